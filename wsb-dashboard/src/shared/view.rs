//! View models derived from the current snapshot
//!
//! [`build_view`] is a pure function of the latest [`Snapshot`] and the
//! [`ViewState`]. Nothing here is cached between calls; every refresh
//! recomputes the whole view.

use serde::{Deserialize, Serialize};

use crate::shared::bars::{move_bar, sentiment_bar, MoveBar, SentimentBar};
use crate::shared::classify::{
    classify, earnings_class, earnings_emoji, signed_tone, streak_tone, tape_vibe, vibe, Category,
    Tone, VibeIcon,
};
use crate::shared::format::{
    format_count, format_expiry, format_move, format_sentiment, format_strike_range,
    format_surprise, format_symbol, format_tape_sentiment, format_volatility,
};
use crate::shared::ranking::{rank, SortKey, SortState};
use crate::shared::summary::{
    percent_split, ratio_label, ratio_tone, summarize, PercentSplit, Summary,
};
use crate::shared::types::{
    EarningsRecord, EarningsSummary, OptionType, OptionsFlowEntry, OptionsResponse, PlayMention,
    TickerAggregate,
};

/// Streaks shorter than this are not worth a label
pub const MIN_STREAK: u32 = 2;

/// Lookback window passed through to the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum Timeframe {
    #[default]
    #[serde(rename = "24h")]
    H24,
    #[serde(rename = "48h")]
    H48,
    #[serde(rename = "72h")]
    H72,
}

impl Timeframe {
    pub const ALL: [Timeframe; 3] = [Timeframe::H24, Timeframe::H48, Timeframe::H72];

    pub fn hours(&self) -> u32 {
        match self {
            Timeframe::H24 => 24,
            Timeframe::H48 => 48,
            Timeframe::H72 => 72,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Timeframe::H24 => "24h",
            Timeframe::H48 => "48h",
            Timeframe::H72 => "72h",
        }
    }

    pub fn from_hours(hours: u32) -> Option<Self> {
        Timeframe::ALL.into_iter().find(|tf| tf.hours() == hours)
    }

    /// 24h → 48h → 72h → 24h
    pub fn next(&self) -> Self {
        match self {
            Timeframe::H24 => Timeframe::H48,
            Timeframe::H48 => Timeframe::H72,
            Timeframe::H72 => Timeframe::H24,
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Everything the user can change, kept apart from the data
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct ViewState {
    pub timeframe: Timeframe,
    pub sort: SortState,
    /// Ticker whose earnings panel is open
    pub selected: Option<String>,
    /// Highlighted table row
    pub cursor: usize,
}

impl ViewState {
    pub fn new(timeframe: Timeframe) -> Self {
        Self {
            timeframe,
            ..Self::default()
        }
    }

    /// Open the earnings panel for `ticker`, or close it if already open.
    ///
    /// Returns `true` when the ticker is now selected.
    pub fn select_ticker(&mut self, ticker: &str) -> bool {
        if self.selected.as_deref() == Some(ticker) {
            self.selected = None;
            false
        } else {
            self.selected = Some(ticker.to_string());
            true
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn sort_by(&mut self, key: SortKey) {
        self.sort.select(key);
    }

    pub fn cycle_timeframe(&mut self) -> Timeframe {
        self.timeframe = self.timeframe.next();
        self.timeframe
    }

    /// Move the row cursor, clamped to `rows`
    pub fn move_cursor(&mut self, delta: isize, rows: usize) {
        if rows == 0 {
            self.cursor = 0;
            return;
        }
        let target = self.cursor as isize + delta;
        self.cursor = target.clamp(0, rows as isize - 1) as usize;
    }
}

/// Earnings lookup for the selected ticker
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EarningsOutcome {
    Loading,
    Ready(EarningsSummary),
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EarningsSlot {
    pub symbol: String,
    pub outcome: EarningsOutcome,
}

/// The latest data, each part replaced wholesale on refresh
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Snapshot {
    pub tickers: Vec<TickerAggregate>,
    pub options: Option<OptionsResponse>,
    pub earnings: Option<EarningsSlot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerRow {
    /// 1-based position after sorting
    pub rank: usize,
    pub ticker: String,
    pub symbol: String,
    pub vibe: VibeIcon,
    pub vibe_glyph: &'static str,
    pub mention_count: u64,
    pub avg_sentiment: f64,
    pub sentiment_text: String,
    pub category: Category,
    pub bar: SentimentBar,
    pub unique_authors: u64,
    pub top_upvotes_text: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TapeItem {
    pub symbol: String,
    pub sentiment_text: String,
    pub tone: Tone,
    pub glyph: &'static str,
    pub mentions_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowRow {
    pub symbol: String,
    pub option_type: OptionType,
    pub badge: &'static str,
    pub count: u64,
    pub strike_range: String,
    pub expiry: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayRow {
    pub raw_match: String,
    pub expiry: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionsView {
    pub calls: u64,
    pub puts: u64,
    pub split: PercentSplit,
    pub call_caption: Option<String>,
    pub put_caption: Option<String>,
    pub ratio: f64,
    pub ratio_text: String,
    pub ratio_label: &'static str,
    pub ratio_tone: Tone,
    pub flow: Vec<FlowRow>,
    pub top_calls: Vec<PlayRow>,
    pub top_puts: Vec<PlayRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreakLabel {
    pub text: String,
    pub tone: Tone,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRow {
    pub date: String,
    pub bar: MoveBar,
    pub move_text: String,
    pub move_tone: Tone,
    pub emoji: &'static str,
    pub class_tone: Tone,
    pub surprise_text: String,
    pub surprise_tone: Tone,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EarningsView {
    pub symbol: String,
    pub moon_pct_text: String,
    pub tank_pct_text: String,
    pub avg_move_text: String,
    pub guh_score_text: String,
    pub commentary: String,
    pub meta: String,
    pub streak: Option<StreakLabel>,
    pub cached: bool,
    pub best_text: String,
    pub worst_text: String,
    pub volatility_text: String,
    pub history: Vec<HistoryRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EarningsPanel {
    Loading { symbol: String },
    Failed { symbol: String, message: String },
    Ready(EarningsView),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub timeframe: Timeframe,
    pub sort: SortState,
    pub summary: Summary,
    pub rows: Vec<TickerRow>,
    pub tape: Vec<TapeItem>,
    pub options: Option<OptionsView>,
    pub earnings: Option<EarningsPanel>,
}

pub fn build_view(snapshot: &Snapshot, state: &ViewState) -> DashboardView {
    let selected = state.selected.as_deref();

    let rows = rank(&snapshot.tickers, state.sort)
        .into_iter()
        .enumerate()
        .map(|(index, record)| ticker_row(index + 1, record, selected))
        .collect();

    DashboardView {
        timeframe: state.timeframe,
        sort: state.sort,
        summary: summarize(&snapshot.tickers),
        rows,
        tape: tape_items(&snapshot.tickers),
        options: snapshot.options.as_ref().and_then(options_view),
        earnings: selected.map(|symbol| earnings_panel(symbol, snapshot.earnings.as_ref())),
    }
}

fn ticker_row(rank: usize, record: TickerAggregate, selected: Option<&str>) -> TickerRow {
    let icon = vibe(record.avg_sentiment, record.mention_count);

    TickerRow {
        rank,
        symbol: format_symbol(&record.ticker),
        vibe: icon,
        vibe_glyph: icon.glyph(),
        mention_count: record.mention_count,
        avg_sentiment: record.avg_sentiment,
        sentiment_text: format_sentiment(record.avg_sentiment),
        category: classify(record.avg_sentiment),
        bar: sentiment_bar(record.avg_sentiment),
        unique_authors: record.unique_authors,
        top_upvotes_text: format_count(record.top_upvotes),
        selected: selected == Some(record.ticker.as_str()),
        ticker: record.ticker,
    }
}

/// Snapshot order, repeated once so the scroll can wrap without a gap
fn tape_items(tickers: &[TickerAggregate]) -> Vec<TapeItem> {
    tickers
        .iter()
        .chain(tickers.iter())
        .map(|record| TapeItem {
            symbol: format_symbol(&record.ticker),
            sentiment_text: format_tape_sentiment(record.avg_sentiment),
            tone: classify(record.avg_sentiment).tone(),
            glyph: tape_vibe(record.avg_sentiment).glyph(),
            mentions_text: format!("{}x", record.mention_count),
        })
        .collect()
}

/// `None` when there is nothing worth showing
fn options_view(response: &OptionsResponse) -> Option<OptionsView> {
    let summary = response.summary.as_ref()?;
    if summary.total_options == 0 {
        return None;
    }

    let split = percent_split(summary.calls, summary.puts);
    let ratio = summary.call_put_ratio;

    Some(OptionsView {
        calls: summary.calls,
        puts: summary.puts,
        call_caption: split
            .show_call_caption()
            .then(|| format!("{} calls", summary.calls)),
        put_caption: split
            .show_put_caption()
            .then(|| format!("{} puts", summary.puts)),
        split,
        ratio,
        ratio_text: ratio.to_string(),
        ratio_label: ratio_label(ratio),
        ratio_tone: ratio_tone(ratio),
        flow: response.flow.iter().map(flow_row).collect(),
        top_calls: summary.top_calls.iter().map(play_row).collect(),
        top_puts: summary.top_puts.iter().map(play_row).collect(),
    })
}

fn flow_row(entry: &OptionsFlowEntry) -> FlowRow {
    FlowRow {
        symbol: format_symbol(&entry.ticker),
        option_type: entry.option_type,
        badge: entry.option_type.badge(),
        count: entry.count,
        strike_range: format_strike_range(entry.min_strike, entry.max_strike),
        expiry: format_expiry(&entry.expiry_categories),
    }
}

fn play_row(play: &PlayMention) -> PlayRow {
    PlayRow {
        raw_match: play.raw_match.clone(),
        expiry: play
            .expiry_category
            .as_ref()
            .filter(|category| !category.is_empty())
            .cloned(),
    }
}

fn earnings_panel(symbol: &str, slot: Option<&EarningsSlot>) -> EarningsPanel {
    let outcome = slot
        .filter(|slot| slot.symbol == symbol)
        .map(|slot| &slot.outcome);

    match outcome {
        Some(EarningsOutcome::Ready(summary)) => EarningsPanel::Ready(earnings_view(symbol, summary)),
        Some(EarningsOutcome::Failed { message }) => EarningsPanel::Failed {
            symbol: symbol.to_string(),
            message: message.clone(),
        },
        Some(EarningsOutcome::Loading) | None => EarningsPanel::Loading {
            symbol: symbol.to_string(),
        },
    }
}

fn earnings_view(symbol: &str, summary: &EarningsSummary) -> EarningsView {
    let streak = (summary.streak >= MIN_STREAK).then(|| StreakLabel {
        text: format!("{} {}s in a row", summary.streak, summary.streak_direction),
        tone: streak_tone(&summary.streak_direction),
    });

    EarningsView {
        symbol: symbol.to_string(),
        moon_pct_text: format!("{}%", summary.moon_pct),
        tank_pct_text: format!("{}%", summary.tank_pct),
        avg_move_text: format_move(summary.avg_move),
        guh_score_text: summary.guh_score.to_string(),
        commentary: summary.commentary.clone(),
        meta: format!(
            "{} earnings over {} years",
            summary.events, summary.years_covered
        ),
        streak,
        cached: summary.cached,
        best_text: format!("Best: {}", format_move(summary.max_moon)),
        worst_text: format!("Worst: {}", format_move(summary.max_tank)),
        volatility_text: format!("Volatility: {}", format_volatility(summary.volatility)),
        history: summary.history.iter().map(history_row).collect(),
    }
}

fn history_row(record: &EarningsRecord) -> HistoryRow {
    let bar = move_bar(record.move_pct);

    HistoryRow {
        date: record.date.clone(),
        move_text: format_move(record.move_pct),
        move_tone: if bar.positive { Tone::Green } else { Tone::Red },
        bar,
        emoji: earnings_emoji(record.classification),
        class_tone: earnings_class(record.classification),
        surprise_text: format_surprise(record.surprise_pct),
        surprise_tone: record.surprise_pct.map(signed_tone).unwrap_or(Tone::Dim),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::types::{MoveClass, OptionsSummary};

    fn ticker(symbol: &str, mentions: u64, sentiment: f64) -> TickerAggregate {
        TickerAggregate {
            ticker: symbol.to_string(),
            mention_count: mentions,
            avg_sentiment: sentiment,
            unique_authors: mentions / 2,
            top_upvotes: mentions as i64 * 100,
            latest_mention: None,
        }
    }

    fn snapshot() -> Snapshot {
        Snapshot {
            tickers: vec![
                ticker("AMC", 8, -0.35),
                ticker("GME", 40, 0.42),
                ticker("SPY", 20, 0.0),
            ],
            options: None,
            earnings: None,
        }
    }

    fn options(total: u64, calls: u64, puts: u64, ratio: f64) -> OptionsResponse {
        OptionsResponse {
            summary: Some(OptionsSummary {
                total_options: total,
                calls,
                puts,
                call_put_ratio: ratio,
                top_calls: vec![PlayMention {
                    raw_match: "NVDA 200c 3/27".to_string(),
                    expiry_category: Some("dated".to_string()),
                    ticker: None,
                    strike: None,
                    expiry: None,
                    upvotes: None,
                }],
                top_puts: vec![PlayMention {
                    raw_match: "SPY 680p".to_string(),
                    expiry_category: Some(String::new()),
                    ticker: None,
                    strike: None,
                    expiry: None,
                    upvotes: None,
                }],
            }),
            flow: vec![OptionsFlowEntry {
                ticker: "NVDA".to_string(),
                option_type: OptionType::Call,
                count: 5,
                min_strike: 200.0,
                max_strike: 210.0,
                expiry_categories: "dated,weekly,dated".to_string(),
                avg_strike: None,
                avg_sentiment: None,
                unique_authors: None,
            }],
            hours: Some(24),
        }
    }

    fn earnings(streak: u32, direction: &str) -> EarningsSummary {
        EarningsSummary {
            symbol: "GME".to_string(),
            events: 8,
            years_covered: 1.8,
            moon_pct: 62.5,
            tank_pct: 25.0,
            avg_move: -1.34,
            max_moon: 12.0,
            max_tank: -9.5,
            volatility: 7.04,
            streak,
            streak_direction: direction.to_string(),
            guh_score: 8.2,
            commentary: "Leans bullish after earnings".to_string(),
            history: vec![
                EarningsRecord {
                    date: "2024-06-11".to_string(),
                    move_pct: 10.0,
                    classification: MoveClass::Moon,
                    surprise_pct: Some(4.0),
                    eps_estimate: None,
                    eps_actual: None,
                    price_before: None,
                    price_after: None,
                },
                EarningsRecord {
                    date: "2024-03-26".to_string(),
                    move_pct: -10.0,
                    classification: MoveClass::Tank,
                    surprise_pct: None,
                    eps_estimate: None,
                    eps_actual: None,
                    price_before: None,
                    price_after: None,
                },
            ],
            cached: true,
            ..EarningsSummary::default()
        }
    }

    #[test]
    fn test_build_view_rows() {
        let view = build_view(&snapshot(), &ViewState::default());

        let tickers: Vec<&str> = view.rows.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["GME", "SPY", "AMC"]);
        let ranks: Vec<usize> = view.rows.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);

        let gme = &view.rows[0];
        assert_eq!(gme.symbol, "$GME");
        assert_eq!(gme.vibe, VibeIcon::Rocket);
        assert_eq!(gme.sentiment_text, "+0.42");
        assert_eq!(gme.category, Category::Bullish);
        assert!((gme.bar.width_pct - 21.0).abs() < 1e-9);
        assert_eq!(gme.top_upvotes_text, "4.0k");
        assert!(!gme.selected);

        // Under the volume gate AMC falls back to the score-only bands
        assert_eq!(view.rows[2].vibe, VibeIcon::ChartDown);

        assert_eq!(
            view.summary,
            Summary {
                bull_count: 1,
                bear_count: 1,
                total_mentions: 68,
                ticker_count: 3,
            }
        );
    }

    #[test]
    fn test_build_view_empty_snapshot() {
        let view = build_view(&Snapshot::default(), &ViewState::default());
        assert!(view.rows.is_empty());
        assert!(view.tape.is_empty());
        assert_eq!(view.summary, Summary::default());
        assert!(view.options.is_none());
        assert!(view.earnings.is_none());
    }

    #[test]
    fn test_tape_doubles_snapshot_order() {
        let view = build_view(&snapshot(), &ViewState::default());
        let symbols: Vec<&str> = view.tape.iter().map(|t| t.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["$AMC", "$GME", "$SPY", "$AMC", "$GME", "$SPY"]);
        assert_eq!(view.tape[0].glyph, "💀");
        assert_eq!(view.tape[0].tone, Tone::Red);
        assert_eq!(view.tape[2].sentiment_text, "+0.00");
        assert_eq!(view.tape[1].mentions_text, "40x");
    }

    #[test]
    fn test_options_hidden_without_activity() {
        let mut snapshot = snapshot();

        snapshot.options = Some(options(0, 0, 0, 0.0));
        assert!(build_view(&snapshot, &ViewState::default()).options.is_none());

        snapshot.options = Some(OptionsResponse::default());
        assert!(build_view(&snapshot, &ViewState::default()).options.is_none());
    }

    #[test]
    fn test_options_view() {
        let mut snapshot = snapshot();
        snapshot.options = Some(options(12, 9, 3, 3.0));

        let view = build_view(&snapshot, &ViewState::default()).options.unwrap();
        assert_eq!(view.split, PercentSplit { call_pct: 75, put_pct: 25 });
        assert_eq!(view.call_caption.as_deref(), Some("9 calls"));
        assert_eq!(view.put_caption.as_deref(), Some("3 puts"));
        assert_eq!(view.ratio_text, "3");
        assert_eq!(view.ratio_label, "apes are yoloing calls");
        assert_eq!(view.ratio_tone, Tone::Green);

        assert_eq!(view.flow[0].symbol, "$NVDA");
        assert_eq!(view.flow[0].badge, "CALL");
        assert_eq!(view.flow[0].strike_range, "$200 — $210");
        assert_eq!(view.flow[0].expiry, "dated, weekly");

        assert_eq!(view.top_calls[0].expiry.as_deref(), Some("dated"));
        // Empty expiry is treated as missing
        assert_eq!(view.top_puts[0].expiry, None);
    }

    #[test]
    fn test_earnings_panel_follows_selection() {
        let mut snapshot = snapshot();
        let mut state = ViewState::default();

        assert!(build_view(&snapshot, &state).earnings.is_none());

        assert!(state.select_ticker("GME"));
        assert_eq!(
            build_view(&snapshot, &state).earnings,
            Some(EarningsPanel::Loading {
                symbol: "GME".to_string()
            })
        );

        // Data for another symbol does not leak into the panel
        snapshot.earnings = Some(EarningsSlot {
            symbol: "AMC".to_string(),
            outcome: EarningsOutcome::Ready(earnings(3, "moon")),
        });
        assert!(matches!(
            build_view(&snapshot, &state).earnings,
            Some(EarningsPanel::Loading { .. })
        ));

        snapshot.earnings = Some(EarningsSlot {
            symbol: "GME".to_string(),
            outcome: EarningsOutcome::Failed {
                message: "Crystal ball is broken".to_string(),
            },
        });
        assert!(matches!(
            build_view(&snapshot, &state).earnings,
            Some(EarningsPanel::Failed { .. })
        ));

        let view = build_view(&snapshot, &state);
        assert!(view.rows.iter().find(|r| r.ticker == "GME").unwrap().selected);

        // Selecting again closes the panel
        assert!(!state.select_ticker("GME"));
        assert!(build_view(&snapshot, &state).earnings.is_none());
    }

    #[test]
    fn test_earnings_view() {
        let view = earnings_view("GME", &earnings(3, "moon"));

        assert_eq!(view.moon_pct_text, "62.5%");
        assert_eq!(view.tank_pct_text, "25%");
        assert_eq!(view.avg_move_text, "-1.3%");
        assert_eq!(view.guh_score_text, "8.2");
        assert_eq!(view.meta, "8 earnings over 1.8 years");
        assert_eq!(
            view.streak,
            Some(StreakLabel {
                text: "3 moons in a row".to_string(),
                tone: Tone::Green,
            })
        );
        assert!(view.cached);
        assert_eq!(view.best_text, "Best: +12.0%");
        assert_eq!(view.worst_text, "Worst: -9.5%");
        assert_eq!(view.volatility_text, "Volatility: 7.0");

        let gain = &view.history[0];
        assert!((gain.bar.offset_pct - 50.0).abs() < 1e-9);
        assert_eq!(gain.move_text, "+10.0%");
        assert_eq!(gain.move_tone, Tone::Green);
        assert_eq!(gain.emoji, "🚀");
        assert_eq!(gain.surprise_text, "EPS +4%");
        assert_eq!(gain.surprise_tone, Tone::Green);

        let loss = &view.history[1];
        assert!((loss.bar.offset_pct - 20.0).abs() < 1e-9);
        assert_eq!(loss.move_tone, Tone::Red);
        assert_eq!(loss.class_tone, Tone::Red);
        assert_eq!(loss.surprise_text, "—");
        assert_eq!(loss.surprise_tone, Tone::Dim);
    }

    #[test]
    fn test_short_streak_has_no_label() {
        assert!(earnings_view("GME", &earnings(1, "tank")).streak.is_none());

        let streak = earnings_view("GME", &earnings(2, "tank")).streak.unwrap();
        assert_eq!(streak.text, "2 tanks in a row");
        assert_eq!(streak.tone, Tone::Red);
    }

    #[test]
    fn test_view_state_controls() {
        let mut state = ViewState::new(Timeframe::H72);
        assert_eq!(state.cycle_timeframe(), Timeframe::H24);
        assert_eq!(state.cycle_timeframe(), Timeframe::H48);

        state.sort_by(SortKey::Ticker);
        assert_eq!(state.sort.key, SortKey::Ticker);
        assert!(state.sort.descending);

        state.move_cursor(5, 3);
        assert_eq!(state.cursor, 2);
        state.move_cursor(-10, 3);
        assert_eq!(state.cursor, 0);
        state.move_cursor(1, 0);
        assert_eq!(state.cursor, 0);
    }

    #[test]
    fn test_timeframe_hours() {
        assert_eq!(Timeframe::from_hours(48), Some(Timeframe::H48));
        assert_eq!(Timeframe::from_hours(12), None);
        assert_eq!(Timeframe::H72.hours(), 72);
        assert_eq!(Timeframe::H24.to_string(), "24h");
    }
}
