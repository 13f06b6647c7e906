//! Ratatui rendering for the WSB dashboard

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use super::bars::{cells, MoveBar, SentimentBar};
use super::classify::Tone;
use super::format::PLACEHOLDER;
use super::ranking::COLUMNS;
use super::state::{DashboardScreen, FetchStatus};
use super::view::{
    DashboardView, EarningsPanel, EarningsView, OptionsView, PlayRow, TapeItem, TickerRow,
};

const C_BULL: Color = Color::Rgb(100, 220, 100);
const C_BEAR: Color = Color::Rgb(220, 100, 100);
const C_DIM: Color = Color::Rgb(120, 120, 120);
const C_BRIGHT: Color = Color::Rgb(220, 220, 220);
const C_ACCENT: Color = Color::Rgb(100, 180, 220);
const C_GOLD: Color = Color::Rgb(220, 190, 80);
const C_HIGHLIGHT: Color = Color::Rgb(40, 50, 70);

/// Cells behind a full-strength sentiment bar
const SENTIMENT_BAR_CELLS: u16 = 10;
/// Cells on an earnings move track
const MOVE_TRACK_CELLS: u16 = 20;

pub fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Green => C_BULL,
        Tone::Red => C_BEAR,
        Tone::Dim => C_DIM,
    }
}

/// Draw the whole dashboard. `tape_offset` advances one item per tick.
pub fn render_dashboard(f: &mut Frame, screen: &DashboardScreen, tape_offset: usize) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_header(f, chunks[0], screen);
    render_tape(f, chunks[1], &screen.view.tape, tape_offset);

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
        .split(chunks[2]);

    render_ticker_panel(f, main[0], screen);

    match &screen.view.earnings {
        Some(panel) => {
            let side = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(main[1]);
            render_earnings_panel(f, side[0], panel);
            render_options_panel(f, side[1], screen.view.options.as_ref());
        }
        None => render_options_panel(f, main[1], screen.view.options.as_ref()),
    }

    render_footer(f, chunks[3], screen);
}

fn render_header(f: &mut Frame, area: Rect, screen: &DashboardScreen) {
    let view = &screen.view;
    let summary = &view.summary;

    let (status_text, status_color) = match &screen.status {
        FetchStatus::Loading => ("LOADING".to_string(), C_GOLD),
        FetchStatus::Ready => ("LIVE".to_string(), C_BULL),
        FetchStatus::Failed(_) => ("API DOWN".to_string(), C_BEAR),
    };

    let line = Line::from(vec![
        Span::styled(
            "WSB SENTIMENT ",
            Style::default().fg(C_GOLD).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("[{}]  ", view.timeframe), Style::default().fg(C_ACCENT)),
        Span::styled("Tickers ", Style::default().fg(C_DIM)),
        Span::styled(
            format!("{}  ", summary.ticker_count),
            Style::default().fg(C_BRIGHT),
        ),
        Span::styled("Mentions ", Style::default().fg(C_DIM)),
        Span::styled(
            format!("{}  ", summary.total_mentions),
            Style::default().fg(C_BRIGHT),
        ),
        Span::styled("Bulls ", Style::default().fg(C_DIM)),
        Span::styled(format!("{}  ", summary.bull_count), Style::default().fg(C_BULL)),
        Span::styled("Bears ", Style::default().fg(C_DIM)),
        Span::styled(format!("{}  ", summary.bear_count), Style::default().fg(C_BEAR)),
        Span::styled(status_text, Style::default().fg(status_color)),
        Span::styled(
            screen
                .last_updated
                .as_deref()
                .map(|at| format!("  updated {at}"))
                .unwrap_or_default(),
            Style::default().fg(C_DIM),
        ),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(C_ACCENT));
    f.render_widget(Paragraph::new(line).block(block), area);
}

/// The tape holds the snapshot twice; rotate within the first copy
fn render_tape(f: &mut Frame, area: Rect, tape: &[TapeItem], offset: usize) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(C_DIM));

    if tape.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled("tape is quiet", Style::default().fg(C_DIM))).block(block),
            area,
        );
        return;
    }

    let unique = (tape.len() / 2).max(1);
    let spans: Vec<Span> = tape
        .iter()
        .skip(offset % unique)
        .flat_map(|item| {
            let color = tone_color(item.tone);
            [
                Span::styled(
                    format!("{} ", item.symbol),
                    Style::default().fg(C_BRIGHT).add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("{} ", item.sentiment_text), Style::default().fg(color)),
                Span::raw(format!("{} ", item.glyph)),
                Span::styled(format!("{}   ", item.mentions_text), Style::default().fg(C_DIM)),
            ]
        })
        .collect();

    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_ticker_panel(f: &mut Frame, area: Rect, screen: &DashboardScreen) {
    let view = &screen.view;
    let block = Block::default()
        .title(format!(" TICKERS ({}) ", view.timeframe))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(C_ACCENT));

    if view.rows.is_empty() {
        let lines = empty_table_lines(&screen.status, view);
        f.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
            area,
        );
        return;
    }

    let header = Row::new(COLUMNS.iter().map(|column| {
        let label = match column.key {
            Some(key) if key == view.sort.key => format!("{} {}", column.label, view.sort.arrow()),
            _ => column.label.to_string(),
        };
        Cell::from(label).style(Style::default().fg(C_GOLD).add_modifier(Modifier::BOLD))
    }))
    .height(1);

    let rows = view.rows.iter().map(ticker_table_row);

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Min(18),
            Constraint::Length(6),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(Style::default().bg(C_HIGHLIGHT).add_modifier(Modifier::BOLD));

    let mut state = TableState::default().with_selected(Some(screen.cursor));
    f.render_stateful_widget(table, area, &mut state);
}

fn empty_table_lines(status: &FetchStatus, view: &DashboardView) -> Vec<Line<'static>> {
    match status {
        FetchStatus::Loading => vec![Line::from(Span::styled(
            "Loading the degeneracy...",
            Style::default().fg(C_DIM),
        ))],
        FetchStatus::Failed(message) => vec![
            Line::from(Span::styled(
                "Failed to reach the sentiment API",
                Style::default().fg(C_BEAR).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(message.clone(), Style::default().fg(C_DIM))),
            Line::from(Span::styled(
                "Is the backend running? uvicorn api:app --port 8000",
                Style::default().fg(C_DIM),
            )),
        ],
        FetchStatus::Ready => vec![
            Line::from(Span::styled(
                format!("No tickers in the last {}", view.timeframe),
                Style::default().fg(C_DIM),
            )),
            Line::from(Span::styled(
                "Press s to scrape r/wallstreetbets",
                Style::default().fg(C_DIM),
            )),
        ],
    }
}

fn ticker_table_row(row: &TickerRow) -> Row<'static> {
    let sentiment_color = tone_color(row.category.tone());
    let symbol_style = if row.selected {
        Style::default().fg(C_GOLD).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(C_BRIGHT)
    };

    Row::new(vec![
        Cell::from(row.rank.to_string()).style(Style::default().fg(C_DIM)),
        Cell::from(format!("{} {}", row.vibe_glyph, row.symbol)).style(symbol_style),
        Cell::from(row.mention_count.to_string()).style(Style::default().fg(C_BRIGHT)),
        Cell::from(Line::from(vec![
            Span::styled(format!("{:>6} ", row.sentiment_text), Style::default().fg(sentiment_color)),
            Span::styled(sentiment_bar_text(&row.bar), Style::default().fg(sentiment_color)),
        ])),
        Cell::from(row.unique_authors.to_string()).style(Style::default().fg(C_DIM)),
        Cell::from(row.top_upvotes_text.clone()).style(Style::default().fg(C_DIM)),
    ])
}

fn sentiment_bar_text(bar: &SentimentBar) -> String {
    "█".repeat(cells(bar.width_pct, SENTIMENT_BAR_CELLS) as usize)
}

/// Gains fill right of the centre line, losses fill left of it
pub fn move_bar_text(bar: &MoveBar, track: u16) -> (String, String, String) {
    let lead = cells(bar.offset_pct, track);
    let fill = cells(bar.width_pct, track).min(track - lead.min(track));
    let trail = track.saturating_sub(lead + fill);

    (
        "·".repeat(lead as usize),
        "█".repeat(fill as usize),
        "·".repeat(trail as usize),
    )
}

pub fn render_earnings_panel(f: &mut Frame, area: Rect, panel: &EarningsPanel) {
    let (title, lines) = match panel {
        EarningsPanel::Loading { symbol } => (
            format!(" EARNINGS ${symbol} "),
            vec![Line::from(Span::styled(
                "Consulting the crystal ball...",
                Style::default().fg(C_DIM),
            ))],
        ),
        EarningsPanel::Failed { symbol, message } => (
            format!(" EARNINGS ${symbol} "),
            vec![Line::from(Span::styled(
                message.clone(),
                Style::default().fg(C_BEAR),
            ))],
        ),
        EarningsPanel::Ready(view) => (format!(" EARNINGS ${} ", view.symbol), earnings_lines(view)),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(C_GOLD));
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn earnings_lines(view: &EarningsView) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Moon ", Style::default().fg(C_DIM)),
            Span::styled(format!("{}  ", view.moon_pct_text), Style::default().fg(C_BULL)),
            Span::styled("Tank ", Style::default().fg(C_DIM)),
            Span::styled(format!("{}  ", view.tank_pct_text), Style::default().fg(C_BEAR)),
            Span::styled("Avg ", Style::default().fg(C_DIM)),
            Span::styled(format!("{}  ", view.avg_move_text), Style::default().fg(C_BRIGHT)),
            Span::styled("GUH ", Style::default().fg(C_DIM)),
            Span::styled(
                view.guh_score_text.clone(),
                Style::default().fg(C_GOLD).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(
            view.commentary.clone(),
            Style::default().fg(C_BRIGHT).add_modifier(Modifier::ITALIC),
        )),
    ];

    let mut meta = vec![Span::styled(view.meta.clone(), Style::default().fg(C_DIM))];
    if let Some(streak) = &view.streak {
        meta.push(Span::raw("  "));
        meta.push(Span::styled(
            streak.text.clone(),
            Style::default().fg(tone_color(streak.tone)),
        ));
    }
    if view.cached {
        meta.push(Span::styled("  (cached)", Style::default().fg(C_DIM)));
    }
    lines.push(Line::from(meta));

    lines.push(Line::from(vec![
        Span::styled(format!("{}  ", view.best_text), Style::default().fg(C_BULL)),
        Span::styled(format!("{}  ", view.worst_text), Style::default().fg(C_BEAR)),
        Span::styled(view.volatility_text.clone(), Style::default().fg(C_DIM)),
    ]));
    lines.push(Line::from(""));

    for row in &view.history {
        let (lead, fill, trail) = move_bar_text(&row.bar, MOVE_TRACK_CELLS);
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", row.date), Style::default().fg(C_DIM)),
            Span::styled(lead, Style::default().fg(C_DIM)),
            Span::styled(fill, Style::default().fg(tone_color(row.move_tone))),
            Span::styled(trail, Style::default().fg(C_DIM)),
            Span::styled(
                format!(" {:>7} ", row.move_text),
                Style::default().fg(tone_color(row.move_tone)),
            ),
            Span::styled(format!("{} ", row.emoji), Style::default().fg(tone_color(row.class_tone))),
            Span::styled(
                row.surprise_text.clone(),
                Style::default().fg(tone_color(row.surprise_tone)),
            ),
        ]));
    }

    lines
}

pub fn render_options_panel(f: &mut Frame, area: Rect, options: Option<&OptionsView>) {
    let block = Block::default()
        .title(" OPTIONS FLOW ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(C_ACCENT));

    let Some(options) = options else {
        f.render_widget(
            Paragraph::new(Span::styled(
                "No options chatter yet",
                Style::default().fg(C_DIM),
            ))
            .block(block),
            area,
        );
        return;
    };

    let inner = block.inner(area);
    f.render_widget(block, area);

    let track = inner.width.max(1);
    let call_cells = cells(options.split.call_pct as f64, track);
    let put_cells = track.saturating_sub(call_cells);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("█".repeat(call_cells as usize), Style::default().fg(C_BULL)),
            Span::styled("█".repeat(put_cells as usize), Style::default().fg(C_BEAR)),
        ]),
        Line::from(vec![
            Span::styled(
                options.call_caption.clone().unwrap_or_default(),
                Style::default().fg(C_BULL),
            ),
            Span::raw("  "),
            Span::styled(
                options.put_caption.clone().unwrap_or_default(),
                Style::default().fg(C_BEAR),
            ),
        ]),
        Line::from(vec![
            Span::styled("C/P ", Style::default().fg(C_DIM)),
            Span::styled(
                format!("{} ", options.ratio_text),
                Style::default()
                    .fg(tone_color(options.ratio_tone))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(options.ratio_label, Style::default().fg(C_DIM)),
        ]),
        Line::from(""),
    ];

    for row in &options.flow {
        let badge_color = if row.option_type.is_call() { C_BULL } else { C_BEAR };
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<4} ", row.badge),
                Style::default().fg(badge_color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("{:<7}", row.symbol), Style::default().fg(C_BRIGHT)),
            Span::styled(format!("{:>3}x ", row.count), Style::default().fg(C_BRIGHT)),
            Span::styled(format!("{}  ", row.strike_range), Style::default().fg(C_DIM)),
            Span::styled(row.expiry.clone(), Style::default().fg(C_DIM)),
        ]));
    }

    lines.push(Line::from(""));
    lines.extend(play_lines("Top calls", &options.top_calls, C_BULL));
    lines.extend(play_lines("Top puts", &options.top_puts, C_BEAR));

    f.render_widget(Paragraph::new(lines), inner);
}

fn play_lines(title: &'static str, plays: &[PlayRow], color: Color) -> Vec<Line<'static>> {
    if plays.is_empty() {
        return Vec::new();
    }

    std::iter::once(Line::from(Span::styled(
        title,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .chain(plays.iter().map(|play| {
        Line::from(vec![
            Span::styled(format!("  {} ", play.raw_match), Style::default().fg(C_BRIGHT)),
            Span::styled(
                play.expiry.clone().unwrap_or_else(|| PLACEHOLDER.to_string()),
                Style::default().fg(C_DIM),
            ),
        ])
    }))
    .collect()
}

fn render_footer(f: &mut Frame, area: Rect, screen: &DashboardScreen) {
    let mut spans = vec![Span::styled(
        "q quit  1-5 sort  t timeframe  ↑↓ move  enter earnings  s scrape",
        Style::default().fg(C_DIM),
    )];

    if screen.scraping {
        spans.push(Span::styled("  scraping...", Style::default().fg(C_GOLD)));
    }
    if let Some(notice) = &screen.notice {
        spans.push(Span::styled(format!("  {notice}"), Style::default().fg(C_BEAR)));
    } else if let FetchStatus::Failed(message) = &screen.status {
        if !screen.view.rows.is_empty() {
            spans.push(Span::styled(
                format!("  showing stale data: {message}"),
                Style::default().fg(C_BEAR),
            ));
        }
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::bars::move_bar;

    #[test]
    fn test_move_bar_text() {
        struct TestCase {
            input: f64,
            expected: (usize, usize, usize),
        }

        let tests = vec![
            TestCase { input: 10.0, expected: (10, 6, 4) },  // TC0: 30% right of centre
            TestCase { input: -10.0, expected: (4, 6, 10) }, // TC1: 30% left of centre
            TestCase { input: 0.0, expected: (10, 0, 10) },  // TC2
            TestCase { input: 50.0, expected: (10, 10, 0) }, // TC3: capped width stays on track
            TestCase { input: -50.0, expected: (0, 20, 0) }, // TC4
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let (lead, fill, trail) = move_bar_text(&move_bar(test.input), 20);
            let actual = (
                lead.chars().count(),
                fill.chars().count(),
                trail.chars().count(),
            );
            assert_eq!(actual, test.expected, "TC{} failed", index);
        }
    }

    #[test]
    fn test_play_lines_list_every_play() {
        let plays: Vec<PlayRow> = (1..=5)
            .map(|strike| PlayRow {
                raw_match: format!("SPY {strike}c"),
                expiry: (strike % 2 == 0).then(|| "weekly".to_string()),
            })
            .collect();

        // Title plus one line per play
        assert_eq!(play_lines("Top calls", &plays, C_BULL).len(), 6);
        assert!(play_lines("Top puts", &[], C_BEAR).is_empty());
    }

    #[test]
    fn test_tone_color() {
        assert_eq!(tone_color(Tone::Green), C_BULL);
        assert_eq!(tone_color(Tone::Red), C_BEAR);
        assert_eq!(tone_color(Tone::Dim), C_DIM);
    }
}
