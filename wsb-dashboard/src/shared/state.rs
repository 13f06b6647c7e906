//! Dashboard state fed by background fetch tasks.
//!
//! Owns the latest [`Snapshot`] and the user's [`ViewState`], applies
//! [`SnapshotUpdate`]s as they arrive and hands the renderer a fresh
//! [`DashboardScreen`] on every frame.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::shared::feed::SnapshotUpdate;
use crate::shared::ranking::{rank, SortKey};
use crate::shared::view::{
    build_view, DashboardView, EarningsOutcome, EarningsSlot, Snapshot, Timeframe, ViewState,
};

/// Health of the ticker feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum FetchStatus {
    Loading,
    Ready,
    Failed(String),
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardScreen {
    pub status: FetchStatus,
    /// Local wall clock of the last successful ticker refresh
    pub last_updated: Option<String>,
    pub scraping: bool,
    /// Highlighted table row
    pub cursor: usize,
    /// One-line message for the status bar, e.g. a failed scrape
    pub notice: Option<String>,
    pub view: DashboardView,
}

#[derive(Debug, Clone)]
pub struct DashboardState {
    snapshot: Snapshot,
    view_state: ViewState,
    status: FetchStatus,
    last_updated: Option<DateTime<Utc>>,
    scraping: bool,
    notice: Option<String>,
}

impl DashboardState {
    pub fn new(timeframe: Timeframe) -> Self {
        Self {
            snapshot: Snapshot::default(),
            view_state: ViewState::new(timeframe),
            status: FetchStatus::Loading,
            last_updated: None,
            scraping: false,
            notice: None,
        }
    }

    pub fn timeframe(&self) -> Timeframe {
        self.view_state.timeframe
    }

    pub fn status(&self) -> &FetchStatus {
        &self.status
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view_state
    }

    pub fn is_scraping(&self) -> bool {
        self.scraping
    }

    /// Apply one background result. Returns `false` when the update was
    /// stale and dropped.
    pub fn apply(&mut self, update: SnapshotUpdate) -> bool {
        match update {
            SnapshotUpdate::Tickers { timeframe, result } => {
                if timeframe != self.view_state.timeframe {
                    debug!("Dropping {} tickers, now showing {}", timeframe, self.view_state.timeframe);
                    return false;
                }
                match result {
                    Ok(tickers) => {
                        debug!("Applying {} tickers for {}", tickers.len(), timeframe);
                        self.snapshot.tickers = tickers;
                        self.status = FetchStatus::Ready;
                        self.last_updated = Some(Utc::now());
                        let rows = self.snapshot.tickers.len();
                        self.view_state.move_cursor(0, rows);
                    }
                    Err(e) => {
                        warn!("Ticker refresh failed: {}", e);
                        self.status = FetchStatus::Failed(e.to_string());
                    }
                }
            }
            SnapshotUpdate::Options { timeframe, result } => {
                if timeframe != self.view_state.timeframe {
                    debug!("Dropping {} options, now showing {}", timeframe, self.view_state.timeframe);
                    return false;
                }
                match result {
                    Ok(options) => self.snapshot.options = Some(options),
                    // The options panel is optional; keep whatever we had
                    Err(e) => warn!("Options refresh failed: {}", e),
                }
            }
            SnapshotUpdate::Earnings { symbol, result } => {
                if self.view_state.selected.as_deref() != Some(symbol.as_str()) {
                    debug!("Dropping earnings for unselected {}", symbol);
                    return false;
                }
                let outcome = match result {
                    Ok(summary) => EarningsOutcome::Ready(summary),
                    Err(e) => EarningsOutcome::Failed {
                        message: e.to_string(),
                    },
                };
                self.snapshot.earnings = Some(EarningsSlot { symbol, outcome });
            }
            SnapshotUpdate::ScrapeFinished(result) => {
                self.scraping = false;
                self.notice = match result {
                    Ok(()) => None,
                    Err(e) => Some(format!("Scrape failed: {e}")),
                };
            }
        }
        true
    }

    /// Advance the timeframe and clear data that belongs to the old window
    pub fn cycle_timeframe(&mut self) -> Timeframe {
        let timeframe = self.view_state.cycle_timeframe();
        self.snapshot.tickers.clear();
        self.snapshot.options = None;
        self.view_state.cursor = 0;
        self.status = FetchStatus::Loading;
        timeframe
    }

    pub fn sort_by(&mut self, key: SortKey) {
        self.view_state.sort_by(key);
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let rows = self.snapshot.tickers.len();
        self.view_state.move_cursor(delta, rows);
    }

    /// Toggle the earnings panel for the highlighted row.
    ///
    /// Returns the symbol whose earnings now need fetching, if any.
    pub fn select_at_cursor(&mut self) -> Option<String> {
        let ticker = rank(&self.snapshot.tickers, self.view_state.sort)
            .into_iter()
            .nth(self.view_state.cursor)?
            .ticker;

        if self.view_state.select_ticker(&ticker) {
            self.begin_earnings(&ticker);
            Some(ticker)
        } else {
            self.snapshot.earnings = None;
            None
        }
    }

    /// Open the earnings panel for `symbol`, listed in the table or not
    pub fn select(&mut self, symbol: &str) {
        if self.view_state.selected.as_deref() != Some(symbol) {
            self.view_state.select_ticker(symbol);
        }
        self.begin_earnings(symbol);
    }

    pub fn clear_selection(&mut self) {
        self.view_state.clear_selection();
        self.snapshot.earnings = None;
    }

    /// Mark an earnings lookup as in flight
    pub fn begin_earnings(&mut self, symbol: &str) {
        self.snapshot.earnings = Some(EarningsSlot {
            symbol: symbol.to_string(),
            outcome: EarningsOutcome::Loading,
        });
    }

    /// `false` if a scrape is already running
    pub fn begin_scrape(&mut self) -> bool {
        if self.scraping {
            return false;
        }
        self.scraping = true;
        self.notice = None;
        true
    }

    pub fn view(&self) -> DashboardScreen {
        DashboardScreen {
            status: self.status.clone(),
            last_updated: self
                .last_updated
                .map(|at| at.with_timezone(&chrono::Local).format("%H:%M:%S").to_string()),
            scraping: self.scraping,
            cursor: self.view_state.cursor,
            notice: self.notice.clone(),
            view: build_view(&self.snapshot, &self.view_state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::error::DashboardError;
    use crate::shared::types::{EarningsSummary, OptionsResponse, TickerAggregate};
    use crate::shared::view::EarningsPanel;

    fn ticker(symbol: &str, mentions: u64, sentiment: f64) -> TickerAggregate {
        TickerAggregate {
            ticker: symbol.to_string(),
            mention_count: mentions,
            avg_sentiment: sentiment,
            unique_authors: 1,
            top_upvotes: 10,
            latest_mention: None,
        }
    }

    fn tickers_update(timeframe: Timeframe) -> SnapshotUpdate {
        SnapshotUpdate::Tickers {
            timeframe,
            result: Ok(vec![ticker("AMC", 3, -0.2), ticker("GME", 12, 0.4)]),
        }
    }

    #[test]
    fn test_tickers_update_marks_ready() {
        let mut state = DashboardState::new(Timeframe::H24);
        assert_eq!(state.status(), &FetchStatus::Loading);
        assert!(state.view().last_updated.is_none());

        assert!(state.apply(tickers_update(Timeframe::H24)));

        let screen = state.view();
        assert_eq!(screen.status, FetchStatus::Ready);
        assert!(screen.last_updated.is_some());
        assert_eq!(screen.view.rows.len(), 2);
        assert_eq!(screen.view.rows[0].ticker, "GME");
    }

    #[test]
    fn test_stale_timeframe_is_dropped() {
        let mut state = DashboardState::new(Timeframe::H24);
        assert_eq!(state.cycle_timeframe(), Timeframe::H48);

        assert!(!state.apply(tickers_update(Timeframe::H24)));
        assert!(!state.apply(SnapshotUpdate::Options {
            timeframe: Timeframe::H24,
            result: Ok(OptionsResponse::default()),
        }));
        assert!(state.snapshot().tickers.is_empty());
        assert!(state.snapshot().options.is_none());
        assert_eq!(state.status(), &FetchStatus::Loading);

        assert!(state.apply(tickers_update(Timeframe::H48)));
        assert_eq!(state.snapshot().tickers.len(), 2);
    }

    #[test]
    fn test_failed_refresh_keeps_last_tickers() {
        let mut state = DashboardState::new(Timeframe::H24);
        state.apply(tickers_update(Timeframe::H24));

        state.apply(SnapshotUpdate::Tickers {
            timeframe: Timeframe::H24,
            result: Err(DashboardError::Http("connection refused".to_string())),
        });

        assert!(matches!(state.status(), FetchStatus::Failed(_)));
        assert_eq!(state.snapshot().tickers.len(), 2);
    }

    #[test]
    fn test_select_at_cursor_toggles_earnings() {
        let mut state = DashboardState::new(Timeframe::H24);
        assert_eq!(state.select_at_cursor(), None);

        state.apply(tickers_update(Timeframe::H24));
        state.move_cursor(1);

        // Ranked by mentions, the second row is AMC
        assert_eq!(state.select_at_cursor(), Some("AMC".to_string()));
        assert!(matches!(
            state.view().view.earnings,
            Some(EarningsPanel::Loading { .. })
        ));

        assert_eq!(state.select_at_cursor(), None);
        assert!(state.view().view.earnings.is_none());
        assert!(state.snapshot().earnings.is_none());
    }

    #[test]
    fn test_earnings_for_other_symbol_is_dropped() {
        let mut state = DashboardState::new(Timeframe::H24);
        state.apply(tickers_update(Timeframe::H24));
        assert_eq!(state.select_at_cursor(), Some("GME".to_string()));

        assert!(!state.apply(SnapshotUpdate::Earnings {
            symbol: "AMC".to_string(),
            result: Ok(EarningsSummary::default()),
        }));

        assert!(state.apply(SnapshotUpdate::Earnings {
            symbol: "GME".to_string(),
            result: Err(DashboardError::Backend("No earnings data found".to_string())),
        }));
        match state.view().view.earnings {
            Some(EarningsPanel::Failed { symbol, message }) => {
                assert_eq!(symbol, "GME");
                assert!(message.contains("No earnings data found"));
            }
            other => panic!("unexpected panel: {other:?}"),
        }
    }

    #[test]
    fn test_select_unlisted_symbol() {
        let mut state = DashboardState::new(Timeframe::H24);
        state.select("TSLA");
        state.select("TSLA");
        assert_eq!(state.view_state().selected.as_deref(), Some("TSLA"));

        assert!(state.apply(SnapshotUpdate::Earnings {
            symbol: "TSLA".to_string(),
            result: Ok(EarningsSummary::default()),
        }));
        assert!(matches!(
            state.view().view.earnings,
            Some(EarningsPanel::Ready(_))
        ));

        state.clear_selection();
        assert!(state.view().view.earnings.is_none());
    }

    #[test]
    fn test_scrape_lifecycle() {
        let mut state = DashboardState::new(Timeframe::H24);

        assert!(state.begin_scrape());
        assert!(!state.begin_scrape());
        assert!(state.view().scraping);

        state.apply(SnapshotUpdate::ScrapeFinished(Err(DashboardError::Status {
            url: "http://127.0.0.1:8000/api/scrape".to_string(),
            status: 500,
        })));
        let screen = state.view();
        assert!(!screen.scraping);
        assert!(screen.notice.unwrap().starts_with("Scrape failed"));

        assert!(state.begin_scrape());
        state.apply(SnapshotUpdate::ScrapeFinished(Ok(())));
        assert!(state.view().notice.is_none());
    }

    #[test]
    fn test_cursor_clamped_after_refresh() {
        let mut state = DashboardState::new(Timeframe::H24);
        state.apply(tickers_update(Timeframe::H24));
        state.move_cursor(5);
        assert_eq!(state.view_state().cursor, 1);

        state.apply(SnapshotUpdate::Tickers {
            timeframe: Timeframe::H24,
            result: Ok(vec![ticker("SPY", 1, 0.0)]),
        });
        assert_eq!(state.view_state().cursor, 0);
    }
}
