/// WSB Sentiment Dashboard - Shared Library
///
/// Turns the sentiment API's ticker, options and earnings payloads into
/// display-ready view models, and provides the pieces the two binaries
/// are built from:
/// - wsb-dashboard: live terminal dashboard
/// - wsb-snapshot: one-shot JSON dump of the same view
///
/// The library includes:
/// - Wire types for the `/api` endpoints
/// - Ranking, classification, bar scaling and summary statistics
/// - HTTP client and background pollers
/// - Ratatui widgets
pub mod shared;

// Re-export commonly used types for convenience
pub use shared::types::{
    EarningsRecord, EarningsSummary, MoveClass, OptionType, OptionsFlowEntry, OptionsResponse,
    OptionsSummary, PlayMention, TickerAggregate, TickersResponse,
};

pub use shared::error::DashboardError;

pub use shared::bars::{move_bar, sentiment_bar, MoveBar, SentimentBar};
pub use shared::classify::{classify, tape_vibe, vibe, Category, Tone, VibeIcon};
pub use shared::format::{format_count, format_expiry, format_move, format_sentiment};
pub use shared::ranking::{rank, SortKey, SortState, COLUMNS};
pub use shared::summary::{percent_split, ratio_label, summarize, PercentSplit, Summary};

pub use shared::view::{build_view, DashboardView, Snapshot, Timeframe, ViewState};

// Outer adapters: HTTP, polling, state and rendering
pub use shared::client::{ApiClient, ApiConfig};
pub use shared::config::DashboardConfig;
pub use shared::feed::{spawn_earnings_fetch, spawn_poller, spawn_scrape, SnapshotUpdate};
pub use shared::state::{DashboardScreen, DashboardState, FetchStatus};
pub use shared::widget::render_dashboard;
