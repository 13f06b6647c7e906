/// Payload types for the sentiment API
///
/// These types match the JSON bodies served by the backend at
/// `/api/tickers`, `/api/earnings/{symbol}` and `/api/options`.
///
/// Numeric fields that arrive as `null` (or not at all) decode to zero so
/// nothing downstream ever compares against a missing value.
use serde::{Deserialize, Deserializer, Serialize};

use crate::shared::error::DashboardError;

/// Decode `null` as `T::default()`.
///
/// `#[serde(default)]` only covers absent keys, the backend also emits
/// explicit `null` for empty SQL aggregates.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Aggregated forum mentions for a single ticker
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TickerAggregate {
    /// Upper-case ticker symbol, unique within a snapshot
    pub ticker: String,
    /// Number of posts + comments mentioning the ticker
    #[serde(default, deserialize_with = "null_as_default")]
    pub mention_count: u64,
    /// Mean sentiment score in [-1, 1]
    #[serde(default, deserialize_with = "null_as_default")]
    pub avg_sentiment: f64,
    /// Distinct authors mentioning the ticker
    #[serde(default, deserialize_with = "null_as_default")]
    pub unique_authors: u64,
    /// Score of the most upvoted mention, negative when every mention was downvoted
    #[serde(default, deserialize_with = "null_as_default")]
    pub top_upvotes: i64,
    /// Unix seconds of the most recent mention
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_mention: Option<i64>,
}

/// `GET /tickers` response body
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TickersResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub tickers: Vec<TickerAggregate>,
    #[serde(default)]
    pub hours: Option<u32>,
    #[serde(default)]
    pub count: Option<usize>,
}

/// Post-earnings move bucket assigned by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MoveClass {
    Moon,
    Pump,
    Flat,
    Dip,
    Tank,
}

impl MoveClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            MoveClass::Moon => "MOON",
            MoveClass::Pump => "PUMP",
            MoveClass::Flat => "FLAT",
            MoveClass::Dip => "DIP",
            MoveClass::Tank => "TANK",
        }
    }
}

impl std::fmt::Display for MoveClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One historical earnings event
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EarningsRecord {
    /// `YYYY-MM-DD`
    pub date: String,
    /// Close-to-close move around the report, in percent
    #[serde(default, deserialize_with = "null_as_default")]
    pub move_pct: f64,
    pub classification: MoveClass,
    /// EPS surprise in percent, absent when estimates were missing
    #[serde(default)]
    pub surprise_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eps_estimate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eps_actual: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_before: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_after: Option<f64>,
}

/// `GET /earnings/{symbol}` response body
///
/// The backend sends either the full summary with `error: null`, or only
/// `{ "error": "..." }`. Use [`EarningsSummary::into_result`] to split the two.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct EarningsSummary {
    #[serde(default)]
    pub symbol: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub events: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub years_covered: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub moon_pct: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tank_pct: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub flat_pct: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub avg_move: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub max_moon: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub max_tank: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub volatility: f64,
    /// Consecutive same-direction events, most recent first
    #[serde(default, deserialize_with = "null_as_default")]
    pub streak: u32,
    /// `moon`, `tank` or `flat`
    #[serde(default, deserialize_with = "null_as_default")]
    pub streak_direction: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub guh_score: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub commentary: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub history: Vec<EarningsRecord>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cached: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EarningsSummary {
    /// Surface a backend-reported `error` as [`DashboardError::Backend`].
    pub fn into_result(self) -> Result<Self, DashboardError> {
        match self.error {
            Some(message) => Err(DashboardError::Backend(message)),
            None => Ok(self),
        }
    }
}

/// Option contract side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Badge text shown in the flow table
    pub fn badge(&self) -> &'static str {
        match self {
            OptionType::Call => "CALL",
            OptionType::Put => "PUT",
        }
    }

    pub fn is_call(&self) -> bool {
        matches!(self, OptionType::Call)
    }
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.badge())
    }
}

/// Options positions grouped by ticker + side
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OptionsFlowEntry {
    pub ticker: String,
    pub option_type: OptionType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub min_strike: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub max_strike: f64,
    /// Comma-joined expiry buckets, may repeat or contain empty members
    #[serde(default, deserialize_with = "null_as_default")]
    pub expiry_categories: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_strike: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_sentiment: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_authors: Option<u64>,
}

/// A single raw options mention, used for the top plays lists
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlayMention {
    #[serde(default, deserialize_with = "null_as_default")]
    pub raw_match: String,
    #[serde(default)]
    pub expiry_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strike: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upvotes: Option<i64>,
}

/// High level options statistics
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct OptionsSummary {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_options: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub calls: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub puts: u64,
    /// Computed by the backend, consumed as-is
    #[serde(default, deserialize_with = "null_as_default")]
    pub call_put_ratio: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub top_calls: Vec<PlayMention>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub top_puts: Vec<PlayMention>,
}

/// `GET /options` response body
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct OptionsResponse {
    #[serde(default)]
    pub summary: Option<OptionsSummary>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub flow: Vec<OptionsFlowEntry>,
    #[serde(default)]
    pub hours: Option<u32>,
}
