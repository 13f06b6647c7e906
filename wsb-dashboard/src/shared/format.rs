/// Display formatting for raw API fields
use itertools::Itertools;

use crate::shared::classify::BULLISH_THRESHOLD;

/// Shown where a value is missing or empty
pub const PLACEHOLDER: &str = "—";

/// Abbreviate large counts: `1.2M`, `3.4k`, else the exact integer.
/// Negative scores are never abbreviated.
pub fn format_count(n: i64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}k", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// Sentiment score with an explicit `+` once it is bullish
pub fn format_sentiment(score: f64) -> String {
    if score >= BULLISH_THRESHOLD {
        format!("+{:.2}", score)
    } else {
        format!("{:.2}", positive_zero(score))
    }
}

/// Sentiment score with an explicit `+` for any non-negative value
pub fn format_tape_sentiment(score: f64) -> String {
    sign_prefixed(score, 2)
}

/// Percentage move with sign, one decimal: `+5.0%`, `-3.2%`
pub fn format_move(pct: f64) -> String {
    format!("{}%", sign_prefixed(pct, 1))
}

/// Unique expiry buckets from a comma-joined list, in first-seen order
pub fn format_expiry(categories: &str) -> String {
    let unique = categories
        .split(',')
        .map(str::trim)
        .filter(|category| !category.is_empty())
        .unique()
        .join(", ");

    if unique.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        unique
    }
}

/// `$200` for a single strike, `$200 — $250` for a range
pub fn format_strike_range(min_strike: f64, max_strike: f64) -> String {
    if min_strike == max_strike {
        format!("${}", min_strike)
    } else {
        format!("${} {} ${}", min_strike, PLACEHOLDER, max_strike)
    }
}

/// EPS surprise, or the placeholder when estimates were missing
pub fn format_surprise(surprise_pct: Option<f64>) -> String {
    match surprise_pct {
        Some(pct) if pct >= 0.0 => format!("EPS +{}%", positive_zero(pct)),
        Some(pct) => format!("EPS {}%", pct),
        None => PLACEHOLDER.to_string(),
    }
}

pub fn format_volatility(volatility: f64) -> String {
    format!("{:.1}", positive_zero(volatility))
}

pub fn format_symbol(ticker: &str) -> String {
    format!("${}", ticker)
}

fn sign_prefixed(value: f64, decimals: usize) -> String {
    if value >= 0.0 {
        format!("+{:.*}", decimals, positive_zero(value))
    } else {
        format!("{:.*}", decimals, value)
    }
}

/// Collapse `-0.0` so it never prints as `-0`
fn positive_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}
