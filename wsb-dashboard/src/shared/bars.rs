//! Proportional bar geometry for sentiment and earnings-move visualisations
//!
//! All widths and offsets are percentages of the bar track.

use serde::{Deserialize, Serialize};

/// Sentiment bar half-track: a full-strength score fills half the track
pub const SENTIMENT_TRACK_PCT: f64 = 50.0;
/// Percentage-move magnification on the earnings track
pub const MOVE_SCALE: f64 = 3.0;
/// Where the shared zero line sits on a centred track
pub const CENTER_PCT: f64 = 50.0;

/// One-sided bar growing from the track origin
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
pub struct SentimentBar {
    /// In [0, 50]
    pub width_pct: f64,
}

/// Bidirectional bar on a track centred at 50%
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
pub struct MoveBar {
    /// In [0, 100]
    pub width_pct: f64,
    /// Left edge of the fill
    pub offset_pct: f64,
    /// Fill extends right of the centre line
    pub positive: bool,
}

impl MoveBar {
    /// Right edge of the fill
    pub fn end_pct(&self) -> f64 {
        self.offset_pct + self.width_pct
    }
}

/// `min(|score| * 50, 50)`
pub fn sentiment_bar(score: f64) -> SentimentBar {
    SentimentBar {
        width_pct: scaled_width(score, SENTIMENT_TRACK_PCT, SENTIMENT_TRACK_PCT),
    }
}

/// Magnitude `min(|move| * 3, 100)`, anchored at the centre for gains and
/// ending at the centre for losses
pub fn move_bar(move_pct: f64) -> MoveBar {
    let width_pct = scaled_width(move_pct, MOVE_SCALE, 100.0);
    let positive = move_pct >= 0.0 || move_pct.is_nan();

    let offset_pct = if positive {
        CENTER_PCT
    } else {
        CENTER_PCT - width_pct
    };

    MoveBar {
        width_pct,
        offset_pct,
        positive,
    }
}

/// Convert a percentage of a track into whole terminal cells
pub fn cells(pct: f64, track: u16) -> u16 {
    if !pct.is_finite() || pct <= 0.0 {
        return 0;
    }
    let raw = (pct / 100.0 * track as f64).round();
    raw.min(track as f64) as u16
}

fn scaled_width(value: f64, scale: f64, cap: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    (value.abs() * scale).min(cap)
}
