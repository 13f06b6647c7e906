//! Threshold-band classification of sentiment scores and earnings moves
//!
//! Every band table is an ordered rule list: rules are evaluated top to
//! bottom and the first match wins.

use serde::{Deserialize, Serialize};

use crate::shared::types::MoveClass;

/// Scores at or above this are bullish
pub const BULLISH_THRESHOLD: f64 = 0.1;
/// Scores at or below this are bearish
pub const BEARISH_THRESHOLD: f64 = -0.1;
/// Mentions required before a high-conviction icon is shown
pub const CONVICTION_MENTIONS: u64 = 10;

/// Discrete sentiment bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Bullish,
    Bearish,
    Neutral,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Bullish => "bullish",
            Category::Bearish => "bearish",
            Category::Neutral => "neutral",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Category::Bullish => Tone::Green,
            Category::Bearish => Tone::Red,
            Category::Neutral => Tone::Dim,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Display colour family, resolved to concrete colours by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Green,
    Red,
    Dim,
}

/// Icon shown next to a ticker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VibeIcon {
    Rocket,
    Skull,
    Fire,
    ChartUp,
    Blood,
    ChartDown,
    Neutral,
}

impl VibeIcon {
    pub fn glyph(&self) -> &'static str {
        match self {
            VibeIcon::Rocket => "🚀",
            VibeIcon::Skull => "💀",
            VibeIcon::Fire => "🔥",
            VibeIcon::ChartUp => "📈",
            VibeIcon::Blood => "🩸",
            VibeIcon::ChartDown => "📉",
            VibeIcon::Neutral => "😐",
        }
    }
}

/// Half-open score band
#[derive(Debug, Clone, Copy)]
enum Band {
    AtLeast(f64),
    AtMost(f64),
}

impl Band {
    fn contains(&self, score: f64) -> bool {
        match *self {
            Band::AtLeast(floor) => score >= floor,
            Band::AtMost(ceiling) => score <= ceiling,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct VibeRule {
    min_mentions: u64,
    band: Band,
    icon: VibeIcon,
}

impl VibeRule {
    const fn new(min_mentions: u64, band: Band, icon: VibeIcon) -> Self {
        Self {
            min_mentions,
            band,
            icon,
        }
    }

    fn matches(&self, score: f64, mentions: u64) -> bool {
        mentions >= self.min_mentions && self.band.contains(score)
    }
}

/// Volume-gated rules first, then score-only bands
const VIBE_RULES: [VibeRule; 6] = [
    VibeRule::new(CONVICTION_MENTIONS, Band::AtLeast(0.3), VibeIcon::Rocket),
    VibeRule::new(CONVICTION_MENTIONS, Band::AtMost(-0.3), VibeIcon::Skull),
    VibeRule::new(0, Band::AtLeast(0.5), VibeIcon::Fire),
    VibeRule::new(0, Band::AtLeast(BULLISH_THRESHOLD), VibeIcon::ChartUp),
    VibeRule::new(0, Band::AtMost(-0.5), VibeIcon::Blood),
    VibeRule::new(0, Band::AtMost(BEARISH_THRESHOLD), VibeIcon::ChartDown),
];

/// Score-only bands used by the scrolling tape
const TAPE_RULES: [VibeRule; 4] = [
    VibeRule::new(0, Band::AtLeast(0.3), VibeIcon::Rocket),
    VibeRule::new(0, Band::AtLeast(BULLISH_THRESHOLD), VibeIcon::ChartUp),
    VibeRule::new(0, Band::AtMost(-0.3), VibeIcon::Skull),
    VibeRule::new(0, Band::AtMost(BEARISH_THRESHOLD), VibeIcon::ChartDown),
];

fn first_match(rules: &[VibeRule], score: f64, mentions: u64) -> VibeIcon {
    rules
        .iter()
        .find(|rule| rule.matches(score, mentions))
        .map(|rule| rule.icon)
        .unwrap_or(VibeIcon::Neutral)
}

/// Bucket a sentiment score
pub fn classify(score: f64) -> Category {
    if score >= BULLISH_THRESHOLD {
        Category::Bullish
    } else if score <= BEARISH_THRESHOLD {
        Category::Bearish
    } else {
        Category::Neutral
    }
}

/// Table icon for a ticker, gated on mention volume for the loud ones
pub fn vibe(score: f64, mentions: u64) -> VibeIcon {
    first_match(&VIBE_RULES, score, mentions)
}

/// Tape icon for a ticker
pub fn tape_vibe(score: f64) -> VibeIcon {
    first_match(&TAPE_RULES, score, 0)
}

/// Colour of an earnings move bucket
pub fn earnings_class(classification: MoveClass) -> Tone {
    match classification {
        MoveClass::Moon | MoveClass::Pump => Tone::Green,
        MoveClass::Tank | MoveClass::Dip => Tone::Red,
        MoveClass::Flat => Tone::Dim,
    }
}

pub fn earnings_emoji(classification: MoveClass) -> &'static str {
    match classification {
        MoveClass::Moon => "🚀",
        MoveClass::Pump => "📈",
        MoveClass::Flat => "😐",
        MoveClass::Dip => "📉",
        MoveClass::Tank => "💀",
    }
}

/// Colour of a streak label, keyed on the backend's direction string
pub fn streak_tone(direction: &str) -> Tone {
    match direction {
        "moon" => Tone::Green,
        "tank" => Tone::Red,
        _ => Tone::Dim,
    }
}

/// Green for non-negative values, red otherwise
pub fn signed_tone(value: f64) -> Tone {
    if value >= 0.0 {
        Tone::Green
    } else {
        Tone::Red
    }
}
