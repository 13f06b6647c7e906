//! Ticker table ordering
//!
//! Sorting never touches the snapshot: [`rank`] returns a freshly ordered
//! copy. The sort is stable in both directions so rows with equal keys
//! keep the order the backend sent them in.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::shared::error::DashboardError;
use crate::shared::types::TickerAggregate;

/// Sortable ticker table columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Ticker,
    MentionCount,
    AvgSentiment,
    UniqueAuthors,
    TopUpvotes,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Ticker,
        SortKey::MentionCount,
        SortKey::AvgSentiment,
        SortKey::UniqueAuthors,
        SortKey::TopUpvotes,
    ];

    /// Column id as used by the API field names
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Ticker => "ticker",
            SortKey::MentionCount => "mention_count",
            SortKey::AvgSentiment => "avg_sentiment",
            SortKey::UniqueAuthors => "unique_authors",
            SortKey::TopUpvotes => "top_upvotes",
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| DashboardError::UnsortableColumn(s.to_string()))
    }
}

/// Ticker table column metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub id: &'static str,
    pub label: &'static str,
    pub tip: &'static str,
    /// `None` for display-only columns
    pub key: Option<SortKey>,
}

impl Column {
    pub fn sortable(&self) -> bool {
        self.key.is_some()
    }
}

pub const COLUMNS: [Column; 6] = [
    Column {
        id: "rank",
        label: "#",
        tip: "Rank — higher = more regarded",
        key: None,
    },
    Column {
        id: "ticker",
        label: "Ticker",
        tip: "The stock your wife's boyfriend is probably already in",
        key: Some(SortKey::Ticker),
    },
    Column {
        id: "mention_count",
        label: "Mentions",
        tip: "How many apes are screaming about this in posts + comments",
        key: Some(SortKey::MentionCount),
    },
    Column {
        id: "avg_sentiment",
        label: "Sentiment",
        tip: "Vibes only — ranges from -1 (GUH) to +1 (moon)",
        key: Some(SortKey::AvgSentiment),
    },
    Column {
        id: "unique_authors",
        label: "Apes",
        tip: "Unique degenerates talking about this ticker",
        key: Some(SortKey::UniqueAuthors),
    },
    Column {
        id: "top_upvotes",
        label: "Top Post",
        tip: "Upvotes on the most viral post — high number = someone's loss porn went big",
        key: Some(SortKey::TopUpvotes),
    },
];

/// Current table ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct SortState {
    pub key: SortKey,
    pub descending: bool,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            key: SortKey::MentionCount,
            descending: true,
        }
    }
}

impl SortState {
    /// Same key flips direction, a new key starts descending
    pub fn select(&mut self, key: SortKey) {
        if self.key == key {
            self.descending = !self.descending;
        } else {
            self.key = key;
            self.descending = true;
        }
    }

    /// Resolve a column id and select it, failing on display-only columns
    pub fn select_column(&mut self, column_id: &str) -> Result<(), DashboardError> {
        let key = column_id.parse::<SortKey>()?;
        self.select(key);
        Ok(())
    }

    pub fn arrow(&self) -> &'static str {
        if self.descending {
            "▼"
        } else {
            "▲"
        }
    }
}

enum SortValue<'a> {
    Text(&'a str),
    Number(f64),
}

fn sort_value(record: &TickerAggregate, key: SortKey) -> SortValue<'_> {
    match key {
        SortKey::Ticker => SortValue::Text(&record.ticker),
        SortKey::MentionCount => SortValue::Number(record.mention_count as f64),
        SortKey::AvgSentiment => SortValue::Number(nan_as_zero(record.avg_sentiment)),
        SortKey::UniqueAuthors => SortValue::Number(record.unique_authors as f64),
        SortKey::TopUpvotes => SortValue::Number(record.top_upvotes as f64),
    }
}

fn nan_as_zero(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value
    }
}

/// Case-folded comparison first; case variants put lowercase ahead,
/// as locale collation does
fn compare_text(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| b.cmp(a))
}

fn compare(a: &TickerAggregate, b: &TickerAggregate, key: SortKey) -> Ordering {
    match (sort_value(a, key), sort_value(b, key)) {
        (SortValue::Text(a), SortValue::Text(b)) => compare_text(a, b),
        (SortValue::Number(a), SortValue::Number(b)) => {
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        // Both sides always come from the same key
        _ => Ordering::Equal,
    }
}

/// Stable ordering of `records` by `sort`, leaving the input untouched
pub fn rank(records: &[TickerAggregate], sort: SortState) -> Vec<TickerAggregate> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = compare(a, b, sort.key);
        if sort.descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
    sorted
}
