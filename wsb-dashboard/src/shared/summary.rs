/// Bulk statistics over the ticker snapshot and the options split
use serde::{Deserialize, Serialize};

use crate::shared::classify::{classify, Category, Tone};
use crate::shared::types::TickerAggregate;

/// Segment captions are only drawn once a side is wider than this
pub const SPLIT_CAPTION_MIN_PCT: u8 = 15;

/// Headline counters for the stats bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Summary {
    pub bull_count: usize,
    pub bear_count: usize,
    pub total_mentions: u64,
    pub ticker_count: usize,
}

pub fn summarize(records: &[TickerAggregate]) -> Summary {
    records.iter().fold(
        Summary {
            ticker_count: records.len(),
            ..Summary::default()
        },
        |mut summary, record| {
            match classify(record.avg_sentiment) {
                Category::Bullish => summary.bull_count += 1,
                Category::Bearish => summary.bear_count += 1,
                Category::Neutral => {}
            }
            summary.total_mentions += record.mention_count;
            summary
        },
    )
}

/// Call/put ratio bands, highest floor first
const RATIO_BANDS: [(f64, &str); 4] = [
    (2.0, "apes are yoloing calls"),
    (1.2, "leaning bullish"),
    (0.8, "roughly balanced"),
    (0.5, "leaning bearish"),
];

const RATIO_FLOOR_LABEL: &str = "put city";

/// Qualitative label for a call/put ratio
pub fn ratio_label(ratio: f64) -> &'static str {
    RATIO_BANDS
        .iter()
        .find(|(floor, _)| ratio >= *floor)
        .map(|(_, label)| *label)
        .unwrap_or(RATIO_FLOOR_LABEL)
}

/// More calls than puts reads green
pub fn ratio_tone(ratio: f64) -> Tone {
    if ratio >= 1.0 {
        Tone::Green
    } else {
        Tone::Red
    }
}

/// Call vs put share of the ratio bar, always summing to 100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct PercentSplit {
    pub call_pct: u8,
    pub put_pct: u8,
}

impl PercentSplit {
    pub fn show_call_caption(&self) -> bool {
        self.call_pct > SPLIT_CAPTION_MIN_PCT
    }

    pub fn show_put_caption(&self) -> bool {
        self.put_pct > SPLIT_CAPTION_MIN_PCT
    }
}

/// `call_pct` is rounded, `put_pct` takes the remainder
pub fn percent_split(calls: u64, puts: u64) -> PercentSplit {
    let total = calls.saturating_add(puts).max(1);
    let call_pct = (calls as f64 / total as f64 * 100.0).round().clamp(0.0, 100.0) as u8;

    PercentSplit {
        call_pct,
        put_pct: 100 - call_pct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticker(symbol: &str, mentions: u64, sentiment: f64) -> TickerAggregate {
        TickerAggregate {
            ticker: symbol.to_string(),
            mention_count: mentions,
            avg_sentiment: sentiment,
            unique_authors: 0,
            top_upvotes: 0,
            latest_mention: None,
        }
    }

    #[test]
    fn test_summarize() {
        let records = vec![ticker("GME", 5, 0.2), ticker("AMC", 3, -0.3)];
        assert_eq!(
            summarize(&records),
            Summary {
                bull_count: 1,
                bear_count: 1,
                total_mentions: 8,
                ticker_count: 2,
            }
        );
    }

    #[test]
    fn test_summarize_thresholds_inclusive() {
        let records = vec![
            ticker("A", 1, 0.1),
            ticker("B", 1, -0.1),
            ticker("C", 1, 0.09),
            ticker("D", 1, -0.09),
        ];
        let summary = summarize(&records);
        assert_eq!(summary.bull_count, 1);
        assert_eq!(summary.bear_count, 1);
        assert_eq!(summary.total_mentions, 4);
    }

    #[test]
    fn test_summarize_empty() {
        assert_eq!(summarize(&[]), Summary::default());
    }

    #[test]
    fn test_ratio_label() {
        struct TestCase {
            input: f64,
            expected: &'static str,
        }

        let tests = vec![
            TestCase { input: 5.0, expected: "apes are yoloing calls" }, // TC0
            TestCase { input: 2.0, expected: "apes are yoloing calls" }, // TC1: inclusive floor
            TestCase { input: 1.99, expected: "leaning bullish" },       // TC2
            TestCase { input: 1.2, expected: "leaning bullish" },        // TC3
            TestCase { input: 1.0, expected: "roughly balanced" },       // TC4
            TestCase { input: 0.8, expected: "roughly balanced" },       // TC5
            TestCase { input: 0.5, expected: "leaning bearish" },        // TC6
            TestCase { input: 0.49, expected: "put city" },              // TC7
            TestCase { input: 0.0, expected: "put city" },               // TC8
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let actual = ratio_label(test.input);
            assert_eq!(actual, test.expected, "TC{} failed", index);
        }
    }

    #[test]
    fn test_ratio_tone() {
        assert_eq!(ratio_tone(1.0), Tone::Green);
        assert_eq!(ratio_tone(0.99), Tone::Red);
    }

    #[test]
    fn test_percent_split() {
        struct TestCase {
            calls: u64,
            puts: u64,
            expected: (u8, u8),
        }

        let tests = vec![
            TestCase { calls: 3, puts: 1, expected: (75, 25) },  // TC0
            TestCase { calls: 0, puts: 0, expected: (0, 100) },  // TC1: no options at all
            TestCase { calls: 1, puts: 2, expected: (33, 67) },  // TC2: remainder absorbs rounding
            TestCase { calls: 2, puts: 1, expected: (67, 33) },  // TC3
            TestCase { calls: 1, puts: 0, expected: (100, 0) },  // TC4
            TestCase { calls: 1, puts: 7, expected: (13, 87) },  // TC5: 12.5 rounds up
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let split = percent_split(test.calls, test.puts);
            assert_eq!((split.call_pct, split.put_pct), test.expected, "TC{} failed", index);
            assert_eq!(split.call_pct as u16 + split.put_pct as u16, 100);
        }
    }

    #[test]
    fn test_split_captions() {
        let split = percent_split(9, 1);
        assert!(split.show_call_caption());
        assert!(!split.show_put_caption());

        let split = percent_split(17, 83);
        assert!(split.show_call_caption());
        assert!(split.show_put_caption());
    }
}
