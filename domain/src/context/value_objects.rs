//! Context value objects

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Default lookback window, in days.
pub const DEFAULT_LOOKBACK_DAYS: u32 = 7;
/// Default maximum number of snippets per round.
pub const DEFAULT_MAX_ITEMS: usize = 15;

/// A single piece of context evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextSnippet {
    pub snippet: String,
    pub source: String,
    pub timestamp: DateTime<Utc>,
}

impl ContextSnippet {
    pub fn new(
        snippet: impl Into<String>,
        source: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            snippet: snippet.into(),
            source: source.into(),
            timestamp,
        }
    }
}

/// Lookback window and item cap for a context request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextQuery {
    pub lookback_days: u32,
    pub max_items: usize,
}

impl ContextQuery {
    pub fn new(lookback_days: u32, max_items: usize) -> Self {
        Self {
            lookback_days,
            max_items,
        }
    }

    /// Oldest timestamp still inside the window.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(i64::from(self.lookback_days))
    }

    /// Apply the window and cap to `snippets`, newest first.
    pub fn select(&self, mut snippets: Vec<ContextSnippet>, now: DateTime<Utc>) -> Vec<ContextSnippet> {
        let cutoff = self.cutoff(now);
        snippets.retain(|s| s.timestamp >= cutoff && s.timestamp <= now);
        snippets.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        snippets.truncate(self.max_items);
        snippets
    }
}

impl Default for ContextQuery {
    fn default() -> Self {
        Self::new(DEFAULT_LOOKBACK_DAYS, DEFAULT_MAX_ITEMS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_select_filters_and_orders() {
        let now = at(20);
        let snippets = vec![
            ContextSnippet::new("old", "a", at(1)),
            ContextSnippet::new("mid", "b", at(15)),
            ContextSnippet::new("new", "c", at(19)),
        ];
        let selected = ContextQuery::new(7, 10).select(snippets, now);
        let texts: Vec<_> = selected.iter().map(|s| s.snippet.as_str()).collect();
        assert_eq!(texts, vec!["new", "mid"]);
    }

    #[test]
    fn test_select_caps_items() {
        let now = at(20);
        let snippets = (10..20)
            .map(|d| ContextSnippet::new(format!("s{d}"), "x", at(d)))
            .collect();
        let selected = ContextQuery::new(30, 3).select(snippets, now);
        assert_eq!(selected.len(), 3);
        assert_eq!(selected[0].snippet, "s19");
    }

    #[test]
    fn test_future_snippets_dropped() {
        let selected =
            ContextQuery::default().select(vec![ContextSnippet::new("f", "x", at(21))], at(20));
        assert!(selected.is_empty());
    }
}
