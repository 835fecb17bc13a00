//! Context bundle entity

use super::value_objects::ContextSnippet;
use crate::core::string::truncate_chars;
use serde::{Deserialize, Serialize};

/// Character budget for context in initial prompts.
pub const INITIAL_CONTEXT_BUDGET: usize = 6000;
/// Character budget for context in requery prompts.
pub const REQUERY_CONTEXT_BUDGET: usize = 3000;

const EMPTY_CONTEXT: &str = "(no context available)";

/// Read-only snippets captured at round start.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextBundle {
    snippets: Vec<ContextSnippet>,
}

impl ContextBundle {
    pub fn new(snippets: Vec<ContextSnippet>) -> Self {
        Self { snippets }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn snippets(&self) -> &[ContextSnippet] {
        &self.snippets
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    /// Render as a numbered block of at most `char_budget` characters.
    ///
    /// Whole lines are kept while they fit; the first line that does not fit
    /// is truncated and rendering stops there.
    pub fn render(&self, char_budget: usize) -> String {
        if self.snippets.is_empty() {
            return EMPTY_CONTEXT.to_string();
        }

        let mut out = String::new();
        let mut used = 0;
        for (i, s) in self.snippets.iter().enumerate() {
            let line = format!(
                "[{}] {} ({}): {}",
                i + 1,
                s.source,
                s.timestamp.format("%Y-%m-%d %H:%M UTC"),
                s.snippet.trim()
            );
            let separator = usize::from(!out.is_empty());
            let len = line.chars().count();
            let remaining = char_budget.saturating_sub(used + separator);

            if len <= remaining {
                if separator == 1 {
                    out.push('\n');
                }
                out.push_str(&line);
                used += separator + len;
                continue;
            }
            if remaining > 3 {
                if separator == 1 {
                    out.push('\n');
                }
                out.push_str(&truncate_chars(&line, remaining));
            }
            break;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn snippet(text: &str) -> ContextSnippet {
        ContextSnippet::new(
            text,
            "reuters.com",
            Utc.with_ymd_and_hms(2025, 3, 2, 14, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_render_numbered_lines() {
        let bundle = ContextBundle::new(vec![snippet("Troops massed."), snippet("Talks stalled.")]);
        assert_eq!(
            bundle.render(INITIAL_CONTEXT_BUDGET),
            "[1] reuters.com (2025-03-02 14:00 UTC): Troops massed.\n\
             [2] reuters.com (2025-03-02 14:00 UTC): Talks stalled."
        );
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(ContextBundle::empty().render(100), "(no context available)");
    }

    #[test]
    fn test_render_respects_budget() {
        let bundle = ContextBundle::new(vec![snippet(&"x".repeat(500)); 20]);
        let rendered = bundle.render(REQUERY_CONTEXT_BUDGET);
        assert!(rendered.chars().count() <= REQUERY_CONTEXT_BUDGET);
        assert!(rendered.ends_with("..."));
        assert!(rendered.starts_with("[1] "));
    }
}
