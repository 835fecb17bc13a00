//! String utilities for the domain layer.

/// Truncate a string to at most `max_chars` characters, appending `...`
/// when anything was cut. Counts characters, so multi-byte text is safe.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut out: String = s.chars().take(keep).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello world", 8), "hello...");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate_chars("日本語テスト", 6), "日本語テスト");
        assert_eq!(truncate_chars("日本語テスト文字列", 6), "日本語...");
    }

    #[test]
    fn test_truncate_tiny_budget() {
        assert_eq!(truncate_chars("abcdef", 2), "...");
    }
}
