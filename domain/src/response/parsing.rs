//! Parsing of agent replies into probability/confidence opinions.
//!
//! Agents are asked for a JSON object. Replies are often wrapped in prose or
//! code fences, so the outermost `{...}` block is extracted first. When that
//! fails, labelled values such as `probability: 0.7` or `70% chance` are
//! scanned from the text.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use thiserror::Error;

/// Confidence assumed when a reply states a probability but no confidence.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

static LABELLED_PROBABILITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:probability|likelihood|chance)\b[^0-9\n]{0,20}?([0-9]+(?:\.[0-9]+)?)\s*(%)?")
        .expect("valid probability regex")
});

static PERCENT_CHANCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-9]+(?:\.[0-9]+)?)\s*%\s*(?:chance|probability|likely|likelihood)")
        .expect("valid percent regex")
});

static LABELLED_CONFIDENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bconfidence\b[^0-9\n]{0,20}?([0-9]+(?:\.[0-9]+)?)\s*(%)?")
        .expect("valid confidence regex")
});

/// Opinion extracted from a reply.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedReply {
    pub probability: f64,
    pub confidence: f64,
    pub analysis: String,
    pub recommendation: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReplyParseError {
    #[error("agent declined: {0}")]
    Declined(String),

    #[error("no probability found in reply")]
    NoProbability,
}

/// Parse a raw reply.
pub fn parse_agent_reply(raw: &str) -> Result<ParsedReply, ReplyParseError> {
    if let Some(Value::Object(obj)) = extract_json_block(raw) {
        if is_truthy(obj.get("declined")) {
            let reason = obj
                .get("reason")
                .and_then(Value::as_str)
                .unwrap_or("no reason given")
                .to_string();
            return Err(ReplyParseError::Declined(reason));
        }

        if let Some(probability) = obj.get("probability").and_then(value_to_unit) {
            let confidence = obj
                .get("confidence")
                .and_then(value_to_unit)
                .unwrap_or(DEFAULT_CONFIDENCE);
            let analysis = obj
                .get("analysis")
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(raw)
                .trim()
                .to_string();
            let recommendation = obj
                .get("recommendation")
                .and_then(Value::as_str)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty());
            return Ok(ParsedReply {
                probability,
                confidence,
                analysis,
                recommendation,
            });
        }
    }

    let probability = scan_labelled(&LABELLED_PROBABILITY, raw)
        .or_else(|| scan_labelled(&PERCENT_CHANCE, raw))
        .ok_or(ReplyParseError::NoProbability)?;
    let confidence = scan_labelled(&LABELLED_CONFIDENCE, raw).unwrap_or(DEFAULT_CONFIDENCE);

    Ok(ParsedReply {
        probability,
        confidence,
        analysis: raw.trim().to_string(),
        recommendation: None,
    })
}

/// Slice from the first `{` to the last `}` and parse it as JSON.
pub fn extract_json_block(text: &str) -> Option<Value> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("yes"),
        _ => false,
    }
}

fn value_to_unit(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().and_then(|v| normalise(v, false)),
        Value::String(s) => {
            let s = s.trim();
            let percent = s.ends_with('%');
            s.trim_end_matches('%')
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(|v| normalise(v, percent))
        }
        _ => None,
    }
}

fn scan_labelled(re: &Regex, text: &str) -> Option<f64> {
    let caps = re.captures(text)?;
    let value = caps.get(1)?.as_str().parse::<f64>().ok()?;
    normalise(value, caps.get(2).is_some())
}

/// Map a 0-1 or 0-100 value into [0, 1].
fn normalise(value: f64, percent: bool) -> Option<f64> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    let v = if percent || value > 1.0 { value / 100.0 } else { value };
    Some(v.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_json() {
        let raw = r#"{"analysis": "Troop build-up.", "probability": 0.7, "confidence": 0.8, "recommendation": "Watch logistics."}"#;
        let reply = parse_agent_reply(raw).unwrap();
        assert_eq!(reply.probability, 0.7);
        assert_eq!(reply.confidence, 0.8);
        assert_eq!(reply.analysis, "Troop build-up.");
        assert_eq!(reply.recommendation.as_deref(), Some("Watch logistics."));
    }

    #[test]
    fn test_parse_json_wrapped_in_prose() {
        let raw = "Here is my answer:\n```json\n{\"analysis\": \"x\", \"probability\": 0.25}\n```\nThanks";
        let reply = parse_agent_reply(raw).unwrap();
        assert_eq!(reply.probability, 0.25);
        assert_eq!(reply.confidence, DEFAULT_CONFIDENCE);
    }

    #[test]
    fn test_percent_values_normalised() {
        let reply =
            parse_agent_reply(r#"{"probability": 65, "confidence": "80%"}"#).unwrap();
        assert!((reply.probability - 0.65).abs() < 1e-12);
        assert!((reply.confidence - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_range_clamped() {
        let reply = parse_agent_reply(r#"{"probability": 250}"#).unwrap();
        assert_eq!(reply.probability, 1.0);
    }

    #[test]
    fn test_declined() {
        let raw = r#"{"declined": true, "reason": "Outside my domain"}"#;
        assert_eq!(
            parse_agent_reply(raw),
            Err(ReplyParseError::Declined("Outside my domain".to_string()))
        );
    }

    #[test]
    fn test_textual_fallback() {
        let raw = "After weighing the evidence, probability: 0.35 with confidence: 60%.";
        let reply = parse_agent_reply(raw).unwrap();
        assert!((reply.probability - 0.35).abs() < 1e-12);
        assert!((reply.confidence - 0.6).abs() < 1e-12);
        assert_eq!(reply.analysis, raw);
    }

    #[test]
    fn test_percent_chance_fallback() {
        let reply = parse_agent_reply("I estimate a 70% chance of escalation.").unwrap();
        assert!((reply.probability - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_json_without_probability_falls_back_to_text() {
        let raw = r#"{"analysis": "The probability is 0.4 given recent talks."}"#;
        let reply = parse_agent_reply(raw).unwrap();
        assert!((reply.probability - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_no_probability() {
        assert_eq!(
            parse_agent_reply("Inflation is at 3% and rising."),
            Err(ReplyParseError::NoProbability)
        );
        assert_eq!(parse_agent_reply(""), Err(ReplyParseError::NoProbability));
    }
}
