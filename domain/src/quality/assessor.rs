//! Heuristic quality assessor

use super::score::{DimensionScores, QualityDimension, QualityScore, RedFlag};
use crate::core::string::truncate_chars;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Indicator count at which a dimension saturates.
const SATURATION_HITS: f64 = 5.0;
/// Concrete-token share at which specificity saturates.
const SPECIFICITY_DENSITY: f64 = 0.15;
/// Dimensions scoring below this are targeted by follow-ups.
const WEAK_DIMENSION: f64 = 0.4;
const FLAG_PENALTY: f64 = 0.1;
const MAX_PENALTY: f64 = 0.3;

fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("valid quality regex")
}

static EVIDENCE: LazyLock<Regex> = LazyLock::new(|| {
    pattern(
        r"(?i)\d+(?:\.\d+)?\s?%|\$\s?\d[\d,]*(?:\.\d+)?|\b\d{4}-\d{2}-\d{2}\b|\b(?:according to|data (?:shows?|suggests?|indicates?)|reported|measured|observed|historically|statistics|surveys?|polls?)\b",
    )
});

static CAUSAL: LazyLock<Regex> = LazyLock::new(|| {
    pattern(
        r"(?i)\b(?:because|therefore|as a result|leads? to|caus(?:es|ed|ing)|due to|consequently|mechanism|pathway|triggers?|drives?|thus|hence)\b",
    )
});

static UNCERTAINTY: LazyLock<Regex> = LazyLock::new(|| {
    pattern(
        r"(?i)\b(?:uncertain(?:ty)?|unclear|unknown|may|might|could|possibly|potentially|unlikely|range of outcomes|depends on)\b",
    )
});

static COUNTER: LazyLock<Regex> = LazyLock::new(|| {
    pattern(
        r"(?i)\b(?:however|although|alternatively|on the other hand|conversely|but|yet|despite|whereas|nevertheless|counterpoint|opposing view)\b",
    )
});

static SPECIFIC_MARKERS: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"(?i)\b(?:specifically|in particular|namely|for example|for instance|such as)\b|\be\.g\.")
});

static TEMPORAL: LazyLock<Regex> = LazyLock::new(|| {
    pattern(
        r"(?i)\b(?:(?:19|20)\d{2}|timeline|timeframe|within \d+|after|before|during|sequence|progression|phases?|weeks?|months?|days?|subsequently)\b",
    )
});

static ONE_WORD: LazyLock<Regex> = LazyLock::new(|| pattern(r"^\W*[\w'-]+\W*$"));

static HEDGE: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)\bit depends\b"));

static HEDGE_WITH_CONTENT: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)\bit depends (?:on|upon)\b"));

static DISMISSIVE: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"(?i)\b(?:difficult|hard|impossible) to (?:say|predict|determine|know|tell)\b")
});

static DEFLECTION: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)\bneeds? more (?:information|data|context)\b"));

/// Thresholds for the assessor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityPolicy {
    /// Depth below which a requery is requested
    pub requery_threshold: f64,
    pub max_follow_ups: usize,
    /// Minimum trimmed length, in characters
    pub min_length: usize,
}

impl Default for QualityPolicy {
    fn default() -> Self {
        Self {
            requery_threshold: 0.6,
            max_follow_ups: 3,
            min_length: 150,
        }
    }
}

impl QualityPolicy {
    pub fn with_requery_threshold(mut self, threshold: f64) -> Self {
        self.requery_threshold = threshold;
        self
    }

    pub fn with_max_follow_ups(mut self, n: usize) -> Self {
        self.max_follow_ups = n;
        self
    }

    pub fn with_min_length(mut self, chars: usize) -> Self {
        self.min_length = chars;
        self
    }
}

/// Scores response text and proposes follow-up questions.
#[derive(Debug, Clone, Default)]
pub struct QualityAssessor {
    policy: QualityPolicy,
}

impl QualityAssessor {
    pub fn new(policy: QualityPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &QualityPolicy {
        &self.policy
    }

    /// Score `text` (an agent's analysis) for a given question.
    pub fn score(&self, text: &str, question: &str) -> QualityScore {
        let text = text.trim();
        let dimensions = DimensionScores {
            evidence: saturating(&EVIDENCE, text),
            causal_reasoning: saturating(&CAUSAL, text),
            uncertainty_handling: saturating(&UNCERTAINTY, text),
            counterarguments: saturating(&COUNTER, text),
            specificity: specificity(text),
            temporal_reasoning: saturating(&TEMPORAL, text),
        };

        let red_flags = self.red_flags(text);
        let penalty = (FLAG_PENALTY * red_flags.len() as f64).min(MAX_PENALTY);
        let depth_score = (dimensions.weighted_depth() - penalty).clamp(0.0, 1.0);

        let needs_requery = depth_score < self.policy.requery_threshold
            || red_flags.len() >= 2
            || red_flags.iter().any(RedFlag::is_disqualifying);

        let follow_up_questions = if needs_requery {
            self.follow_ups(&dimensions, &red_flags, question)
        } else {
            Vec::new()
        };

        QualityScore {
            dimensions,
            penalty,
            depth_score,
            red_flags,
            needs_requery,
            follow_up_questions,
        }
    }

    fn red_flags(&self, text: &str) -> Vec<RedFlag> {
        let mut flags = Vec::new();
        if text.chars().count() < self.policy.min_length {
            flags.push(RedFlag::TooShort);
        }
        if ONE_WORD.is_match(text) {
            flags.push(RedFlag::OneWord);
        }
        if HEDGE.find_iter(text).count() > HEDGE_WITH_CONTENT.find_iter(text).count() {
            flags.push(RedFlag::GenericHedge);
        }
        if DISMISSIVE.is_match(text) {
            flags.push(RedFlag::Dismissive);
        }
        if DEFLECTION.is_match(text) {
            flags.push(RedFlag::Deflection);
        }
        flags
    }

    fn follow_ups(
        &self,
        dimensions: &DimensionScores,
        flags: &[RedFlag],
        question: &str,
    ) -> Vec<String> {
        let topic = truncate_chars(question, 60);
        let mut out: Vec<String> = dimensions
            .weakest(3)
            .into_iter()
            .filter(|(_, score)| *score < WEAK_DIMENSION)
            .map(|(d, _)| dimension_follow_up(d, &topic))
            .collect();

        if flags.iter().any(RedFlag::is_disqualifying) {
            out.push(format!(
                "Expand your analysis. The previous answer was too brief to assess \"{topic}\"."
            ));
        }
        if flags.iter().any(|f| !f.is_disqualifying()) {
            out.push(
                "Avoid vague or dismissive statements. Use the provided context to give a concrete, evidence-backed assessment."
                    .to_string(),
            );
        }
        if out.is_empty() {
            out.push(
                "Strengthen your analysis with concrete evidence and explicit reasoning for your probability."
                    .to_string(),
            );
        }

        out.truncate(self.policy.max_follow_ups);
        out
    }
}

fn dimension_follow_up(dimension: QualityDimension, topic: &str) -> String {
    match dimension {
        QualityDimension::Evidence => format!(
            "What specific data, figures or historical precedents support your view on \"{topic}\"?"
        ),
        QualityDimension::CausalReasoning => {
            "Explain the causal mechanism: how and why would this outcome come about, step by step?"
                .to_string()
        }
        QualityDimension::UncertaintyHandling => {
            "What are the key uncertainties or unknowns that could change your estimate?".to_string()
        }
        QualityDimension::Counterarguments => {
            "What evidence or arguments contradict your assessment, and why might you be wrong?"
                .to_string()
        }
        QualityDimension::Specificity => {
            "Name specific actors, places, dates or quantities instead of general statements."
                .to_string()
        }
        QualityDimension::TemporalReasoning => {
            "What is the expected timeline, and what would happen first, second and third?"
                .to_string()
        }
    }
}

fn saturating(re: &Regex, text: &str) -> f64 {
    (re.find_iter(text).count() as f64 / SATURATION_HITS).min(1.0)
}

/// Share of concrete tokens (numbers, mid-sentence capitalised words),
/// boosted by explicit specificity markers.
fn specificity(text: &str) -> f64 {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.is_empty() {
        return 0.0;
    }

    let mut concrete = 0usize;
    let mut sentence_start = true;
    for token in &tokens {
        let word = token.trim_matches(|c: char| !c.is_alphanumeric());
        let has_digit = word.chars().any(|c| c.is_ascii_digit());
        let capitalised = !sentence_start && word.chars().next().is_some_and(char::is_uppercase);
        if has_digit || capitalised {
            concrete += 1;
        }
        sentence_start = token.ends_with(&['.', '!', '?', ':'][..]);
    }

    let density = (concrete as f64 / tokens.len() as f64 / SPECIFICITY_DENSITY).min(1.0);
    density.max(saturating(&SPECIFIC_MARKERS, text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DEEP: &str = "According to UN data, troop deployments rose 35% between 2023-01-15 and \
        2024-06-01, and satellite imagery observed 12 new supply depots. Because logistics lines \
        are now complete, an offensive becomes feasible; as a result, escalation within 30 days is \
        plausible, which leads to higher risk. This mechanism is consistent with the 2014 Crimea \
        precedent, therefore I weight it heavily. However, diplomatic talks in Geneva could delay \
        action, although sanctions might also push Moscow toward restraint. Despite the build-up, \
        uncertainty remains high and the outcome may depend on winter weather. Specifically, the \
        Black Sea Fleet movements in particular matter; for example, the Sevastopol drills before \
        March suggest a timeline of weeks rather than months.";

    const QUESTION: &str = "Will there be a military escalation in region X within 30 days?";

    #[test]
    fn test_deep_response_accepted() {
        let score = QualityAssessor::default().score(DEEP, QUESTION);
        assert!(score.red_flags.is_empty(), "{:?}", score.red_flags);
        assert!(score.depth_score > 0.6, "depth {}", score.depth_score);
        assert!(!score.needs_requery);
        assert!(score.follow_up_questions.is_empty());
        assert_eq!(score.dimensions.evidence, 1.0);
        assert_eq!(score.dimensions.causal_reasoning, 1.0);
    }

    #[test]
    fn test_one_word_answer() {
        let score = QualityAssessor::default().score("Maybe.", QUESTION);
        assert!(score.needs_requery);
        assert_eq!(score.red_flags, vec![RedFlag::TooShort, RedFlag::OneWord]);
        assert!((score.penalty - 0.2).abs() < 1e-12);
        assert_eq!(score.depth_score, 0.0);
        assert!(!score.follow_up_questions.is_empty());
        assert!(score.follow_up_questions.len() <= 3);
    }

    #[test]
    fn test_two_flags_force_requery_even_when_deep() {
        let text = format!("{DEEP} Honestly it depends, and it is impossible to predict.");
        let score = QualityAssessor::default().score(&text, QUESTION);
        assert_eq!(score.red_flags, vec![RedFlag::GenericHedge, RedFlag::Dismissive]);
        assert!(score.depth_score >= 0.6, "depth {}", score.depth_score);
        assert!(score.needs_requery);
        assert!(
            score
                .follow_up_questions
                .iter()
                .any(|q| q.starts_with("Avoid vague"))
        );
    }

    #[test]
    fn test_hedge_with_content_not_flagged() {
        let text = format!("{DEEP} In the end it depends on whether winter arrives early.");
        let score = QualityAssessor::default().score(&text, QUESTION);
        assert!(!score.red_flags.contains(&RedFlag::GenericHedge));
    }

    #[test]
    fn test_deflection_flagged() {
        let text = format!("{DEEP} We would need more information to be sure.");
        let score = QualityAssessor::default().score(&text, QUESTION);
        assert_eq!(score.red_flags, vec![RedFlag::Deflection]);
        assert!((score.penalty - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_penalty_capped() {
        let text = "It depends. Impossible to say. Need more data.";
        let score = QualityAssessor::default().score(text, QUESTION);
        assert_eq!(score.red_flags.len(), 4);
        assert!((score.penalty - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_follow_ups_target_weak_dimensions() {
        let text = "The region has seen tension for a long time and things are tense now. \
            Leaders are talking and talking and talking, and people are worried about what \
            will happen next in the area overall.";
        let score = QualityAssessor::default().score(text, QUESTION);
        assert!(score.needs_requery);
        assert_eq!(score.follow_up_questions.len(), 3);
        assert!(score.follow_up_questions[0].starts_with("What specific data"));
        assert!(score.follow_up_questions[0].contains("military escalation"));
    }

    #[test]
    fn test_threshold_configurable() {
        let lenient = QualityAssessor::new(QualityPolicy::default().with_requery_threshold(0.0));
        let text = "x ".repeat(100);
        assert!(!lenient.score(&text, QUESTION).needs_requery);
    }

    #[test]
    fn test_max_follow_ups_respected() {
        let assessor = QualityAssessor::new(QualityPolicy::default().with_max_follow_ups(1));
        let score = assessor.score("No.", QUESTION);
        assert_eq!(score.follow_up_questions.len(), 1);
    }

    proptest! {
        #[test]
        fn prop_short_responses_always_requeried(text in "[a-zA-Z0-9 .,]{0,149}") {
            let score = QualityAssessor::default().score(&text, QUESTION);
            prop_assert!(score.needs_requery);
            prop_assert!(!score.red_flags.is_empty());
        }

        #[test]
        fn prop_depth_in_unit_range(text in ".{0,600}") {
            let score = QualityAssessor::default().score(&text, QUESTION);
            prop_assert!((0.0..=1.0).contains(&score.depth_score));
            prop_assert!(score.follow_up_questions.len() <= 3);
        }
    }
}
