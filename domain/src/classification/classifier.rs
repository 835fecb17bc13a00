//! Keyword-weighted domain classifier

use super::domain::ForecastDomain;
use super::keywords::keywords_for;
use serde::{Deserialize, Serialize};

/// Secondary domains must reach this share of the top score.
pub const SECONDARY_SHARE: f64 = 0.5;

/// Score accumulated by one domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomainScore {
    pub domain: ForecastDomain,
    pub score: f64,
}

/// Classification of a single question (immutable once produced).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainClassification {
    pub primary_domain: ForecastDomain,
    /// `top_score / total_score`, or 0 when nothing matched.
    pub confidence: f64,
    /// Ordered by score, highest first.
    pub secondary_domains: Vec<ForecastDomain>,
    pub matched_keywords: Vec<String>,
    /// Non-zero domain scores in priority order.
    pub scores: Vec<DomainScore>,
}

impl DomainClassification {
    /// Classification for a question that matched no keyword.
    pub fn general() -> Self {
        Self {
            primary_domain: ForecastDomain::General,
            confidence: 0.0,
            secondary_domains: Vec::new(),
            matched_keywords: Vec::new(),
            scores: Vec::new(),
        }
    }

    pub fn is_general(&self) -> bool {
        self.primary_domain.is_general()
    }

    pub fn is_secondary(&self, domain: ForecastDomain) -> bool {
        self.secondary_domains.contains(&domain)
    }
}

/// Classify question text into a primary domain and ordered secondaries.
///
/// Matching is case-insensitive. Single words match whole tokens, so "war"
/// does not hit "award"; multi-word phrases match as substrings of the
/// whitespace-normalised text, so "air force" also hits "air forces". Each
/// occurrence of a keyword adds its weight. Equal scores resolve by
/// [`ForecastDomain::RANKED`] order.
pub fn classify(question: &str) -> DomainClassification {
    let text = Normalized::new(question);

    let mut scores = Vec::new();
    let mut matched_keywords = Vec::new();

    for domain in ForecastDomain::RANKED {
        let mut score = 0.0;
        for (keyword, weight) in keywords_for(domain) {
            let hits = text.count_occurrences(keyword);
            if hits > 0 {
                score += weight * hits as f64;
                if !matched_keywords.iter().any(|k: &String| k == keyword) {
                    matched_keywords.push(keyword.to_string());
                }
            }
        }
        if score > 0.0 {
            scores.push(DomainScore { domain, score });
        }
    }

    let total: f64 = scores.iter().map(|s| s.score).sum();
    if total <= 0.0 {
        return DomainClassification::general();
    }

    // `scores` is in priority order, so a strict comparison keeps the
    // higher-priority domain on ties.
    let mut top = scores[0];
    for candidate in &scores[1..] {
        if candidate.score > top.score {
            top = *candidate;
        }
    }

    let mut secondary: Vec<DomainScore> = scores
        .iter()
        .copied()
        .filter(|s| s.domain != top.domain && s.score >= SECONDARY_SHARE * top.score)
        .collect();
    secondary.sort_by(|a, b| b.score.total_cmp(&a.score));

    DomainClassification {
        primary_domain: top.domain,
        confidence: (top.score / total).clamp(0.0, 1.0),
        secondary_domains: secondary.into_iter().map(|s| s.domain).collect(),
        matched_keywords,
        scores,
    }
}

/// Question text prepared for both matching modes.
struct Normalized {
    tokens: Vec<String>,
    /// Lowercase with runs of whitespace collapsed to one space
    flat: String,
}

impl Normalized {
    fn new(text: &str) -> Self {
        Self {
            tokens: tokenize(text),
            flat: text
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
                .to_lowercase(),
        }
    }

    /// Non-overlapping occurrences of a keyword.
    fn count_occurrences(&self, keyword: &str) -> usize {
        if keyword.contains(' ') {
            self.flat.matches(keyword).count()
        } else {
            self.tokens.iter().filter(|t| *t == keyword).count()
        }
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '-'))
        .map(|t| t.trim_matches('-'))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
