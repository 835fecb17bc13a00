//! Quality score value objects

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the six scored dimensions of analytical depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityDimension {
    Evidence,
    CausalReasoning,
    UncertaintyHandling,
    Counterarguments,
    Specificity,
    TemporalReasoning,
}

impl QualityDimension {
    pub const ALL: [QualityDimension; 6] = [
        QualityDimension::Evidence,
        QualityDimension::CausalReasoning,
        QualityDimension::UncertaintyHandling,
        QualityDimension::Counterarguments,
        QualityDimension::Specificity,
        QualityDimension::TemporalReasoning,
    ];

    /// Fixed contribution to the depth score. Weights sum to 1.
    pub fn weight(&self) -> f64 {
        match self {
            QualityDimension::Evidence => 0.25,
            QualityDimension::CausalReasoning => 0.20,
            QualityDimension::UncertaintyHandling => 0.15,
            QualityDimension::Counterarguments => 0.15,
            QualityDimension::Specificity => 0.15,
            QualityDimension::TemporalReasoning => 0.10,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityDimension::Evidence => "evidence",
            QualityDimension::CausalReasoning => "causal_reasoning",
            QualityDimension::UncertaintyHandling => "uncertainty_handling",
            QualityDimension::Counterarguments => "counterarguments",
            QualityDimension::Specificity => "specificity",
            QualityDimension::TemporalReasoning => "temporal_reasoning",
        }
    }
}

impl fmt::Display for QualityDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Indicator of superficial analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedFlag {
    TooShort,
    OneWord,
    GenericHedge,
    Dismissive,
    Deflection,
}

impl RedFlag {
    /// Flags that force a requery regardless of depth.
    pub fn is_disqualifying(&self) -> bool {
        matches!(self, RedFlag::TooShort | RedFlag::OneWord)
    }

    pub fn description(&self) -> &'static str {
        match self {
            RedFlag::TooShort => "Response too short",
            RedFlag::OneWord => "One-word answer",
            RedFlag::GenericHedge => "Generic hedge without specifics",
            RedFlag::Dismissive => "Dismissive without analysis",
            RedFlag::Deflection => "Deflection without using available context",
        }
    }
}

impl fmt::Display for RedFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Sub-scores in [0, 1] for each dimension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DimensionScores {
    pub evidence: f64,
    pub causal_reasoning: f64,
    pub uncertainty_handling: f64,
    pub counterarguments: f64,
    pub specificity: f64,
    pub temporal_reasoning: f64,
}

impl DimensionScores {
    pub fn get(&self, dimension: QualityDimension) -> f64 {
        match dimension {
            QualityDimension::Evidence => self.evidence,
            QualityDimension::CausalReasoning => self.causal_reasoning,
            QualityDimension::UncertaintyHandling => self.uncertainty_handling,
            QualityDimension::Counterarguments => self.counterarguments,
            QualityDimension::Specificity => self.specificity,
            QualityDimension::TemporalReasoning => self.temporal_reasoning,
        }
    }

    /// Weighted sum before penalties.
    pub fn weighted_depth(&self) -> f64 {
        QualityDimension::ALL
            .iter()
            .map(|d| d.weight() * self.get(*d))
            .sum()
    }

    /// Up to `n` dimensions sorted from weakest, ties in declaration order.
    pub fn weakest(&self, n: usize) -> Vec<(QualityDimension, f64)> {
        let mut dims: Vec<_> = QualityDimension::ALL
            .iter()
            .map(|d| (*d, self.get(*d)))
            .collect();
        dims.sort_by(|a, b| a.1.total_cmp(&b.1));
        dims.truncate(n);
        dims
    }
}

/// Assessment of a single response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityScore {
    pub dimensions: DimensionScores,
    /// Total red-flag penalty subtracted from the weighted depth
    pub penalty: f64,
    /// Final depth in [0, 1]
    pub depth_score: f64,
    pub red_flags: Vec<RedFlag>,
    pub needs_requery: bool,
    pub follow_up_questions: Vec<String>,
}

impl QualityScore {
    pub fn has_flags(&self) -> bool {
        !self.red_flags.is_empty()
    }
}
