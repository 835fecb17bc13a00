//! Forecast domain enumeration

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Subject-matter domain of a forecasting question.
///
/// Variant order is the tie-break priority used by the classifier: when two
/// domains score equally, the one declared first wins. `General` is the
/// fallback for questions that match no keyword and never wins a tie.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ForecastDomain {
    Military,
    Geopolitical,
    Financial,
    Energy,
    Technology,
    Health,
    Infrastructure,
    Environmental,
    Societal,
    Policy,
    General,
}

impl ForecastDomain {
    /// Every keyword-bearing domain, in tie-break priority order.
    pub const RANKED: [ForecastDomain; 10] = [
        ForecastDomain::Military,
        ForecastDomain::Geopolitical,
        ForecastDomain::Financial,
        ForecastDomain::Energy,
        ForecastDomain::Technology,
        ForecastDomain::Health,
        ForecastDomain::Infrastructure,
        ForecastDomain::Environmental,
        ForecastDomain::Societal,
        ForecastDomain::Policy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastDomain::Military => "military",
            ForecastDomain::Geopolitical => "geopolitical",
            ForecastDomain::Financial => "financial",
            ForecastDomain::Energy => "energy",
            ForecastDomain::Technology => "technology",
            ForecastDomain::Health => "health",
            ForecastDomain::Infrastructure => "infrastructure",
            ForecastDomain::Environmental => "environmental",
            ForecastDomain::Societal => "societal",
            ForecastDomain::Policy => "policy",
            ForecastDomain::General => "general",
        }
    }

    /// Position in the tie-break order (lower wins).
    pub fn priority(&self) -> usize {
        Self::RANKED
            .iter()
            .position(|d| d == self)
            .unwrap_or(Self::RANKED.len())
    }

    pub fn is_general(&self) -> bool {
        matches!(self, ForecastDomain::General)
    }
}

impl fmt::Display for ForecastDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ForecastDomain {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::RANKED
            .iter()
            .copied()
            .chain(std::iter::once(ForecastDomain::General))
            .find(|d| d.as_str() == lower)
            .ok_or_else(|| DomainError::UnknownDomain(s.to_string()))
    }
}
