//! Agent profile entity

use crate::classification::ForecastDomain;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// How strongly an agent identifies with a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DomainAffinity {
    Primary,
    Secondary,
    #[default]
    None,
}

impl fmt::Display for DomainAffinity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainAffinity::Primary => write!(f, "primary"),
            DomainAffinity::Secondary => write!(f, "secondary"),
            DomainAffinity::None => write!(f, "none"),
        }
    }
}

fn default_enabled() -> bool {
    true
}

/// A persona-bound agent (plain data).
///
/// Behaviour over a profile (prompt rendering, weighting) lives in pure
/// functions elsewhere; the profile itself never changes during a round.
///
/// `persona` may contain a `{name}` placeholder that is replaced with the
/// agent name when rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentProfile {
    pub name: String,
    pub persona: String,
    /// Backend model identifier (e.g. `gemma:2b`)
    pub model: String,
    pub base_weight: f64,
    #[serde(default)]
    pub domain_affinities: BTreeMap<ForecastDomain, DomainAffinity>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl AgentProfile {
    pub fn new(
        name: impl Into<String>,
        persona: impl Into<String>,
        model: impl Into<String>,
        base_weight: f64,
    ) -> Self {
        Self {
            name: name.into(),
            persona: persona.into(),
            model: model.into(),
            base_weight,
            domain_affinities: BTreeMap::new(),
            enabled: true,
        }
    }

    pub fn with_affinity(mut self, domain: ForecastDomain, affinity: DomainAffinity) -> Self {
        self.domain_affinities.insert(domain, affinity);
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Affinity for `domain`; unlisted domains are `None`.
    pub fn affinity_for(&self, domain: ForecastDomain) -> DomainAffinity {
        self.domain_affinities
            .get(&domain)
            .copied()
            .unwrap_or_default()
    }

    /// Domains with a primary affinity, in priority order.
    pub fn primary_domains(&self) -> Vec<ForecastDomain> {
        self.domains_with(DomainAffinity::Primary)
    }

    /// Domains with a secondary affinity, in priority order.
    pub fn secondary_domains(&self) -> Vec<ForecastDomain> {
        self.domains_with(DomainAffinity::Secondary)
    }

    fn domains_with(&self, affinity: DomainAffinity) -> Vec<ForecastDomain> {
        self.domain_affinities
            .iter()
            .filter(|(_, a)| **a == affinity)
            .map(|(d, _)| *d)
            .collect()
    }

    /// Persona text with `{name}` substituted.
    pub fn render_persona(&self) -> String {
        self.persona.replace("{name}", &self.name)
    }

    /// Reject profiles that could never be weighted or dispatched.
    pub fn validate(&self) -> Result<(), DomainError> {
        let invalid = |reason: &str| DomainError::InvalidProfile {
            name: self.name.clone(),
            reason: reason.to_string(),
        };
        if self.name.trim().is_empty() {
            return Err(invalid("name cannot be empty"));
        }
        if self.model.trim().is_empty() {
            return Err(invalid("model cannot be empty"));
        }
        if !self.base_weight.is_finite() || self.base_weight <= 0.0 {
            return Err(invalid("base_weight must be a positive finite number"));
        }
        if self.affinity_for(ForecastDomain::General) != DomainAffinity::None {
            return Err(invalid("the general domain cannot carry an affinity"));
        }
        Ok(())
    }
}
