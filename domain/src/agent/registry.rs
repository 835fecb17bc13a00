//! Agent registry: the catalogue of profiles available to a round.

use super::profile::{AgentProfile, DomainAffinity};
use crate::classification::ForecastDomain;
use crate::core::error::DomainError;
use std::collections::HashSet;

/// Validated, name-unique collection of [`AgentProfile`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentRegistry {
    profiles: Vec<AgentProfile>,
}

impl AgentRegistry {
    /// Build a registry, validating every profile and rejecting duplicates.
    pub fn new(profiles: Vec<AgentProfile>) -> Result<Self, DomainError> {
        let mut seen = HashSet::new();
        for profile in &profiles {
            profile.validate()?;
            if !seen.insert(profile.name.to_lowercase()) {
                return Err(DomainError::DuplicateAgent(profile.name.clone()));
            }
        }
        Ok(Self { profiles })
    }

    /// The built-in forecasting expert corps.
    pub fn builtin() -> Self {
        Self {
            profiles: builtin_corps(),
        }
    }

    /// Replace profiles with matching names and append the rest.
    pub fn with_overrides(self, overrides: Vec<AgentProfile>) -> Result<Self, DomainError> {
        let mut profiles = self.profiles;
        for o in overrides {
            match profiles
                .iter_mut()
                .find(|p| p.name.eq_ignore_ascii_case(&o.name))
            {
                Some(existing) => *existing = o,
                None => profiles.push(o),
            }
        }
        Self::new(profiles)
    }

    pub fn profiles(&self) -> &[AgentProfile] {
        &self.profiles
    }

    pub fn get(&self, name: &str) -> Option<&AgentProfile> {
        self.profiles
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn enabled(&self) -> Vec<AgentProfile> {
        self.profiles.iter().filter(|p| p.enabled).cloned().collect()
    }

    /// Agents for one round.
    ///
    /// An empty `names` list selects every enabled agent. Otherwise exactly
    /// the named agents are returned (in registry order), even if disabled.
    pub fn select(&self, names: &[String]) -> Result<Vec<AgentProfile>, DomainError> {
        if names.is_empty() {
            return Ok(self.enabled());
        }
        for name in names {
            if self.get(name).is_none() {
                return Err(DomainError::UnknownAgent(name.clone()));
            }
        }
        Ok(self
            .profiles
            .iter()
            .filter(|p| names.iter().any(|n| p.name.eq_ignore_ascii_case(n)))
            .cloned()
            .collect())
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn expert(name: &str, persona: &str, model: &str, base_weight: f64) -> AgentProfile {
    AgentProfile::new(
        name,
        format!("You are {{name}}, {persona}"),
        model,
        base_weight,
    )
}

fn builtin_corps() -> Vec<AgentProfile> {
    use DomainAffinity::{Primary, Secondary};
    use ForecastDomain::*;

    vec![
        expert(
            "Macro Risk Forecaster",
            "a macroeconomic risk analyst. Weigh systemic economic and political shocks: growth trends, monetary policy, trade flows and tail events.",
            "gemma:2b",
            1.2,
        )
        .with_affinity(Geopolitical, Primary)
        .with_affinity(Financial, Secondary),
        expert(
            "Demand & Logistics Forecaster",
            "a supply chain specialist. Anticipate disruptions to shipping, freight rates, port congestion and manufacturing demand.",
            "qwen2.5:0.5b-instruct",
            1.1,
        )
        .with_affinity(Infrastructure, Primary)
        .with_affinity(Energy, Secondary),
        expert(
            "Financial Market Forecaster",
            "a quantitative market analyst. Relate events to equity volatility, currency moves, credit spreads and commodity prices.",
            "deepseek-r1:1.5b",
            1.2,
        )
        .with_affinity(Financial, Primary),
        expert(
            "Energy & Resource Forecaster",
            "an energy and commodities expert. Assess oil, gas, critical minerals and renewables through supply and demand balances.",
            "gemma:2b",
            1.1,
        )
        .with_affinity(Energy, Primary)
        .with_affinity(Environmental, Secondary),
        expert(
            "Time-Series Specialist",
            "a statistical forecaster. Look for trends, seasonality, structural breaks and honest prediction intervals.",
            "qwen2.5:0.5b",
            1.0,
        )
        .with_affinity(Financial, Secondary)
        .with_affinity(Infrastructure, Secondary),
        expert(
            "Military Strategy Expert",
            "a military strategist. Judge force posture, doctrine, deployments and escalation dynamics.",
            "qwen2.5:0.5b",
            1.2,
        )
        .with_affinity(Military, Primary)
        .with_affinity(Geopolitical, Secondary),
        expert(
            "Historical Trends Expert",
            "a historian of geopolitical cycles. Place current events against historical precedent and base rates.",
            "gemma:2b",
            1.0,
        )
        .with_affinity(Geopolitical, Secondary)
        .with_affinity(Societal, Secondary),
        expert(
            "Technology & Cyber Expert",
            "a technology and cybersecurity strategist. Forecast disruption from AI, semiconductors, cyberattacks and digital infrastructure.",
            "mistral:7b",
            1.1,
        )
        .with_affinity(Technology, Primary)
        .with_affinity(Infrastructure, Secondary),
        expert(
            "Climate & Environmental Expert",
            "a climate risk analyst. Connect weather extremes, resource scarcity and climate policy to outcomes.",
            "gemma:2b",
            1.0,
        )
        .with_affinity(Environmental, Primary)
        .with_affinity(Energy, Secondary),
        expert(
            "Societal Dynamics Expert",
            "a sociologist of civil unrest. Track inequality, unemployment, demographic pressure and protest movements.",
            "qwen2.5:0.5b",
            1.0,
        )
        .with_affinity(Societal, Primary),
        expert(
            "Policy & Governance Analyst",
            "a public policy expert. Analyse legislation, regulatory change and institutional stability.",
            "llama2:latest",
            1.0,
        )
        .with_affinity(Policy, Primary)
        .with_affinity(Geopolitical, Secondary),
        expert(
            "Intelligence & OSINT Specialist",
            "an open-source intelligence analyst. Read indicators, information operations and signals of covert activity.",
            "phi3:mini",
            1.1,
        )
        .with_affinity(Military, Secondary)
        .with_affinity(Geopolitical, Secondary),
        expert(
            "Industrial & Manufacturing Analyst",
            "an industrial production analyst. Follow capacity utilisation, factory orders and manufacturing bottlenecks.",
            "gemma:2b",
            1.0,
        )
        .with_affinity(Infrastructure, Primary)
        .with_affinity(Financial, Secondary),
        expert(
            "Health & Biosecurity Expert",
            "a public health and biosecurity specialist. Forecast outbreak risk, health system stress and biological threats.",
            "llama2:latest",
            1.0,
        )
        .with_affinity(Health, Primary),
        expert(
            "Network & Infrastructure Analyst",
            "a critical infrastructure analyst. Assess grid stability, telecom outages and cascading system dependencies.",
            "qwen2.5:0.5b",
            1.0,
        )
        .with_affinity(Infrastructure, Primary)
        .with_affinity(Technology, Secondary),
        expert(
            "Chaos Agent",
            "a deliberate contrarian. Argue the strongest case against the prevailing view and surface overlooked failure modes.",
            "gemma:2b",
            0.8,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_corps_is_valid() {
        let registry = AgentRegistry::builtin();
        assert_eq!(registry.len(), 16);
        assert!(AgentRegistry::new(registry.profiles().to_vec()).is_ok());
    }

    #[test]
    fn test_chaos_agent_has_no_affinities() {
        let registry = AgentRegistry::builtin();
        let chaos = registry.get("chaos agent").unwrap();
        assert!(chaos.domain_affinities.is_empty());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let profiles = vec![
            AgentProfile::new("Analyst", "p", "m", 1.0),
            AgentProfile::new("analyst", "p", "m", 1.0),
        ];
        assert_eq!(
            AgentRegistry::new(profiles),
            Err(DomainError::DuplicateAgent("analyst".to_string()))
        );
    }

    #[test]
    fn test_overrides_replace_and_append() {
        let registry = AgentRegistry::builtin()
            .with_overrides(vec![
                AgentProfile::new("Chaos Agent", "p", "m", 1.0).with_enabled(false),
                AgentProfile::new("Local Analyst", "p", "llama3", 1.5),
            ])
            .unwrap();
        assert_eq!(registry.len(), 17);
        assert!(!registry.get("Chaos Agent").unwrap().enabled);
        assert_eq!(registry.enabled().len(), 16);
    }

    #[test]
    fn test_overrides_validated() {
        let result = AgentRegistry::builtin()
            .with_overrides(vec![AgentProfile::new("Broken", "p", "m", 0.0)]);
        assert!(matches!(result, Err(DomainError::InvalidProfile { .. })));
    }

    #[test]
    fn test_select_by_name() {
        let registry = AgentRegistry::builtin();
        let selected = registry
            .select(&["chaos agent".to_string(), "Military Strategy Expert".to_string()])
            .unwrap();
        // Registry order, not request order
        assert_eq!(selected[0].name, "Military Strategy Expert");
        assert_eq!(selected[1].name, "Chaos Agent");
    }

    #[test]
    fn test_select_unknown_agent() {
        let registry = AgentRegistry::builtin();
        assert_eq!(
            registry.select(&["Nobody".to_string()]),
            Err(DomainError::UnknownAgent("Nobody".to_string()))
        );
    }

    #[test]
    fn test_select_empty_returns_enabled() {
        let registry = AgentRegistry::new(vec![
            AgentProfile::new("a", "p", "m", 1.0),
            AgentProfile::new("b", "p", "m", 1.0).with_enabled(false),
        ])
        .unwrap();
        let selected = registry.select(&[]).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name, "a");
    }
}
