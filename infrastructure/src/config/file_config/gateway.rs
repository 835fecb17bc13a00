//! Gateway configuration from TOML (`[gateway]` section)

use foresight_application::GatewayParams;
use foresight_domain::{CacheTtls, CircuitBreakerConfig, ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retry, cache and circuit breaker settings.
///
/// ```toml
/// [gateway]
/// max_retries = 3
/// backoff_base_ms = 1000
/// cache_ttl_secs = 3600
/// failure_threshold = 5
/// open_timeout_secs = 60
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGatewayConfig {
    pub max_retries: u32,
    pub backoff_base_ms: u64,
    pub backoff_max_ms: u64,
    pub cache_enabled: bool,
    /// TTL for forecast prompts
    pub cache_ttl_secs: u64,
    /// TTL for slow-changing lookups
    pub lookup_cache_ttl_secs: u64,
    pub failure_threshold: u32,
    pub open_timeout_secs: u64,
    pub success_threshold: u32,
    pub half_open_max_probes: u32,
}

impl Default for FileGatewayConfig {
    fn default() -> Self {
        let params = GatewayParams::default();
        Self {
            max_retries: params.max_retries,
            backoff_base_ms: params.backoff_base.as_millis() as u64,
            backoff_max_ms: params.backoff_max.as_millis() as u64,
            cache_enabled: params.cache_enabled,
            cache_ttl_secs: params.cache_ttls.ad_hoc.as_secs(),
            lookup_cache_ttl_secs: params.cache_ttls.lookup.as_secs(),
            failure_threshold: params.breaker.failure_threshold,
            open_timeout_secs: params.breaker.open_timeout.as_secs(),
            success_threshold: params.breaker.success_threshold,
            half_open_max_probes: params.breaker.half_open_max_probes,
        }
    }
}

impl FileGatewayConfig {
    pub fn to_params(&self) -> GatewayParams {
        GatewayParams::default()
            .with_max_retries(self.max_retries)
            .with_backoff(
                Duration::from_millis(self.backoff_base_ms),
                Duration::from_millis(self.backoff_max_ms),
            )
            .with_cache_enabled(self.cache_enabled)
            .with_cache_ttls(CacheTtls {
                ad_hoc: Duration::from_secs(self.cache_ttl_secs),
                lookup: Duration::from_secs(self.lookup_cache_ttl_secs),
            })
            .with_breaker(CircuitBreakerConfig {
                failure_threshold: self.failure_threshold,
                open_timeout: Duration::from_secs(self.open_timeout_secs),
                success_threshold: self.success_threshold,
                half_open_max_probes: self.half_open_max_probes,
            })
    }

    pub(super) fn validate(&self, issues: &mut Vec<ConfigIssue>) {
        for (field, value) in [
            ("failure_threshold", self.failure_threshold),
            ("success_threshold", self.success_threshold),
            ("half_open_max_probes", self.half_open_max_probes),
        ] {
            if value == 0 {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::ThresholdOutOfRange,
                    format!("gateway.{field} must be at least 1"),
                ));
            }
        }
        if self.open_timeout_secs == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroDuration,
                "gateway.open_timeout_secs cannot be 0",
            ));
        }
        if self.cache_enabled && (self.cache_ttl_secs == 0 || self.lookup_cache_ttl_secs == 0) {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ZeroDuration,
                "gateway cache TTL of 0 disables caching for that class of call",
            ));
        }
        if self.max_retries > 0 && self.backoff_base_ms == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ZeroDuration,
                "gateway.backoff_base_ms is 0; retries will hammer the backend",
            ));
        }
    }
}
