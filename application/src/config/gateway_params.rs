//! Generation gateway parameters.

use foresight_domain::{CacheTtls, CircuitBreakerConfig};
use std::time::Duration;

/// Resilience settings for the [`GenerationGateway`](crate::gateway::GenerationGateway).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayParams {
    /// Retries after the first attempt for transient failures.
    pub max_retries: u32,
    /// Delay before the first retry; doubles each time.
    pub backoff_base: Duration,
    /// Upper bound for a single backoff delay.
    pub backoff_max: Duration,
    pub cache_ttls: CacheTtls,
    pub cache_enabled: bool,
    pub breaker: CircuitBreakerConfig,
}

impl Default for GatewayParams {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_base: Duration::from_secs(1),
            backoff_max: Duration::from_secs(60),
            cache_ttls: CacheTtls::default(),
            cache_enabled: true,
            breaker: CircuitBreakerConfig::default(),
        }
    }
}

impl GatewayParams {
    // ==================== Builder Methods ====================

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn with_backoff(mut self, base: Duration, max: Duration) -> Self {
        self.backoff_base = base;
        self.backoff_max = max;
        self
    }

    pub fn with_cache_ttls(mut self, ttls: CacheTtls) -> Self {
        self.cache_ttls = ttls;
        self
    }

    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    pub fn with_breaker(mut self, breaker: CircuitBreakerConfig) -> Self {
        self.breaker = breaker;
        self
    }

    /// Delay before retry number `retry` (0-based): base × 2^retry, capped.
    pub fn backoff_for(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry);
        self.backoff_base
            .checked_mul(factor)
            .unwrap_or(self.backoff_max)
            .min(self.backoff_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_backoff_sequence() {
        let params = GatewayParams::default();
        assert_eq!(params.backoff_for(0), Duration::from_secs(1));
        assert_eq!(params.backoff_for(1), Duration::from_secs(2));
        assert_eq!(params.backoff_for(2), Duration::from_secs(4));
    }

    #[test]
    fn test_backoff_is_capped() {
        let params = GatewayParams::default()
            .with_backoff(Duration::from_secs(10), Duration::from_secs(30));
        assert_eq!(params.backoff_for(5), Duration::from_secs(30));
        assert_eq!(params.backoff_for(40), Duration::from_secs(30));
    }

    #[test]
    fn test_builder() {
        let params = GatewayParams::default()
            .with_max_retries(0)
            .with_cache_enabled(false);
        assert_eq!(params.max_retries, 0);
        assert!(!params.cache_enabled);
    }
}
