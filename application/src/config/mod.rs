//! Application-level configuration.
//!
//! Parameter slices handed to the gateway and use cases:
//!
//! - [`GatewayParams`]: retries, backoff, cache TTLs, breaker thresholds
//! - [`RoundParams`]: per-call timeout, round deadline, question bound
//! - [`QualityParams`]: requery policy
//! - [`ForecastParams`]: container for everything a round needs

pub mod gateway_params;
pub mod round_params;

pub use gateway_params::GatewayParams;
pub use round_params::{ForecastParams, QualityParams, RoundParams};
