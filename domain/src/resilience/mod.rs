//! Failure-isolation state for the generation gateway.
//!
//! Both types here are plain state machines driven by an explicit `now`;
//! the gateway owns them behind a mutex and performs every transition
//! atomically.

pub mod cache;
pub mod circuit_breaker;

pub use cache::{CacheKey, CachePolicy, CacheStats, CacheTtls, ResponseCache};
pub use circuit_breaker::{
    Admission, BreakerRejection, CircuitBreaker, CircuitBreakerConfig, CircuitBreakerSnapshot,
    CircuitState, Transition,
};
