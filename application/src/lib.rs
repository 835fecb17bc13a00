//! Application layer for foresight
//!
//! This crate contains use cases, port definitions, the resilient generation
//! gateway and application configuration. It depends only on the domain layer.

pub mod config;
pub mod gateway;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ForecastParams, GatewayParams, QualityParams, RoundParams};
pub use gateway::{EndpointStatus, Generation, GatewayError, GenerationGateway};
pub use ports::{
    agent_source::{AgentSource, AgentSourceError, StaticAgentSource},
    context_provider::{ContextError, ContextProvider, NoContext},
    generation_backend::{BackendError, BackendErrorKind, GenerationBackend},
    progress::{NoProgress, RoundProgressNotifier},
    report_repository::{ReportRepository, ReportRepositoryError},
    reputation_store::{InMemoryReputationStore, ReputationStore, ReputationStoreError},
    round_logger::{NoRoundLogger, RoundEvent, RoundLogger},
};
pub use use_cases::record_outcome::{RecordOutcomeError, RecordOutcomeUseCase};
pub use use_cases::run_forecast::{RunForecastError, RunForecastInput, RunForecastUseCase};
