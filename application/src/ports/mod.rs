//! Port definitions (interfaces for external collaborators)
//!
//! Ports define how the application layer talks to the outside world.
//! Adapters implementing them live in the infrastructure and presentation
//! layers.

pub mod agent_source;
pub mod context_provider;
pub mod generation_backend;
pub mod progress;
pub mod report_repository;
pub mod reputation_store;
pub mod round_logger;
