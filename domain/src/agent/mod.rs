//! Agent domain module
//!
//! Agents are plain data ([`AgentProfile`]) collected in an
//! [`AgentRegistry`]. Prompt rendering and weighting are pure functions
//! over the profile (see [`crate::prompt`] and [`crate::consensus`]).

pub mod profile;
pub mod registry;

pub use profile::{AgentProfile, DomainAffinity};
pub use registry::AgentRegistry;
