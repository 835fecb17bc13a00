//! Agent responses and reply parsing.

pub mod entities;
pub mod parsing;

pub use entities::{AgentResponse, AttemptStatus, FailureKind, ResponseFailure, ScoredResponse};
pub use parsing::{ParsedReply, ReplyParseError, parse_agent_reply};
