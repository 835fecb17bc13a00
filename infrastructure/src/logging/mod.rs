//! Round audit logging adapters

mod jsonl_round_logger;

pub use jsonl_round_logger::JsonlRoundLogger;
