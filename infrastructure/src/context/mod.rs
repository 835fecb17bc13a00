//! Context provider adapters

mod jsonl_provider;

pub use jsonl_provider::JsonlContextProvider;
