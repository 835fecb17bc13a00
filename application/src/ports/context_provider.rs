//! Context provider port
//!
//! Supplies recent `(snippet, source, timestamp)` items for a question. The
//! round reads them once at start; a failing provider degrades to an empty
//! context rather than failing the round.

use async_trait::async_trait;
use foresight_domain::{ContextQuery, ContextSnippet};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContextError {
    #[error("Context source unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed context entry: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait ContextProvider: Send + Sync {
    /// Snippets inside `query`'s lookback window, newest first, at most
    /// `query.max_items`.
    async fn fetch(
        &self,
        question: &str,
        query: &ContextQuery,
    ) -> Result<Vec<ContextSnippet>, ContextError>;
}

/// Provider with nothing to offer.
pub struct NoContext;

#[async_trait]
impl ContextProvider for NoContext {
    async fn fetch(
        &self,
        _question: &str,
        _query: &ContextQuery,
    ) -> Result<Vec<ContextSnippet>, ContextError> {
        Ok(Vec::new())
    }
}
