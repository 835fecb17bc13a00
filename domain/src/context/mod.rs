//! Round context: dated snippets from an external collaborator.
//!
//! A context provider returns [`ContextSnippet`]s for a [`ContextQuery`].
//! The orchestrator wraps them in a [`ContextBundle`], which renders a
//! numbered block within a character budget:
//!
//! ```text
//! [1] reuters.com (2025-03-02 14:00 UTC): Troops massed near the border...
//! [2] bbc.co.uk (2025-03-01 09:30 UTC): Talks stalled after...
//! ```

pub mod entities;
pub mod value_objects;

pub use entities::ContextBundle;
pub use value_objects::{ContextQuery, ContextSnippet};
