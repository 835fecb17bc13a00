//! Prompt domain
//!
//! Pure rendering of agent and requery prompts from profile data.

mod template;

pub use template::PromptTemplate;
