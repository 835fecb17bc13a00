//! File-backed agent registry source

mod file_source;

pub use file_source::FileAgentSource;
