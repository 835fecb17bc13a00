//! File-backed persistence adapters
//!
//! Both stores write JSON through [`write_atomic`]: a sibling temp file is
//! written in full and renamed over the target, so readers never observe a
//! half-written document.

mod json_report_repository;
mod json_reputation_store;

pub use json_report_repository::JsonReportRepository;
pub use json_reputation_store::JsonReputationStore;

use std::io;
use std::path::Path;

pub(crate) async fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await
}
