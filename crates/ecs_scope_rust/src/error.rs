use std::path::PathBuf;

use thiserror::Error;

/// Failure that prevents a scan from producing any result.
///
/// Per-file and per-item problems never surface here; they are recorded in
/// [`crate::ScanDiagnostics`] and the scan carries on.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("scan root {} cannot be enumerated: {reason}", path.display())]
    RootUnavailable { path: PathBuf, reason: String },

    #[error("scan cancelled after {files_done} file(s)")]
    Cancelled { files_done: usize },
}

/// Failure to obtain declarations from a single source file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("read {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("parse {path}: {reason}")]
    Unparsable { path: String, reason: String },
}
