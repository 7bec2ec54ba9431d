//! Error types for the merge crate.

use std::path::PathBuf;

/// Errors that can occur while loading merge inputs or writing results.
///
/// Conflicts are not errors: they are emitted as marker blocks in the
/// merged output.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// One of the input paths does not exist.
    #[error("input not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    /// Reading an input or writing the merged output failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration file could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience alias for merge results.
pub type MergeResult<T> = Result<T, MergeError>;
