// SPDX-License-Identifier: GPL-3.0-only

use std::path::PathBuf;

use thiserror::Error;

/// Error types for snapshot lookup and removal
#[derive(Error, Debug)]
pub enum SnapError {
    #[error("cmd error: {command}: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to get subvolume info on path or parent of {path:?}: {stderr}")]
    NoSubvolume { path: PathBuf, stderr: String },

    #[error("top level volume (subvolid={id}) not listed in {table:?}")]
    MountNotFound { id: String, table: PathBuf },

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("unexpected property value for {path:?}: {value}")]
    UnexpectedProperty { path: PathBuf, value: String },

    #[error(
        "delete failed in {subvolume:?} ({delete}) and read-only could not be restored: {restore}"
    )]
    RollbackFailed {
        subvolume: PathBuf,
        delete: String,
        restore: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for snapshot operations
pub type Result<T> = std::result::Result<T, SnapError>;
