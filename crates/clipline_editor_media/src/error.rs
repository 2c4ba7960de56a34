// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors raised while importing or analysing media
#[derive(Debug, Error)]
pub enum MediaError {
    /// File rejected before probing
    #[error("Invalid video file: {0}")]
    Rejected(String),

    /// File does not exist
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Tool binary missing from PATH
    #[error("{0} not found in PATH")]
    ToolNotFound(&'static str),

    /// FFprobe exited unsuccessfully
    #[error("FFprobe failed: {message}")]
    ProbeFailed {
        /// Summary
        message: String,
        /// Captured stderr
        stderr: Option<String>,
    },

    /// FFmpeg exited unsuccessfully
    #[error("FFmpeg failed: {message}")]
    DecodeFailed {
        /// Summary
        message: String,
        /// Captured stderr
        stderr: Option<String>,
    },

    /// Media decoded but its metadata is unusable
    #[error("Invalid media: {0}")]
    InvalidMedia(String),

    /// External tool did not finish in time
    #[error("{operation} timed out after {seconds} seconds")]
    Timeout {
        /// What was running
        operation: &'static str,
        /// Limit that was hit
        seconds: u64,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed tool output
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}
