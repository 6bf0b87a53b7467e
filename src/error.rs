// aaxsplit - AAX audiobook to per-chapter MP3 converter
// Copyright (C) 2025 Henning Berge
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! Error types for aaxsplit
//!
//! This module defines error types using thiserror for ergonomic error
//! handling. Errors are categorized by failure domain:
//!
//! - **Launch**: the external tool could not be started at all
//! - **Probe**: ffprobe produced malformed or unexpected structured output
//! - **ToolExecution**: a transcode/split invocation exited non-zero
//! - **Filesystem**: directory or file creation failed
//! - **Timeout**: a deadline-wrapped invocation expired
//!
//! Probe and transcode errors abort the pipeline immediately; there is no
//! retry logic anywhere. `ToolExecution` carries the rendered command line
//! and captured stderr so failures surface everything needed for diagnosis.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias using our AaxSplitError type
pub type Result<T> = std::result::Result<T, AaxSplitError>;

/// Main error type for aaxsplit
#[derive(Error, Debug)]
pub enum AaxSplitError {
    /// External tool binary not found
    #[error("tool not found: {0}. Install ffmpeg and check the --tool directory.")]
    ToolNotFound(String),

    /// External tool found but could not be launched
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// ffprobe output was malformed or missing an expected field
    #[error("probe output invalid: {0}")]
    Probe(String),

    /// Transcode or split invocation exited non-zero
    #[error("`{command}` exited with code {exit_code}:\n{stderr}")]
    ToolExecution {
        /// The full rendered command line that failed
        command: String,
        exit_code: i32,
        /// Captured standard-error text from the child
        stderr: String,
    },

    /// Directory or file creation failure
    #[error("filesystem error at {path}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A deadline-wrapped invocation expired; the child was killed
    #[error("{program} timed out after {elapsed:?}")]
    Timeout { program: String, elapsed: Duration },

    /// Activation bytes were not 8 hex digits
    #[error("invalid activation bytes: {0}")]
    InvalidActivationBytes(String),
}

impl AaxSplitError {
    /// Create a Filesystem error with path context
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AaxSplitError::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Create a Probe error with a message
    pub fn probe<S: Into<String>>(message: S) -> Self {
        AaxSplitError::Probe(message.into())
    }

    /// Check if error came from the external tool itself
    /// (as opposed to our own filesystem/parsing failures). The CLI maps
    /// the two classes to distinct exit codes.
    pub fn is_tool_error(&self) -> bool {
        matches!(
            self,
            AaxSplitError::ToolNotFound(_)
                | AaxSplitError::Launch { .. }
                | AaxSplitError::ToolExecution { .. }
                | AaxSplitError::Timeout { .. }
        )
    }

    /// Get user-friendly error message suitable for display
    pub fn user_message(&self) -> String {
        match self {
            AaxSplitError::ToolNotFound(tool) => {
                format!(
                    "{} is required but was not found. Install ffmpeg and point --tool at its bin directory.",
                    tool
                )
            }
            AaxSplitError::ToolExecution { command, stderr, .. } => {
                format!("ffmpeg failed while running `{}`:\n{}", command, stderr.trim())
            }
            AaxSplitError::InvalidActivationBytes(_) => {
                "Activation bytes must be exactly 8 hex characters (e.g. 1cEB00da).".to_string()
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_error_classification() {
        let err = AaxSplitError::ToolNotFound("ffprobe".to_string());
        assert!(err.is_tool_error());

        let err = AaxSplitError::Probe("empty output".to_string());
        assert!(!err.is_tool_error());

        let err = AaxSplitError::ToolExecution {
            command: "ffmpeg -i in.aax out.mp3".to_string(),
            exit_code: 1,
            stderr: "invalid activation bytes".to_string(),
        };
        assert!(err.is_tool_error());
    }

    #[test]
    fn test_tool_execution_display_includes_command_and_stderr() {
        let err = AaxSplitError::ToolExecution {
            command: "ffmpeg -i book.aax out.mp3".to_string(),
            exit_code: 1,
            stderr: "Invalid data found".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("ffmpeg -i book.aax out.mp3"));
        assert!(msg.contains("code 1"));
        assert!(msg.contains("Invalid data found"));
    }

    #[test]
    fn test_user_message_tool_not_found() {
        let err = AaxSplitError::ToolNotFound("ffprobe".to_string());
        assert!(err.user_message().contains("--tool"));
    }
}
