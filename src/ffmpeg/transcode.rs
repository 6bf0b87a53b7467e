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


//! AAX to MP3 transcoding via ffmpeg
//!
//! Runs the one decrypting invocation in the pipeline:
//!
//! ```text
//! ffmpeg -hide_banner -y -activation_bytes <hex> -i <input> -codec:a libmp3lame -vn <output>
//! ```
//!
//! `-y` overwrites an existing intermediate, `-vn` drops the embedded
//! cover-art video stream. A non-zero exit is fatal: ignoring it would
//! silently yield empty output when the activation bytes are wrong.
//! Callers still verify the output file is non-empty, since ffmpeg has
//! been observed exiting zero after writing nothing useful.

use crate::error::{AaxSplitError, Result};
use crate::ffmpeg::{ActivationBytes, FFMPEG_BIN};
use crate::process::{render_command, ProcessRunner};
use std::path::{Path, PathBuf};
use tracing::info;

/// ffmpeg transcode front-end
pub struct Transcoder {
    tool_dir: PathBuf,
    activation: ActivationBytes,
}

impl Transcoder {
    pub fn new(tool_dir: impl Into<PathBuf>, activation: ActivationBytes) -> Self {
        Self {
            tool_dir: tool_dir.into(),
            activation,
        }
    }

    fn ffmpeg_path(&self) -> PathBuf {
        self.tool_dir.join(FFMPEG_BIN)
    }

    /// Transcode the encrypted `input` container to MP3 at `output`,
    /// overwriting any existing file.
    ///
    /// # Errors
    /// - `ToolExecution` on a non-zero ffmpeg exit, carrying the command
    ///   line (credential redacted) and captured stderr
    /// - `ToolNotFound` / `Launch` if ffmpeg cannot be started
    pub async fn convert(&self, input: &Path, output: &Path) -> Result<()> {
        let args = transcode_args(&self.activation, input, output);
        let command = self.redacted_command(&args);
        info!(%command, "transcoding");

        let result = ProcessRunner::run(self.ffmpeg_path(), &args).await?;
        if !result.success() {
            return Err(AaxSplitError::ToolExecution {
                command,
                exit_code: result.exit_code,
                stderr: result.stderr,
            });
        }
        Ok(())
    }

    /// Rendered command line with the activation credential masked
    fn redacted_command(&self, args: &[String]) -> String {
        render_command(self.ffmpeg_path().as_os_str(), args)
            .replace(&self.activation.to_hex(), "********")
    }
}

/// ffmpeg arguments for the decrypting transcode
fn transcode_args(activation: &ActivationBytes, input: &Path, output: &Path) -> Vec<String> {
    vec![
        "-hide_banner".to_string(),
        "-y".to_string(),
        "-activation_bytes".to_string(),
        activation.to_hex(),
        "-i".to_string(),
        input.to_string_lossy().into_owned(),
        "-codec:a".to_string(),
        "libmp3lame".to_string(),
        "-vn".to_string(),
        output.to_string_lossy().into_owned(),
    ]
}
