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


//! Chapter extraction via ffmpeg stream copy
//!
//! One invocation per chapter:
//!
//! ```text
//! ffmpeg -hide_banner -loglevel error -y -i <input> -ss <start> -t <duration>
//!        -map 0:a:0 -c copy -metadata title="<title>" <output>
//! ```
//!
//! `-c copy` avoids a re-encode, so a split is a cheap byte-range
//! operation. Start and duration are always rendered with exactly six
//! fractional digits; ffmpeg's argument parser expects a stable numeric
//! format and Rust's `{:.6}` is locale-independent.

use crate::error::{AaxSplitError, Result};
use crate::ffmpeg::FFMPEG_BIN;
use crate::process::{render_command, ProcessRunner};
use std::path::{Path, PathBuf};
use tracing::info;

/// ffmpeg chapter splitter front-end
pub struct Splitter {
    tool_dir: PathBuf,
}

impl Splitter {
    pub fn new(tool_dir: impl Into<PathBuf>) -> Self {
        Self {
            tool_dir: tool_dir.into(),
        }
    }

    fn ffmpeg_path(&self) -> PathBuf {
        self.tool_dir.join(FFMPEG_BIN)
    }

    /// Extract `[start, start + duration)` seconds of the first audio
    /// stream of `input` into `output`, tagged with `title`.
    ///
    /// # Errors
    /// - `ToolExecution` on a non-zero ffmpeg exit, carrying the command
    ///   line and captured stderr
    /// - `ToolNotFound` / `Launch` if ffmpeg cannot be started
    pub async fn split(
        &self,
        input: &Path,
        output: &Path,
        start_seconds: f64,
        duration_seconds: f64,
        title: &str,
    ) -> Result<()> {
        let args = split_args(input, output, start_seconds, duration_seconds, title);
        let command = render_command(self.ffmpeg_path().as_os_str(), &args);
        info!(%command, "splitting chapter");

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
}

/// ffmpeg arguments for a single chapter extraction
fn split_args(
    input: &Path,
    output: &Path,
    start_seconds: f64,
    duration_seconds: f64,
    title: &str,
) -> Vec<String> {
    vec![
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-y".to_string(),
        "-i".to_string(),
        input.to_string_lossy().into_owned(),
        "-ss".to_string(),
        format!("{start_seconds:.6}"),
        "-t".to_string(),
        format!("{duration_seconds:.6}"),
        "-map".to_string(),
        "0:a:0".to_string(),
        "-c".to_string(),
        "copy".to_string(),
        "-metadata".to_string(),
        format!("title=\"{title}\""),
        output.to_string_lossy().into_owned(),
    ]
}
