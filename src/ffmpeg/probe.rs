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


//! Container metadata and chapter probing via ffprobe
//!
//! ffprobe is asked for JSON on stdout and decoded into typed structures
//! that fail fast on missing or mistyped fields, instead of deferring
//! shape errors to the point of use:
//!
//! - `ffprobe -v error -show_entries format_tags -of json <input>` for
//!   container tag metadata
//! - `ffprobe -v error -print_format json -show_chapters <input>` for the
//!   chapter list
//!
//! Chapter order is the tool's order; ordinals are assigned 1..N in that
//! order and never re-sorted.

use crate::error::{AaxSplitError, Result};
use crate::ffmpeg::FFPROBE_BIN;
use crate::process::ProcessRunner;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A chapter time range within the audiobook
///
/// Produced by [`MediaProbe::chapters`] and consumed immediately by the
/// splitter; not persisted anywhere.
#[derive(Debug, Clone, PartialEq)]
pub struct Chapter {
    /// 1-based position in tool order, contiguous
    pub index: usize,
    /// Start offset in seconds, >= 0
    pub start_seconds: f64,
    /// End offset in seconds
    pub end_seconds: f64,
}

impl Chapter {
    /// Chapter length in seconds, clamped so malformed tool output
    /// (end before start) yields 0.0 rather than a negative duration.
    pub fn duration(&self) -> f64 {
        (self.end_seconds - self.start_seconds).max(0.0)
    }
}

/// Container-level tag metadata
///
/// Used only for diagnostic logging in the pipeline; absence of tags is
/// not an error.
#[derive(Debug, Clone, Default)]
pub struct ContainerMetadata {
    pub tags: BTreeMap<String, String>,
}

/// ffprobe JSON output structures
#[derive(Debug, Deserialize)]
struct TagDocument {
    #[serde(default)]
    format: TagFormatSection,
}

#[derive(Debug, Default, Deserialize)]
struct TagFormatSection {
    #[serde(default)]
    tags: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct ChapterDocument {
    // Required: a document without a chapter array is a probe failure
    chapters: Vec<RawChapter>,
}

#[derive(Debug, Deserialize)]
struct RawChapter {
    start_time: String,
    end_time: String,
}

/// ffprobe front-end
pub struct MediaProbe {
    tool_dir: PathBuf,
}

impl MediaProbe {
    pub fn new(tool_dir: impl Into<PathBuf>) -> Self {
        Self {
            tool_dir: tool_dir.into(),
        }
    }

    fn ffprobe_path(&self) -> PathBuf {
        self.tool_dir.join(FFPROBE_BIN)
    }

    /// Read container tag metadata from `input`
    ///
    /// # Errors
    /// `Probe` if ffprobe exits non-zero or its output is not a JSON
    /// document (malformed or empty).
    pub async fn metadata(&self, input: &Path) -> Result<ContainerMetadata> {
        let args = metadata_args(input);
        debug!(input = %input.display(), "probing container metadata");

        let result = ProcessRunner::run(self.ffprobe_path(), &args).await?;
        if !result.success() {
            return Err(AaxSplitError::probe(format!(
                "metadata probe of {} exited with code {}: {}",
                input.display(),
                result.exit_code,
                result.stderr.trim()
            )));
        }
        parse_metadata(&result.stdout)
    }

    /// Read the ordered chapter list from `input`
    ///
    /// # Errors
    /// `Probe` if ffprobe exits non-zero, the output is not JSON, the
    /// `chapters` field is absent, or any time field is non-numeric.
    pub async fn chapters(&self, input: &Path) -> Result<Vec<Chapter>> {
        let args = chapter_args(input);
        debug!(input = %input.display(), "probing chapters");

        let result = ProcessRunner::run(self.ffprobe_path(), &args).await?;
        if !result.success() {
            return Err(AaxSplitError::probe(format!(
                "chapter probe of {} exited with code {}: {}",
                input.display(),
                result.exit_code,
                result.stderr.trim()
            )));
        }
        parse_chapters(&result.stdout)
    }
}

/// ffprobe arguments for the container tag metadata query
fn metadata_args(input: &Path) -> Vec<String> {
    vec![
        "-v".to_string(),
        "error".to_string(),
        "-show_entries".to_string(),
        "format_tags".to_string(),
        "-of".to_string(),
        "json".to_string(),
        input.to_string_lossy().into_owned(),
    ]
}

/// ffprobe arguments for the chapter listing query
fn chapter_args(input: &Path) -> Vec<String> {
    vec![
        "-v".to_string(),
        "error".to_string(),
        "-print_format".to_string(),
        "json".to_string(),
        "-show_chapters".to_string(),
        input.to_string_lossy().into_owned(),
    ]
}

/// Decode the tag metadata document
fn parse_metadata(json: &str) -> Result<ContainerMetadata> {
    if json.trim().is_empty() {
        return Err(AaxSplitError::probe("metadata probe produced no output"));
    }
    let doc: TagDocument = serde_json::from_str(json)
        .map_err(|e| AaxSplitError::probe(format!("metadata document malformed: {e}")))?;
    Ok(ContainerMetadata {
        tags: doc.format.tags,
    })
}

/// Decode the chapter document into ordered, 1-indexed chapters
fn parse_chapters(json: &str) -> Result<Vec<Chapter>> {
    if json.trim().is_empty() {
        return Err(AaxSplitError::probe("chapter probe produced no output"));
    }
    let doc: ChapterDocument = serde_json::from_str(json)
        .map_err(|e| AaxSplitError::probe(format!("chapter document malformed: {e}")))?;

    let mut chapters = Vec::with_capacity(doc.chapters.len());
    for (i, raw) in doc.chapters.into_iter().enumerate() {
        let start = parse_time_field("start_time", &raw.start_time)?;
        let end = parse_time_field("end_time", &raw.end_time)?;
        chapters.push(Chapter {
            index: i + 1,
            start_seconds: start.max(0.0),
            end_seconds: end,
        });
    }
    Ok(chapters)
}

fn parse_time_field(field: &str, value: &str) -> Result<f64> {
    value.parse::<f64>().map_err(|_| {
        AaxSplitError::probe(format!("chapter {field} is not numeric: {value:?}"))
    })
}
