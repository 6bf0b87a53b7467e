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


//! Conversion pipeline
//!
//! Strictly sequential stages, no re-entry, no inter-stage parallelism:
//!
//! 1. Ensure the output directory exists (recursive, idempotent)
//! 2. Probe the input container's tag metadata (diagnostic logging only)
//! 3. Transcode the input to the fixed intermediate file in the working
//!    directory, then verify it is non-empty
//! 4. Probe the intermediate for chapters
//! 5. Split each chapter, in tool order, into
//!    `NNN - <sanitized title>.mp3` inside the output directory
//!
//! Splitting chapters could run concurrently, but running them in order
//! bounds the number of live ffmpeg processes at one and makes failure
//! attribution exact. The sequential ordering is also what guarantees the
//! intermediate file is written once and only read afterwards.
//!
//! Failure policy: any stage error aborts the pipeline, including the
//! first failing chapter split. There is no rollback; chapter files
//! written before the failure stay on disk.

use crate::error::{AaxSplitError, Result};
use crate::ffmpeg::{ActivationBytes, MediaProbe, Splitter, Transcoder};
use crate::naming;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Fixed name of the decrypted intermediate file inside the working
/// directory. Written by the transcode stage, read by the chapter probe
/// and every split.
pub const INTERMEDIATE_FILE_NAME: &str = "test.mp3";

/// Everything a conversion run needs
///
/// Owned by the caller (normally the CLI layer, which also resolves
/// platform defaults for the tool directory).
#[derive(Debug, Clone)]
pub struct ConversionOptions {
    /// Encrypted input container
    pub input: PathBuf,
    /// Directory receiving the chapter files; created recursively
    pub output_dir: PathBuf,
    /// Base output name (also the default display title)
    pub base_name: String,
    /// Display title used to build chapter file names
    pub title: String,
    /// Directory containing the ffmpeg and ffprobe executables
    pub tool_dir: PathBuf,
    /// Directory owning the intermediate file
    pub work_dir: PathBuf,
    /// Credential unlocking the encrypted input
    pub activation: ActivationBytes,
}

/// Per-chapter title: zero-padded three-digit ordinal plus the sanitized
/// display title, falling back to `"NNN <title>"` when the title
/// sanitizes away to nothing. Doubles as the embedded metadata title.
pub fn chapter_file_title(display_title: &str, index: usize) -> String {
    let fallback = format!("{index:03} {display_title}");
    format!("{index:03} - {}", naming::sanitize(display_title, &fallback))
}

/// The conversion orchestrator
pub struct Pipeline {
    options: ConversionOptions,
    probe: MediaProbe,
    transcoder: Transcoder,
    splitter: Splitter,
}

impl Pipeline {
    pub fn new(options: ConversionOptions) -> Self {
        let probe = MediaProbe::new(&options.tool_dir);
        let transcoder = Transcoder::new(&options.tool_dir, options.activation);
        let splitter = Splitter::new(&options.tool_dir);
        Self {
            options,
            probe,
            transcoder,
            splitter,
        }
    }

    /// Path of the intermediate file this run writes and reads
    pub fn intermediate_path(&self) -> PathBuf {
        self.options.work_dir.join(INTERMEDIATE_FILE_NAME)
    }

    /// Run the full conversion, returning the chapter files written, in
    /// chapter order.
    pub async fn run(&self) -> Result<Vec<PathBuf>> {
        let options = &self.options;

        tokio::fs::create_dir_all(&options.output_dir)
            .await
            .map_err(|e| AaxSplitError::filesystem(&options.output_dir, e))?;

        let metadata = self.probe.metadata(&options.input).await?;
        debug!(tags = ?metadata.tags, "container metadata");

        let intermediate = self.intermediate_path();
        self.transcoder.convert(&options.input, &intermediate).await?;
        verify_non_empty(&intermediate).await?;

        let chapters = self.probe.chapters(&intermediate).await?;
        info!(
            chapters = chapters.len(),
            output_dir = %options.output_dir.display(),
            "splitting {}", options.title
        );

        let mut written = Vec::with_capacity(chapters.len());
        for chapter in &chapters {
            let file_title = chapter_file_title(&options.title, chapter.index);
            let output = options.output_dir.join(format!("{file_title}.mp3"));
            self.splitter
                .split(
                    &intermediate,
                    &output,
                    chapter.start_seconds,
                    chapter.duration(),
                    &file_title,
                )
                .await?;
            written.push(output);
        }

        info!(files = written.len(), "conversion complete");
        Ok(written)
    }
}

/// The transcode stage does not trust ffmpeg's exit status alone: a wrong
/// credential has been seen producing an empty file on a zero exit.
async fn verify_non_empty(path: &Path) -> Result<()> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| AaxSplitError::filesystem(path, e))?;
    if metadata.len() == 0 {
        return Err(AaxSplitError::filesystem(
            path,
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "transcoded intermediate file is empty",
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ffmpeg::Chapter;

    #[test]
    fn test_chapter_file_title_with_real_title() {
        assert_eq!(chapter_file_title("Episode", 1), "001 - Episode");
        assert_eq!(chapter_file_title("Episode", 42), "042 - Episode");
        assert_eq!(chapter_file_title("Episode", 123), "123 - Episode");
    }

    #[test]
    fn test_chapter_file_title_sanitizes() {
        assert_eq!(chapter_file_title("My/Book: Ch 1", 7), "007 - My_Book_ Ch 1");
    }

    #[test]
    fn test_chapter_file_title_blank_title_falls_back_to_ordinal() {
        // fallback is "NNN <title>", which sanitizes to the bare ordinal
        assert_eq!(chapter_file_title("   ", 3), "003 - 003");
    }

    #[test]
    fn test_ordinal_prefixes_have_no_gaps() {
        let titles: Vec<String> = (1..=12).map(|i| chapter_file_title("Book", i)).collect();
        for (i, title) in titles.iter().enumerate() {
            assert!(title.starts_with(&format!("{:03} - ", i + 1)));
        }
        let mut sorted = titles.clone();
        sorted.sort();
        assert_eq!(sorted, titles, "alphabetical order must match chapter order");
    }

    #[test]
    fn test_three_chapter_split_plan() {
        // Probe response [0,10], [10,25], [25,25] with title "Episode"
        let chapters = [
            Chapter { index: 1, start_seconds: 0.0, end_seconds: 10.0 },
            Chapter { index: 2, start_seconds: 10.0, end_seconds: 25.0 },
            Chapter { index: 3, start_seconds: 25.0, end_seconds: 25.0 },
        ];
        let durations: Vec<f64> = chapters.iter().map(Chapter::duration).collect();
        assert_eq!(durations, vec![10.0, 15.0, 0.0]);

        let names: Vec<String> = chapters
            .iter()
            .map(|c| format!("{}.mp3", chapter_file_title("Episode", c.index)))
            .collect();
        assert_eq!(
            names,
            vec!["001 - Episode.mp3", "002 - Episode.mp3", "003 - Episode.mp3"]
        );
    }

    #[test]
    fn test_intermediate_path_inside_work_dir() {
        let options = ConversionOptions {
            input: PathBuf::from("book.aax"),
            output_dir: PathBuf::from("out"),
            base_name: "out".to_string(),
            title: "out".to_string(),
            tool_dir: PathBuf::from("/usr/bin"),
            work_dir: PathBuf::from("/tmp/work"),
            activation: ActivationBytes::default(),
        };
        let pipeline = Pipeline::new(options);
        assert_eq!(
            pipeline.intermediate_path(),
            PathBuf::from("/tmp/work").join(INTERMEDIATE_FILE_NAME)
        );
    }
}
