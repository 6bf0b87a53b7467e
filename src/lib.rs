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


//! aaxsplit - convert encrypted AAX audiobooks into per-chapter MP3 files
//!
//! The crate orchestrates ffmpeg/ffprobe through subprocess invocations:
//! probe the container, transcode it with the account's activation bytes,
//! enumerate chapters, then extract each chapter into an
//! ordinal-prefixed, filesystem-safe MP3.
//!
//! # Module Organization
//!
//! ## process
//! Subprocess execution: [`process::ProcessRunner`] drains both child
//! output streams concurrently so the child can never deadlock on a full
//! pipe buffer.
//!
//! ## ffmpeg
//! Tool invocations: [`ffmpeg::MediaProbe`] (metadata and chapters, typed
//! JSON decoding), [`ffmpeg::Transcoder`] (decrypting AAX→MP3 transcode),
//! [`ffmpeg::Splitter`] (per-chapter stream-copy extraction), and
//! [`ffmpeg::ActivationBytes`] (validated credential).
//!
//! ## naming
//! Pure filename sanitization for chapter titles.
//!
//! ## pipeline
//! [`pipeline::Pipeline`] sequences the stages and owns the working
//! directory and intermediate file.
//!
//! # ffmpeg Integration
//!
//! ffmpeg and ffprobe must be installed; their directory is passed in via
//! [`pipeline::ConversionOptions::tool_dir`] (the CLI resolves a platform
//! default). Decoding AAX input additionally requires the activation
//! bytes for the account that owns the book.

pub mod error;
pub mod ffmpeg;
pub mod naming;
pub mod pipeline;
pub mod process;

// Re-export commonly used types for convenience
pub use error::{AaxSplitError, Result};
pub use ffmpeg::{ActivationBytes, Chapter, ContainerMetadata, MediaProbe, Splitter, Transcoder};
pub use pipeline::{ConversionOptions, Pipeline, INTERMEDIATE_FILE_NAME};
pub use process::{ProcessResult, ProcessRunner};
