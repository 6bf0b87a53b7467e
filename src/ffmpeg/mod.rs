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


//! ffmpeg/ffprobe invocation layer
//!
//! This module wraps the three ways the pipeline talks to the media tools:
//!
//! ## probe
//! Container inspection via ffprobe:
//! - `MediaProbe` - tag metadata and chapter listings as typed structures
//! - `Chapter` - a 1-based, tool-ordered time range within the book
//! - `ContainerMetadata` - format-level tag map (diagnostics only)
//!
//! ## transcode
//! Decrypting format conversion via ffmpeg:
//! - `Transcoder` - AAX container to intermediate MP3 with activation bytes
//!
//! ## split
//! Chapter extraction via ffmpeg:
//! - `Splitter` - stream-copied time range with an embedded title tag
//!
//! ## activation
//! - `ActivationBytes` - validated 8-hex-digit decryption credential
//!
//! # Tool resolution
//!
//! Executables are resolved inside a caller-supplied tool directory
//! (`<tool_dir>/ffprobe`, `<tool_dir>/ffmpeg`); nothing here consults PATH
//! or hard-codes an installation location.

pub mod activation;
pub mod probe;
pub mod split;
pub mod transcode;

// Re-export commonly used types
pub use activation::ActivationBytes;
pub use probe::{Chapter, ContainerMetadata, MediaProbe};
pub use split::Splitter;
pub use transcode::Transcoder;

/// ffprobe executable name inside the tool directory
pub(crate) const FFPROBE_BIN: &str = "ffprobe";
/// ffmpeg executable name inside the tool directory
pub(crate) const FFMPEG_BIN: &str = "ffmpeg";
