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


//! Subprocess execution with deadlock-free stream capture
//!
//! Everything else in this crate talks to ffmpeg/ffprobe through
//! [`ProcessRunner`]. The runner owns the one piece of concurrency in the
//! system: both child output pipes are drained by independent tasks so the
//! child can never stall on a full pipe buffer while we wait on the other
//! stream.

pub mod runner;

// Re-export commonly used types
pub use runner::{render_command, ProcessResult, ProcessRunner};
