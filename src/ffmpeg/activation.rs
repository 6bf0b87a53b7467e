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


//! Activation bytes handling
//!
//! # What are Activation Bytes?
//! - 4-byte key derived from the Audible account owning the book
//! - Required by ffmpeg (`-activation_bytes`) to decode AAX containers
//! - Format: 8 hex characters (e.g., "1CEB00DA")
//!
//! The value is account-secret: it is carried in a newtype whose `Debug`
//! output is redacted, and only rendered as hex at the point the ffmpeg
//! argument list is assembled.

use crate::error::{AaxSplitError, Result};
use std::str::FromStr;

/// Fallback credential used when no activation bytes are configured.
///
/// Kept for backward compatibility with earlier releases that baked this
/// value in; real use requires the bytes for the owning account.
pub const DEFAULT_ACTIVATION_BYTES: &str = "11bb9604";

/// Newtype wrapper around activation bytes to provide type safety
///
/// Guarantees the value is exactly 4 bytes parsed from 8 hex characters,
/// so command construction can never see a malformed credential.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ActivationBytes([u8; 4]);

impl ActivationBytes {
    /// Parse activation bytes from a hex string
    ///
    /// # Errors
    /// `InvalidActivationBytes` if the string is not exactly 8 hex
    /// characters (case-insensitive).
    pub fn from_hex(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.len() != 8 {
            return Err(AaxSplitError::InvalidActivationBytes(format!(
                "expected 8 hex characters, got {}",
                trimmed.len()
            )));
        }
        let decoded = hex::decode(trimmed).map_err(|e| {
            AaxSplitError::InvalidActivationBytes(format!("not valid hex: {e}"))
        })?;
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&decoded);
        Ok(Self(bytes))
    }

    /// Format as the lowercase hex string ffmpeg expects
    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }
}

impl Default for ActivationBytes {
    fn default() -> Self {
        Self([0x11, 0xbb, 0x96, 0x04])
    }
}

impl FromStr for ActivationBytes {
    type Err = AaxSplitError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

// Redacted: the credential must never land in logs or error chains.
impl std::fmt::Debug for ActivationBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ActivationBytes(********)")
    }
}
