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


//! Filesystem-safe name sanitization
//!
//! Chapter titles come from container metadata and user input, so they can
//! contain anything. [`sanitize`] turns them into names that are safe on
//! every filesystem we care about: no path separators or Windows-reserved
//! characters, collapsed whitespace, bounded length. Pure string
//! transformation, no I/O, deterministic in its inputs, and idempotent.

use regex::Regex;
use std::sync::LazyLock;

/// Upper bound on sanitized name length, in characters
pub const MAX_NAME_CHARS: usize = 180;

// Windows-illegal characters; a run of them collapses to one underscore
static RESERVED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*]+"#).unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Sanitize `raw` into a filesystem-safe name, substituting `fallback`
/// when the trimmed raw name is empty.
///
/// Steps, in order: fallback substitution, reserved-run replacement with
/// `_`, whitespace-run collapse to a single space, trim, truncation to
/// [`MAX_NAME_CHARS`] characters.
pub fn sanitize(raw: &str, fallback: &str) -> String {
    let base = raw.trim();
    let base = if base.is_empty() { fallback } else { base };

    let replaced = RESERVED.replace_all(base, "_");
    let collapsed = WHITESPACE.replace_all(&replaced, " ");
    // Truncation can cut right after an internal space, so the bound is
    // applied first and the trim repeated to keep the result trimmed.
    let truncated: String = collapsed.trim().chars().take(MAX_NAME_CHARS).collect();
    truncated.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_characters_replaced() {
        assert_eq!(sanitize("My/Book: Ch 1", "fallback"), "My_Book_ Ch 1");
    }

    #[test]
    fn test_reserved_run_becomes_single_underscore() {
        assert_eq!(sanitize("a<>:\"|?*b", "fallback"), "a_b");
        assert_eq!(sanitize("a\\\\//b", "fallback"), "a_b");
    }

    #[test]
    fn test_whitespace_collapsed_and_trimmed() {
        assert_eq!(sanitize("  a \t\n b  ", "fallback"), "a b");
    }

    #[test]
    fn test_empty_raw_uses_fallback() {
        assert_eq!(sanitize("   ", "fallback"), "fallback");
        assert_eq!(sanitize("", "fallback"), "fallback");
    }

    #[test]
    fn test_fallback_is_sanitized_too() {
        assert_eq!(sanitize("", "bad/fall  back"), "bad_fall back");
    }

    #[test]
    fn test_truncated_to_max_chars() {
        let long = "x".repeat(500);
        let result = sanitize(&long, "fallback");
        assert_eq!(result.chars().count(), MAX_NAME_CHARS);
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let long = "ä".repeat(500);
        let result = sanitize(&long, "fallback");
        assert_eq!(result.chars().count(), MAX_NAME_CHARS);
    }

    #[test]
    fn test_truncation_landing_after_a_space_stays_trimmed() {
        // 179 chars, then a space at position 180: the cut must not
        // leave a trailing space behind
        let raw = format!("{} tail", "a".repeat(MAX_NAME_CHARS - 1));
        let once = sanitize(&raw, "fallback");
        assert_eq!(once, "a".repeat(MAX_NAME_CHARS - 1));
        assert!(!once.ends_with(' '));
        assert_eq!(sanitize(&once, "fallback"), once);
    }

    #[test]
    fn test_idempotent() {
        let cases = [
            "My/Book: Ch 1",
            "   ",
            "plain name",
            "a<>:\"|?*b",
            "  spaced   out  ",
            "ümläut / töst",
        ];
        for raw in cases {
            let once = sanitize(raw, "fallback");
            let twice = sanitize(&once, "fallback");
            assert_eq!(once, twice, "sanitize not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(
            sanitize("Some: Title", "fb"),
            sanitize("Some: Title", "fb")
        );
    }
}
