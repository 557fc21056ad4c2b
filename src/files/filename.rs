//! Download filename construction and sanitization.
//!
//! A download is saved as `{base}.{extension}`. The base comes from the
//! caller and may contain anything, so characters that would change the
//! target directory or that filesystems reject are replaced before use.

use crate::error::{Error, Result};
use crate::string_utils::truncate_bytes;
use regex::Regex;
use std::sync::OnceLock;

/// Maximum filename length (bytes) for most filesystems.
const MAX_FILENAME_LENGTH: usize = 255;

/// Windows reserved device names that cannot be used as filenames.
const WINDOWS_RESERVED: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Control characters, path separators, and characters invalid on common filesystems.
fn invalid_chars() -> &'static Regex {
    static INVALID: OnceLock<Regex> = OnceLock::new();
    INVALID.get_or_init(|| {
        Regex::new(r#"[\x00-\x1f\x7f/\\:*?"<>|]"#).expect("static pattern is valid")
    })
}

/// Replace every unsafe character in `base` with `_` and trim the edges.
pub fn sanitize_base(base: &str) -> String {
    let replaced = invalid_chars().replace_all(base, "_");
    let trimmed = replaced.trim_matches(|c: char| c == '.' || c.is_whitespace());

    if WINDOWS_RESERVED
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(trimmed))
    {
        format!("_{}", trimmed)
    } else {
        trimmed.to_string()
    }
}

/// Build the download filename `{base}.{extension}`.
///
/// # Errors
///
/// `InvalidFilename` if nothing usable remains of `base` after sanitizing.
pub fn build_filename(base: &str, extension: &str) -> Result<String> {
    if base.trim() == "." || base.trim() == ".." {
        return Err(Error::InvalidFilename {
            name: base.to_string(),
            reason: "reserved directory name",
        });
    }

    let mut stem = sanitize_base(base);
    if stem.is_empty() {
        return Err(Error::InvalidFilename {
            name: base.to_string(),
            reason: "no usable characters",
        });
    }

    truncate_bytes(&mut stem, MAX_FILENAME_LENGTH.saturating_sub(extension.len() + 1));

    Ok(format!("{}.{}", stem, extension))
}
