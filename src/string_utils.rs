//! UTF-8 Safe String Utilities
//!
//! Byte-length limits (such as filesystem name limits) must never cut a
//! multi-byte character in half. These helpers adjust byte positions to the
//! nearest character boundary first.

/// Returns the largest index that is less than or equal to `index`
/// and is on a UTF-8 character boundary.
///
/// If `index` is greater than the string length, returns the string length.
#[inline]
pub fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    (0..=index)
        .rev()
        .find(|&i| s.is_char_boundary(i))
        .unwrap_or(0)
}

/// Shorten `s` to at most `max_bytes` bytes without splitting a character.
pub fn truncate_bytes(s: &mut String, max_bytes: usize) {
    let cut = floor_char_boundary(s, max_bytes);
    s.truncate(cut);
}
