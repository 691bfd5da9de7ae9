//! UTF-8 offset helpers for caret and selection handling.

use std::borrow::Cow;

/// Clamp a byte offset into `0..=s.len()` and snap it back onto a char boundary.
///
/// # Examples
///
/// ```
/// use input_core::clamp_to_char_boundary;
///
/// let s = "a€b"; // '€' is 3 bytes
/// assert_eq!(clamp_to_char_boundary(s, 1), 1);
/// assert_eq!(clamp_to_char_boundary(s, 2), 1);
/// assert_eq!(clamp_to_char_boundary(s, 4), 4);
/// assert_eq!(clamp_to_char_boundary(s, 100), 5);
/// ```
#[inline]
pub fn clamp_to_char_boundary(s: &str, index: usize) -> usize {
    let mut index = index.min(s.len());
    while index > 0 && !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Clamp an offset captured against one value so it is usable against `s`,
/// whose length may differ (`new_len` may be shorter than `s` while a caller
/// is still writing it, so both bounds are applied).
///
/// ```
/// use input_core::clamp_offset;
///
/// assert_eq!(clamp_offset("1234", 9, 4), 4);
/// assert_eq!(clamp_offset("1234", 3, 2), 2);
/// assert_eq!(clamp_offset("€", 2, 3), 0);
/// ```
#[inline]
pub fn clamp_offset(s: &str, offset: usize, new_len: usize) -> usize {
    clamp_to_char_boundary(s, offset.min(new_len))
}

/// Byte offset of the char boundary before `i` (0 at the start).
///
/// ```
/// use input_core::prev_cursor_boundary;
///
/// assert_eq!(prev_cursor_boundary("a€b", 4), 1);
/// assert_eq!(prev_cursor_boundary("a€b", 0), 0);
/// ```
pub fn prev_cursor_boundary(s: &str, i: usize) -> usize {
    let i = clamp_to_char_boundary(s, i);
    s[..i].char_indices().next_back().map_or(0, |(idx, _)| idx)
}

/// Byte offset of the char boundary after `i` (`s.len()` at the end).
///
/// ```
/// use input_core::next_cursor_boundary;
///
/// assert_eq!(next_cursor_boundary("a€b", 1), 4);
/// assert_eq!(next_cursor_boundary("a€b", 5), 5);
/// ```
pub fn next_cursor_boundary(s: &str, i: usize) -> usize {
    let i = clamp_to_char_boundary(s, i);
    s[i..].chars().next().map_or(s.len(), |ch| i + ch.len_utf8())
}

/// Strip CR/LF for single-line controls.
///
/// ```
/// use input_core::filter_single_line;
///
/// assert_eq!(filter_single_line("a\r\nb"), "ab");
/// ```
pub fn filter_single_line(s: &str) -> Cow<'_, str> {
    if !s.contains(['\n', '\r']) {
        return Cow::Borrowed(s);
    }
    Cow::Owned(s.chars().filter(|c| *c != '\n' && *c != '\r').collect())
}

/// Normalize CRLF/CR to LF, the way textarea values are stored.
///
/// ```
/// use input_core::normalize_newlines;
///
/// assert_eq!(normalize_newlines("a\r\nb\rc"), "a\nb\nc");
/// ```
pub fn normalize_newlines(s: &str) -> Cow<'_, str> {
    if !s.contains('\r') {
        return Cow::Borrowed(s);
    }
    Cow::Owned(s.replace("\r\n", "\n").replace('\r', "\n"))
}
