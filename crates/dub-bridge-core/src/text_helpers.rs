//! UTF-16 offset helpers.
//!
//! DOM text controls report selection offsets in UTF-16 code units, while
//! Rust strings index by byte. These functions convert between the two.

use crate::types::SelectionRange;

/// Length of a string in UTF-16 code units.
pub fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

/// Byte offset for a UTF-16 offset, clamped to the string length.
///
/// An offset that falls between the two halves of a surrogate pair rounds
/// down to the start of that character.
pub fn utf16_to_byte_offset(s: &str, utf16_offset: usize) -> usize {
    let mut units = 0;
    for (byte_idx, c) in s.char_indices() {
        let next = units + c.len_utf16();
        if next > utf16_offset {
            return byte_idx;
        }
        units = next;
    }
    s.len()
}

/// Replace the selected range of `value` with `insert`.
///
/// Returns the new value and the caret offset (UTF-16) just after the
/// inserted text.
pub fn splice_utf16(value: &str, selection: SelectionRange, insert: &str) -> (String, usize) {
    let start = utf16_to_byte_offset(value, selection.start);
    let end = utf16_to_byte_offset(value, selection.end).max(start);

    let mut out = String::with_capacity(value.len() + insert.len());
    out.push_str(&value[..start]);
    out.push_str(insert);
    out.push_str(&value[end..]);

    let caret = utf16_len(&value[..start]) + utf16_len(insert);
    (out, caret)
}
