//! Low-level padding primitives.
//!
//! Lengths are counted in `char`s. [`pad`] returns the number of pad
//! characters it added so that [`unpad`] can remove exactly those again;
//! the pair is the encode/decode inverse used by every field.

/// Side of the value on which pad characters are placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PadDirection {
    /// Pad at the front (right-justified content).
    Left,
    /// Pad at the back (left-justified content).
    Right,
}

/// Result of [`pad`]: the formatted value and how many pad chars were added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Padded {
    pub value: String,
    pub added: usize,
}

/// Number of `char`s in `s`.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Removes a maximal run of `fill` from the padding side of `value`.
pub fn strip(value: &str, fill: char, direction: PadDirection) -> &str {
    match direction {
        PadDirection::Left => value.trim_start_matches(fill),
        PadDirection::Right => value.trim_end_matches(fill),
    }
}

/// Pads `value` with `fill` on `direction` until it is `width` chars long.
///
/// A value already `width` or longer is returned unchanged with nothing added.
pub fn pad(value: &str, width: usize, fill: char, direction: PadDirection) -> Padded {
    let len = char_len(value);
    if len >= width {
        return Padded {
            value: value.to_string(),
            added: 0,
        };
    }

    let added = width - len;
    let mut out = String::with_capacity(value.len() + added * fill.len_utf8());
    match direction {
        PadDirection::Left => {
            out.extend(std::iter::repeat_n(fill, added));
            out.push_str(value);
        }
        PadDirection::Right => {
            out.push_str(value);
            out.extend(std::iter::repeat_n(fill, added));
        }
    }

    Padded { value: out, added }
}

/// Removes exactly `added` chars from the padding side of `value`.
///
/// This is not a trim: it only undoes what the matching [`pad`] call did.
pub fn unpad(value: &str, added: usize, direction: PadDirection) -> &str {
    if added == 0 {
        return value;
    }

    match direction {
        PadDirection::Left => match value.char_indices().nth(added) {
            Some((idx, _)) => &value[idx..],
            None => "",
        },
        PadDirection::Right => {
            let keep = char_len(value).saturating_sub(added);
            &value[..byte_offset(value, keep)]
        }
    }
}

/// Byte offset of the `n`th char of `s` (or `s.len()` past the end).
pub fn byte_offset(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map_or(s.len(), |(idx, _)| idx)
}

/// Splits `s` after `n` chars.
pub fn split_chars(s: &str, n: usize) -> (&str, &str) {
    s.split_at(byte_offset(s, n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_right() {
        let padded = pad("Lorem ipsum", 20, ' ', PadDirection::Right);
        assert_eq!(padded.value, "Lorem ipsum         ");
        assert_eq!(padded.added, 9);
    }

    #[test]
    fn test_pad_left() {
        let padded = pad("-123", 5, '0', PadDirection::Left);
        assert_eq!(padded.value, "0-123");
        assert_eq!(padded.added, 1);
    }

    #[test]
    fn test_pad_too_long() {
        let padded = pad("abcdef", 3, ' ', PadDirection::Right);
        assert_eq!(padded.value, "abcdef");
        assert_eq!(padded.added, 0);
    }

    #[test]
    fn test_unpad_is_exact() {
        assert_eq!(unpad("0-123", 1, PadDirection::Left), "-123");
        assert_eq!(unpad("ab   ", 2, PadDirection::Right), "ab ");
        assert_eq!(unpad("ab   ", 0, PadDirection::Right), "ab   ");
        assert_eq!(unpad("000", 3, PadDirection::Left), "");
    }

    #[test]
    fn test_strip() {
        assert_eq!(strip("000120", '0', PadDirection::Left), "120");
        assert_eq!(strip("ab  ", ' ', PadDirection::Right), "ab");
        assert_eq!(strip("   ", ' ', PadDirection::Right), "");
    }

    #[test]
    fn test_multibyte_chars() {
        let padded = pad("città", 7, ' ', PadDirection::Right);
        assert_eq!(padded.value, "città  ");
        assert_eq!(char_len(&padded.value), 7);
        assert_eq!(unpad(&padded.value, padded.added, PadDirection::Right), "città");
        assert_eq!(split_chars("àbc", 1), ("à", "bc"));
    }
}
