// SPDX-FileCopyrightText: 2026 Aco Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Splits a reply into segments that fit the platform message limit.
//!
//! Lengths are counted in Unicode scalar values, never bytes, so a segment
//! boundary can not fall inside a multi-byte character. Splitting ignores
//! word boundaries.

/// Partitions `text` into consecutive segments of at most `max_length`
/// characters. Concatenating the result reproduces `text` exactly.
///
/// Empty text yields a single empty segment. A `max_length` of zero is
/// treated as one.
pub fn split(text: &str, max_length: usize) -> Vec<String> {
    let max_length = max_length.max(1);

    let mut segments = Vec::with_capacity(text.len() / max_length + 1);
    let mut start = 0;
    let mut chars_in_segment = 0;
    for (offset, _) in text.char_indices() {
        if chars_in_segment == max_length {
            segments.push(text[start..offset].to_string());
            start = offset;
            chars_in_segment = 0;
        }
        chars_in_segment += 1;
    }
    segments.push(text[start..].to_string());
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn short_text_is_returned_unchanged() {
        assert_eq!(split("ciao", 2000), vec!["ciao"]);
    }

    #[test]
    fn empty_text_yields_one_empty_segment() {
        assert_eq!(split("", 2000), vec![String::new()]);
    }

    #[test]
    fn exact_multiple_has_no_trailing_empty_segment() {
        assert_eq!(split("abcdef", 3), vec!["abc", "def"]);
    }

    #[test]
    fn remainder_goes_in_last_segment() {
        assert_eq!(split("abcdefg", 3), vec!["abc", "def", "g"]);
    }

    #[test]
    fn newlines_are_preserved() {
        let segments = split("ab\ncd\n", 2);
        assert_eq!(segments, vec!["ab", "\nc", "d\n"]);
        assert_eq!(segments.concat(), "ab\ncd\n");
    }

    #[test]
    fn multibyte_characters_are_not_cut() {
        let text = "è".repeat(5);
        let segments = split(&text, 2);
        assert_eq!(segments, vec!["èè", "èè", "è"]);
    }

    #[test]
    fn zero_limit_behaves_as_one() {
        assert_eq!(split("abc", 0), vec!["a", "b", "c"]);
    }

    #[test]
    fn platform_limit_splits_long_reply() {
        let reply = "x".repeat(4500);
        let segments = split(&reply, 2000);
        let lengths: Vec<_> = segments.iter().map(|s| s.chars().count()).collect();
        assert_eq!(lengths, vec![2000, 2000, 500]);
    }

    proptest! {
        #[test]
        fn segments_reassemble_within_bounds(text in "\\PC{0,300}", max_length in 1usize..64) {
            let segments = split(&text, max_length);
            let len = text.chars().count();
            let expected = if len == 0 { 1 } else { len.div_ceil(max_length) };

            prop_assert_eq!(segments.concat(), text);
            prop_assert_eq!(segments.len(), expected);
            for segment in &segments {
                prop_assert!(segment.chars().count() <= max_length);
            }
        }
    }
}
