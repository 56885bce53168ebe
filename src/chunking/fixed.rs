//! Fixed-window segmentation.
//!
//! Cuts text every `max_len` characters. Boundaries ignore words and
//! sentences, so concatenating the units always gives back the input.

use super::{ContentUnit, Segmenter, MAX_UNIT_LENGTH};
use crate::error::Result;

/// Split `text` into windows of at most [`MAX_UNIT_LENGTH`] characters.
pub fn segment(text: &str) -> Vec<ContentUnit> {
    segment_with_len(text, MAX_UNIT_LENGTH)
}

fn segment_with_len(text: &str, max_len: usize) -> Vec<ContentUnit> {
    if text.is_empty() || max_len == 0 {
        return Vec::new();
    }

    let mut units = Vec::with_capacity(text.len() / max_len + 1);
    let mut start = 0;
    let mut count = 0;

    for (idx, _) in text.char_indices() {
        if count == max_len {
            units.push(ContentUnit::new(text[start..idx].to_string()));
            start = idx;
            count = 0;
        }
        count += 1;
    }
    units.push(ContentUnit::new(text[start..].to_string()));

    units
}

/// Segmenter with a configurable window length.
#[derive(Debug, Clone)]
pub struct FixedWindowSegmenter {
    max_len: usize,
}

impl FixedWindowSegmenter {
    pub fn new() -> Self {
        Self::with_max_len(MAX_UNIT_LENGTH)
    }

    /// A zero length is treated as the default.
    pub fn with_max_len(max_len: usize) -> Self {
        let max_len = if max_len == 0 { MAX_UNIT_LENGTH } else { max_len };
        Self { max_len }
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }
}

impl Default for FixedWindowSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Segmenter for FixedWindowSegmenter {
    fn segment(&self, text: &str) -> Result<Vec<ContentUnit>> {
        Ok(segment_with_len(text, self.max_len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(units: &[ContentUnit]) -> String {
        units.iter().map(|u| u.content()).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(segment("").is_empty());
    }

    #[test]
    fn test_short_input_is_single_unit() {
        let units = segment("Hello world");
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].content(), "Hello world");
    }

    #[test]
    fn test_unit_counts_and_reconstruction() {
        for n in [1usize, 399, 400, 401, 799, 800, 801, 1234] {
            let text: String = (0..n).map(|i| (b'a' + (i % 26) as u8) as char).collect();
            let units = segment(&text);

            assert_eq!(units.len(), n.div_ceil(400), "length {}", n);
            assert_eq!(joined(&units), text);
            for unit in &units[..units.len() - 1] {
                assert_eq!(unit.char_len(), 400);
            }
            assert!(units.last().unwrap().char_len() <= 400);
        }
    }

    #[test]
    fn test_boundaries_ignore_words() {
        let text = "word ".repeat(100);
        let units = segment(&text);
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].char_len(), 400);
        assert_eq!(units[1].content(), "word ".repeat(20));
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let text = "é".repeat(450);
        let units = segment(&text);
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].char_len(), 400);
        assert_eq!(units[1].char_len(), 50);
        assert_eq!(joined(&units), text);
    }

    #[test]
    fn test_resegmenting_a_unit_is_identity() {
        let text = "Das ist ein ziemlich langer Satz. ".repeat(40);
        for unit in segment(&text) {
            let again = segment(unit.content());
            assert_eq!(again, vec![unit]);
        }
    }

    #[test]
    fn test_deterministic() {
        let text = "abc".repeat(300);
        assert_eq!(segment(&text), segment(&text));
    }

    #[test]
    fn test_custom_window() {
        let segmenter = FixedWindowSegmenter::with_max_len(4);
        let units = segmenter.segment("abcdefghij").unwrap();
        let contents: Vec<&str> = units.iter().map(|u| u.content()).collect();
        assert_eq!(contents, vec!["abcd", "efgh", "ij"]);

        assert_eq!(FixedWindowSegmenter::with_max_len(0).max_len(), MAX_UNIT_LENGTH);
    }
}
