//! Styled text - the render-ready output of a highlight pass
//!
//! A [`StyledText`] pairs the original text with a run list that covers every
//! character exactly once. Positions are character indices, not bytes.

use std::ops::Range;

use crate::font::{Decoration, Font};
use crate::theme::Color;

/// Fully resolved style for a run of characters
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub foreground: Color,
    pub background: Option<Color>,
    pub font: Font,
    pub decoration: Option<Decoration>,
}

impl TextStyle {
    pub fn new(foreground: Color, font: Font) -> Self {
        Self {
            foreground,
            background: None,
            font,
            decoration: None,
        }
    }
}

/// A maximal run of characters sharing one style
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRun {
    /// Character range (start inclusive, end exclusive)
    pub range: Range<usize>,
    pub style: TextStyle,
}

/// Text plus per-character style. Immutable once built.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StyledText {
    text: String,
    char_count: usize,
    /// Sorted, contiguous, covering 0..char_count
    runs: Vec<StyleRun>,
}

impl StyledText {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every character with the same style
    pub fn uniform(text: &str, style: TextStyle) -> Self {
        StyledTextBuilder::new(text, style).build()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn runs(&self) -> &[StyleRun] {
        &self.runs
    }

    pub fn len_chars(&self) -> usize {
        self.char_count
    }

    pub fn is_empty(&self) -> bool {
        self.char_count == 0
    }

    /// Style of the character at `char_idx`
    pub fn style_at(&self, char_idx: usize) -> Option<&TextStyle> {
        if char_idx >= self.char_count {
            return None;
        }
        let idx = self.runs.partition_point(|run| run.range.end <= char_idx);
        self.runs.get(idx).map(|run| &run.style)
    }

    /// Copy limited to the first `limit` lines, without the final line break
    pub fn first_lines(&self, limit: usize) -> StyledText {
        let cut = self
            .text
            .char_indices()
            .filter(|&(_, ch)| ch == '\n')
            .nth(limit.saturating_sub(1))
            .map(|(byte, _)| byte);

        let byte_end = match (limit, cut) {
            (0, _) => 0,
            (_, Some(byte)) => byte,
            (_, None) => return self.clone(),
        };

        let text = self.text[..byte_end].to_string();
        let char_count = text.chars().count();
        let runs = self
            .runs
            .iter()
            .filter(|run| run.range.start < char_count)
            .map(|run| StyleRun {
                range: run.range.start..run.range.end.min(char_count),
                style: run.style.clone(),
            })
            .collect();

        StyledText {
            text,
            char_count,
            runs,
        }
    }
}

/// Mutable construction state for a [`StyledText`]
pub(crate) struct StyledTextBuilder {
    text: String,
    /// Byte offset of each char
    char_starts: Vec<usize>,
    palette: Vec<TextStyle>,
    /// Palette index per char
    slots: Vec<u32>,
}

impl StyledTextBuilder {
    pub(crate) fn new(text: &str, base: TextStyle) -> Self {
        let char_starts: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        let slots = vec![0; char_starts.len()];
        Self {
            text: text.to_string(),
            char_starts,
            palette: vec![base],
            slots,
        }
    }

    /// Palette slot for a style, reusing an existing identical one
    pub(crate) fn intern(&mut self, style: TextStyle) -> u32 {
        if let Some(pos) = self.palette.iter().position(|s| *s == style) {
            return pos as u32;
        }
        self.palette.push(style);
        (self.palette.len() - 1) as u32
    }

    /// Map a byte range onto characters.
    ///
    /// The range is clamped to the text and widened to char boundaries.
    /// Returns the char range and whether it had to be adjusted, or `None`
    /// when nothing of it lies inside the text.
    pub(crate) fn char_range(&self, bytes: &Range<usize>) -> Option<(Range<usize>, bool)> {
        let len = self.text.len();
        let mut start = bytes.start.min(len);
        let mut end = bytes.end.min(len);
        if start >= end {
            return None;
        }
        let clamped = start != bytes.start || end != bytes.end;

        while !self.text.is_char_boundary(start) {
            start -= 1;
        }
        while !self.text.is_char_boundary(end) {
            end += 1;
        }
        let snapped = start != bytes.start.min(len) || end != bytes.end.min(len);

        let first = self.char_starts.partition_point(|&b| b < start);
        let last = self.char_starts.partition_point(|&b| b < end);
        Some((first..last, clamped || snapped))
    }

    /// Assign a palette slot to a char range (last write wins)
    pub(crate) fn apply(&mut self, chars: Range<usize>, slot: u32) {
        let end = chars.end.min(self.slots.len());
        let start = chars.start.min(end);
        self.slots[start..end].fill(slot);
    }

    pub(crate) fn build(self) -> StyledText {
        let mut runs: Vec<StyleRun> = Vec::new();
        let mut run_start = 0;
        for i in 1..=self.slots.len() {
            if i == self.slots.len() || self.slots[i] != self.slots[run_start] {
                runs.push(StyleRun {
                    range: run_start..i,
                    style: self.palette[self.slots[run_start] as usize].clone(),
                });
                run_start = i;
            }
        }

        StyledText {
            char_count: self.slots.len(),
            text: self.text,
            runs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontConfiguration;

    fn style(r: u8) -> TextStyle {
        TextStyle::new(Color::rgb(r, 0, 0), FontConfiguration::default().font())
    }

    #[test]
    fn test_uniform_single_run() {
        let styled = StyledText::uniform("hello", style(1));
        assert_eq!(styled.len_chars(), 5);
        assert_eq!(styled.runs().len(), 1);
        assert_eq!(styled.runs()[0].range, 0..5);
    }

    #[test]
    fn test_empty_has_no_runs() {
        let styled = StyledText::uniform("", style(1));
        assert!(styled.is_empty());
        assert!(styled.runs().is_empty());
        assert_eq!(styled.style_at(0), None);
    }

    #[test]
    fn test_apply_splits_runs() {
        let mut builder = StyledTextBuilder::new("abcdef", style(1));
        let slot = builder.intern(style(2));
        builder.apply(2..4, slot);
        let styled = builder.build();

        let ranges: Vec<_> = styled.runs().iter().map(|r| r.range.clone()).collect();
        assert_eq!(ranges, vec![0..2, 2..4, 4..6]);
        assert_eq!(styled.style_at(3), Some(&style(2)));
        assert_eq!(styled.style_at(4), Some(&style(1)));
    }

    #[test]
    fn test_intern_reuses_identical_styles() {
        let mut builder = StyledTextBuilder::new("abc", style(1));
        assert_eq!(builder.intern(style(1)), 0);
        let a = builder.intern(style(2));
        let b = builder.intern(style(2));
        assert_eq!(a, b);
    }

    #[test]
    fn test_char_range_multibyte() {
        // "é" is two bytes
        let builder = StyledTextBuilder::new("aéb", style(1));
        assert_eq!(builder.char_range(&(1..3)), Some((1..2, false)));
        // Cutting into the middle of "é" widens to the whole char
        assert_eq!(builder.char_range(&(2..4)), Some((1..3, true)));
    }

    #[test]
    fn test_char_range_clamps_out_of_bounds() {
        let builder = StyledTextBuilder::new("abc", style(1));
        assert_eq!(builder.char_range(&(1..10)), Some((1..3, true)));
        assert_eq!(builder.char_range(&(5..10)), None);
        #[allow(clippy::reversed_empty_ranges)]
        let reversed = 2..1;
        assert_eq!(builder.char_range(&reversed), None);
    }

    #[test]
    fn test_first_lines() {
        let mut builder = StyledTextBuilder::new("one\ntwo\nthree", style(1));
        let slot = builder.intern(style(2));
        builder.apply(2..6, slot);
        let styled = builder.build();

        let limited = styled.first_lines(2);
        assert_eq!(limited.text(), "one\ntwo");
        assert_eq!(limited.len_chars(), 7);
        assert_eq!(limited.runs().last().unwrap().range.end, 7);

        assert_eq!(styled.first_lines(0).text(), "");
        assert_eq!(styled.first_lines(10), styled);
    }
}
