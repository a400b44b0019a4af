//! Utility functions to measure the unicode graphemes of a line of text.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::line_ending::str_is_line_ending;

#[inline]
pub fn tab_width_at(visual_x: usize, tab_width: u16) -> usize {
  let tab_width = tab_width.max(1) as usize;
  tab_width - (visual_x % tab_width)
}

#[must_use]
pub fn grapheme_width(g: &str) -> usize {
  if g.is_ascii() {
    // Fast-path for pure ASCII: each byte renders with width 1.
    g.len()
  } else {
    // Ensure a minimum width of 1 for ill-formed clusters so
    // they remain visible.
    UnicodeWidthStr::width(g).max(1)
  }
}

/// A grapheme of a line together with its char length and visual width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasuredGrapheme<'a> {
  pub text:  &'a str,
  pub chars: usize,
  pub width: usize,
}

/// Splits `line` into graphemes, expanding tabs at their visual column.
///
/// Line endings measure as zero width.
pub fn measure_graphemes(
  line: &str,
  tab_width: u16,
) -> impl Iterator<Item = MeasuredGrapheme<'_>> + '_ {
  let mut visual_x = 0;
  line.graphemes(true).map(move |g| {
    let width = if g == "\t" {
      tab_width_at(visual_x, tab_width)
    } else if str_is_line_ending(g) {
      0
    } else {
      grapheme_width(g)
    };
    visual_x += width;
    MeasuredGrapheme {
      text: g,
      chars: g.chars().count(),
      width,
    }
  })
}

/// Total visual width of `line`.
pub fn str_width(line: &str, tab_width: u16) -> usize {
  measure_graphemes(line, tab_width).map(|g| g.width).sum()
}
