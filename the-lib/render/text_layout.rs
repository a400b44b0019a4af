//! Text layout engines answer geometry questions about laid out text.
//!
//! The editor core never measures glyphs itself. Hosts hand it a
//! [`TextLayout`], usually a wrapper around the platform's layout manager;
//! [`MonospaceLayout`] is a self-contained engine for cell based hosts such as
//! terminals, and for tests.

use std::{
  borrow::Cow,
  ops::Range,
};

use ropey::Rope;
use serde::{
  Deserialize,
  Serialize,
};
use the_core::{
  grapheme::{
    measure_graphemes,
    str_width,
  },
  line_ending::{
    ends_with_line_ending,
    line_spans,
    soft_breaks,
  },
};
use unicode_linebreak::BreakOpportunity;

use super::graphics::{
  Rect,
  Size,
};

pub trait TextLayout {
  /// Replace the text being laid out.
  fn set_text(&mut self, text: &Rope);

  /// Bounding box of the glyphs covering the given char range, in the text
  /// container's coordinate space.
  fn bounding_rect(&self, chars: Range<usize>) -> Rect;

  fn container_size(&self) -> Size;

  fn set_container_width(&mut self, width: f64);

  /// Bring the layout up to date with the text and container. Engines that
  /// lay out eagerly need not override this.
  fn ensure_layout(&mut self) {}

  /// Rect enclosing all laid out text, including the empty line after a
  /// trailing line break.
  fn used_rect(&self) -> Rect;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct CellMetrics {
  pub char_width:   f64,
  pub line_height:  f64,
  /// Extra space between two visual rows.
  pub line_spacing: f64,
  pub tab_width:    u16,
}

impl Default for CellMetrics {
  fn default() -> Self {
    Self {
      char_width:   1.0,
      line_height:  1.0,
      line_spacing: 0.0,
      tab_width:    4,
    }
  }
}

impl CellMetrics {
  fn row_advance(&self) -> f64 {
    self.line_height + self.line_spacing
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct VisualRow {
  /// Chars of the row; the last row of a line also owns the line ending.
  chars: Range<usize>,
  /// Width in cells.
  width: usize,
}

/// Layout engine for fixed-pitch text.
///
/// Each grapheme occupies `unicode-width` cells; tabs expand to the next tab
/// stop. With soft wrap enabled lines wrap at the container width, preferring
/// Unicode line-break opportunities and splitting between graphemes when a
/// single word does not fit.
#[derive(Debug, Clone)]
pub struct MonospaceLayout {
  text:            Rope,
  metrics:         CellMetrics,
  soft_wrap:       bool,
  container_width: f64,
  rows:            Vec<VisualRow>,
  /// Whether an empty row follows the last line.
  trailing_row:    bool,
  dirty:           bool,
}

impl MonospaceLayout {
  pub fn new(text: &Rope, metrics: CellMetrics) -> Self {
    let mut layout = Self {
      text: text.clone(),
      metrics,
      soft_wrap: false,
      container_width: f64::INFINITY,
      rows: Vec::new(),
      trailing_row: true,
      dirty: true,
    };
    layout.ensure_layout();
    layout
  }

  pub fn with_soft_wrap(mut self, soft_wrap: bool) -> Self {
    self.soft_wrap = soft_wrap;
    self.dirty = true;
    self.ensure_layout();
    self
  }

  pub fn metrics(&self) -> &CellMetrics {
    &self.metrics
  }

  pub fn text(&self) -> &Rope {
    &self.text
  }

  pub fn is_dirty(&self) -> bool {
    self.dirty
  }

  /// Number of visual rows, including the trailing empty row.
  pub fn row_count(&self) -> usize {
    self.rows.len() + usize::from(self.trailing_row)
  }

  /// Visual rows of the laid out text as char ranges, line endings included.
  pub fn row_ranges(&self) -> impl Iterator<Item = Range<usize>> + '_ {
    self.rows.iter().map(|row| row.chars.clone())
  }

  fn wrap_columns(&self) -> Option<usize> {
    if !self.soft_wrap || !self.container_width.is_finite() {
      return None;
    }
    let columns = (self.container_width / self.metrics.char_width).floor();
    Some((columns.max(1.0)) as usize)
  }

  fn row_rect(&self, row: usize, width: usize) -> Rect {
    Rect::new(
      0.0,
      row as f64 * self.metrics.row_advance(),
      width as f64 * self.metrics.char_width,
      self.metrics.line_height,
    )
  }

  fn reflow(&mut self) {
    let columns = self.wrap_columns();
    let text: Cow<str> = self.text.slice(..).into();
    let mut rows = Vec::new();

    for line in line_spans(&text) {
      let start = rows.len();
      wrap_line(line.content, line.start, columns, self.metrics.tab_width, &mut rows);
      if let Some(last) = rows[start..].last_mut() {
        last.chars.end = line.end();
      }
    }

    self.trailing_row = text.is_empty() || ends_with_line_ending(&text);
    self.rows = rows;
    self.dirty = false;
    tracing::trace!(
      rows = self.rows.len(),
      trailing_row = self.trailing_row,
      "monospace layout reflowed"
    );
  }
}

/// Break one line into visual rows, pushing them onto `rows`. Always pushes at
/// least one row.
fn wrap_line(
  content: &str,
  line_start: usize,
  columns: Option<usize>,
  tab_width: u16,
  rows: &mut Vec<VisualRow>,
) {
  let Some(columns) = columns else {
    let width = str_width(content, tab_width);
    let len = content.chars().count();
    rows.push(VisualRow {
      chars: line_start..line_start + len,
      width,
    });
    return;
  };

  let mut opportunities = soft_breaks(content)
    .filter(|(_, opportunity)| *opportunity == BreakOpportunity::Allowed)
    .map(|(byte, _)| byte)
    .peekable();

  let mut row_start = 0;
  let mut row_width = 0;
  // (char offset, row width before it) of the last break opportunity
  let mut last_break: Option<(usize, usize)> = None;
  let mut char_pos = 0;
  let mut byte_pos = 0;

  for grapheme in measure_graphemes(content, tab_width) {
    while opportunities.next_if(|&byte| byte < byte_pos).is_some() {}
    if opportunities.next_if_eq(&byte_pos).is_some() && char_pos > row_start {
      last_break = Some((char_pos, row_width));
    }

    while row_width + grapheme.width > columns && char_pos > row_start {
      match last_break.take() {
        Some((at, width)) => {
          rows.push(VisualRow {
            chars: line_start + row_start..line_start + at,
            width,
          });
          row_start = at;
          row_width -= width;
        },
        None => {
          rows.push(VisualRow {
            chars: line_start + row_start..line_start + char_pos,
            width: row_width,
          });
          row_start = char_pos;
          row_width = 0;
        },
      }
    }

    row_width += grapheme.width;
    char_pos += grapheme.chars;
    byte_pos += grapheme.text.len();
  }

  rows.push(VisualRow {
    chars: line_start + row_start..line_start + char_pos,
    width: row_width,
  });
}

impl TextLayout for MonospaceLayout {
  fn set_text(&mut self, text: &Rope) {
    self.text = text.clone();
    self.dirty = true;
  }

  fn bounding_rect(&self, chars: Range<usize>) -> Rect {
    let first = self.rows.partition_point(|row| row.chars.end <= chars.start);

    if chars.is_empty() || first == self.rows.len() {
      return match self.rows.get(first) {
        Some(row) if row.chars.start <= chars.start => self.row_rect(first, 0),
        _ => self.row_rect(self.rows.len(), 0),
      };
    }

    self.rows[first..]
      .iter()
      .enumerate()
      .take_while(|(_, row)| row.chars.start < chars.end)
      .map(|(offset, row)| self.row_rect(first + offset, row.width))
      .reduce(|acc, rect| acc.union(&rect))
      .unwrap_or_else(|| self.row_rect(first, 0))
  }

  fn container_size(&self) -> Size {
    Size::new(self.container_width, self.used_rect().height)
  }

  fn set_container_width(&mut self, width: f64) {
    if width != self.container_width {
      self.container_width = width.max(0.0);
      self.dirty = true;
    }
  }

  fn ensure_layout(&mut self) {
    if self.dirty {
      self.reflow();
    }
  }

  fn used_rect(&self) -> Rect {
    let rows = self.row_count();
    let width = self.rows.iter().map(|row| row.width).max().unwrap_or(0);
    let height = if rows == 0 {
      0.0
    } else {
      rows as f64 * self.metrics.row_advance() - self.metrics.line_spacing
    };
    Rect::new(0.0, 0.0, width as f64 * self.metrics.char_width, height)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn layout(text: &str) -> MonospaceLayout {
    MonospaceLayout::new(&Rope::from_str(text), CellMetrics::default())
  }

  fn wrapped(text: &str, width: f64) -> MonospaceLayout {
    let mut layout = layout(text).with_soft_wrap(true);
    layout.set_container_width(width);
    layout.ensure_layout();
    layout
  }

  fn rows(layout: &MonospaceLayout) -> Vec<Range<usize>> {
    layout.row_ranges().collect()
  }

  #[test]
  fn one_row_per_line_without_wrap() {
    let layout = layout("ab\ncde\n");
    assert_eq!(rows(&layout), vec![0..3, 3..7]);
    assert_eq!(layout.row_count(), 3);
    assert_eq!(layout.bounding_rect(3..7), Rect::new(0.0, 1.0, 3.0, 1.0));
  }

  #[test]
  fn empty_text_has_only_the_trailing_row() {
    let layout = layout("");
    assert_eq!(layout.row_count(), 1);
    assert_eq!(layout.used_rect(), Rect::new(0.0, 0.0, 0.0, 1.0));
    assert_eq!(layout.bounding_rect(0..0), Rect::new(0.0, 0.0, 0.0, 1.0));
  }

  #[test]
  fn empty_lines_have_zero_width() {
    let layout = layout("a\n\nb");
    assert_eq!(layout.bounding_rect(2..3), Rect::new(0.0, 1.0, 0.0, 1.0));
    assert_eq!(layout.row_count(), 3);
  }

  #[test]
  fn wraps_at_word_boundaries() {
    let layout = wrapped("hello world", 8.0);
    assert_eq!(rows(&layout), vec![0..6, 6..11]);
    // both rows belong to the same line
    assert_eq!(layout.bounding_rect(0..11), Rect::new(0.0, 0.0, 6.0, 2.0));
  }

  #[test]
  fn long_words_wrap_between_graphemes() {
    let layout = wrapped("abcdefgh", 3.0);
    assert_eq!(rows(&layout), vec![0..3, 3..6, 6..8]);
  }

  #[test]
  fn wide_graphemes_take_two_cells() {
    let layout = wrapped("日本語", 4.0);
    assert_eq!(rows(&layout), vec![0..2, 2..3]);
    assert_eq!(layout.used_rect().width, 4.0);
  }

  #[test]
  fn tabs_expand_to_tab_stops() {
    let layout = layout("\tx");
    assert_eq!(layout.bounding_rect(0..2).width, 5.0);
  }

  #[test]
  fn line_spacing_separates_rows() {
    let metrics = CellMetrics {
      char_width:   10.0,
      line_height:  18.0,
      line_spacing: 2.0,
      tab_width:    4,
    };
    let layout = MonospaceLayout::new(&Rope::from_str("a\nb"), metrics);
    assert_eq!(layout.bounding_rect(2..3), Rect::new(0.0, 20.0, 10.0, 18.0));
    assert_eq!(layout.used_rect().height, 38.0);
  }

  #[test]
  fn set_text_waits_for_ensure_layout() {
    let mut layout = layout("a");
    layout.set_text(&Rope::from_str("a\nb\nc"));
    assert!(layout.is_dirty());
    layout.ensure_layout();
    assert!(!layout.is_dirty());
    assert_eq!(layout.row_count(), 3);
  }

  quickcheck::quickcheck! {
    fn wrapped_rows_cover_the_text(text: String, width: u8) -> bool {
      let len = text.chars().count();
      let layout = wrapped(&text, (width % 40) as f64 + 1.0);
      let mut next = 0;
      for range in layout.row_ranges() {
        if range.start != next {
          return false;
        }
        next = range.end;
      }
      next == len
    }
  }
}
