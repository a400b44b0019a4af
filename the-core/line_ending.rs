use std::ops::Range;

pub use unicode_linebreak::BreakOpportunity;

/// A paragraph break. Vertical tab and form feed are not breaks; they may
/// appear inside a line.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum LineEnding {
  /// CarriageReturn followed by LineFeed.
  Crlf,

  /// U+000A -- LineFeed
  LF,

  #[cfg(feature = "unicode-lines")]
  /// U+000D -- CarriageReturn
  CR,

  #[cfg(feature = "unicode-lines")]
  /// U+0085 -- NextLine
  Nel,

  /// U+2028 -- Line Separator
  #[cfg(feature = "unicode-lines")]
  LS,

  /// U+2029 -- ParagraphSeparator
  #[cfg(feature = "unicode-lines")]
  PS,
}

impl LineEnding {
  #[inline]
  pub const fn len_chars(&self) -> usize {
    match self {
      Self::Crlf => 2,
      _ => 1,
    }
  }

  #[inline]
  pub const fn from_char(ch: char) -> Option<LineEnding> {
    match ch {
      '\u{000A}' => Some(LineEnding::LF),
      #[cfg(feature = "unicode-lines")]
      '\u{000D}' => Some(LineEnding::CR),
      #[cfg(feature = "unicode-lines")]
      '\u{0085}' => Some(LineEnding::Nel),
      #[cfg(feature = "unicode-lines")]
      '\u{2028}' => Some(LineEnding::LS),
      #[cfg(feature = "unicode-lines")]
      '\u{2029}' => Some(LineEnding::PS),
      _ => None,
    }
  }

  /// Like [`LineEnding::from_char`], but for a whole grapheme, so CRLF is
  /// recognized too.
  #[allow(clippy::should_implement_trait)]
  #[inline]
  pub fn from_str(g: &str) -> Option<LineEnding> {
    if g == "\u{000D}\u{000A}" {
      return Some(LineEnding::Crlf);
    }
    let mut chars = g.chars();
    match (chars.next(), chars.next()) {
      (Some(ch), None) => LineEnding::from_char(ch),
      _ => None,
    }
  }
}

#[inline]
pub fn char_is_line_ending(ch: char) -> bool {
  LineEnding::from_char(ch).is_some()
}

#[inline]
pub fn str_is_line_ending(s: &str) -> bool {
  LineEnding::from_str(s).is_some()
}

/// Whether the text ends with a line ending, i.e. whether its last line is the
/// implicit empty line after a final break.
pub fn ends_with_line_ending(text: &str) -> bool {
  // CRLF ends in LF, which is always an ending.
  text.chars().next_back().is_some_and(char_is_line_ending)
}

/// Number of lines in `text`, counting the empty line after a final break.
///
/// Agrees with [`line_spans`] rather than `Rope::len_lines`, which also
/// breaks on vertical tab and form feed.
pub fn line_count(text: &str) -> usize {
  line_spans(text).count() + usize::from(text.is_empty() || ends_with_line_ending(text))
}

/// A single line of a `&str`, addressed in char offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpan<'a> {
  /// Line contents without the line ending.
  pub content: &'a str,
  /// Char offset of the first char of the line.
  pub start:   usize,
  /// Char length of the contents, excluding the line ending.
  pub len:     usize,
  pub ending:  Option<LineEnding>,
}

impl LineSpan<'_> {
  /// Char range of the line including its line ending.
  pub fn range(&self) -> Range<usize> {
    self.start..self.end()
  }

  pub fn end(&self) -> usize {
    self.start + self.len + self.ending.map(|le| le.len_chars()).unwrap_or(0)
  }
}

/// Iterates the lines of `text`.
///
/// Unlike `Rope::lines` no empty line is produced after a trailing line ending,
/// and an empty input has no lines at all.
pub fn line_spans(text: &str) -> LineSpans<'_> {
  LineSpans {
    rest:     text,
    char_pos: 0,
  }
}

#[derive(Debug, Clone)]
pub struct LineSpans<'a> {
  rest:     &'a str,
  char_pos: usize,
}

impl<'a> Iterator for LineSpans<'a> {
  type Item = LineSpan<'a>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.rest.is_empty() {
      return None;
    }

    let rest = self.rest;
    let start = self.char_pos;
    let mut len = 0;

    for (offset, ch) in rest.char_indices() {
      // CRLF is checked first: without `unicode-lines` a lone CR is not an
      // ending, but CRLF still is.
      let ending = if ch == '\r' && rest[offset + 1..].starts_with('\n') {
        Some((LineEnding::Crlf, 2))
      } else {
        LineEnding::from_char(ch).map(|le| (le, ch.len_utf8()))
      };

      if let Some((ending, ending_bytes)) = ending {
        let span = LineSpan {
          content: &rest[..offset],
          start,
          len,
          ending: Some(ending),
        };
        self.rest = &rest[offset + ending_bytes..];
        self.char_pos = span.end();
        return Some(span);
      }

      len += 1;
    }

    self.rest = "";
    self.char_pos = start + len;
    Some(LineSpan {
      content: rest,
      start,
      len,
      ending: None,
    })
  }
}

/// Returns an iterator over soft line break opportunities in the given string.
///
/// Each item is a `(byte_index, BreakOpportunity)` pair indicating where a line
/// break may or must occur.
#[inline]
pub fn soft_breaks(text: &str) -> impl Iterator<Item = (usize, BreakOpportunity)> + '_ {
  unicode_linebreak::linebreaks(text)
}
