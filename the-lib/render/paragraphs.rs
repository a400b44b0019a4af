//! Paragraph generation, caching and line-number geometry.

use std::borrow::Cow;

use ropey::RopeSlice;
use serde::{
  Deserialize,
  Serialize,
};
use the_core::line_ending::{
  ends_with_line_ending,
  line_spans,
};

use super::{
  graphics::{
    Rect,
    Size,
  },
  paragraph::Paragraph,
  text_layout::TextLayout,
};

/// Where the host's coordinate system puts `y = 0`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoordinateOrigin {
  #[default]
  TopLeft,
  BottomLeft,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParagraphOptions {
  pub origin:                CoordinateOrigin,
  /// Height of the synthetic last paragraph when there is no paragraph above
  /// it to copy from.
  pub default_line_height:   f64,
  /// Gap between the last real paragraph and the synthetic one below it.
  pub trailing_line_spacing: f64,
  /// Width of the synthetic paragraph, usually the gutter width.
  pub synthetic_width:       f64,
  /// Height of the hosting view. Bottom-left rects are flipped within this
  /// or the layout's container height, whichever is taller.
  pub container_height:      f64,
}

impl Default for ParagraphOptions {
  fn default() -> Self {
    Self {
      origin:                CoordinateOrigin::TopLeft,
      default_line_height:   18.0,
      trailing_line_spacing: 0.0,
      synthetic_width:       0.0,
      container_height:      0.0,
    }
  }
}

/// Lay out one [`Paragraph`] per line of `text`, top to bottom.
///
/// Each rect is the layout's bounding box of the line, line ending included,
/// with `x` pinned to 0. Empty text, or text ending in a line break, gets an
/// extra synthetic paragraph for the empty last line. On
/// [`CoordinateOrigin::BottomLeft`] hosts every rect is flipped within
/// [`ParagraphOptions::container_height`], grown to the layout's container
/// height when the text is taller than the view.
///
/// The layout must be up to date; see [`TextLayout::ensure_layout`].
pub fn generate_paragraphs(
  text: RopeSlice,
  layout: &dyn TextLayout,
  line_numbers: Option<&[String]>,
  options: &ParagraphOptions,
) -> Vec<Paragraph> {
  let text: Cow<str> = text.into();
  let mut paragraphs: Vec<Paragraph> = line_spans(&text)
    .enumerate()
    .map(|(idx, line)| {
      let rect = Rect {
        x: 0.0,
        ..layout.bounding_rect(line.range())
      };
      Paragraph::new(rect, idx + 1, line_numbers)
    })
    .collect();

  if text.is_empty() || ends_with_line_ending(&text) {
    let rect = match paragraphs.last() {
      Some(last) => Rect::new(
        0.0,
        last.rect.max_y() + options.trailing_line_spacing,
        options.synthetic_width,
        last.rect.height,
      ),
      None => Rect::new(
        0.0,
        0.0,
        options.synthetic_width,
        options.default_line_height,
      ),
    };
    let number = paragraphs.len() + 1;
    paragraphs.push(Paragraph::new(rect, number, line_numbers));
  }

  if options.origin == CoordinateOrigin::BottomLeft {
    let height = options.container_height.max(layout.container_size().height);
    for paragraph in &mut paragraphs {
      paragraph.rect = paragraph.rect.flipped(height);
    }
  }

  tracing::debug!(paragraphs = paragraphs.len(), "generated paragraphs");
  paragraphs
}

/// Holds the paragraphs of the most recent generation.
#[derive(Debug, Clone, Default)]
pub struct ParagraphCache {
  paragraphs: Option<Vec<Paragraph>>,
  generation: u64,
}

impl ParagraphCache {
  /// Cached paragraphs, generating them first if the cache was invalidated.
  pub fn get_or_generate(&mut self, generate: impl FnOnce() -> Vec<Paragraph>) -> &[Paragraph] {
    if self.paragraphs.is_none() {
      self.generation += 1;
      tracing::trace!(generation = self.generation, "paragraph cache miss");
    }
    self.paragraphs.get_or_insert_with(generate)
  }

  pub fn get(&self) -> Option<&[Paragraph]> {
    self.paragraphs.as_deref()
  }

  pub fn invalidate(&mut self) {
    self.paragraphs = None;
  }

  pub fn is_valid(&self) -> bool {
    self.paragraphs.is_some()
  }

  /// Number of times paragraphs were generated.
  pub fn generation(&self) -> u64 {
    self.generation
  }
}

/// Gap between a line number and the text area.
pub const LINE_NUMBER_MARGIN: f64 = 4.0;

/// A line number label and where to draw it.
#[derive(Debug, Clone, PartialEq)]
pub struct LineNumberPlacement<'a> {
  pub label:  &'a str,
  pub number: usize,
  pub rect:   Rect,
}

/// Placements for every paragraph intersecting `dirty_rect`.
///
/// Labels are right aligned in the gutter, [`LINE_NUMBER_MARGIN`] away from
/// its right edge, and line up with the top of their paragraph. `measure`
/// returns the rendered size of a label.
pub fn line_number_placements<'a>(
  paragraphs: &'a [Paragraph],
  dirty_rect: Rect,
  gutter_width: f64,
  origin: CoordinateOrigin,
  mut measure: impl FnMut(&str) -> Size,
) -> Vec<LineNumberPlacement<'a>> {
  paragraphs
    .iter()
    .filter(|paragraph| paragraph.rect.intersects(&dirty_rect))
    .map(|paragraph| {
      let size = measure(paragraph.label());
      let y = match origin {
        CoordinateOrigin::TopLeft => paragraph.rect.y,
        CoordinateOrigin::BottomLeft => paragraph.rect.max_y() - size.height,
      };
      LineNumberPlacement {
        label:  paragraph.label(),
        number: paragraph.number,
        rect:   Rect::new(
          gutter_width - size.width - LINE_NUMBER_MARGIN,
          y,
          size.width,
          size.height,
        ),
      }
    })
    .collect()
}
