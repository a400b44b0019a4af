//! Paint an [`EditorCore`] to a terminal, one cell per layout unit.

use std::{
  collections::HashMap,
  io::Write,
  ops::Range,
};

use crossterm::{
  queue,
  style::{
    Print,
    ResetColor,
    SetBackgroundColor,
    SetForegroundColor,
  },
};
use eyre::Result;
use the_core::{
  grapheme::measure_graphemes,
  line_ending::char_is_line_ending,
};
use the_lib::{
  editor::EditorCore,
  render::{
    CellMetrics,
    Color,
    MonospaceLayout,
    Rect,
    Size,
    StyledRun,
    TextLayout,
  },
};

use crate::theme::to_crossterm;

/// Size of one terminal cell in layout units.
pub const CELL_WIDTH: f64 = 10.0;
pub const CELL_HEIGHT: f64 = 18.0;

pub fn cell_metrics(tab_width: u16) -> CellMetrics {
  CellMetrics {
    char_width: CELL_WIDTH,
    line_height: CELL_HEIGHT,
    line_spacing: 0.0,
    tab_width,
  }
}

fn cells(units: f64) -> usize {
  (units / CELL_WIDTH).ceil().max(0.0) as usize
}

/// Write every visual row of `core` to `out`: the gutter with its label, then
/// the text with its run colors, padded to `columns`.
pub fn print_document(
  core: &mut EditorCore,
  layout: &mut MonospaceLayout,
  columns: usize,
  out: &mut impl Write,
) -> Result<()> {
  core.layout_pass(layout);
  let runs = core.styled_runs();

  let theme = core.theme();
  let background = theme.background_color();
  let gutter_background = theme.gutter_style().background_color;
  let label_color = theme
    .line_numbers_style()
    .map(|style| style.text_color)
    .unwrap_or(Color::Reset);

  let gutter_width = core.gutter_width();
  let gutter_cols = cells(gutter_width);
  let everything = Rect::new(0.0, 0.0, gutter_width, layout.used_rect().height);
  let labels: HashMap<usize, (usize, String)> = core
    .line_number_placements(everything, |label| {
      Size::new(label.chars().count() as f64 * CELL_WIDTH, CELL_HEIGHT)
    })
    .into_iter()
    .map(|placement| {
      let row = (placement.rect.y / CELL_HEIGHT).round() as usize;
      let col = (placement.rect.x / CELL_WIDTH).round().max(0.0) as usize;
      (row, (col, placement.label.to_string()))
    })
    .collect();

  let text = core.text().clone();
  let mut rows: Vec<Range<usize>> = layout.row_ranges().collect();
  if layout.row_count() > rows.len() {
    let end = text.len_chars();
    rows.push(end..end);
  }

  let tab_width = layout.metrics().tab_width;
  for (idx, row) in rows.iter().enumerate() {
    let mut gutter = vec![' '; gutter_cols];
    if let Some((col, label)) = labels.get(&idx) {
      for (offset, ch) in label.chars().enumerate() {
        if let Some(cell) = gutter.get_mut(col + offset) {
          *cell = ch;
        }
      }
    }
    queue!(
      out,
      SetBackgroundColor(to_crossterm(gutter_background, background)),
      SetForegroundColor(to_crossterm(label_color, background)),
      Print(gutter.into_iter().collect::<String>())
    )?;

    let mut used = gutter_cols;
    let mut fill = background;
    for run in runs_in(&runs, row) {
      let start = run.range.start.max(row.start);
      let end = run.range.end.min(row.end);
      let visible: String = text
        .slice(start..end)
        .chars()
        .filter(|ch| !char_is_line_ending(*ch))
        .collect();
      let mut printed = String::with_capacity(visible.len());
      for grapheme in measure_graphemes(&visible, tab_width) {
        if grapheme.text == "\t" {
          printed.extend(std::iter::repeat_n(' ', grapheme.width));
        } else {
          printed.push_str(grapheme.text);
        }
        used += grapheme.width;
      }

      let foreground = run.attributes.foreground.unwrap_or(Color::Reset);
      fill = run.attributes.background.unwrap_or(background);
      queue!(
        out,
        SetBackgroundColor(to_crossterm(fill, background)),
        SetForegroundColor(to_crossterm(foreground, background)),
        Print(printed)
      )?;
    }

    if used < columns {
      queue!(
        out,
        SetBackgroundColor(to_crossterm(fill, background)),
        Print(" ".repeat(columns - used))
      )?;
    }
    queue!(out, ResetColor, Print("\n"))?;
  }

  out.flush()?;
  Ok(())
}

fn runs_in<'a>(runs: &'a [StyledRun], row: &'a Range<usize>) -> impl Iterator<Item = &'a StyledRun> {
  let first = runs.partition_point(|run| run.range.end <= row.start);
  runs[first..]
    .iter()
    .take_while(move |run| run.range.start < row.end)
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use ropey::Rope;
  use the_lib::{
    lexer::GitDiffLexer,
    render::GitDiffOutputTheme,
  };

  use super::*;

  fn strip_ansi(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    let mut plain = String::new();
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
      if ch == '\u{1b}' {
        for ch in chars.by_ref() {
          if ch.is_ascii_alphabetic() {
            break;
          }
        }
      } else {
        plain.push(ch);
      }
    }
    plain
  }

  #[test]
  fn prints_gutter_and_text() {
    let mut core = EditorCore::new(
      "+a\n-b\n",
      Box::new(GitDiffLexer),
      Arc::new(GitDiffOutputTheme::default()),
    );
    core.resize(Size::new(20.0 * CELL_WIDTH, 0.0));
    let mut layout = MonospaceLayout::new(&Rope::new(), cell_metrics(4));
    let mut out = Vec::new();
    print_document(&mut core, &mut layout, 20, &mut out).unwrap();

    let plain = strip_ansi(&out);
    let lines: Vec<&str> = plain.lines().collect();
    assert_eq!(lines.len(), 3);
    // 32 units of gutter are four cells, labels end 4 units before the edge
    assert_eq!(lines[0].trim_end(), "  1 +a");
    assert_eq!(lines[1].trim_end(), "  2 -b");
    assert_eq!(lines[2].trim_end(), "  3");
  }
}
