//! Render-adjacent helpers: geometry, themes, paragraph layout and the gutter.
//!
//! Nothing here draws. Hosts take the rects, labels and attribute runs computed
//! here and paint them with whatever toolkit they use.

pub mod graphics;
pub mod gutter;
pub mod highlight;
pub mod paragraph;
pub mod paragraphs;
pub mod text_layout;
pub mod theme;

pub use graphics::{
  Color,
  Font,
  Point,
  Rect,
  Size,
  TextAttributes,
};
pub use highlight::{
  StyledRun,
  highlight_spans,
  styled_runs,
};
pub use paragraph::Paragraph;
pub use paragraphs::{
  CoordinateOrigin,
  LineNumberPlacement,
  ParagraphCache,
  ParagraphOptions,
  generate_paragraphs,
  line_number_placements,
};
pub use text_layout::{
  CellMetrics,
  MonospaceLayout,
  TextLayout,
};
pub use theme::{
  ConfigTheme,
  DefaultSourceCodeTheme,
  GitDiffOutputTheme,
  SourceCodeTheme,
};
