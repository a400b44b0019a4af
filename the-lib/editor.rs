//! Editor state core.
//!
//! [`EditorCore`] owns the text and everything derived from it: tokens,
//! paragraphs, and the gutter width. A host adapter forwards edits, resizes and
//! draw requests to it and paints whatever it returns. The core never talks to
//! a UI framework; measuring goes through [`TextLayout`] and notifications go
//! through the [`EventQueue`].

use std::{
  borrow::Cow,
  fmt,
  sync::Arc,
};

use ropey::Rope;

use crate::{
  config::{
    EditorConfig,
    ParagraphsConfig,
  },
  events::{
    EditorEvent,
    EditorEventKind,
    EditorObserver,
    EventQueue,
  },
  lexer::Lexer,
  render::{
    graphics::{
      Rect,
      Size,
    },
    gutter::{
      GutterConfig,
      gutter_width,
      hidden_gutter_width,
      max_label_len,
    },
    highlight::{
      StyledRun,
      styled_runs,
    },
    paragraph::Paragraph,
    paragraphs::{
      LineNumberPlacement,
      ParagraphCache,
      generate_paragraphs,
      line_number_placements,
    },
    text_layout::TextLayout,
    theme::SourceCodeTheme,
  },
  token::Token,
};

pub struct EditorCore {
  text:         Rope,
  lexer:        Box<dyn Lexer>,
  theme:        Arc<dyn SourceCodeTheme>,
  gutter:       GutterConfig,
  paragraph:    ParagraphsConfig,
  line_numbers: Option<Vec<String>>,
  paragraphs:   ParagraphCache,
  tokens:       Option<Vec<Token>>,
  gutter_width: f64,
  viewport:     Size,
  events:       EventQueue,
}

impl fmt::Debug for EditorCore {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("EditorCore")
      .field("len_chars", &self.text.len_chars())
      .field("line_numbers", &self.line_numbers)
      .field("paragraphs_valid", &self.paragraphs.is_valid())
      .field("tokens_valid", &self.tokens.is_some())
      .field("gutter_width", &self.gutter_width)
      .field("viewport", &self.viewport)
      .finish_non_exhaustive()
  }
}

impl EditorCore {
  pub fn new(text: impl Into<Rope>, lexer: Box<dyn Lexer>, theme: Arc<dyn SourceCodeTheme>) -> Self {
    let mut core = Self {
      text: text.into(),
      lexer,
      theme,
      gutter: GutterConfig::default(),
      paragraph: ParagraphsConfig::default(),
      line_numbers: None,
      paragraphs: ParagraphCache::default(),
      tokens: None,
      gutter_width: 0.0,
      viewport: Size::default(),
      events: EventQueue::default(),
    };
    core.gutter_width = core.compute_gutter_width();
    core
  }

  /// Apply the gutter and paragraph sections of `config`. The theme section is
  /// left to the host, see [`EditorConfig::theme`].
  pub fn with_config(mut self, config: &EditorConfig) -> Self {
    self.gutter = config.gutter;
    self.paragraph = config.paragraphs;
    self.gutter_width = self.compute_gutter_width();
    self.paragraphs.invalidate();
    self
  }

  pub fn text(&self) -> &Rope {
    &self.text
  }

  /// Replace the whole text. Every derived value is recomputed lazily and a
  /// [`EditorEventKind::TextChanged`] is delivered after the next layout pass.
  pub fn set_text(&mut self, text: impl Into<Rope>) {
    self.text = text.into();
    self.tokens = None;
    self.paragraphs.invalidate();
    self.refresh_gutter_width();
    self.events.defer(EditorEventKind::TextChanged {
      len_chars: self.text.len_chars(),
    });
  }

  pub fn begin_editing(&mut self) {
    self.events.push(EditorEventKind::BeganEditing);
  }

  pub fn line_numbers(&self) -> Option<&[String]> {
    self.line_numbers.as_deref()
  }

  /// Replace the gutter labels. `None` or an empty list numbers the
  /// paragraphs.
  pub fn set_line_numbers(&mut self, line_numbers: Option<Vec<String>>) {
    self.line_numbers = line_numbers;
    self.paragraphs.invalidate();
    self.refresh_gutter_width();
  }

  pub fn viewport(&self) -> Size {
    self.viewport
  }

  pub fn resize(&mut self, viewport: Size) {
    if viewport != self.viewport {
      self.viewport = viewport;
      self.paragraphs.invalidate();
    }
  }

  pub fn theme(&self) -> &dyn SourceCodeTheme {
    self.theme.as_ref()
  }

  pub fn set_theme(&mut self, theme: Arc<dyn SourceCodeTheme>) {
    self.theme = theme;
    self.paragraphs.invalidate();
    self.refresh_gutter_width();
  }

  pub fn set_lexer(&mut self, lexer: Box<dyn Lexer>) {
    self.lexer = lexer;
    self.tokens = None;
  }

  /// Drop the cached paragraphs; the next render regenerates them.
  pub fn invalidate(&mut self) {
    self.paragraphs.invalidate();
  }

  pub fn paragraph_cache(&self) -> &ParagraphCache {
    &self.paragraphs
  }

  pub fn gutter_width(&self) -> f64 {
    self.gutter_width
  }

  pub fn tokens(&mut self) -> &[Token] {
    let text = &self.text;
    let lexer = &self.lexer;
    self.tokens.get_or_insert_with(|| {
      let source: Cow<str> = text.slice(..).into();
      let tokens = lexer.tokenize(&source);
      tracing::debug!(tokens = tokens.len(), "lexed text");
      tokens
    })
  }

  pub fn styled_runs(&mut self) -> Vec<StyledRun> {
    let len = self.text.len_chars();
    self.tokens();
    let tokens = self.tokens.as_deref().unwrap_or_default();
    styled_runs(len, tokens, self.theme.as_ref())
  }

  /// Cached paragraphs, regenerated with `layout` when the cache is invalid.
  pub fn paragraphs(&mut self, layout: &mut dyn TextLayout) -> &[Paragraph] {
    if !self.paragraphs.is_valid() {
      layout.set_text(&self.text);
      if self.viewport.width > 0.0 {
        layout.set_container_width((self.viewport.width - self.gutter_width).max(0.0));
      }
      layout.ensure_layout();
    }

    let text = &self.text;
    let line_numbers = self.line_numbers.as_deref();
    let options = self
      .paragraph
      .options(self.gutter_width, self.viewport.height.max(0.0));
    let layout: &dyn TextLayout = layout;
    self
      .paragraphs
      .get_or_generate(|| generate_paragraphs(text.slice(..), layout, line_numbers, &options))
  }

  /// Run a layout pass: settle the gutter width, regenerate paragraphs if
  /// needed, then release the events deferred until layout.
  pub fn layout_pass(&mut self, layout: &mut dyn TextLayout) {
    self.refresh_gutter_width();
    self.paragraphs(layout);
    self.events.release();
  }

  /// Size the editor needs at `proposed_width`, laying out the whole text.
  ///
  /// Without a proposed width there is nothing to fit and `None` is returned.
  pub fn size_that_fits(
    &mut self,
    layout: &mut dyn TextLayout,
    proposed_width: Option<f64>,
  ) -> Option<Size> {
    let width = proposed_width?;
    layout.set_text(&self.text);
    layout.set_container_width((width - self.gutter_width).max(0.0));
    layout.ensure_layout();
    Some(Size::new(width, layout.used_rect().height))
  }

  /// Where to draw the gutter labels intersecting `dirty_rect`.
  ///
  /// Empty when the theme has no line number style or paragraphs have not
  /// been generated yet.
  pub fn line_number_placements(
    &self,
    dirty_rect: Rect,
    measure: impl FnMut(&str) -> Size,
  ) -> Vec<LineNumberPlacement<'_>> {
    if self.theme.line_numbers_style().is_none() || !self.gutter.show_line_numbers {
      return Vec::new();
    }
    let Some(paragraphs) = self.paragraphs.get() else {
      return Vec::new();
    };
    line_number_placements(
      paragraphs,
      dirty_rect,
      self.gutter_width,
      self.paragraph.origin,
      measure,
    )
  }

  pub fn events(&self) -> &EventQueue {
    &self.events
  }

  pub fn drain_events(&mut self) -> Vec<EditorEvent> {
    self.events.drain()
  }

  pub fn dispatch_events(&mut self, observer: &mut impl EditorObserver) -> usize {
    self.events.dispatch(observer)
  }

  fn compute_gutter_width(&self) -> f64 {
    let minimum = self.theme.gutter_style().minimum_width;
    if self.theme.line_numbers_style().is_none() || !self.gutter.show_line_numbers {
      return hidden_gutter_width(minimum);
    }
    let label_len = max_label_len(self.text.slice(..), self.line_numbers.as_deref());
    gutter_width(label_len, &self.gutter, minimum)
  }

  fn refresh_gutter_width(&mut self) {
    let width = self.compute_gutter_width();
    if width != self.gutter_width {
      tracing::debug!(from = self.gutter_width, to = width, "gutter width changed");
      self.gutter_width = width;
      self.paragraphs.invalidate();
      self
        .events
        .defer(EditorEventKind::GutterWidthChanged { width });
    }
  }
}
