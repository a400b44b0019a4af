//! End-to-end checks of the text -> tokens -> attributes and
//! text -> paragraphs -> gutter pipelines.

use std::sync::Arc;

use ropey::Rope;
use the_lib::{
  config::EditorConfig,
  editor::EditorCore,
  events::{
    EditorEvent,
    EditorEventKind,
  },
  lexer::{
    DiffSniffer,
    GitDiffLexer,
    Lexer,
    LexerProvider,
    PlainLexer,
  },
  render::{
    CellMetrics,
    Color,
    ConfigTheme,
    CoordinateOrigin,
    GitDiffOutputTheme,
    MonospaceLayout,
    Rect,
    Size,
    SourceCodeTheme,
  },
  token::{
    DiffChunkType,
    Token,
  },
};

fn layout() -> MonospaceLayout {
  let metrics = CellMetrics {
    char_width:   10.0,
    line_height:  18.0,
    line_spacing: 0.0,
    tab_width:    4,
  };
  MonospaceLayout::new(&Rope::new(), metrics)
}

fn diff_core(text: &str) -> EditorCore {
  EditorCore::new(
    text,
    Box::new(GitDiffLexer),
    Arc::new(GitDiffOutputTheme::default()),
  )
}

#[test]
fn diff_lines_are_classified() {
  let tokens = GitDiffLexer.tokenize("+foo\n-bar\n baz\n");
  assert_eq!(tokens, vec![
    Token::diff(DiffChunkType::Added, 0..5),
    Token::diff(DiffChunkType::Removed, 5..10),
    Token::diff(DiffChunkType::Unchanged, 10..15),
  ]);
}

#[test]
fn empty_text_gets_one_numbered_paragraph() {
  let mut core = diff_core("");
  let mut layout = layout();
  core.layout_pass(&mut layout);

  let paragraphs = core.paragraphs(&mut layout);
  assert_eq!(paragraphs.len(), 1);
  assert_eq!(paragraphs[0].number, 1);
  assert_eq!(paragraphs[0].label(), "1");
}

#[test]
fn short_overrides_leave_trailing_labels_empty() {
  let mut core = diff_core("a\nb\n");
  core.set_line_numbers(Some(vec!["10".to_string(), "20".to_string()]));
  let mut layout = layout();

  let labels: Vec<String> = core
    .paragraphs(&mut layout)
    .iter()
    .map(|paragraph| paragraph.label().to_string())
    .collect();
  assert_eq!(labels, vec!["10", "20", ""]);
}

#[test]
fn edits_regenerate_paragraphs_and_notify_after_layout() {
  let mut core = diff_core("+a\n");
  let mut layout = layout();
  core.layout_pass(&mut layout);
  assert_eq!(core.paragraph_cache().generation(), 1);

  let mut seen = Vec::new();
  core.begin_editing();
  core.set_text("+a\n-b\n c\n");
  core.dispatch_events(&mut |event: &EditorEvent| seen.push(event.kind.clone()));
  assert_eq!(seen, vec![EditorEventKind::BeganEditing]);

  core.layout_pass(&mut layout);
  core.dispatch_events(&mut |event: &EditorEvent| seen.push(event.kind.clone()));
  assert_eq!(seen, vec![
    EditorEventKind::BeganEditing,
    EditorEventKind::TextChanged { len_chars: 9 },
  ]);
  assert_eq!(core.paragraph_cache().generation(), 2);
  assert_eq!(core.paragraph_cache().get().map(|p| p.len()), Some(4));
  assert_eq!(core.tokens().len(), 3);
}

#[test]
fn diff_backgrounds_reach_the_runs() {
  let mut core = diff_core("@@ -1 +1 @@\n-old\n+new\n");
  let theme = GitDiffOutputTheme::default();
  let runs = core.styled_runs();

  let backgrounds: Vec<Option<Color>> = runs.iter().map(|run| run.attributes.background).collect();
  assert_eq!(backgrounds, vec![
    None,
    theme.diff_background_color(DiffChunkType::Removed),
    theme.diff_background_color(DiffChunkType::Added),
  ]);
  assert_eq!(runs[0].attributes.foreground, Some(Color::Gray));
}

#[test]
fn config_drives_core_and_theme() {
  let config = EditorConfig::from_toml_str(
    r##"
      [gutter]
      char-width = 20

      [paragraphs]
      origin = "bottom-left"

      [theme]
      inherits = "git-diff"
      gutter = { minimum-width = 0 }

      [theme.diff.added]
      bg = "#00ff00"
    "##,
  )
  .unwrap();

  let theme = config.strict_theme().unwrap().unwrap();
  assert_eq!(
    theme.diff_background_color(DiffChunkType::Added),
    Some(Color::Rgb(0, 255, 0))
  );

  let mut core = EditorCore::new("+x\n", Box::new(GitDiffLexer), Arc::new(theme)).with_config(&config);
  // one digit: 20 + 4 + 4
  assert_eq!(core.gutter_width(), 28.0);

  let mut layout = layout();
  core.layout_pass(&mut layout);
  let placements = core.line_number_placements(Rect::new(0.0, 0.0, 100.0, 100.0), |label| {
    Size::new(label.len() as f64 * 10.0, 18.0)
  });
  // flipped: line 1 sits above the synthetic line 2
  assert_eq!(placements.len(), 2);
  assert_eq!(placements[0].label, "1");
  assert!(placements[0].rect.y > placements[1].rect.y);
  assert_eq!(config.paragraphs.origin, CoordinateOrigin::BottomLeft);
}

#[test]
fn config_theme_falls_back_on_bad_entries() {
  let value: toml::Value = toml::from_str("background = 12").unwrap();
  let theme = ConfigTheme::from(value);
  assert_eq!(
    theme.background_color(),
    GitDiffOutputTheme::default().background_color()
  );
}

#[test]
fn sniffer_picks_lexer_per_source() {
  let provider = DiffSniffer::new(PlainLexer);

  for (source, expected) in [("diff --git a/x b/x\n+y\n", 1), ("+y but not a diff\n", 0)] {
    let lexer = provider.lexer_for_source(source);
    assert_eq!(lexer.tokenize(source).len(), expected);
  }
}

#[test]
fn size_that_fits_measures_wrapped_text() {
  let mut core = diff_core("+abcdef\n");
  let mut layout = layout().with_soft_wrap(true);
  // 32 gutter leaves 4 cells per row: "+abc" "def" plus the trailing line
  let size = core.size_that_fits(&mut layout, Some(72.0));
  assert_eq!(size, Some(Size::new(72.0, 54.0)));
  assert_eq!(core.size_that_fits(&mut layout, None), None);
}
