#![no_main]

use std::sync::Arc;

use libfuzzer_sys::fuzz_target;
use ropey::Rope;
use the_lib::{
  editor::EditorCore,
  lexer::GitDiffLexer,
  render::{
    CellMetrics,
    GitDiffOutputTheme,
    MonospaceLayout,
    Size,
  },
};

const MAX_BYTES: usize = 16 * 1024;

fuzz_target!(|data: &[u8]| {
  let Some((&width, rest)) = data.split_first() else {
    return;
  };
  let Ok(text) = std::str::from_utf8(&rest[..rest.len().min(MAX_BYTES)]) else {
    return;
  };

  let mut core = EditorCore::new(
    text,
    Box::new(GitDiffLexer),
    Arc::new(GitDiffOutputTheme::default()),
  );
  let mut layout = MonospaceLayout::new(&Rope::new(), CellMetrics::default()).with_soft_wrap(true);
  core.resize(Size::new(32.0 + width as f64, 1000.0));
  core.layout_pass(&mut layout);

  let len = text.chars().count();
  assert!(core.tokens().iter().all(|token| token.is_within(len)));

  let runs = core.styled_runs();
  assert_eq!(runs.last().map(|run| run.range.end).unwrap_or(0), len);

  let paragraphs = core.paragraphs(&mut layout);
  assert!(!paragraphs.is_empty());
  for (idx, paragraph) in paragraphs.iter().enumerate() {
    assert_eq!(paragraph.number, idx + 1);
  }
});
