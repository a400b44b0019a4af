//! Flattening of token attributes into renderable runs.

use std::ops::Range;

use super::theme::{
  SourceCodeTheme,
  TextAttributes,
};
use crate::token::Token;

/// A maximal run of chars sharing the same attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledRun {
  pub range:      Range<usize>,
  pub attributes: TextAttributes,
}

/// Per-token attributes, in token order. Tokens the theme has nothing to say
/// about are skipped.
pub fn highlight_spans(
  tokens: &[Token],
  theme: &dyn SourceCodeTheme,
) -> Vec<(Range<usize>, TextAttributes)> {
  tokens
    .iter()
    .filter(|token| !token.range().is_empty())
    .map(|token| (token.range(), theme.attributes_for(token)))
    .filter(|(_, attributes)| !attributes.is_empty())
    .collect()
}

/// Cover `0..text_len` with non-overlapping runs.
///
/// Every run starts from the theme's global attributes; each token covering
/// the run is then patched on top in token order, so later tokens win per
/// channel. Token ranges past `text_len` are clamped.
pub fn styled_runs(
  text_len: usize,
  tokens: &[Token],
  theme: &dyn SourceCodeTheme,
) -> Vec<StyledRun> {
  if text_len == 0 {
    return Vec::new();
  }

  let base = theme.global_attributes();
  let spans: Vec<_> = tokens
    .iter()
    .filter_map(|token| {
      let range = token.range();
      let range = range.start.min(text_len)..range.end.min(text_len);
      (!range.is_empty()).then(|| (range, theme.attributes_for(token)))
    })
    .collect();

  let mut boundaries: Vec<usize> = Vec::with_capacity(spans.len() * 2 + 2);
  boundaries.push(0);
  boundaries.push(text_len);
  for (range, _) in &spans {
    boundaries.push(range.start);
    boundaries.push(range.end);
  }
  boundaries.sort_unstable();
  boundaries.dedup();

  let mut by_start: Vec<usize> = (0..spans.len()).collect();
  by_start.sort_by_key(|&idx| spans[idx].0.start);
  let mut pending = by_start.into_iter().peekable();
  let mut active: Vec<usize> = Vec::new();

  let mut runs: Vec<StyledRun> = Vec::new();
  for window in boundaries.windows(2) {
    let (start, end) = (window[0], window[1]);

    active.retain(|&idx| spans[idx].0.end > start);
    while let Some(&idx) = pending.peek() {
      if spans[idx].0.start > start {
        break;
      }
      if spans[idx].0.end > start {
        active.push(idx);
      }
      pending.next();
    }
    active.sort_unstable();

    let attributes = active
      .iter()
      .fold(base.clone(), |attrs, &idx| attrs.patch(&spans[idx].1));

    match runs.last_mut() {
      Some(last) if last.attributes == attributes && last.range.end == start => {
        last.range.end = end;
      },
      _ => runs.push(StyledRun {
        range: start..end,
        attributes,
      }),
    }
  }

  runs
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    lexer::{
      GitDiffLexer,
      Lexer,
    },
    render::{
      graphics::Color,
      theme::{
        DefaultSourceCodeTheme,
        GitDiffOutputTheme,
      },
    },
    token::{
      DiffChunkType,
      SourceCodeTokenType,
    },
  };

  #[test]
  fn empty_text_has_no_runs() {
    let theme = DefaultSourceCodeTheme::default();
    assert!(styled_runs(0, &[], &theme).is_empty());
  }

  #[test]
  fn untokenized_text_is_one_global_run() {
    let theme = DefaultSourceCodeTheme::default();
    let runs = styled_runs(12, &[], &theme);
    assert_eq!(runs, vec![StyledRun {
      range:      0..12,
      attributes: theme.global_attributes(),
    }]);
  }

  #[test]
  fn diff_runs_keep_global_foreground() {
    let theme = GitDiffOutputTheme::default();
    let source = "+foo\n-bar\n baz\n";
    let tokens = GitDiffLexer.tokenize(source);
    let runs = styled_runs(source.chars().count(), &tokens, &theme);

    assert_eq!(runs.len(), 3);
    assert_eq!(runs[0].range, 0..5);
    assert_eq!(runs[0].attributes.foreground, Some(Color::White));
    assert_eq!(
      runs[0].attributes.background,
      theme.diff_background_color(DiffChunkType::Added)
    );
    assert_eq!(runs[1].range, 5..10);
    assert_eq!(
      runs[1].attributes.background,
      theme.diff_background_color(DiffChunkType::Removed)
    );
    // unchanged lines carry no attributes of their own and merge with nothing
    assert_eq!(runs[2].range, 10..15);
    assert_eq!(runs[2].attributes, theme.global_attributes());
  }

  #[test]
  fn later_tokens_win_per_channel() {
    let theme = GitDiffOutputTheme::default();
    let tokens = vec![
      Token::diff(DiffChunkType::Added, 0..10),
      Token::source(SourceCodeTokenType::Keyword, 2..4),
    ];
    let runs = styled_runs(10, &tokens, &theme);

    assert_eq!(runs.len(), 3);
    let keyword = &runs[1];
    assert_eq!(keyword.range, 2..4);
    assert_eq!(
      keyword.attributes.foreground,
      Some(theme.color(SourceCodeTokenType::Keyword))
    );
    // the keyword sets no background, so the diff background stays
    assert_eq!(
      keyword.attributes.background,
      theme.diff_background_color(DiffChunkType::Added)
    );
  }

  #[test]
  fn out_of_range_tokens_are_clamped() {
    let theme = DefaultSourceCodeTheme::default();
    let tokens = vec![Token::source(SourceCodeTokenType::Comment, 3..100)];
    let runs = styled_runs(5, &tokens, &theme);
    assert_eq!(runs.last().map(|run| run.range.clone()), Some(3..5));
  }

  #[test]
  fn spans_skip_tokens_without_attributes() {
    let theme = GitDiffOutputTheme::default();
    let tokens = vec![
      Token::diff(DiffChunkType::Unchanged, 0..3),
      Token::diff(DiffChunkType::Header, 3..6),
    ];
    let spans = highlight_spans(&tokens, &theme);
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].0, 3..6);
  }

  quickcheck::quickcheck! {
    fn runs_tile_the_buffer(source: String) -> bool {
      let theme = GitDiffOutputTheme::default();
      let len = source.chars().count();
      let runs = styled_runs(len, &GitDiffLexer.tokenize(&source), &theme);
      let mut next = 0;
      for run in &runs {
        if run.range.start != next || run.range.is_empty() {
          return false;
        }
        next = run.range.end;
      }
      next == len
    }
  }
}
