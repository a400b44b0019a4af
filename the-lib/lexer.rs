//! Lexers turn source text into [`Token`]s.
//!
//! Every lexer rescans the whole input; there is no incremental re-lexing.
//! Language lexers living outside this crate plug in through [`Lexer`], either
//! by implementing it or as a plain closure:
//!
//! ```no_run
//! use the_lib::{
//!   lexer::Lexer,
//!   token::{
//!     SourceCodeTokenType,
//!     Token,
//!   },
//! };
//!
//! let everything_is_a_comment = |source: &str| {
//!   vec![Token::source(
//!     SourceCodeTokenType::Comment,
//!     0..source.chars().count(),
//!   )]
//! };
//! assert_eq!(everything_is_a_comment.tokenize("# hi").len(), 1);
//! ```

mod git_diff;

pub use git_diff::{
  GitDiffLexer,
  git_diff_tokens,
};

use crate::token::Token;

pub trait Lexer {
  /// Produce the tokens of `source`.
  ///
  /// Must be deterministic: the same input always yields the same tokens.
  fn tokenize(&self, source: &str) -> Vec<Token>;
}

impl<F> Lexer for F
where
  F: Fn(&str) -> Vec<Token>,
{
  fn tokenize(&self, source: &str) -> Vec<Token> {
    self(source)
  }
}

/// Lexer that produces no tokens; the buffer renders with the theme's global
/// attributes only.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PlainLexer;

impl Lexer for PlainLexer {
  fn tokenize(&self, _source: &str) -> Vec<Token> {
    Vec::new()
  }
}

/// Picks the lexer for a given source, e.g. by sniffing its first line.
pub trait LexerProvider {
  fn lexer_for_source(&self, source: &str) -> &dyn Lexer;
}

/// Always hands out the same lexer.
#[derive(Debug, Default, Clone)]
pub struct FixedLexer<L>(pub L);

impl<L: Lexer> LexerProvider for FixedLexer<L> {
  fn lexer_for_source(&self, _source: &str) -> &dyn Lexer {
    &self.0
  }
}

/// Uses the diff lexer when the source looks like `git diff` output and falls
/// back to `fallback` otherwise.
pub struct DiffSniffer<L> {
  diff:     GitDiffLexer,
  fallback: L,
}

impl<L: Lexer> DiffSniffer<L> {
  pub fn new(fallback: L) -> Self {
    Self {
      diff: GitDiffLexer,
      fallback,
    }
  }
}

impl<L: Lexer> LexerProvider for DiffSniffer<L> {
  fn lexer_for_source(&self, source: &str) -> &dyn Lexer {
    let first = source.lines().find(|line| !line.is_empty());
    let looks_like_diff = first.is_some_and(|line| {
      line.starts_with("diff --git") || line.starts_with("@@") || line.starts_with("--- ")
    });
    if looks_like_diff {
      &self.diff
    } else {
      &self.fallback
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::token::SourceCodeTokenType;

  #[test]
  fn plain_lexer_produces_nothing() {
    assert!(PlainLexer.tokenize("let x = 1;").is_empty());
  }

  #[test]
  fn closures_are_lexers() {
    let lexer = |source: &str| vec![Token::source(SourceCodeTokenType::Keyword, 0..source.len())];
    let boxed: Box<dyn Lexer> = Box::new(lexer);
    assert_eq!(boxed.tokenize("fn"), vec![Token::source(
      SourceCodeTokenType::Keyword,
      0..2
    )]);
  }

  #[test]
  fn sniffer_selects_diff_lexer() {
    let provider = DiffSniffer::new(PlainLexer);
    let diff = "@@ -1 +1 @@\n-a\n+b\n";
    assert_eq!(provider.lexer_for_source(diff).tokenize(diff).len(), 3);

    let code = "fn main() {}\n";
    assert!(provider.lexer_for_source(code).tokenize(code).is_empty());
  }

  #[test]
  fn fixed_provider_ignores_source() {
    let provider = FixedLexer(GitDiffLexer);
    assert_eq!(provider.lexer_for_source("").tokenize("+x").len(), 1);
  }
}
