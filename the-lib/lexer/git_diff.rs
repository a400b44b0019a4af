use the_core::line_ending::line_spans;

use super::Lexer;
use crate::token::{
  DiffChunkType,
  Token,
};

/// Line-prefix lexer for `git diff` output.
///
/// Every line starting with one of the [`DiffChunkType`] markers becomes one
/// token spanning the whole line, line ending included. Lines with any other
/// first character produce no token and render as plain text.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GitDiffLexer;

impl Lexer for GitDiffLexer {
  fn tokenize(&self, source: &str) -> Vec<Token> {
    git_diff_tokens(source)
  }
}

pub fn git_diff_tokens(source: &str) -> Vec<Token> {
  let mut tokens = Vec::new();

  for line in line_spans(source) {
    for kind in DiffChunkType::ALL {
      if line.content.starts_with(kind.prefix()) {
        tokens.push(Token::diff(kind, line.range()));
      }
    }
  }

  tracing::trace!(tokens = tokens.len(), "lexed git diff output");
  tokens
}
