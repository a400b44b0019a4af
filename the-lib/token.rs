//! Token model shared by lexers, themes and renderers.
//!
//! Tokens address the source by **char** offsets so they stay valid regardless
//! of how a host encodes the text. Use [`Token::byte_range`] to slice a `&str`.

use std::{
  ops::Range,
  str::FromStr,
};

use serde::{
  Deserialize,
  Serialize,
};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceCodeTokenType {
  Plain,
  Number,
  String,
  Identifier,
  Keyword,
  Comment,
  EditorPlaceholder,
}

impl SourceCodeTokenType {
  pub const ALL: [SourceCodeTokenType; 7] = [
    SourceCodeTokenType::Plain,
    SourceCodeTokenType::Number,
    SourceCodeTokenType::String,
    SourceCodeTokenType::Identifier,
    SourceCodeTokenType::Keyword,
    SourceCodeTokenType::Comment,
    SourceCodeTokenType::EditorPlaceholder,
  ];
}

/// Classification of one line of `git diff` output by its leading marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiffChunkType {
  Header,
  Removed,
  Added,
  Unchanged,
}

impl DiffChunkType {
  /// Enumeration order used when matching line prefixes.
  pub const ALL: [DiffChunkType; 4] = [
    DiffChunkType::Header,
    DiffChunkType::Removed,
    DiffChunkType::Added,
    DiffChunkType::Unchanged,
  ];

  pub const fn prefix(self) -> &'static str {
    match self {
      Self::Header => "@",
      Self::Removed => "-",
      Self::Added => "+",
      Self::Unchanged => " ",
    }
  }
}

impl FromStr for SourceCodeTokenType {
  type Err = UnknownTokenType;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "plain" => Ok(Self::Plain),
      "number" => Ok(Self::Number),
      "string" => Ok(Self::String),
      "identifier" => Ok(Self::Identifier),
      "keyword" => Ok(Self::Keyword),
      "comment" => Ok(Self::Comment),
      "editor-placeholder" => Ok(Self::EditorPlaceholder),
      _ => Err(UnknownTokenType(s.to_string())),
    }
  }
}

impl FromStr for DiffChunkType {
  type Err = UnknownTokenType;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "header" => Ok(Self::Header),
      "removed" => Ok(Self::Removed),
      "added" => Ok(Self::Added),
      "unchanged" => Ok(Self::Unchanged),
      _ => Err(UnknownTokenType(s.to_string())),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown token type '{0}'")]
pub struct UnknownTokenType(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceCodeToken {
  pub kind:  SourceCodeTokenType,
  pub range: Range<usize>,
}

impl SourceCodeToken {
  pub fn new(kind: SourceCodeTokenType, range: Range<usize>) -> Self {
    Self { kind, range }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiffChunkToken {
  pub kind:  DiffChunkType,
  pub range: Range<usize>,
}

impl DiffChunkToken {
  pub fn new(kind: DiffChunkType, range: Range<usize>) -> Self {
    Self { kind, range }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
  SourceCode(SourceCodeToken),
  DiffChunk(DiffChunkToken),
}

impl Token {
  pub fn source(kind: SourceCodeTokenType, range: Range<usize>) -> Self {
    Self::SourceCode(SourceCodeToken::new(kind, range))
  }

  pub fn diff(kind: DiffChunkType, range: Range<usize>) -> Self {
    Self::DiffChunk(DiffChunkToken::new(kind, range))
  }

  /// Half-open char range covered by this token.
  pub fn range(&self) -> Range<usize> {
    match self {
      Self::SourceCode(token) => token.range.clone(),
      Self::DiffChunk(token) => token.range.clone(),
    }
  }

  /// Unchanged diff lines count as plain text.
  pub fn is_plain(&self) -> bool {
    match self {
      Self::SourceCode(token) => token.kind == SourceCodeTokenType::Plain,
      Self::DiffChunk(token) => token.kind == DiffChunkType::Unchanged,
    }
  }

  pub fn is_editor_placeholder(&self) -> bool {
    match self {
      Self::SourceCode(token) => token.kind == SourceCodeTokenType::EditorPlaceholder,
      Self::DiffChunk(_) => false,
    }
  }

  /// Byte range of this token within `text`.
  ///
  /// Offsets past the end of `text` clamp to its length.
  pub fn byte_range(&self, text: &str) -> Range<usize> {
    let range = self.range();
    let start = char_to_byte(text, range.start);
    let end = char_to_byte(text, range.end.max(range.start));
    start..end
  }

  /// Whether the range fits inside a text of `len_chars` chars.
  pub fn is_within(&self, len_chars: usize) -> bool {
    let range = self.range();
    range.start <= range.end && range.end <= len_chars
  }
}

fn char_to_byte(text: &str, char_idx: usize) -> usize {
  text
    .char_indices()
    .nth(char_idx)
    .map(|(byte, _)| byte)
    .unwrap_or(text.len())
}
