//! Editor configuration loaded from TOML.
//!
//! ```toml
//! [gutter]
//! char-width = 10.0
//! show-line-numbers = true
//!
//! [paragraphs]
//! origin = "bottom-left"
//!
//! [theme]
//! inherits = "git-diff"
//! tokens = { keyword = "magenta" }
//! ```

use std::path::{
  Path,
  PathBuf,
};

use serde::{
  Deserialize,
  Serialize,
};
use thiserror::Error;

use crate::render::{
  gutter::GutterConfig,
  paragraphs::{
    CoordinateOrigin,
    ParagraphOptions,
  },
  theme::ConfigTheme,
};

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read {path}: {source}")]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error(transparent)]
  Parse(#[from] toml::de::Error),
  #[error("invalid theme: {}", .0.join("; "))]
  Theme(Vec<String>),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct ParagraphsConfig {
  pub default_line_height:   f64,
  pub trailing_line_spacing: f64,
  pub origin:                CoordinateOrigin,
}

impl Default for ParagraphsConfig {
  fn default() -> Self {
    let options = ParagraphOptions::default();
    Self {
      default_line_height:   options.default_line_height,
      trailing_line_spacing: options.trailing_line_spacing,
      origin:                options.origin,
    }
  }
}

impl ParagraphsConfig {
  pub fn options(&self, synthetic_width: f64, container_height: f64) -> ParagraphOptions {
    ParagraphOptions {
      origin: self.origin,
      default_line_height: self.default_line_height,
      trailing_line_spacing: self.trailing_line_spacing,
      synthetic_width,
      container_height,
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct EditorConfig {
  pub gutter:     GutterConfig,
  pub paragraphs: ParagraphsConfig,
  /// Raw theme table, see [`ConfigTheme`].
  #[serde(skip_serializing_if = "Option::is_none")]
  pub theme:      Option<toml::Value>,
}

impl EditorConfig {
  pub fn from_toml_str(source: &str) -> Result<Self> {
    Ok(toml::from_str(source)?)
  }

  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|source| {
      ConfigError::Io {
        path: path.to_path_buf(),
        source,
      }
    })?;
    let config = Self::from_toml_str(&source)?;
    tracing::debug!(path = %path.display(), "loaded editor config");
    Ok(config)
  }

  /// The configured theme, if any. Invalid theme entries are logged and
  /// skipped.
  pub fn theme(&self) -> Option<ConfigTheme> {
    self.theme.clone().map(ConfigTheme::from)
  }

  /// Like [`EditorConfig::theme`], but fails on the first invalid entry
  /// instead of skipping it.
  pub fn strict_theme(&self) -> Result<Option<ConfigTheme>> {
    let Some(value) = self.theme.clone() else {
      return Ok(None);
    };
    let (theme, warnings) = ConfigTheme::from_toml(value);
    if warnings.is_empty() {
      Ok(Some(theme))
    } else {
      Err(ConfigError::Theme(warnings))
    }
  }
}
