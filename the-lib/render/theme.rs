//! Source code themes: token colors plus the static style of the editor chrome.
//!
//! A theme is a stateless capability. Renderers first paint the whole buffer
//! with [`SourceCodeTheme::global_attributes`] and then overlay
//! [`SourceCodeTheme::attributes_for`] per token.

use std::collections::HashMap;

use serde::Deserialize;
use toml::{
  Value,
  map::Map,
};
use tracing::warn;

pub use super::graphics::{
  Color,
  Font,
  TextAttributes,
};
use crate::token::{
  DiffChunkType,
  SourceCodeTokenType,
  Token,
};

#[derive(Debug, Clone, PartialEq)]
pub struct LineNumbersStyle {
  pub font:       Font,
  pub text_color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GutterStyle {
  pub background_color: Color,
  pub minimum_width:    f64,
}

pub trait SourceCodeTheme: Send + Sync {
  fn font(&self) -> &Font;

  fn background_color(&self) -> Color;

  /// `None` hides the line numbers and collapses the gutter to its minimum
  /// width.
  fn line_numbers_style(&self) -> Option<&LineNumbersStyle>;

  fn gutter_style(&self) -> &GutterStyle;

  fn color(&self, kind: SourceCodeTokenType) -> Color;

  fn diff_color(&self, _kind: DiffChunkType) -> Option<Color> {
    None
  }

  fn diff_background_color(&self, _kind: DiffChunkType) -> Option<Color> {
    None
  }

  /// Attributes applied to the whole buffer before any token.
  fn global_attributes(&self) -> TextAttributes {
    TextAttributes::default()
      .font(self.font().clone())
      .fg(self.color(SourceCodeTokenType::Plain))
  }

  fn attributes_for(&self, token: &Token) -> TextAttributes {
    match token {
      Token::SourceCode(token) => TextAttributes::default().fg(self.color(token.kind)),
      Token::DiffChunk(token) => TextAttributes {
        font:       None,
        foreground: self.diff_color(token.kind),
        background: self.diff_background_color(token.kind),
      },
    }
  }
}

const fn rgb(r: u8, g: u8, b: u8) -> Color {
  Color::Rgb(r, g, b)
}

const LINE_NUMBERS_COLOR: Color = rgb(100, 100, 100);
const GUTTER_BACKGROUND: Color = rgb(21, 22, 31);
const EDITOR_BACKGROUND: Color = rgb(31, 32, 41);
const MINIMUM_GUTTER_WIDTH: f64 = 32.0;

fn dark_token_color(kind: SourceCodeTokenType, background: Color) -> Color {
  match kind {
    SourceCodeTokenType::Plain => Color::White,
    SourceCodeTokenType::Number => rgb(116, 109, 176),
    SourceCodeTokenType::String => rgb(211, 35, 46),
    SourceCodeTokenType::Identifier => rgb(20, 156, 146),
    SourceCodeTokenType::Keyword => rgb(215, 0, 143),
    SourceCodeTokenType::Comment => rgb(69, 187, 62),
    SourceCodeTokenType::EditorPlaceholder => background,
  }
}

/// Dark theme for general source code.
#[derive(Debug, Clone)]
pub struct DefaultSourceCodeTheme {
  font:         Font,
  line_numbers: LineNumbersStyle,
  gutter:       GutterStyle,
}

impl Default for DefaultSourceCodeTheme {
  fn default() -> Self {
    Self {
      font:         Font::new("Menlo", 15.0),
      line_numbers: LineNumbersStyle {
        font:       Font::new("Menlo", 15.0),
        text_color: LINE_NUMBERS_COLOR,
      },
      gutter:       GutterStyle {
        background_color: GUTTER_BACKGROUND,
        minimum_width:    MINIMUM_GUTTER_WIDTH,
      },
    }
  }
}

impl SourceCodeTheme for DefaultSourceCodeTheme {
  fn font(&self) -> &Font {
    &self.font
  }

  fn background_color(&self) -> Color {
    EDITOR_BACKGROUND
  }

  fn line_numbers_style(&self) -> Option<&LineNumbersStyle> {
    Some(&self.line_numbers)
  }

  fn gutter_style(&self) -> &GutterStyle {
    &self.gutter
  }

  fn color(&self, kind: SourceCodeTokenType) -> Color {
    dark_token_color(kind, self.background_color())
  }
}

/// Theme for `git diff` output: grey hunk headers and tinted added/removed
/// line backgrounds.
#[derive(Debug, Clone)]
pub struct GitDiffOutputTheme {
  font:         Font,
  line_numbers: LineNumbersStyle,
  gutter:       GutterStyle,
}

impl Default for GitDiffOutputTheme {
  fn default() -> Self {
    Self {
      font:         Font::new("Menlo", 15.0),
      line_numbers: LineNumbersStyle {
        font:       Font::new("Menlo", 16.0),
        text_color: LINE_NUMBERS_COLOR,
      },
      gutter:       GutterStyle {
        background_color: GUTTER_BACKGROUND,
        minimum_width:    MINIMUM_GUTTER_WIDTH,
      },
    }
  }
}

impl SourceCodeTheme for GitDiffOutputTheme {
  fn font(&self) -> &Font {
    &self.font
  }

  fn background_color(&self) -> Color {
    EDITOR_BACKGROUND
  }

  fn line_numbers_style(&self) -> Option<&LineNumbersStyle> {
    Some(&self.line_numbers)
  }

  fn gutter_style(&self) -> &GutterStyle {
    &self.gutter
  }

  fn color(&self, kind: SourceCodeTokenType) -> Color {
    dark_token_color(kind, self.background_color())
  }

  fn diff_color(&self, kind: DiffChunkType) -> Option<Color> {
    match kind {
      DiffChunkType::Header => Some(Color::Gray),
      _ => None,
    }
  }

  fn diff_background_color(&self, kind: DiffChunkType) -> Option<Color> {
    match kind {
      DiffChunkType::Added => Some(Color::Green.with_alpha(0.2)),
      DiffChunkType::Removed => Some(Color::Red.with_alpha(0.2)),
      _ => None,
    }
  }
}

/// Built-in theme a configured theme starts from.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BaseTheme {
  #[default]
  Default,
  GitDiff,
}

impl BaseTheme {
  fn snapshot(self) -> ConfigTheme {
    match self {
      BaseTheme::Default => ConfigTheme::from_theme(&DefaultSourceCodeTheme::default()),
      BaseTheme::GitDiff => ConfigTheme::from_theme(&GitDiffOutputTheme::default()),
    }
  }
}

/// A theme assembled from a TOML table on top of a built-in theme.
///
/// ```toml
/// inherits = "git-diff"
/// background = "#1f2029"
/// font = { family = "Menlo", size = 14 }
/// line-numbers = { color = "gray" }
/// gutter = { background = "#15161f", minimum-width = 40 }
///
/// [palette]
/// accent = "#d7008f"
///
/// [tokens]
/// keyword = "accent"
///
/// [diff.added]
/// bg = "#00ff0033"
/// ```
///
/// `line-numbers = false` hides the line numbers. Entries that fail to parse
/// are reported as warnings and leave the inherited value in place.
#[derive(Debug, Clone)]
pub struct ConfigTheme {
  font:            Font,
  background:      Color,
  line_numbers:    Option<LineNumbersStyle>,
  gutter:          GutterStyle,
  tokens:          HashMap<SourceCodeTokenType, Color>,
  diff_foreground: HashMap<DiffChunkType, Color>,
  diff_background: HashMap<DiffChunkType, Color>,
}

impl ConfigTheme {
  /// Capture every value of `theme`.
  pub fn from_theme(theme: &dyn SourceCodeTheme) -> Self {
    let tokens = SourceCodeTokenType::ALL
      .into_iter()
      .map(|kind| (kind, theme.color(kind)))
      .collect();
    let diff_foreground = DiffChunkType::ALL
      .into_iter()
      .filter_map(|kind| Some((kind, theme.diff_color(kind)?)))
      .collect();
    let diff_background = DiffChunkType::ALL
      .into_iter()
      .filter_map(|kind| Some((kind, theme.diff_background_color(kind)?)))
      .collect();

    Self {
      font: theme.font().clone(),
      background: theme.background_color(),
      line_numbers: theme.line_numbers_style().cloned(),
      gutter: theme.gutter_style().clone(),
      tokens,
      diff_foreground,
      diff_background,
    }
  }

  /// Build a theme from a TOML value, returning it together with the
  /// warnings produced while parsing.
  pub fn from_toml(value: Value) -> (Self, Vec<String>) {
    match value {
      Value::Table(table) => Self::from_keys(table),
      other => {
        let warning = format!("Expected theme TOML value to be a table, found {other:?}");
        (BaseTheme::default().snapshot(), vec![warning])
      },
    }
  }

  fn from_keys(mut values: Map<String, Value>) -> (Self, Vec<String>) {
    let mut warnings = Vec::new();

    let base = match values.remove("inherits") {
      Some(value) => value.try_into::<BaseTheme>().unwrap_or_else(|err| {
        warnings.push(format!("Invalid base theme: {err}"));
        BaseTheme::default()
      }),
      None => BaseTheme::default(),
    };
    let mut theme = base.snapshot();

    let palette = values
      .remove("palette")
      .map(|value| {
        ThemePalette::try_from(value).unwrap_or_else(|err| {
          warnings.push(err);
          ThemePalette::default()
        })
      })
      .unwrap_or_default();

    for (key, value) in values {
      let result = match key.as_str() {
        "font" => parse_font(value).map(|font| theme.font = font),
        "background" => palette.parse_color(value).map(|color| theme.background = color),
        "line-numbers" => theme.apply_line_numbers(&palette, value),
        "gutter" => theme.apply_gutter(&palette, value),
        "tokens" => theme.apply_tokens(&palette, value, &mut warnings),
        "diff" => theme.apply_diff(&palette, value, &mut warnings),
        _ => Err(format!("Unknown theme key {key:?}")),
      };
      if let Err(err) = result {
        warnings.push(format!("Failed to parse theme key {key:?}. {err}"));
      }
    }

    (theme, warnings)
  }

  fn apply_line_numbers(&mut self, palette: &ThemePalette, value: Value) -> Result<(), String> {
    let table = match value {
      Value::Boolean(false) => {
        self.line_numbers = None;
        return Ok(());
      },
      Value::Boolean(true) => Map::new(),
      Value::Table(table) => table,
      other => return Err(format!("Expected a table or boolean, found {other}")),
    };

    let mut style = self.line_numbers.clone().unwrap_or_else(|| LineNumbersStyle {
      font:       self.font.clone(),
      text_color: LINE_NUMBERS_COLOR,
    });
    for (name, value) in table {
      match name.as_str() {
        "font" => style.font = parse_font(value)?,
        "color" => style.text_color = palette.parse_color(value)?,
        _ => return Err(format!("Invalid line number attribute: {name}")),
      }
    }
    self.line_numbers = Some(style);
    Ok(())
  }

  fn apply_gutter(&mut self, palette: &ThemePalette, value: Value) -> Result<(), String> {
    let Value::Table(table) = value else {
      return Err("Gutter must be a table".to_string());
    };
    for (name, value) in table {
      match name.as_str() {
        "background" => self.gutter.background_color = palette.parse_color(value)?,
        "minimum-width" => self.gutter.minimum_width = parse_number(&value)?.max(0.0),
        _ => return Err(format!("Invalid gutter attribute: {name}")),
      }
    }
    Ok(())
  }

  fn apply_tokens(
    &mut self,
    palette: &ThemePalette,
    value: Value,
    warnings: &mut Vec<String>,
  ) -> Result<(), String> {
    let Value::Table(table) = value else {
      return Err("Tokens must be a table".to_string());
    };
    for (name, value) in table {
      let parsed = name
        .parse::<SourceCodeTokenType>()
        .map_err(|err| err.to_string())
        .and_then(|kind| Ok((kind, palette.parse_color(value)?)));
      match parsed {
        Ok((kind, color)) => {
          self.tokens.insert(kind, color);
        },
        Err(err) => warnings.push(format!("Failed to parse token color {name:?}. {err}")),
      }
    }
    Ok(())
  }

  fn apply_diff(
    &mut self,
    palette: &ThemePalette,
    value: Value,
    warnings: &mut Vec<String>,
  ) -> Result<(), String> {
    let Value::Table(table) = value else {
      return Err("Diff must be a table".to_string());
    };
    for (name, value) in table {
      let result = name
        .parse::<DiffChunkType>()
        .map_err(|err| err.to_string())
        .and_then(|kind| self.apply_diff_style(palette, kind, value));
      if let Err(err) = result {
        warnings.push(format!("Failed to parse diff style {name:?}. {err}"));
      }
    }
    Ok(())
  }

  fn apply_diff_style(
    &mut self,
    palette: &ThemePalette,
    kind: DiffChunkType,
    value: Value,
  ) -> Result<(), String> {
    let Value::Table(entries) = value else {
      // A bare color is shorthand for the foreground.
      self.diff_foreground.insert(kind, palette.parse_color(value)?);
      return Ok(());
    };
    for (name, value) in entries {
      let target = match name.as_str() {
        "fg" => &mut self.diff_foreground,
        "bg" => &mut self.diff_background,
        _ => return Err(format!("Invalid diff style attribute: {name}")),
      };
      if value.as_bool() == Some(false) {
        target.remove(&kind);
      } else {
        target.insert(kind, palette.parse_color(value)?);
      }
    }
    Ok(())
  }
}

impl Default for ConfigTheme {
  fn default() -> Self {
    BaseTheme::default().snapshot()
  }
}

impl From<Value> for ConfigTheme {
  fn from(value: Value) -> Self {
    let (theme, warnings) = ConfigTheme::from_toml(value);
    for warning in warnings {
      warn!("{}", warning);
    }
    theme
  }
}

impl SourceCodeTheme for ConfigTheme {
  fn font(&self) -> &Font {
    &self.font
  }

  fn background_color(&self) -> Color {
    self.background
  }

  fn line_numbers_style(&self) -> Option<&LineNumbersStyle> {
    self.line_numbers.as_ref()
  }

  fn gutter_style(&self) -> &GutterStyle {
    &self.gutter
  }

  fn color(&self, kind: SourceCodeTokenType) -> Color {
    match self.tokens.get(&kind) {
      Some(color) => *color,
      None => dark_token_color(kind, self.background),
    }
  }

  fn diff_color(&self, kind: DiffChunkType) -> Option<Color> {
    self.diff_foreground.get(&kind).copied()
  }

  fn diff_background_color(&self, kind: DiffChunkType) -> Option<Color> {
    self.diff_background.get(&kind).copied()
  }
}

fn parse_number(value: &Value) -> Result<f64, String> {
  match value {
    Value::Integer(i) => Ok(*i as f64),
    Value::Float(f) => Ok(*f),
    other => Err(format!("Expected a number, found {other}")),
  }
}

fn parse_font(value: Value) -> Result<Font, String> {
  let Value::Table(table) = value else {
    return Err("Font must be a table".to_string());
  };
  let mut font = Font::default();
  for (name, value) in table {
    match name.as_str() {
      "family" => {
        font.family = value
          .as_str()
          .ok_or(format!("Font family must be a string: {value}"))?
          .to_string()
      },
      "size" => font.size = parse_number(&value)?,
      _ => return Err(format!("Invalid font attribute: {name}")),
    }
  }
  Ok(font)
}

struct ThemePalette {
  palette: HashMap<String, Color>,
}

impl Default for ThemePalette {
  fn default() -> Self {
    let mut palette = HashMap::new();
    palette.insert("default".to_string(), Color::Reset);
    palette.insert("black".to_string(), Color::Black);
    palette.insert("red".to_string(), Color::Red);
    palette.insert("green".to_string(), Color::Green);
    palette.insert("yellow".to_string(), Color::Yellow);
    palette.insert("blue".to_string(), Color::Blue);
    palette.insert("magenta".to_string(), Color::Magenta);
    palette.insert("cyan".to_string(), Color::Cyan);
    palette.insert("gray".to_string(), Color::Gray);
    palette.insert("light-red".to_string(), Color::LightRed);
    palette.insert("light-green".to_string(), Color::LightGreen);
    palette.insert("light-yellow".to_string(), Color::LightYellow);
    palette.insert("light-blue".to_string(), Color::LightBlue);
    palette.insert("light-magenta".to_string(), Color::LightMagenta);
    palette.insert("light-cyan".to_string(), Color::LightCyan);
    palette.insert("light-gray".to_string(), Color::LightGray);
    palette.insert("white".to_string(), Color::White);
    Self { palette }
  }
}

impl ThemePalette {
  pub fn new(palette: HashMap<String, Color>) -> Self {
    let ThemePalette {
      palette: mut default,
    } = ThemePalette::default();

    default.extend(palette);
    Self { palette: default }
  }

  /// Parse `#rrggbb` or `#rrggbbaa`.
  pub fn hex_string_to_rgb(s: &str) -> Result<Color, String> {
    let component = |range: std::ops::Range<usize>| {
      s.get(range)
        .and_then(|hex| u8::from_str_radix(hex, 16).ok())
    };

    if s.starts_with('#') {
      match s.len() {
        7 => {
          if let (Some(r), Some(g), Some(b)) = (component(1..3), component(3..5), component(5..7)) {
            return Ok(Color::Rgb(r, g, b));
          }
        },
        9 => {
          if let (Some(r), Some(g), Some(b), Some(a)) = (
            component(1..3),
            component(3..5),
            component(5..7),
            component(7..9),
          ) {
            return Ok(Color::Rgba(r, g, b, a));
          }
        },
        _ => {},
      }
    }

    Err(format!("Malformed hexcode: {}", s))
  }

  fn parse_value_as_str(value: &Value) -> Result<&str, String> {
    value
      .as_str()
      .ok_or(format!("Unrecognized value: {}", value))
  }

  pub fn parse_color(&self, value: Value) -> Result<Color, String> {
    let value = Self::parse_value_as_str(&value)?;

    self
      .palette
      .get(value)
      .copied()
      .ok_or("")
      .or_else(|_| Self::hex_string_to_rgb(value))
  }
}

impl TryFrom<Value> for ThemePalette {
  type Error = String;

  fn try_from(value: Value) -> Result<Self, Self::Error> {
    let map = match value {
      Value::Table(entries) => entries,
      _ => return Ok(Self::default()),
    };

    let mut palette = HashMap::with_capacity(map.len());
    for (name, value) in map {
      let value = Self::parse_value_as_str(&value)?;
      let color = Self::hex_string_to_rgb(value)?;
      palette.insert(name, color);
    }

    Ok(Self::new(palette))
  }
}
