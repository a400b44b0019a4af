//! Geometry, colors and text attributes shared by the render helpers.

use serde::{
  Deserialize,
  Serialize,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
  pub x: f64,
  pub y: f64,
}

impl Point {
  pub const fn new(x: f64, y: f64) -> Self {
    Self { x, y }
  }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
  pub width:  f64,
  pub height: f64,
}

impl Size {
  pub const fn new(width: f64, height: f64) -> Self {
    Self { width, height }
  }
}

/// Axis aligned rectangle in the coordinate space of the hosting view.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
  pub x:      f64,
  pub y:      f64,
  pub width:  f64,
  pub height: f64,
}

impl Rect {
  pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
    Self {
      x,
      y,
      width,
      height,
    }
  }

  pub const fn zero() -> Self {
    Self::new(0.0, 0.0, 0.0, 0.0)
  }

  pub fn origin(&self) -> Point {
    Point::new(self.x, self.y)
  }

  pub fn size(&self) -> Size {
    Size::new(self.width, self.height)
  }

  pub fn max_x(&self) -> f64 {
    self.x + self.width
  }

  pub fn max_y(&self) -> f64 {
    self.y + self.height
  }

  pub fn is_empty(&self) -> bool {
    self.width <= 0.0 || self.height <= 0.0
  }

  /// Whether the two rectangles overlap.
  ///
  /// Zero-width rectangles (e.g. an empty line) still count when their
  /// vertical extent overlaps `other`.
  pub fn intersects(&self, other: &Rect) -> bool {
    self.x <= other.max_x()
      && other.x <= self.max_x()
      && self.y < other.max_y()
      && other.y < self.max_y()
  }

  pub fn union(&self, other: &Rect) -> Rect {
    let x = self.x.min(other.x);
    let y = self.y.min(other.y);
    Rect::new(
      x,
      y,
      self.max_x().max(other.max_x()) - x,
      self.max_y().max(other.max_y()) - y,
    )
  }

  /// Mirror the rectangle vertically inside a container of the given height.
  pub fn flipped(&self, container_height: f64) -> Rect {
    Rect {
      y: container_height - self.height - self.y,
      ..*self
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
  Reset,
  Black,
  Red,
  Green,
  Yellow,
  Blue,
  Magenta,
  Cyan,
  Gray,
  LightRed,
  LightGreen,
  LightYellow,
  LightBlue,
  LightMagenta,
  LightCyan,
  LightGray,
  White,
  Rgb(u8, u8, u8),
  Rgba(u8, u8, u8, u8),
}

impl Color {
  /// RGB components of the color, named colors mapped to their usual sRGB
  /// values. `Reset` has none.
  pub fn to_rgb(self) -> Option<(u8, u8, u8)> {
    let rgb = match self {
      Color::Reset => return None,
      Color::Black => (0, 0, 0),
      Color::Red => (255, 0, 0),
      Color::Green => (0, 255, 0),
      Color::Yellow => (255, 255, 0),
      Color::Blue => (0, 0, 255),
      Color::Magenta => (255, 0, 255),
      Color::Cyan => (0, 255, 255),
      Color::Gray => (128, 128, 128),
      Color::LightRed => (255, 128, 128),
      Color::LightGreen => (128, 255, 128),
      Color::LightYellow => (255, 255, 128),
      Color::LightBlue => (128, 128, 255),
      Color::LightMagenta => (255, 128, 255),
      Color::LightCyan => (128, 255, 255),
      Color::LightGray => (192, 192, 192),
      Color::White => (255, 255, 255),
      Color::Rgb(r, g, b) | Color::Rgba(r, g, b, _) => (r, g, b),
    };
    Some(rgb)
  }

  pub fn alpha(self) -> u8 {
    match self {
      Color::Rgba(.., a) => a,
      Color::Reset => 0,
      _ => u8::MAX,
    }
  }

  /// The same color with the given opacity in `0.0..=1.0`.
  pub fn with_alpha(self, alpha: f64) -> Color {
    let Some((r, g, b)) = self.to_rgb() else {
      return self;
    };
    let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::Rgba(r, g, b, a)
  }

  /// Composite this color over an opaque `background`.
  pub fn blend_over(self, background: Color) -> Color {
    let alpha = self.alpha();
    if alpha == u8::MAX {
      return self;
    }
    let (Some((r, g, b)), Some((br, bg, bb))) = (self.to_rgb(), background.to_rgb()) else {
      return background;
    };
    let a = alpha as f64 / 255.0;
    let mix = |fg: u8, bg: u8| (fg as f64 * a + bg as f64 * (1.0 - a)).round() as u8;
    Color::Rgb(mix(r, br), mix(g, bg), mix(b, bb))
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
  pub family: String,
  pub size:   f64,
}

impl Font {
  pub fn new(family: impl Into<String>, size: f64) -> Self {
    Self {
      family: family.into(),
      size,
    }
  }
}

impl Default for Font {
  fn default() -> Self {
    Self::new("Menlo", 15.0)
  }
}

/// Display attributes of a run of text.
///
/// Each channel is independent: an unset channel leaves whatever lies below
/// untouched when patched.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TextAttributes {
  pub font:       Option<Font>,
  pub foreground: Option<Color>,
  pub background: Option<Color>,
}

impl TextAttributes {
  pub fn fg(mut self, color: Color) -> Self {
    self.foreground = Some(color);
    self
  }

  pub fn bg(mut self, color: Color) -> Self {
    self.background = Some(color);
    self
  }

  pub fn font(mut self, font: Font) -> Self {
    self.font = Some(font);
    self
  }

  /// Overlay `other` on top of `self`, channel by channel.
  pub fn patch(mut self, other: &TextAttributes) -> Self {
    if let Some(font) = &other.font {
      self.font = Some(font.clone());
    }
    if let Some(fg) = other.foreground {
      self.foreground = Some(fg);
    }
    if let Some(bg) = other.background {
      self.background = Some(bg);
    }
    self
  }

  pub fn is_empty(&self) -> bool {
    self.font.is_none() && self.foreground.is_none() && self.background.is_none()
  }
}
