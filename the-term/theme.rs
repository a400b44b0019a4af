//! Conversion of theme colors to terminal colors.

use crossterm::style::Color as CColor;
use the_lib::render::Color;

/// Map a theme color to a terminal color.
///
/// Translucent colors are composited over `background` first, terminals have
/// no alpha channel.
pub fn to_crossterm(color: Color, background: Color) -> CColor {
  match color {
    Color::Reset => CColor::Reset,
    Color::Black => CColor::Black,
    Color::Red => CColor::DarkRed,
    Color::Green => CColor::DarkGreen,
    Color::Yellow => CColor::DarkYellow,
    Color::Blue => CColor::DarkBlue,
    Color::Magenta => CColor::DarkMagenta,
    Color::Cyan => CColor::DarkCyan,
    Color::Gray => CColor::DarkGrey,
    Color::LightRed => CColor::Red,
    Color::LightGreen => CColor::Green,
    Color::LightYellow => CColor::Yellow,
    Color::LightBlue => CColor::Blue,
    Color::LightMagenta => CColor::Magenta,
    Color::LightCyan => CColor::Cyan,
    Color::LightGray => CColor::Grey,
    Color::White => CColor::White,
    Color::Rgb(r, g, b) => CColor::Rgb { r, g, b },
    Color::Rgba(..) => match color.blend_over(background) {
      Color::Rgb(r, g, b) | Color::Rgba(r, g, b, _) => CColor::Rgb { r, g, b },
      // the background had no components to blend with
      _ => CColor::Reset,
    },
  }
}
