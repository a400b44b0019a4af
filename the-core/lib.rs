pub mod grapheme;
pub mod line_ending;
