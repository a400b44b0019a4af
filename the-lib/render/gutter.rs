use std::borrow::Cow;

use ropey::RopeSlice;
use serde::{
  Deserialize,
  Serialize,
};
use the_core::line_ending::line_count;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct GutterConfig {
  /// Width reserved per label character.
  pub char_width:        f64,
  pub left_inset:        f64,
  pub right_inset:       f64,
  pub show_line_numbers: bool,
}

impl Default for GutterConfig {
  fn default() -> Self {
    Self {
      char_width:        10.0,
      left_inset:        4.0,
      right_inset:       4.0,
      show_line_numbers: true,
    }
  }
}

/// Length in chars of the longest label the gutter has to fit.
///
/// With a non-empty override list this is its longest entry, otherwise the
/// digit count of the number of lines in `text`.
pub fn max_label_len(text: RopeSlice, line_numbers: Option<&[String]>) -> usize {
  match line_numbers {
    Some(overrides) if !overrides.is_empty() => overrides
      .iter()
      .map(|label| label.chars().count())
      .max()
      .unwrap_or(0),
    _ => {
      let text: Cow<str> = text.into();
      digits(line_count(&text))
    },
  }
}

fn digits(mut n: usize) -> usize {
  let mut count = 1;
  while n >= 10 {
    n /= 10;
    count += 1;
  }
  count
}

pub fn gutter_width(label_len: usize, config: &GutterConfig, minimum_width: f64) -> f64 {
  let width = label_len as f64 * config.char_width + config.left_inset + config.right_inset;
  width.max(minimum_width)
}

/// Width of a gutter that shows no line numbers.
pub fn hidden_gutter_width(minimum_width: f64) -> f64 {
  minimum_width.max(0.0)
}

#[cfg(test)]
mod tests {
  use ropey::Rope;

  use super::*;

  #[test]
  fn defaults() {
    let config = GutterConfig::default();
    assert_eq!(config.char_width, 10.0);
    assert_eq!(config.left_inset, 4.0);
    assert_eq!(config.right_inset, 4.0);
    assert!(config.show_line_numbers);
  }

  #[test]
  fn config_uses_kebab_case_keys() {
    let config: GutterConfig = toml::from_str("char-width = 8.0\nshow-line-numbers = false").unwrap();
    assert_eq!(config.char_width, 8.0);
    assert!(!config.show_line_numbers);
    assert_eq!(config.left_inset, 4.0);
    assert!(toml::from_str::<GutterConfig>("charwidth = 1.0").is_err());
  }

  #[test]
  fn label_len_from_line_count() {
    let empty = Rope::new();
    assert_eq!(max_label_len(empty.slice(..), None), 1);

    let nine = Rope::from_str(&"x\n".repeat(8));
    assert_eq!(max_label_len(nine.slice(..), None), 1);

    let ten = Rope::from_str(&"x\n".repeat(9));
    assert_eq!(max_label_len(ten.slice(..), None), 2);
  }

  #[test]
  fn form_feeds_do_not_add_lines() {
    let six = Rope::from_str(&"x\u{000C}y\n".repeat(5));
    assert_eq!(max_label_len(six.slice(..), None), 1);
  }

  #[test]
  fn label_len_from_overrides() {
    let text = Rope::from_str("a\nb\nc");
    let overrides = vec!["1".to_string(), "123456789".to_string()];
    assert_eq!(max_label_len(text.slice(..), Some(&overrides)), 9);
    assert_eq!(max_label_len(text.slice(..), Some(&[])), 1);
  }

  #[test]
  fn width_is_floored_at_minimum() {
    let config = GutterConfig::default();
    assert_eq!(gutter_width(1, &config, 32.0), 32.0);
    assert_eq!(gutter_width(3, &config, 32.0), 38.0);
    assert_eq!(hidden_gutter_width(32.0), 32.0);
  }

  quickcheck::quickcheck! {
    fn width_is_monotonic(a: u8, b: u8, minimum: u8) -> bool {
      let config = GutterConfig::default();
      let (short, long) = (a.min(b) as usize, a.max(b) as usize);
      let minimum = minimum as f64;
      gutter_width(short, &config, minimum) <= gutter_width(long, &config, minimum)
        && gutter_width(short, &config, minimum) >= minimum
    }
  }
}
