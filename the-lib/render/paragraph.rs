use super::graphics::Rect;

/// One paragraph (logical line) of the text and where it sits in the view.
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
  pub rect:   Rect,
  /// 1-based paragraph index.
  pub number: usize,
  pub label:  String,
}

impl Paragraph {
  pub fn new(rect: Rect, number: usize, line_numbers: Option<&[String]>) -> Self {
    Self {
      rect,
      number,
      label: paragraph_label(number, line_numbers),
    }
  }

  pub fn label(&self) -> &str {
    &self.label
  }
}

/// Label shown in the gutter for paragraph `number`.
///
/// Without overrides (or with an empty list) this is the paragraph number.
/// Otherwise it is the override at `number - 1`, or an empty string once the
/// overrides run out.
pub fn paragraph_label(number: usize, line_numbers: Option<&[String]>) -> String {
  match line_numbers {
    Some(overrides) if !overrides.is_empty() => number
      .checked_sub(1)
      .and_then(|idx| overrides.get(idx))
      .cloned()
      .unwrap_or_default(),
    _ => number.to_string(),
  }
}
