//! Benchmarks for line ending operations in the-core.
//!
//! Run with: `cargo bench -p the-core --bench line_ending`

use divan::{
  Bencher,
  black_box,
};
use the_core::line_ending::{
  LineEnding,
  line_count,
  line_spans,
};

fn main() {
  divan::main();
}

fn sample_diff(lines: usize) -> String {
  let mut text = String::new();
  for i in 0..lines {
    let prefix = match i % 4 {
      0 => "@@ -1,3 +1,3 @@",
      1 => "-removed line",
      2 => "+added line",
      _ => " unchanged line",
    };
    text.push_str(prefix);
    text.push('\n');
  }
  text
}

// ─────────────────────────────────────────────────────────────────────────────
// LineEnding::from_char benchmarks
// ─────────────────────────────────────────────────────────────────────────────

mod from_char {
  use super::*;

  #[divan::bench]
  fn lf(bencher: Bencher) {
    bencher.bench(|| {
      assert_eq!(LineEnding::from_char(black_box('\n')), Some(LineEnding::LF));
    });
  }

  #[divan::bench]
  fn not_line_ending(bencher: Bencher) {
    bencher.bench(|| {
      assert!(LineEnding::from_char(black_box('a')).is_none());
    });
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// line_spans benchmarks
// ─────────────────────────────────────────────────────────────────────────────

mod spans {
  use super::*;

  #[divan::bench(args = [100, 10_000])]
  fn diff_lines(bencher: Bencher, lines: usize) {
    let text = sample_diff(lines);
    bencher.bench(|| line_spans(black_box(&text)).count());
  }

  #[divan::bench(args = [100, 10_000])]
  fn count(bencher: Bencher, lines: usize) {
    let text = sample_diff(lines);
    bencher.bench(|| line_count(black_box(&text)));
  }
}
