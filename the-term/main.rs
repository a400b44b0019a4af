//! Terminal viewer for the-lib.
//!
//! Prints a file (usually `git diff` output) with a line number gutter and
//! diff highlighting, exercising the same pipeline a GUI host would:
//! - lexing and theme attribute runs
//! - paragraph layout, gutter width and line number placement

mod render;
mod theme;

use std::{
  io::{
    self,
    Read,
  },
  path::PathBuf,
  sync::Arc,
};

use clap::Parser;
use eyre::{
  Result,
  WrapErr,
};
use ropey::Rope;
use the_lib::{
  config::EditorConfig,
  editor::EditorCore,
  lexer::{
    GitDiffLexer,
    Lexer,
    PlainLexer,
  },
  render::{
    CoordinateOrigin,
    GitDiffOutputTheme,
    MonospaceLayout,
    Size,
    SourceCodeTheme,
  },
};

#[derive(Debug, Parser)]
#[command(name = "the-sourceful")]
#[command(about = "Print a file with a line number gutter and diff highlighting")]
struct Cli {
  /// Editor config (TOML) with optional `[theme]` table
  #[arg(long)]
  config: Option<PathBuf>,

  /// Comma separated gutter labels used instead of line numbers
  #[arg(long, value_delimiter = ',')]
  line_numbers: Option<Vec<String>>,

  /// Output width in columns, defaults to the terminal width
  #[arg(long)]
  width: Option<u16>,

  /// Soft wrap lines at the output width
  #[arg(long)]
  wrap: bool,

  /// Do not highlight diff lines
  #[arg(long)]
  plain: bool,

  /// Fail on invalid theme entries instead of skipping them
  #[arg(long)]
  strict: bool,

  /// File to print, `-` for stdin
  file: String,
}

fn read_input(file: &str) -> Result<String> {
  if file == "-" {
    let mut text = String::new();
    io::stdin()
      .read_to_string(&mut text)
      .wrap_err("failed to read stdin")?;
    return Ok(text);
  }
  std::fs::read_to_string(file).wrap_err_with(|| format!("failed to read {file}"))
}

fn main() -> Result<()> {
  env_logger::init();
  let cli = Cli::parse();

  let mut config = match cli.config.as_deref() {
    Some(path) => EditorConfig::load(path)?,
    None => EditorConfig::default(),
  };
  // terminal rows grow downwards
  config.paragraphs.origin = CoordinateOrigin::TopLeft;

  let configured = if cli.strict {
    config.strict_theme()?
  } else {
    config.theme()
  };
  let theme: Arc<dyn SourceCodeTheme> = match configured {
    Some(theme) => Arc::new(theme),
    None => Arc::new(GitDiffOutputTheme::default()),
  };
  let lexer: Box<dyn Lexer> = if cli.plain {
    Box::new(PlainLexer)
  } else {
    Box::new(GitDiffLexer)
  };

  let text = read_input(&cli.file)?;
  let mut core = EditorCore::new(text, lexer, theme).with_config(&config);
  core.set_line_numbers(cli.line_numbers);

  let columns = cli
    .width
    .or_else(|| crossterm::terminal::size().ok().map(|(width, _)| width))
    .map(usize::from)
    .unwrap_or(80);
  core.resize(Size::new(columns as f64 * render::CELL_WIDTH, 0.0));

  let mut layout =
    MonospaceLayout::new(&Rope::new(), render::cell_metrics(4)).with_soft_wrap(cli.wrap);
  let mut stdout = io::stdout().lock();
  render::print_document(&mut core, &mut layout, columns, &mut stdout)?;

  for event in core.drain_events() {
    log::debug!("editor event {}: {:?}", event.seq, event.kind);
  }
  Ok(())
}
