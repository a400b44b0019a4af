//! Tokenization and paragraph layout for an embeddable source code editor.
//!
//! Text flows through two independent pipelines:
//!
//! - [`lexer`] turns it into [`token::Token`]s, which a
//!   [`render::theme::SourceCodeTheme`] maps to display attributes.
//! - A [`render::text_layout::TextLayout`] measures it into
//!   [`render::paragraph::Paragraph`]s, which drive the gutter.
//!
//! [`editor::EditorCore`] ties both together with caching and change events.

pub mod config;
pub mod editor;
pub mod events;
pub mod lexer;
pub mod render;
pub mod token;
