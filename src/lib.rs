//! source-view - toolkit-neutral syntax highlighting pipeline
//!
//! Turns source text into styled text for host views (editable text views,
//! read-only labels, terminals). A pluggable lexer emits tokens, a theme maps
//! them to colors and font traits, and an Elm-style pipeline runs passes off
//! the UI thread while keeping results ordered and fresh.

pub mod ansi;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod font;
pub mod highlighter;
pub mod messages;
pub mod model;
pub mod runtime;
pub mod styled;
pub mod surface;
pub mod syntax;
pub mod theme;
pub mod tracing;
pub mod update;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::SourceConfig;
pub use font::{Font, FontConfiguration, FontTraits};
pub use highlighter::{highlight, HighlightOutcome, PassStats};
pub use messages::Msg;
pub use model::{HighlightModel, ViewId};
pub use runtime::{HighlightRuntime, LabelOptions, ViewOptions};
pub use styled::{StyledText, TextStyle};
pub use surface::{MemorySurface, TextSurface};
pub use syntax::{Language, LanguageId, ParseError, ParsingLanguage, StyleContext, TextTraits, Token};
pub use theme::{Appearance, Color, Theme, ThemeSet};
