//! Syntax module
//!
//! The lexer side of the pipeline:
//! - Language detection from file extensions
//! - The [`ParsingLanguage`] lexer trait and [`Language`] capability
//! - Token and style-context types shared with themes
//! - A tree-sitter backed lexer
//!
//! ## Supported Grammars
//!
//! - Rust, Python, Go, C, Java, Bash

mod highlights;
mod languages;
mod parser;
mod token;

pub use highlights::{
    highlight_id_for_name, highlight_name, parent_highlight, HighlightId, HIGHLIGHT_NAMES,
};
pub use languages::{Language, LanguageId, ParsingLanguage};
pub use parser::TreeSitterLanguage;
pub use token::{ParseError, ParseResult, StyleContext, TextTraits, Token};
