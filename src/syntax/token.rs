//! Lexer output types
//!
//! Defines tokens, style contexts, and the lexer error type.

use std::fmt;
use std::ops::Range;

use super::highlights::HighlightId;
use crate::font::{Decoration, FontTraits};
use crate::theme::Color;

bitflags::bitflags! {
    /// Text traits a lexer may request for a token
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TextTraits: u8 {
        const UNDERLINE     = 0b0000_0001;
        const STRIKETHROUGH = 0b0000_0010;
        const BOLD          = 0b0000_0100;
        const ITALIC        = 0b0000_1000;
    }
}

impl TextTraits {
    /// Line decoration for these traits. Strikethrough wins over underline.
    pub fn decoration(self) -> Option<Decoration> {
        if self.contains(Self::STRIKETHROUGH) {
            Some(Decoration::Strikethrough)
        } else if self.contains(Self::UNDERLINE) {
            Some(Decoration::Underline)
        } else {
            None
        }
    }

    /// The bold/italic part as font traits
    pub fn symbolic(self) -> FontTraits {
        let mut traits = FontTraits::empty();
        traits.set(FontTraits::BOLD, self.contains(Self::BOLD));
        traits.set(FontTraits::ITALIC, self.contains(Self::ITALIC));
        traits
    }
}

/// How a token should be styled: theme lookups plus optional overrides
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StyleContext {
    /// Index into the theme's foreground table
    pub index: HighlightId,
    /// Index into the theme's background table
    pub background_index: Option<HighlightId>,
    /// Explicit foreground, overrides the theme
    pub color: Option<Color>,
    /// Explicit background, overrides the theme
    pub background: Option<Color>,
    pub traits: Option<TextTraits>,
}

impl StyleContext {
    pub fn new(index: HighlightId) -> Self {
        Self {
            index,
            ..Self::default()
        }
    }

    pub fn with_background_index(mut self, index: HighlightId) -> Self {
        self.background_index = Some(index);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn with_traits(mut self, traits: TextTraits) -> Self {
        self.traits = Some(traits);
        self
    }
}

/// A lexer-emitted token: one or more byte ranges sharing a style
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Byte ranges into the exact input passed to `lex`
    pub ranges: Vec<Range<usize>>,
    pub context: Option<StyleContext>,
}

impl Token {
    pub fn new(range: Range<usize>, context: StyleContext) -> Self {
        Self {
            ranges: vec![range],
            context: Some(context),
        }
    }

    /// Token covering several disjoint ranges with one style
    pub fn spanning(ranges: Vec<Range<usize>>, context: StyleContext) -> Self {
        Self {
            ranges,
            context: Some(context),
        }
    }

    /// Token without styling (kept by lexers for structure only)
    pub fn unstyled(range: Range<usize>) -> Self {
        Self {
            ranges: vec![range],
            context: None,
        }
    }
}

/// All tokens produced by one lexer invocation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseResult {
    pub tokens: Vec<Token>,
}

impl ParseResult {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Lexer failure. Always recoverable: the caller falls back to base styling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The input could not be tokenized
    Malformed {
        message: String,
        offset: Option<usize>,
    },
    /// The lexer itself failed
    Internal { message: String },
}

impl ParseError {
    pub fn malformed(message: impl Into<String>, offset: Option<usize>) -> Self {
        ParseError::Malformed {
            message: message.into(),
            offset,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ParseError::Internal {
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Malformed {
                message,
                offset: Some(offset),
            } => write!(f, "malformed input at byte {}: {}", offset, message),
            ParseError::Malformed {
                message,
                offset: None,
            } => write!(f, "malformed input: {}", message),
            ParseError::Internal { message } => write!(f, "lexer failure: {}", message),
        }
    }
}

impl std::error::Error for ParseError {}
