//! Language identification and the lexer capability
//!
//! Maps file extensions to language IDs and wraps the lexer behind
//! [`Language`], which is either plain text or a parsing-capable language.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use super::parser::TreeSitterLanguage;
use super::token::{ParseError, Token};

/// Supported language identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LanguageId {
    #[default]
    PlainText,
    Rust,
    Python,
    Go,
    C,
    Java,
    Bash,
}

impl LanguageId {
    /// Detect language from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "rs" => LanguageId::Rust,
            "py" | "pyi" | "pyw" => LanguageId::Python,
            "go" => LanguageId::Go,
            "c" | "h" => LanguageId::C,
            "java" => LanguageId::Java,
            "sh" | "bash" | "zsh" => LanguageId::Bash,
            _ => LanguageId::PlainText,
        }
    }

    /// Detect language from file path
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(LanguageId::PlainText)
    }

    /// Look up a language by its display or short name ("rust", "Python")
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        [
            LanguageId::PlainText,
            LanguageId::Rust,
            LanguageId::Python,
            LanguageId::Go,
            LanguageId::C,
            LanguageId::Java,
            LanguageId::Bash,
        ]
        .into_iter()
        .find(|id| id.display_name().to_lowercase() == lower || id.short_name() == lower)
    }

    /// Get display name for the language
    pub fn display_name(&self) -> &'static str {
        match self {
            LanguageId::PlainText => "Plain Text",
            LanguageId::Rust => "Rust",
            LanguageId::Python => "Python",
            LanguageId::Go => "Go",
            LanguageId::C => "C",
            LanguageId::Java => "Java",
            LanguageId::Bash => "Bash",
        }
    }

    fn short_name(&self) -> &'static str {
        match self {
            LanguageId::PlainText => "text",
            LanguageId::Rust => "rust",
            LanguageId::Python => "python",
            LanguageId::Go => "go",
            LanguageId::C => "c",
            LanguageId::Java => "java",
            LanguageId::Bash => "bash",
        }
    }

    /// Check if this language has syntax highlighting support
    pub fn has_highlighting(&self) -> bool {
        !matches!(self, LanguageId::PlainText)
    }
}

/// A lexer that turns text into styled tokens.
///
/// Tokens are streamed through `output` as they are produced. On `Err` the
/// caller discards everything already emitted for this call.
pub trait ParsingLanguage: Send + Sync {
    /// Grammar name, used in logs
    fn name(&self) -> &str;

    fn lex(&self, input: &str, output: &mut dyn FnMut(Token)) -> Result<(), ParseError>;
}

/// The language of a text surface
#[derive(Clone)]
pub enum Language {
    /// No tokenization, base styling only
    Plain { name: Arc<str> },
    Parsing(Arc<dyn ParsingLanguage>),
}

impl Default for Language {
    fn default() -> Self {
        Self::plain()
    }
}

impl fmt::Debug for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Plain { name } => f.debug_struct("Plain").field("name", name).finish(),
            Language::Parsing(lexer) => f.debug_tuple("Parsing").field(&lexer.name()).finish(),
        }
    }
}

impl Language {
    pub fn plain() -> Self {
        Language::Plain {
            name: Arc::from(LanguageId::PlainText.display_name()),
        }
    }

    pub fn parsing(lexer: impl ParsingLanguage + 'static) -> Self {
        Language::Parsing(Arc::new(lexer))
    }

    /// Build the built-in lexer for a language id.
    ///
    /// Falls back to plain text if the grammar cannot be loaded.
    pub fn for_id(id: LanguageId) -> Self {
        if !id.has_highlighting() {
            return Self::plain();
        }
        match TreeSitterLanguage::new(id) {
            Ok(lexer) => Language::Parsing(Arc::new(lexer)),
            Err(e) => {
                tracing::warn!("Falling back to plain text for {:?}: {}", id, e);
                Language::Plain {
                    name: Arc::from(id.display_name()),
                }
            }
        }
    }

    /// Detect and build the language for a file path
    pub fn from_path(path: &Path) -> Self {
        Self::for_id(LanguageId::from_path(path))
    }

    pub fn name(&self) -> &str {
        match self {
            Language::Plain { name } => name,
            Language::Parsing(lexer) => lexer.name(),
        }
    }

    /// The lexer, if this language supports parsing
    pub fn parser(&self) -> Option<&dyn ParsingLanguage> {
        match self {
            Language::Plain { .. } => None,
            Language::Parsing(lexer) => Some(lexer.as_ref()),
        }
    }

    pub fn supports_parsing(&self) -> bool {
        matches!(self, Language::Parsing(_))
    }

    /// Same language instance (plain languages compare by name)
    pub fn same_as(&self, other: &Language) -> bool {
        match (self, other) {
            (Language::Plain { name: a }, Language::Plain { name: b }) => a == b,
            (Language::Parsing(a), Language::Parsing(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}
