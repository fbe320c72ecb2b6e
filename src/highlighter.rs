//! The highlight pass
//!
//! [`highlight`] turns text into [`StyledText`] using a language's lexer, a
//! theme, and a font configuration. It is synchronous and pure apart from
//! the lexer; the pipeline runs it on a worker thread and handles ordering.

use crate::font::{FontConfiguration, FontTraits};
use crate::styled::{StyledText, StyledTextBuilder, TextStyle};
use crate::syntax::{Language, ParseError, ParseResult, StyleContext};
use crate::theme::Theme;

/// Counters for one pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Tokens with a style context that were applied
    pub tokens: usize,
    /// Token ranges that had to be clamped, or were dropped as reversed or
    /// out of bounds
    pub clamped: usize,
}

/// Result of one highlight pass.
///
/// `styled` is always usable: on lexer failure it holds the base styling.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightOutcome {
    pub styled: StyledText,
    pub result: Result<PassStats, ParseError>,
}

impl HighlightOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    pub fn error(&self) -> Option<&ParseError> {
        self.result.as_ref().err()
    }
}

/// Style applied to every character before tokens: default foreground and
/// the base font with the theme's default traits (when the family has them)
pub fn base_style(theme: &Theme, font: &FontConfiguration) -> TextStyle {
    let font = font
        .with_traits(theme.font_traits)
        .unwrap_or_else(|| font.font());
    TextStyle::new(theme.foreground, font)
}

/// Resolve a style context against the theme and font configuration
fn resolve_style(
    context: &StyleContext,
    base: &TextStyle,
    theme: &Theme,
    font: &FontConfiguration,
) -> TextStyle {
    let foreground = context
        .color
        .or_else(|| theme.foreground_for(context.index))
        .unwrap_or(theme.foreground);

    let background = context
        .background
        .or_else(|| context.background_index.and_then(|i| theme.background_for(i)));

    let (decoration, symbolic) = match context.traits {
        Some(traits) => (traits.decoration(), traits.symbolic()),
        None => (None, FontTraits::empty()),
    };

    let merged = base.font.traits | symbolic;
    let font = if merged == base.font.traits {
        base.font.clone()
    } else {
        font.with_traits(merged).unwrap_or_else(|| {
            tracing::trace!("Font face {:?} unavailable, using base font", merged);
            base.font.clone()
        })
    };

    TextStyle {
        foreground,
        background,
        font,
        decoration,
    }
}

/// Collect the lexer's tokens; partial output is dropped on failure
fn lex(language: &Language, text: &str) -> Option<Result<ParseResult, ParseError>> {
    let lexer = language.parser()?;
    let mut result = ParseResult::default();
    let outcome = lexer.lex(text, &mut |token| result.tokens.push(token));
    Some(outcome.map(|()| result))
}

/// Run one highlight pass
pub fn highlight(
    text: &str,
    language: &Language,
    theme: &Theme,
    font: &FontConfiguration,
) -> HighlightOutcome {
    let base = base_style(theme, font);

    if text.is_empty() {
        return HighlightOutcome {
            styled: StyledText::empty(),
            result: Ok(PassStats::default()),
        };
    }

    let parsed = match lex(language, text) {
        None => {
            return HighlightOutcome {
                styled: StyledText::uniform(text, base),
                result: Ok(PassStats::default()),
            };
        }
        Some(Err(e)) => {
            tracing::debug!("{} lexer failed: {}", language.name(), e);
            return HighlightOutcome {
                styled: StyledText::uniform(text, base),
                result: Err(e),
            };
        }
        Some(Ok(parsed)) => parsed,
    };

    let mut builder = StyledTextBuilder::new(text, base.clone());
    let mut stats = PassStats::default();

    for token in &parsed.tokens {
        let Some(context) = &token.context else {
            continue;
        };
        let reversed = token.ranges.iter().filter(|r| r.start > r.end).count();
        if reversed > 0 {
            tracing::trace!("Dropping {} reversed token ranges", reversed);
            stats.clamped += reversed;
        }
        if token.ranges.iter().all(|r| r.is_empty()) {
            continue;
        }

        let style = resolve_style(context, &base, theme, font);
        let slot = builder.intern(style);
        stats.tokens += 1;

        for range in &token.ranges {
            if range.is_empty() {
                continue;
            }
            match builder.char_range(range) {
                Some((chars, adjusted)) => {
                    if adjusted {
                        stats.clamped += 1;
                    }
                    builder.apply(chars, slot);
                }
                None => {
                    tracing::trace!(
                        "Dropping token range {:?} outside text of {} bytes",
                        range,
                        text.len()
                    );
                    stats.clamped += 1;
                }
            }
        }
    }

    if stats.clamped > 0 {
        tracing::debug!(
            "{} lexer produced {} out-of-bounds ranges",
            language.name(),
            stats.clamped
        );
    }

    HighlightOutcome {
        styled: builder.build(),
        result: Ok(stats),
    }
}
