//! Tree-sitter lexer
//!
//! Implements [`ParsingLanguage`] on top of a tree-sitter grammar and its
//! highlights query. Keeps the last tree so consecutive passes over edited
//! text reparse incrementally.

use std::ops::Range;
use std::sync::Mutex;

use streaming_iterator::StreamingIterator;
use tree_sitter::{InputEdit, Parser, Point, Query, QueryCursor, Tree};

use super::highlights::highlight_id_for_name;
use super::languages::{LanguageId, ParsingLanguage};
use super::token::{ParseError, StyleContext, TextTraits, Token};

const RUST_HIGHLIGHTS: &str = tree_sitter_rust::HIGHLIGHTS_QUERY;
const PYTHON_HIGHLIGHTS: &str = tree_sitter_python::HIGHLIGHTS_QUERY;
const GO_HIGHLIGHTS: &str = tree_sitter_go::HIGHLIGHTS_QUERY;
// Some grammars export HIGHLIGHT_QUERY (singular)
const C_HIGHLIGHTS: &str = tree_sitter_c::HIGHLIGHT_QUERY;
const JAVA_HIGHLIGHTS: &str = tree_sitter_java::HIGHLIGHTS_QUERY;
const BASH_HIGHLIGHTS: &str = tree_sitter_bash::HIGHLIGHT_QUERY;

/// Last successful parse, reused for incremental parsing
struct CachedTree {
    tree: Tree,
    source: String,
}

/// Parser and cache; tree-sitter parsers are !Sync so they live behind a lock
struct LexState {
    parser: Parser,
    cache: Option<CachedTree>,
}

/// A [`ParsingLanguage`] backed by a tree-sitter grammar
pub struct TreeSitterLanguage {
    id: LanguageId,
    query: Query,
    /// Text traits per query capture index
    capture_styles: Vec<Option<(u16, TextTraits)>>,
    state: Mutex<LexState>,
}

/// Convert a byte offset to a tree-sitter Point (row, column in bytes)
fn byte_to_point(text: &str, byte_offset: usize) -> Point {
    let mut row = 0usize;
    let mut col = 0usize;
    let bytes = text.as_bytes();

    for &byte in bytes.iter().take(byte_offset) {
        if byte == b'\n' {
            row += 1;
            col = 0;
        } else {
            col += 1;
        }
    }

    Point { row, column: col }
}

/// Compute an InputEdit by diffing old and new source text.
/// Returns None if the sources are identical.
fn compute_incremental_edit(old_src: &str, new_src: &str) -> Option<InputEdit> {
    if old_src == new_src {
        return None;
    }

    let old_bytes = old_src.as_bytes();
    let new_bytes = new_src.as_bytes();

    // Find common prefix length (in bytes)
    let mut start = 0;
    let max_start = old_bytes.len().min(new_bytes.len());
    while start < max_start && old_bytes[start] == new_bytes[start] {
        start += 1;
    }

    // Find common suffix length (in bytes), not overlapping prefix
    let mut old_end = old_bytes.len();
    let mut new_end = new_bytes.len();
    while old_end > start && new_end > start && old_bytes[old_end - 1] == new_bytes[new_end - 1] {
        old_end -= 1;
        new_end -= 1;
    }

    Some(InputEdit {
        start_byte: start,
        old_end_byte: old_end,
        new_end_byte: new_end,
        start_position: byte_to_point(old_src, start),
        old_end_position: byte_to_point(old_src, old_end),
        new_end_position: byte_to_point(new_src, new_end),
    })
}

/// One capture before nesting is resolved
struct Span {
    range: Range<usize>,
    context: StyleContext,
}

/// Turn captures (in query order) into non-overlapping tokens.
///
/// When several patterns capture the same range the first one wins. Nested
/// captures win over the capture that contains them, which is split around
/// them (an escape inside a string).
fn flatten_captures(mut spans: Vec<Span>) -> Vec<Token> {
    // Stable: equal ranges keep query order
    spans.sort_by(|a, b| {
        a.range
            .start
            .cmp(&b.range.start)
            .then(b.range.end.cmp(&a.range.end))
    });
    spans.dedup_by(|later, first| later.range == first.range);

    let mut pieces: Vec<Vec<Range<usize>>> = vec![Vec::new(); spans.len()];
    // Open spans as (index, end); ends never grow towards the top
    let mut open: Vec<(usize, usize)> = Vec::new();
    let mut pos = 0;

    for (idx, span) in spans.iter().enumerate() {
        while let Some(&(top, end)) = open.last() {
            if end > span.range.start {
                break;
            }
            if pos < end {
                pieces[top].push(pos..end);
            }
            pos = pos.max(end);
            open.pop();
        }
        if let Some(&(top, _)) = open.last() {
            if pos < span.range.start {
                pieces[top].push(pos..span.range.start);
            }
        }
        pos = pos.max(span.range.start);
        let end = open
            .last()
            .map_or(span.range.end, |&(_, outer)| span.range.end.min(outer));
        open.push((idx, end));
    }
    while let Some((top, end)) = open.pop() {
        if pos < end {
            pieces[top].push(pos..end);
        }
        pos = pos.max(end);
    }

    spans
        .into_iter()
        .zip(pieces)
        .filter(|(_, ranges)| !ranges.is_empty())
        .map(|(span, ranges)| Token::spanning(ranges, span.context))
        .collect()
}

/// Extra text traits implied by a capture name
fn traits_for_capture(name: &str) -> TextTraits {
    match name {
        "text.strong" | "markup.bold" => TextTraits::BOLD,
        "text.emphasis" | "markup.italic" => TextTraits::ITALIC,
        "text.uri" | "markup.link.url" => TextTraits::UNDERLINE,
        "text.strikethrough" | "markup.strikethrough" => TextTraits::STRIKETHROUGH,
        _ => TextTraits::empty(),
    }
}

impl TreeSitterLanguage {
    /// Load the grammar and compile the highlights query for a language
    pub fn new(id: LanguageId) -> Result<Self, String> {
        let (ts_lang, highlights_scm): (tree_sitter::Language, &str) = match id {
            LanguageId::Rust => (tree_sitter_rust::LANGUAGE.into(), RUST_HIGHLIGHTS),
            LanguageId::Python => (tree_sitter_python::LANGUAGE.into(), PYTHON_HIGHLIGHTS),
            LanguageId::Go => (tree_sitter_go::LANGUAGE.into(), GO_HIGHLIGHTS),
            LanguageId::C => (tree_sitter_c::LANGUAGE.into(), C_HIGHLIGHTS),
            LanguageId::Java => (tree_sitter_java::LANGUAGE.into(), JAVA_HIGHLIGHTS),
            LanguageId::Bash => (tree_sitter_bash::LANGUAGE.into(), BASH_HIGHLIGHTS),
            LanguageId::PlainText => {
                return Err("plain text has no grammar".to_string());
            }
        };

        let mut parser = Parser::new();
        parser
            .set_language(&ts_lang)
            .map_err(|e| format!("Failed to set language for {:?}: {}", id, e))?;

        let query = Query::new(&ts_lang, highlights_scm)
            .map_err(|e| format!("Failed to compile query for {:?}: {:?}", id, e))?;

        let capture_styles = query
            .capture_names()
            .iter()
            .map(|name| highlight_id_for_name(name).map(|hid| (hid, traits_for_capture(name))))
            .collect();

        Ok(Self {
            id,
            query,
            capture_styles,
            state: Mutex::new(LexState {
                parser,
                cache: None,
            }),
        })
    }

    pub fn id(&self) -> LanguageId {
        self.id
    }

    /// Parse `source`, reusing the cached tree when possible
    fn parse(&self, state: &mut LexState, source: &str) -> Result<Tree, ParseError> {
        if let Some(cached) = state.cache.as_mut() {
            match compute_incremental_edit(&cached.source, source) {
                None => {
                    tracing::trace!("Source unchanged, reusing cached tree");
                    return Ok(cached.tree.clone());
                }
                Some(edit) => {
                    cached.tree.edit(&edit);
                    tracing::trace!(
                        "Incremental parse: edit at byte {}..{} -> {}..{}",
                        edit.start_byte,
                        edit.old_end_byte,
                        edit.start_byte,
                        edit.new_end_byte
                    );

                    if let Some(tree) = state.parser.parse(source, Some(&cached.tree)) {
                        cached.tree = tree.clone();
                        cached.source = source.to_owned();
                        return Ok(tree);
                    }

                    tracing::warn!(
                        "Incremental parse failed for {:?}, falling back to full parse",
                        self.id
                    );
                    state.cache = None;
                }
            }
        }

        let tree = state
            .parser
            .parse(source, None)
            .ok_or_else(|| ParseError::internal(format!("{:?} parser produced no tree", self.id)))?;
        state.cache = Some(CachedTree {
            tree: tree.clone(),
            source: source.to_owned(),
        });
        Ok(tree)
    }
}

impl ParsingLanguage for TreeSitterLanguage {
    fn name(&self) -> &str {
        self.id.display_name()
    }

    fn lex(&self, input: &str, output: &mut dyn FnMut(Token)) -> Result<(), ParseError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| ParseError::internal("parser state poisoned"))?;

        let tree = self.parse(&mut state, input)?;
        drop(state);

        if tree.root_node().has_error() {
            tracing::debug!("{:?} tree contains error nodes", self.id);
        }

        let mut spans = Vec::new();
        let mut cursor = QueryCursor::new();
        let mut captures = cursor.captures(&self.query, tree.root_node(), input.as_bytes());
        while let Some((query_match, capture_idx)) = captures.next() {
            let capture = &query_match.captures[*capture_idx];
            let Some(Some((highlight, traits))) = self.capture_styles.get(capture.index as usize)
            else {
                continue; // Skip unknown captures
            };

            let range = capture.node.byte_range();
            if range.is_empty() {
                continue;
            }

            let mut context = StyleContext::new(*highlight);
            if *traits != TextTraits::empty() {
                context = context.with_traits(*traits);
            }
            spans.push(Span { range, context });
        }

        for token in flatten_captures(spans) {
            output(token);
        }
        Ok(())
    }
}
