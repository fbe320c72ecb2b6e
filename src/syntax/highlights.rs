//! Style-context indices shared by lexers and themes
//!
//! A lexer tags each token with a [`HighlightId`]; themes resolve the same
//! ids to colors. The id is the position of the capture name in
//! [`HIGHLIGHT_NAMES`].

/// Standard tree-sitter capture names mapped to theme colors.
/// Index into this array is the HighlightId.
pub const HIGHLIGHT_NAMES: &[&str] = &[
    "attribute",             // @attribute
    "boolean",               // @boolean (true, false)
    "comment",               // @comment
    "constant",              // @constant
    "constant.builtin",      // @constant.builtin (null, nil)
    "constructor",           // @constructor (new Foo)
    "escape",                // @escape (string escapes)
    "function",              // @function
    "function.builtin",      // @function.builtin (echo, print)
    "function.macro",        // @function.macro (println!)
    "function.method",       // @function.method
    "keyword",               // @keyword
    "keyword.return",        // @keyword.return
    "keyword.function",      // @keyword.function (function, fn)
    "keyword.operator",      // @keyword.operator (and, or)
    "label",                 // @label (lifetimes, goto labels)
    "number",                // @number
    "operator",              // @operator
    "property",              // @property
    "punctuation",           // @punctuation (general)
    "punctuation.bracket",   // @punctuation.bracket
    "punctuation.delimiter", // @punctuation.delimiter
    "punctuation.special",   // @punctuation.special
    "string",                // @string
    "string.special",        // @string.special (regex, heredoc)
    "tag",                   // @tag
    "text",                  // @text (plain prose)
    "text.emphasis",         // @text.emphasis (*italic*)
    "text.strong",           // @text.strong (**bold**)
    "text.strikethrough",    // @text.strikethrough (~~struck~~)
    "text.title",            // @text.title (headings)
    "text.uri",              // @text.uri (URLs)
    "type",                  // @type
    "type.builtin",          // @type.builtin (int, string, bool)
    "variable",              // @variable
    "variable.builtin",      // @variable.builtin (self, this)
    "variable.parameter",    // @variable.parameter
];

/// Index into HIGHLIGHT_NAMES
pub type HighlightId = u16;

/// Look up highlight ID by capture name
pub fn highlight_id_for_name(name: &str) -> Option<HighlightId> {
    // Handle hierarchical names: try exact match first, then progressively shorter
    // parents (e.g. "keyword.control.import" -> "keyword.control" -> "keyword").
    let mut current = name;
    loop {
        if let Some(pos) = HIGHLIGHT_NAMES.iter().position(|&n| n == current) {
            return Some(pos as HighlightId);
        }

        let Some(dot_pos) = current.rfind('.') else {
            break;
        };
        current = &current[..dot_pos];
    }

    None
}

/// Capture name for a highlight ID
pub fn highlight_name(id: HighlightId) -> Option<&'static str> {
    HIGHLIGHT_NAMES.get(id as usize).copied()
}

/// Closest registered parent of a highlight ID ("keyword.return" -> "keyword")
pub fn parent_highlight(id: HighlightId) -> Option<HighlightId> {
    let name = highlight_name(id)?;
    let dot_pos = name.rfind('.')?;
    highlight_id_for_name(&name[..dot_pos])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_id_lookup() {
        assert!(highlight_id_for_name("keyword").is_some());
        assert!(highlight_id_for_name("keyword.function").is_some());
        assert!(highlight_id_for_name("keyword.control.import").is_some());
        assert!(highlight_id_for_name("string").is_some());
        assert!(highlight_id_for_name("nonexistent").is_none());
    }

    #[test]
    fn test_hierarchical_lookup_falls_back_to_parent() {
        assert_eq!(
            highlight_id_for_name("keyword.control.import"),
            highlight_id_for_name("keyword")
        );
        assert_eq!(
            highlight_id_for_name("string.special.regex"),
            highlight_id_for_name("string.special")
        );
    }

    #[test]
    fn test_parent_highlight() {
        let ret = highlight_id_for_name("keyword.return").unwrap();
        assert_eq!(parent_highlight(ret), highlight_id_for_name("keyword"));

        let keyword = highlight_id_for_name("keyword").unwrap();
        assert_eq!(parent_highlight(keyword), None);
    }

    #[test]
    fn test_names_are_unique() {
        for (i, name) in HIGHLIGHT_NAMES.iter().enumerate() {
            assert_eq!(
                HIGHLIGHT_NAMES.iter().position(|n| n == name),
                Some(i),
                "duplicate capture name {}",
                name
            );
        }
    }
}
