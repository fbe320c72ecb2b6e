//! Highlight pass tests: text preservation, run coverage, token styling,
//! clamping and failure behavior

mod common;

use common::*;
use source_view::highlighter::{highlight, PassStats};
use source_view::syntax::{highlight_id_for_name, LanguageId, ParseError, ParsingLanguage};
use source_view::theme::{Color, Theme};
use source_view::{Language, StyleContext, StyledText, TextTraits, Token};

const RUST_SAMPLE: &str = r#"use std::collections::HashMap;

/// A counter
pub struct Counter {
    counts: HashMap<String, usize>,
}

impl Counter {
    pub fn add(&mut self, word: &str) -> usize {
        let n = self.counts.entry(word.to_string()).or_insert(0);
        *n += 1;
        *n
    }
}
"#;

/// Runs must tile the whole text without gaps or overlaps
fn assert_runs_cover(styled: &StyledText) {
    let mut expected = 0;
    for run in styled.runs() {
        assert_eq!(run.range.start, expected, "gap or overlap at {}", expected);
        assert!(run.range.end > run.range.start, "empty run");
        expected = run.range.end;
    }
    assert_eq!(expected, styled.len_chars());
}

fn keyword() -> u16 {
    highlight_id_for_name("keyword").unwrap()
}

#[test]
fn test_rust_sample_keeps_text_and_covers_it() {
    let language = Language::for_id(LanguageId::Rust);
    let outcome = highlight(RUST_SAMPLE, &language, &Theme::default_dark(), &test_font());

    assert!(outcome.is_ok());
    assert_eq!(outcome.styled.text(), RUST_SAMPLE);
    assert_runs_cover(&outcome.styled);
    assert!(outcome.styled.runs().len() > 10);
}

#[test]
fn test_rust_keywords_use_theme_color() {
    let language = Language::for_id(LanguageId::Rust);
    let theme = Theme::default_dark();
    let keyword_color = theme.foreground_for(keyword()).unwrap();

    let outcome = highlight("pub fn x() {}", &language, &theme, &test_font());
    let styled = &outcome.styled;
    assert_eq!(styled.style_at(0).unwrap().foreground, keyword_color);
    assert_eq!(styled.style_at(4).unwrap().foreground, keyword_color);
}

#[test]
fn test_same_input_same_output() {
    let language = Language::for_id(LanguageId::Python);
    let theme = Theme::default_light();
    let text = "def f(x):\n    return x * 2  # double\n";

    let first = highlight(text, &language, &theme, &test_font());
    let second = highlight(text, &language, &theme, &test_font());
    assert_eq!(first, second);
}

#[test]
fn test_multibyte_text_is_covered() {
    let language = Language::for_id(LanguageId::Rust);
    let text = "let s = \"héllo wörld 🚀\"; // ünïcode\n";
    let outcome = highlight(text, &language, &Theme::default_dark(), &test_font());

    assert_eq!(outcome.styled.text(), text);
    assert_eq!(outcome.styled.len_chars(), text.chars().count());
    assert_runs_cover(&outcome.styled);
}

#[test]
fn test_empty_text() {
    let recorder = Recorder::new();
    let outcome = highlight("", &recorder.language(), &test_theme(), &test_font());
    assert!(outcome.styled.is_empty());
    assert!(outcome.styled.runs().is_empty());
    assert_eq!(outcome.result, Ok(PassStats::default()));
    assert_eq!(recorder.calls(), 0);

    let outcome = highlight("", &Language::for_id(LanguageId::Rust), &test_theme(), &test_font());
    assert!(outcome.styled.is_empty());
}

#[test]
fn test_plain_language_gets_base_style() {
    let outcome = highlight("a\nb", &Language::plain(), &test_theme(), &test_font());
    assert_eq!(outcome.styled.runs().len(), 1);
    let style = &outcome.styled.runs()[0].style;
    assert_eq!(style.foreground, FOREGROUND);
    assert_eq!(style.font, test_font().font());
    assert_eq!(style.decoration, None);
}

#[test]
fn test_invalid_syntax_still_highlights() {
    let language = Language::for_id(LanguageId::Rust);
    let outcome = highlight("fn (((", &language, &Theme::default_dark(), &test_font());
    assert!(outcome.is_ok());
    assert_runs_cover(&outcome.styled);
}

#[test]
fn test_later_tokens_win_overlaps() {
    let red = Color::rgb(255, 0, 0);
    let green = Color::rgb(0, 255, 0);
    let language = fixed(vec![
        Token::new(0..6, StyleContext::new(keyword()).with_color(red)),
        Token::new(2..4, StyleContext::new(keyword()).with_color(green)),
    ]);
    let outcome = highlight("abcdef", &language, &test_theme(), &test_font());
    let styled = &outcome.styled;

    assert_eq!(styled.style_at(1).unwrap().foreground, red);
    assert_eq!(styled.style_at(2).unwrap().foreground, green);
    assert_eq!(styled.style_at(4).unwrap().foreground, red);
    assert_eq!(styled.runs().len(), 3);
}

#[test]
fn test_token_with_several_ranges() {
    let language = fixed(vec![Token::spanning(
        vec![0..1, 4..5],
        StyleContext::new(keyword()),
    )]);
    let outcome = highlight("abcdef", &language, &test_theme(), &test_font());
    let styled = &outcome.styled;

    assert_eq!(styled.style_at(0).unwrap().foreground, KEYWORD);
    assert_eq!(styled.style_at(2).unwrap().foreground, FOREGROUND);
    assert_eq!(styled.style_at(4).unwrap().foreground, KEYWORD);
    assert_eq!(outcome.result.unwrap().tokens, 1);
}

#[test]
fn test_range_inside_multibyte_char_is_widened() {
    // 'é' occupies bytes 1..3
    let language = fixed(vec![Token::new(2..3, StyleContext::new(keyword()))]);
    let outcome = highlight("xéy", &language, &test_theme(), &test_font());
    let styled = &outcome.styled;

    assert_eq!(styled.style_at(0).unwrap().foreground, FOREGROUND);
    assert_eq!(styled.style_at(1).unwrap().foreground, KEYWORD);
    assert_eq!(styled.style_at(2).unwrap().foreground, FOREGROUND);
    assert_eq!(outcome.result.unwrap().clamped, 1);
}

#[test]
fn test_traits_become_font_and_decoration() {
    let language = fixed(vec![
        Token::new(0..1, StyleContext::new(keyword()).with_traits(TextTraits::BOLD)),
        Token::new(
            1..2,
            StyleContext::new(keyword()).with_traits(TextTraits::ITALIC | TextTraits::UNDERLINE),
        ),
    ]);
    let outcome = highlight("ab", &language, &test_theme(), &test_font());
    let styled = &outcome.styled;

    let bold = styled.style_at(0).unwrap();
    assert!(bold.font.traits.is_bold());
    assert_eq!(bold.decoration, None);

    let italic = styled.style_at(1).unwrap();
    assert!(italic.font.traits.is_italic());
    assert_eq!(
        italic.decoration,
        Some(source_view::font::Decoration::Underline)
    );
}

struct Broken;

impl ParsingLanguage for Broken {
    fn name(&self) -> &str {
        "broken"
    }

    fn lex(&self, _input: &str, output: &mut dyn FnMut(Token)) -> Result<(), ParseError> {
        output(Token::new(
            0..1,
            StyleContext::new(highlight_id_for_name("keyword").unwrap()),
        ));
        Err(ParseError::internal("lexer state corrupted"))
    }
}

#[test]
fn test_failure_returns_base_styling_and_error() {
    let outcome = highlight(
        "abc",
        &Language::parsing(Broken),
        &test_theme(),
        &test_font(),
    );
    assert_eq!(
        outcome.error(),
        Some(&ParseError::internal("lexer state corrupted"))
    );
    assert_eq!(outcome.styled.text(), "abc");
    assert_eq!(outcome.styled.runs().len(), 1);
    assert_eq!(outcome.styled.runs()[0].style.foreground, FOREGROUND);
}
