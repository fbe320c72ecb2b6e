//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use source_view::syntax::highlight_id_for_name;
use source_view::theme::{Appearance, Color, Theme, ThemeSet};
use source_view::{FontConfiguration, Language, ParseError, ParsingLanguage, StyleContext, Token};

pub const FOREGROUND: Color = Color::rgb(200, 200, 200);
pub const KEYWORD: Color = Color::rgb(0, 0, 255);
pub const LIGHT_FOREGROUND: Color = Color::rgb(20, 20, 20);

/// Generous upper bound for the worker in tests
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(5);

/// Dark theme with only `keyword` colored
pub fn test_theme() -> Theme {
    Theme::plain("test dark", Appearance::Dark, FOREGROUND, Color::rgb(0, 0, 0))
        .with_syntax_color("keyword", KEYWORD)
}

pub fn test_light_theme() -> Theme {
    Theme::plain(
        "test light",
        Appearance::Light,
        LIGHT_FOREGROUND,
        Color::rgb(255, 255, 255),
    )
    .with_syntax_color("keyword", Color::rgb(128, 0, 0))
}

pub fn test_theme_set() -> ThemeSet {
    ThemeSet::new(test_light_theme(), test_theme())
}

pub fn test_font() -> FontConfiguration {
    FontConfiguration::new("Test Mono", 10.0)
}

/// Lexer that always emits the same tokens
pub struct Fixed(pub Vec<Token>);

impl ParsingLanguage for Fixed {
    fn name(&self) -> &str {
        "fixed"
    }

    fn lex(&self, _input: &str, output: &mut dyn FnMut(Token)) -> Result<(), ParseError> {
        for token in &self.0 {
            output(token.clone());
        }
        Ok(())
    }
}

pub fn fixed(tokens: Vec<Token>) -> Language {
    Language::parsing(Fixed(tokens))
}

pub struct RecorderState {
    lexed: Mutex<Vec<String>>,
    gate: Mutex<Option<Receiver<()>>>,
    failing: AtomicBool,
}

/// Lexer that marks every `fn` as a keyword and records what it was asked
/// to lex. A gated recorder waits for one permit per call.
#[derive(Clone)]
pub struct Recorder(Arc<RecorderState>);

impl Recorder {
    pub fn new() -> Self {
        Self(Arc::new(RecorderState {
            lexed: Mutex::new(Vec::new()),
            gate: Mutex::new(None),
            failing: AtomicBool::new(false),
        }))
    }

    /// Recorder plus the sender that releases one lex call per message
    pub fn gated() -> (Self, Sender<()>) {
        let (tx, rx) = mpsc::channel();
        let recorder = Self::new();
        *recorder.0.gate.lock().unwrap() = Some(rx);
        (recorder, tx)
    }

    pub fn failing() -> Self {
        let recorder = Self::new();
        recorder.0.failing.store(true, Ordering::SeqCst);
        recorder
    }

    pub fn language(&self) -> Language {
        Language::parsing(self.clone())
    }

    pub fn calls(&self) -> usize {
        self.0.lexed.lock().unwrap().len()
    }

    pub fn lexed(&self) -> Vec<String> {
        self.0.lexed.lock().unwrap().clone()
    }
}

impl ParsingLanguage for Recorder {
    fn name(&self) -> &str {
        "recorder"
    }

    fn lex(&self, input: &str, output: &mut dyn FnMut(Token)) -> Result<(), ParseError> {
        if let Some(gate) = self.0.gate.lock().unwrap().as_ref() {
            let _ = gate.recv();
        }
        self.0.lexed.lock().unwrap().push(input.to_string());

        let keyword = highlight_id_for_name("keyword").unwrap();
        for (start, word) in input.match_indices("fn") {
            output(Token::new(start..start + word.len(), StyleContext::new(keyword)));
        }

        if self.0.failing.load(Ordering::SeqCst) {
            return Err(ParseError::malformed("unbalanced input", Some(input.len())));
        }
        Ok(())
    }
}
