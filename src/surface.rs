//! Host text surface abstraction
//!
//! The pipeline never touches a toolkit directly. Each host view (an editable
//! text view, a read-only label, a terminal) implements [`TextSurface`] and
//! the runtime drives it from the UI thread.

use std::cell::RefCell;
use std::ops::Range;
use std::rc::Rc;

use ropey::Rope;

use crate::font::Font;
use crate::styled::StyledText;
use crate::syntax::ParseError;
use crate::theme::Color;

/// Base colors of a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceColors {
    pub foreground: Color,
    pub background: Color,
    /// Insertion point color
    pub caret: Color,
}

/// A host view that displays text.
///
/// All methods are called on the thread that owns the view.
pub trait TextSurface {
    /// Current plain text of the view
    fn text(&self) -> String;

    /// Replace the plain text (programmatic change, not a user edit)
    fn set_text(&mut self, text: &str);

    /// Replace the displayed content with a finished pass
    fn set_styled_text(&mut self, styled: &StyledText);

    fn font(&self) -> Option<Font>;

    fn set_font(&mut self, font: &Font);

    fn colors(&self) -> Option<SurfaceColors>;

    fn set_colors(&mut self, colors: SurfaceColors);

    /// Called after the base styling of a failed pass was applied
    fn highlight_failed(&mut self, _error: &ParseError) {}
}

impl<S: TextSurface> TextSurface for Rc<RefCell<S>> {
    fn text(&self) -> String {
        self.borrow().text()
    }

    fn set_text(&mut self, text: &str) {
        self.borrow_mut().set_text(text)
    }

    fn set_styled_text(&mut self, styled: &StyledText) {
        self.borrow_mut().set_styled_text(styled)
    }

    fn font(&self) -> Option<Font> {
        self.borrow().font()
    }

    fn set_font(&mut self, font: &Font) {
        self.borrow_mut().set_font(font)
    }

    fn colors(&self) -> Option<SurfaceColors> {
        self.borrow().colors()
    }

    fn set_colors(&mut self, colors: SurfaceColors) {
        self.borrow_mut().set_colors(colors)
    }

    fn highlight_failed(&mut self, error: &ParseError) {
        self.borrow_mut().highlight_failed(error)
    }
}

/// Headless surface backed by a rope.
///
/// Used by tests and by hosts that render elsewhere; edits go through
/// [`MemorySurface::insert`] and [`MemorySurface::remove`] like keystrokes.
#[derive(Debug, Default)]
pub struct MemorySurface {
    buffer: Rope,
    styled: Option<StyledText>,
    font: Option<Font>,
    colors: Option<SurfaceColors>,
    /// Number of styled texts applied so far
    pub applied: usize,
    pub last_error: Option<ParseError>,
}

impl MemorySurface {
    pub fn new(text: &str) -> Self {
        Self {
            buffer: Rope::from(text),
            ..Self::default()
        }
    }

    /// Wrap in a shared handle so the host can keep inspecting it
    pub fn shared(text: &str) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new(text)))
    }

    /// Insert text at a char index (clamped to the end)
    pub fn insert(&mut self, char_idx: usize, text: &str) {
        let idx = char_idx.min(self.buffer.len_chars());
        self.buffer.insert(idx, text);
    }

    /// Remove a char range (clamped to the buffer)
    pub fn remove(&mut self, chars: Range<usize>) {
        let len = self.buffer.len_chars();
        let end = chars.end.min(len);
        let start = chars.start.min(end);
        self.buffer.remove(start..end);
    }

    pub fn styled(&self) -> Option<&StyledText> {
        self.styled.as_ref()
    }
}

impl TextSurface for MemorySurface {
    fn text(&self) -> String {
        self.buffer.to_string()
    }

    fn set_text(&mut self, text: &str) {
        self.buffer = Rope::from(text);
    }

    fn set_styled_text(&mut self, styled: &StyledText) {
        self.styled = Some(styled.clone());
        self.applied += 1;
    }

    fn font(&self) -> Option<Font> {
        self.font.clone()
    }

    fn set_font(&mut self, font: &Font) {
        self.font = Some(font.clone());
    }

    fn colors(&self) -> Option<SurfaceColors> {
        self.colors
    }

    fn set_colors(&mut self, colors: SurfaceColors) {
        self.colors = Some(colors);
    }

    fn highlight_failed(&mut self, error: &ParseError) {
        self.last_error = Some(error.clone());
    }
}
