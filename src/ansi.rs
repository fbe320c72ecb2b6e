//! Terminal surface
//!
//! Renders styled text as 24-bit ANSI escape sequences. Used by the
//! `source-preview` binary.

use std::cell::RefCell;
use std::rc::Rc;

use crate::font::{Decoration, Font};
use crate::styled::{StyledText, TextStyle};
use crate::surface::{SurfaceColors, TextSurface};

const RESET: &str = "\x1b[0m";

/// Select Graphic Rendition parameters for a style
fn sgr(style: &TextStyle) -> String {
    let mut params = Vec::new();
    if style.font.traits.is_bold() {
        params.push("1".to_string());
    }
    if style.font.traits.is_italic() {
        params.push("3".to_string());
    }
    match style.decoration {
        Some(Decoration::Underline) => params.push("4".to_string()),
        Some(Decoration::Strikethrough) => params.push("9".to_string()),
        None => {}
    }
    let fg = style.foreground;
    params.push(format!("38;2;{};{};{}", fg.r, fg.g, fg.b));
    if let Some(bg) = style.background {
        params.push(format!("48;2;{};{};{}", bg.r, bg.g, bg.b));
    }
    format!("\x1b[{}m", params.join(";"))
}

/// Render styled text with escape codes. Styles are reset before every
/// newline so backgrounds do not bleed to the end of the terminal line.
pub fn render_ansi(styled: &StyledText) -> String {
    let mut out = String::with_capacity(styled.text().len() * 2);
    let mut chars = styled.text().chars();

    for run in styled.runs() {
        let open = sgr(&run.style);
        out.push_str(&open);
        for ch in chars.by_ref().take(run.range.len()) {
            if ch == '\n' {
                out.push_str(RESET);
                out.push('\n');
                out.push_str(&open);
            } else {
                out.push(ch);
            }
        }
        out.push_str(RESET);
    }

    // Any characters not covered by a run
    out.extend(chars);
    out
}

/// Surface that keeps the last rendering as a string
#[derive(Debug, Default)]
pub struct AnsiSurface {
    text: String,
    output: String,
    color: bool,
    font: Option<Font>,
    colors: Option<SurfaceColors>,
}

impl AnsiSurface {
    /// `color: false` renders plain text only
    pub fn new(text: &str, color: bool) -> Self {
        Self {
            text: text.to_string(),
            output: text.to_string(),
            color,
            ..Self::default()
        }
    }

    pub fn shared(text: &str, color: bool) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new(text, color)))
    }

    /// Last rendered output
    pub fn output(&self) -> &str {
        &self.output
    }
}

impl TextSurface for AnsiSurface {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.output = self.text.clone();
    }

    fn set_styled_text(&mut self, styled: &StyledText) {
        self.output = if self.color {
            render_ansi(styled)
        } else {
            styled.text().to_string()
        };
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{FontConfiguration, FontTraits};
    use crate::theme::Color;

    fn style(fg: Color) -> TextStyle {
        TextStyle::new(fg, FontConfiguration::default().font())
    }

    #[test]
    fn test_sgr_codes() {
        let mut s = style(Color::rgb(1, 2, 3));
        s.background = Some(Color::rgb(4, 5, 6));
        s.decoration = Some(Decoration::Strikethrough);
        s.font.traits = FontTraits::BOLD | FontTraits::ITALIC;
        assert_eq!(sgr(&s), "\x1b[1;3;9;38;2;1;2;3;48;2;4;5;6m");
    }

    #[test]
    fn test_reset_before_newline() {
        let styled = StyledText::uniform("a\nb", style(Color::rgb(9, 9, 9)));
        let out = render_ansi(&styled);
        let open = "\x1b[38;2;9;9;9m";
        assert_eq!(out, format!("{open}a{RESET}\n{open}b{RESET}"));
    }

    #[test]
    fn test_plain_surface_has_no_escapes() {
        let mut surface = AnsiSurface::new("x", false);
        surface.set_styled_text(&StyledText::uniform("x", style(Color::rgb(0, 0, 0))));
        assert_eq!(surface.output(), "x");
    }
}
