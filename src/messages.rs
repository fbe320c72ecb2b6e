//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types. View messages come
//! from the host on the UI thread; pass messages come back from debounce
//! timers and the highlight worker.

use std::sync::Arc;

use crate::font::FontConfiguration;
use crate::highlighter::HighlightOutcome;
use crate::model::ViewId;
use crate::syntax::Language;
use crate::theme::{Appearance, Theme, ThemeSet};

/// Host events for one view
#[derive(Debug, Clone)]
pub enum ViewMsg {
    /// View was attached; runs the first pass
    Attached { view: ViewId },
    /// User edited the text
    TextChanged { view: ViewId, text: String },
    /// Host replaced the text programmatically
    TextReplaced { view: ViewId, text: String },
    /// Explicit theme snapshot
    ThemeChanged { view: ViewId, theme: Arc<Theme> },
    /// New light/dark pair; the current appearance picks one
    ThemeSetChanged { view: ViewId, themes: ThemeSet },
    /// Light/dark switch
    AppearanceChanged {
        view: ViewId,
        appearance: Appearance,
    },
    LanguageChanged { view: ViewId, language: Language },
    FontChanged {
        view: ViewId,
        font: FontConfiguration,
    },
    Detached { view: ViewId },
}

/// Highlight pass lifecycle
#[derive(Debug, Clone)]
pub enum PassMsg {
    /// Debounce delay elapsed for a revision
    Ready { view: ViewId, revision: u64 },
    /// Worker finished a pass
    Completed {
        view: ViewId,
        revision: u64,
        outcome: HighlightOutcome,
    },
}

/// Top-level message type
#[derive(Debug, Clone)]
pub enum Msg {
    View(ViewMsg),
    Pass(PassMsg),
}

impl Msg {
    /// Create a user edit message
    pub fn text_changed(view: ViewId, text: impl Into<String>) -> Self {
        Msg::View(ViewMsg::TextChanged {
            view,
            text: text.into(),
        })
    }

    /// Create a debounce-elapsed message
    pub fn ready(view: ViewId, revision: u64) -> Self {
        Msg::Pass(PassMsg::Ready { view, revision })
    }
}
