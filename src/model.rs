//! Pipeline state
//!
//! One [`ViewState`] per attached host view. It holds the inputs of the next
//! pass (text, language, theme, font) and the bookkeeping that keeps passes
//! single-flight and fresh.

use std::collections::HashMap;
use std::sync::Arc;

use crate::font::FontConfiguration;
use crate::syntax::{Language, ParseError};
use crate::theme::{Appearance, Theme, ThemeSet};

/// Identifies an attached view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u64);

/// What kind of host view this is
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewKind {
    /// Text view; user edits trigger passes when editable
    Editor { editable: bool },
    /// Read-only label
    Label {
        /// Multiplier on the configured font size
        scale: f32,
        /// Maximum number of displayed lines
        line_limit: Option<usize>,
        /// Run the lexer; otherwise labels get base styling only
        should_highlight: bool,
    },
}

impl ViewKind {
    /// Font configuration as this kind of view displays it
    pub fn effective_font(&self, font: FontConfiguration) -> FontConfiguration {
        match self {
            ViewKind::Label { scale, .. } => {
                let combined = font.scale * scale;
                font.with_scale(combined)
            }
            ViewKind::Editor { .. } => font,
        }
    }
}

/// Per-view pipeline state
#[derive(Debug, Clone)]
pub struct ViewState {
    pub id: ViewId,
    pub kind: ViewKind,

    // === Pass inputs ===
    pub text: String,
    pub language: Language,
    pub themes: ThemeSet,
    pub appearance: Appearance,
    /// Theme snapshot used by the next pass
    pub theme: Arc<Theme>,
    /// Effective font (label scale already applied)
    pub font: FontConfiguration,

    // === Pass bookkeeping ===
    /// Incremented on every change that needs a new pass
    pub revision: u64,
    /// Revision whose debounce timer has not fired yet
    pub scheduled: Option<u64>,
    /// Revision currently being highlighted on the worker
    pub in_flight: Option<u64>,
    /// A pass for the current revision was requested while another was in flight
    pub rerun_pending: bool,
    /// Revision of the last result handed to the surface
    pub applied_revision: Option<u64>,
    /// Error of the last applied pass
    pub last_error: Option<ParseError>,
}

impl ViewState {
    pub fn new(
        id: ViewId,
        kind: ViewKind,
        text: String,
        language: Language,
        themes: ThemeSet,
        appearance: Appearance,
        font: FontConfiguration,
    ) -> Self {
        let theme = themes.for_appearance(appearance);
        let font = kind.effective_font(font);
        Self {
            id,
            kind,
            text,
            language,
            themes,
            appearance,
            theme,
            font,
            revision: 0,
            scheduled: None,
            in_flight: None,
            rerun_pending: false,
            applied_revision: None,
            last_error: None,
        }
    }

    pub fn is_editable(&self) -> bool {
        matches!(self.kind, ViewKind::Editor { editable: true })
    }

    /// Whether passes for this view run the lexer
    pub fn should_lex(&self) -> bool {
        let allowed = match self.kind {
            ViewKind::Label {
                should_highlight, ..
            } => should_highlight,
            ViewKind::Editor { .. } => true,
        };
        allowed && self.language.supports_parsing()
    }

    pub fn line_limit(&self) -> Option<usize> {
        match self.kind {
            ViewKind::Label { line_limit, .. } => line_limit,
            ViewKind::Editor { .. } => None,
        }
    }

    /// No timer pending and nothing on the worker
    pub fn is_idle(&self) -> bool {
        self.scheduled.is_none() && self.in_flight.is_none() && !self.rerun_pending
    }
}

/// All attached views
#[derive(Debug, Clone)]
pub struct HighlightModel {
    pub views: HashMap<ViewId, ViewState>,
    /// Delay between an edit and its pass
    pub debounce_ms: u64,
    next_view_id: u64,
}

impl HighlightModel {
    pub fn new(debounce_ms: u64) -> Self {
        Self {
            views: HashMap::new(),
            debounce_ms,
            next_view_id: 1,
        }
    }

    /// Allocate an id that has never been used by this model
    pub fn next_id(&mut self) -> ViewId {
        let id = ViewId(self.next_view_id);
        self.next_view_id += 1;
        id
    }

    pub fn insert(&mut self, view: ViewState) {
        self.views.insert(view.id, view);
    }

    pub fn view(&self, id: ViewId) -> Option<&ViewState> {
        self.views.get(&id)
    }

    pub fn view_mut(&mut self, id: ViewId) -> Option<&mut ViewState> {
        self.views.get_mut(&id)
    }

    pub fn is_idle(&self) -> bool {
        self.views.values().all(ViewState::is_idle)
    }
}
