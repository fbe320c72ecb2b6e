//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that should be performed after an update.

use std::sync::Arc;

use crate::font::{Font, FontConfiguration};
use crate::highlighter::{highlight, HighlightOutcome};
use crate::model::ViewId;
use crate::surface::SurfaceColors;
use crate::syntax::Language;
use crate::theme::Theme;

/// Snapshot of everything one pass needs. Later changes to the view do not
/// affect a request that was already issued.
#[derive(Debug, Clone)]
pub struct PassRequest {
    pub text: String,
    pub language: Language,
    pub theme: Arc<Theme>,
    pub font: FontConfiguration,
}

impl PassRequest {
    pub fn run(&self) -> HighlightOutcome {
        highlight(&self.text, &self.language, &self.theme, &self.font)
    }
}

/// Commands returned by update functions
#[derive(Debug, Clone)]
pub enum Cmd {
    /// No command
    None,
    /// Start debounce timer for a pass.
    /// After delay_ms, sends Msg::Pass(Ready)
    DebouncedHighlight {
        view: ViewId,
        revision: u64,
        delay_ms: u64,
    },
    /// Run a pass on the background worker.
    /// Sends Msg::Pass(Completed) when done
    RunHighlight {
        view: ViewId,
        revision: u64,
        request: PassRequest,
    },
    /// Hand a finished pass to the surface (UI thread)
    ApplyStyledText {
        view: ViewId,
        revision: u64,
        outcome: HighlightOutcome,
    },
    /// Push base font and colors to the surface
    UpdateSurface {
        view: ViewId,
        font: Font,
        colors: SurfaceColors,
    },
    /// Invoke the host's change callback
    NotifyChanged { view: ViewId, text: String },
    /// Execute multiple commands
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Combine commands, dropping `None`s. Returns `None` when nothing is left.
    pub fn batch(cmds: Vec<Cmd>) -> Option<Cmd> {
        let mut cmds: Vec<Cmd> = cmds
            .into_iter()
            .filter(|c| !matches!(c, Cmd::None))
            .collect();
        match cmds.len() {
            0 => None,
            1 => cmds.pop(),
            _ => Some(Cmd::Batch(cmds)),
        }
    }
}
