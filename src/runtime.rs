//! Host-side driver
//!
//! [`HighlightRuntime`] lives on the thread that owns the surfaces. It feeds
//! host events into [`update`], executes the returned commands, and drains
//! results from the debounce timers and the highlight worker.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::commands::{Cmd, PassRequest};
use crate::config::SourceConfig;
use crate::font::FontConfiguration;
use crate::messages::{Msg, PassMsg, ViewMsg};
use crate::model::{HighlightModel, ViewId, ViewKind, ViewState};
use crate::surface::TextSurface;
use crate::syntax::Language;
use crate::theme::{Appearance, Theme, ThemeSet};
use crate::update::{update, view_ids};

/// Callback invoked with the new text after every user edit
pub type ChangeCallback = Box<dyn FnMut(&str)>;

/// Options for [`HighlightRuntime::attach_editor`]
pub struct ViewOptions {
    pub language: Language,
    pub themes: ThemeSet,
    pub appearance: Appearance,
    pub font: FontConfiguration,
    pub editable: bool,
    pub on_change: Option<ChangeCallback>,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            language: Language::plain(),
            themes: ThemeSet::default(),
            appearance: Appearance::default(),
            font: FontConfiguration::default(),
            editable: true,
            on_change: None,
        }
    }
}

impl ViewOptions {
    /// Theme set, appearance and font from the user config
    pub fn from_config(config: &SourceConfig) -> Self {
        Self {
            themes: config.theme_set(),
            appearance: config.appearance,
            font: config.font_configuration(),
            ..Self::default()
        }
    }
}

/// Options for [`HighlightRuntime::attach_label`]
#[derive(Debug, Clone)]
pub struct LabelOptions {
    pub language: Language,
    pub themes: ThemeSet,
    pub appearance: Appearance,
    pub font: FontConfiguration,
    /// Multiplier on the font size
    pub scale: f32,
    pub line_limit: Option<usize>,
    pub should_highlight: bool,
}

impl Default for LabelOptions {
    fn default() -> Self {
        Self {
            language: Language::plain(),
            themes: ThemeSet::default(),
            appearance: Appearance::default(),
            font: FontConfiguration::default(),
            scale: 1.0,
            line_limit: Some(4),
            should_highlight: false,
        }
    }
}

impl LabelOptions {
    pub fn from_config(config: &SourceConfig) -> Self {
        Self {
            themes: config.theme_set(),
            appearance: config.appearance,
            font: config.font_configuration(),
            ..Self::default()
        }
    }
}

struct Host {
    surface: Box<dyn TextSurface>,
    on_change: Option<ChangeCallback>,
}

struct Job {
    view: ViewId,
    revision: u64,
    request: PassRequest,
}

/// Spawn the highlight worker. It exits when the runtime is dropped.
fn spawn_worker(msg_tx: Sender<Msg>) -> std::io::Result<Sender<Job>> {
    let (job_tx, job_rx) = mpsc::channel::<Job>();

    thread::Builder::new()
        .name("source-highlight".to_string())
        .spawn(move || {
            for job in job_rx {
                let start = Instant::now();
                let outcome = job.request.run();
                tracing::debug!(
                    "Highlighted view {} revision {} in {:?}",
                    job.view.0,
                    job.revision,
                    start.elapsed()
                );

                let msg = Msg::Pass(PassMsg::Completed {
                    view: job.view,
                    revision: job.revision,
                    outcome,
                });
                if msg_tx.send(msg).is_err() {
                    break;
                }
            }
            tracing::debug!("Highlight worker exiting");
        })?;

    Ok(job_tx)
}

/// Drives highlight passes for a set of host views
pub struct HighlightRuntime {
    model: HighlightModel,
    hosts: HashMap<ViewId, Host>,
    msg_tx: Sender<Msg>,
    msg_rx: Receiver<Msg>,
    job_tx: Option<Sender<Job>>,
}

impl HighlightRuntime {
    pub fn new(debounce_ms: u64) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel();

        let job_tx = match spawn_worker(msg_tx.clone()) {
            Ok(tx) => Some(tx),
            Err(e) => {
                tracing::warn!("Failed to spawn highlight worker, highlighting inline: {}", e);
                None
            }
        };

        Self {
            model: HighlightModel::new(debounce_ms),
            hosts: HashMap::new(),
            msg_tx,
            msg_rx,
            job_tx,
        }
    }

    pub fn from_config(config: &SourceConfig) -> Self {
        Self::new(config.debounce_ms)
    }

    pub fn model(&self) -> &HighlightModel {
        &self.model
    }

    pub fn view(&self, view: ViewId) -> Option<&ViewState> {
        self.model.view(view)
    }

    // =========================================================================
    // View lifecycle
    // =========================================================================

    /// Attach a text view. The first pass is scheduled immediately.
    pub fn attach_editor(
        &mut self,
        surface: impl TextSurface + 'static,
        options: ViewOptions,
    ) -> ViewId {
        let kind = ViewKind::Editor {
            editable: options.editable,
        };
        self.attach(
            Box::new(surface),
            kind,
            options.language,
            options.themes,
            options.appearance,
            options.font,
            options.on_change,
        )
    }

    /// Attach a read-only label
    pub fn attach_label(
        &mut self,
        surface: impl TextSurface + 'static,
        options: LabelOptions,
    ) -> ViewId {
        let kind = ViewKind::Label {
            scale: options.scale,
            line_limit: options.line_limit,
            should_highlight: options.should_highlight,
        };
        self.attach(
            Box::new(surface),
            kind,
            options.language,
            options.themes,
            options.appearance,
            options.font,
            None,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn attach(
        &mut self,
        surface: Box<dyn TextSurface>,
        kind: ViewKind,
        language: Language,
        themes: ThemeSet,
        appearance: Appearance,
        font: FontConfiguration,
        on_change: Option<ChangeCallback>,
    ) -> ViewId {
        let id = self.model.next_id();
        let text = surface.text();
        tracing::debug!(
            "Attaching view {} ({:?}, {}, {} bytes)",
            id.0,
            kind,
            language.name(),
            text.len()
        );

        self.model.insert(ViewState::new(
            id, kind, text, language, themes, appearance, font,
        ));
        self.hosts.insert(id, Host { surface, on_change });
        self.dispatch(Msg::View(ViewMsg::Attached { view: id }));
        id
    }

    /// Stop highlighting a view. Pending results for it are dropped.
    pub fn detach(&mut self, view: ViewId) -> Option<Box<dyn TextSurface>> {
        self.dispatch(Msg::View(ViewMsg::Detached { view }));
        self.hosts.remove(&view).map(|host| host.surface)
    }

    // =========================================================================
    // Host events
    // =========================================================================

    /// The user edited the surface; reads its text and schedules a debounced pass
    pub fn text_changed(&mut self, view: ViewId) {
        let Some(host) = self.hosts.get(&view) else {
            return;
        };
        let text = host.surface.text();
        self.dispatch(Msg::text_changed(view, text));
    }

    /// Replace the text programmatically and rehighlight without delay
    pub fn set_text(&mut self, view: ViewId, text: &str) {
        let Some(host) = self.hosts.get_mut(&view) else {
            return;
        };
        host.surface.set_text(text);
        self.dispatch(Msg::View(ViewMsg::TextReplaced {
            view,
            text: text.to_string(),
        }));
    }

    pub fn set_language(&mut self, view: ViewId, language: Language) {
        self.dispatch(Msg::View(ViewMsg::LanguageChanged { view, language }));
    }

    pub fn set_font(&mut self, view: ViewId, font: FontConfiguration) {
        self.dispatch(Msg::View(ViewMsg::FontChanged { view, font }));
    }

    /// Use this theme regardless of appearance until the next appearance change
    pub fn set_theme(&mut self, view: ViewId, theme: Arc<Theme>) {
        self.dispatch(Msg::View(ViewMsg::ThemeChanged { view, theme }));
    }

    pub fn set_theme_set(&mut self, view: ViewId, themes: ThemeSet) {
        self.dispatch(Msg::View(ViewMsg::ThemeSetChanged { view, themes }));
    }

    pub fn set_appearance(&mut self, view: ViewId, appearance: Appearance) {
        self.dispatch(Msg::View(ViewMsg::AppearanceChanged { view, appearance }));
    }

    /// System-wide light/dark switch
    pub fn set_appearance_all(&mut self, appearance: Appearance) {
        for view in view_ids(&self.model) {
            self.set_appearance(view, appearance);
        }
    }

    // =========================================================================
    // Driving
    // =========================================================================

    /// Process everything the timers and the worker have sent so far.
    /// Returns the number of passes applied to surfaces.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            applied += self.dispatch(msg);
        }
        applied
    }

    /// Block until no view has pending work, or the timeout elapses.
    /// Returns true when idle.
    pub fn pump_until_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            self.pump();
            if self.model.is_idle() {
                return true;
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            match self.msg_rx.recv_timeout(remaining) {
                Ok(msg) => {
                    self.dispatch(msg);
                }
                Err(RecvTimeoutError::Timeout) => return self.model.is_idle(),
                Err(RecvTimeoutError::Disconnected) => return false,
            }
        }
    }

    fn dispatch(&mut self, msg: Msg) -> usize {
        match update(&mut self.model, msg) {
            Some(cmd) => self.process_cmd(cmd),
            None => 0,
        }
    }

    fn process_cmd(&mut self, cmd: Cmd) -> usize {
        match cmd {
            Cmd::None => 0,

            Cmd::Batch(cmds) => cmds.into_iter().map(|c| self.process_cmd(c)).sum(),

            Cmd::DebouncedHighlight {
                view,
                revision,
                delay_ms,
            } => {
                if delay_ms == 0 {
                    return self.dispatch(Msg::ready(view, revision));
                }
                let tx = self.msg_tx.clone();
                thread::spawn(move || {
                    thread::sleep(Duration::from_millis(delay_ms));
                    let _ = tx.send(Msg::ready(view, revision));
                });
                0
            }

            Cmd::RunHighlight {
                view,
                revision,
                request,
            } => {
                let mut job = Job {
                    view,
                    revision,
                    request,
                };
                if let Some(tx) = &self.job_tx {
                    match tx.send(job) {
                        Ok(()) => return 0,
                        Err(mpsc::SendError(returned)) => job = returned,
                    }
                    tracing::warn!("Highlight worker gone, highlighting inline");
                    self.job_tx = None;
                }

                let outcome = job.request.run();
                self.dispatch(Msg::Pass(PassMsg::Completed {
                    view: job.view,
                    revision: job.revision,
                    outcome,
                }))
            }

            Cmd::ApplyStyledText { view, outcome, .. } => {
                let Some(host) = self.hosts.get_mut(&view) else {
                    return 0;
                };
                host.surface.set_styled_text(&outcome.styled);
                if let Some(error) = outcome.error() {
                    host.surface.highlight_failed(error);
                }
                1
            }

            Cmd::UpdateSurface { view, font, colors } => {
                if let Some(host) = self.hosts.get_mut(&view) {
                    host.surface.set_font(&font);
                    host.surface.set_colors(colors);
                }
                0
            }

            Cmd::NotifyChanged { view, text } => {
                if let Some(callback) = self
                    .hosts
                    .get_mut(&view)
                    .and_then(|host| host.on_change.as_mut())
                {
                    callback(&text);
                }
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MemorySurface;
    use crate::syntax::LanguageId;

    #[test]
    fn test_attach_plain_text_applies_immediately() {
        let mut runtime = HighlightRuntime::new(0);
        let surface = MemorySurface::shared("hello");
        let id = runtime.attach_editor(surface.clone(), ViewOptions::default());

        assert_eq!(surface.borrow().applied, 1);
        assert!(surface.borrow().font().is_some());
        assert!(runtime.view(id).unwrap().is_idle());
    }

    #[test]
    fn test_attach_rust_highlights_on_worker() {
        let mut runtime = HighlightRuntime::new(0);
        let surface = MemorySurface::shared("fn main() {}");
        let options = ViewOptions {
            language: Language::for_id(LanguageId::Rust),
            ..ViewOptions::default()
        };
        runtime.attach_editor(surface.clone(), options);

        assert!(runtime.pump_until_idle(Duration::from_secs(5)));
        let surface = surface.borrow();
        let styled = surface.styled().unwrap();
        assert_eq!(styled.text(), "fn main() {}");
        assert!(styled.runs().len() > 1);
    }

    #[test]
    fn test_detach_returns_surface() {
        let mut runtime = HighlightRuntime::new(0);
        let id = runtime.attach_editor(MemorySurface::new("x"), ViewOptions::default());
        assert!(runtime.detach(id).is_some());
        assert!(runtime.view(id).is_none());
        assert!(runtime.detach(id).is_none());
    }
}
