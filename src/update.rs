//! Update functions for the Elm-style architecture
//!
//! All pipeline state transformations flow through these functions. They
//! never block: passes that run the lexer go to the worker via
//! [`Cmd::RunHighlight`], and their results come back as
//! [`PassMsg::Completed`].

use std::sync::Arc;

use crate::commands::{Cmd, PassRequest};
use crate::highlighter::{base_style, highlight};
use crate::messages::{Msg, PassMsg, ViewMsg};
use crate::model::{HighlightModel, ViewId, ViewState};
use crate::surface::SurfaceColors;
use crate::syntax::Language;
use crate::theme::Theme;

/// Debounce delay in milliseconds
/// Kept short since the previous styling stays visible during the wait
pub const HIGHLIGHT_DEBOUNCE_MS: u64 = 30;

/// Main update function - dispatches to sub-handlers
pub fn update(model: &mut HighlightModel, msg: Msg) -> Option<Cmd> {
    match msg {
        Msg::View(m) => update_view(model, m),
        Msg::Pass(m) => update_pass(model, m),
    }
}

/// Handle host events
pub fn update_view(model: &mut HighlightModel, msg: ViewMsg) -> Option<Cmd> {
    let debounce_ms = model.debounce_ms;

    match msg {
        ViewMsg::Attached { view } => {
            let state = model.view_mut(view)?;
            let surface = surface_attributes(state);
            let pass = schedule_highlight(state, 0);
            Cmd::batch(vec![surface, pass])
        }

        ViewMsg::TextChanged { view, text } => {
            let state = model.view_mut(view)?;
            if !state.is_editable() {
                tracing::debug!("Ignoring edit on read-only view {}", view.0);
                return None;
            }
            if state.text == text {
                return None;
            }
            state.text = text.clone();
            let pass = schedule_highlight(state, debounce_ms);
            Cmd::batch(vec![Cmd::NotifyChanged { view, text }, pass])
        }

        ViewMsg::TextReplaced { view, text } => {
            let state = model.view_mut(view)?;
            if state.text == text {
                return None;
            }
            state.text = text;
            Some(schedule_highlight(state, 0))
        }

        ViewMsg::ThemeChanged { view, theme } => {
            let state = model.view_mut(view)?;
            apply_theme(state, theme)
        }

        ViewMsg::ThemeSetChanged { view, themes } => {
            let state = model.view_mut(view)?;
            let theme = themes.for_appearance(state.appearance);
            state.themes = themes;
            apply_theme(state, theme)
        }

        ViewMsg::AppearanceChanged { view, appearance } => {
            let state = model.view_mut(view)?;
            state.appearance = appearance;
            let theme = state.themes.for_appearance(appearance);
            apply_theme(state, theme)
        }

        ViewMsg::LanguageChanged { view, language } => {
            let state = model.view_mut(view)?;
            if state.language.same_as(&language) {
                return None;
            }
            tracing::debug!(
                "View {} language {} -> {}",
                view.0,
                state.language.name(),
                language.name()
            );
            state.language = language;
            Some(schedule_highlight(state, 0))
        }

        ViewMsg::FontChanged { view, font } => {
            let state = model.view_mut(view)?;
            let font = state.kind.effective_font(font);
            if state.font == font {
                return None;
            }
            state.font = font;
            let surface = surface_attributes(state);
            let pass = schedule_highlight(state, 0);
            Cmd::batch(vec![surface, pass])
        }

        ViewMsg::Detached { view } => {
            if model.views.remove(&view).is_some() {
                tracing::debug!("Detached view {}", view.0);
            }
            None
        }
    }
}

/// Handle pass lifecycle messages
pub fn update_pass(model: &mut HighlightModel, msg: PassMsg) -> Option<Cmd> {
    match msg {
        PassMsg::Ready { view, revision } => {
            let state = match model.view_mut(view) {
                Some(s) => s,
                None => {
                    tracing::debug!("View {} not found for Ready", view.0);
                    return None;
                }
            };

            if state.scheduled == Some(revision) {
                state.scheduled = None;
            }

            // Skip if the view changed since the debounce started
            if state.revision != revision {
                tracing::debug!(
                    "Skipping stale pass request: view revision {} != request revision {}",
                    state.revision,
                    revision
                );
                return None;
            }

            if state.applied_revision == Some(revision) {
                return None;
            }

            if let Some(running) = state.in_flight {
                tracing::debug!(
                    "Pass {} still running for view {}, deferring {}",
                    running,
                    view.0,
                    revision
                );
                state.rerun_pending = true;
                return None;
            }

            Some(start_pass(state))
        }

        PassMsg::Completed {
            view,
            revision,
            mut outcome,
        } => {
            let state = match model.view_mut(view) {
                Some(s) => s,
                None => {
                    tracing::debug!("View {} not found, discarding Completed", view.0);
                    return None;
                }
            };

            if state.in_flight == Some(revision) {
                state.in_flight = None;
            }

            let fresh = state.revision == revision
                && state.applied_revision.map_or(true, |applied| revision > applied);

            if !fresh {
                tracing::debug!(
                    "Discarding stale pass result: view revision {} != result revision {}",
                    state.revision,
                    revision
                );
                return rerun_if_pending(state);
            }

            state.rerun_pending = false;
            state.applied_revision = Some(revision);
            state.last_error = outcome.error().cloned();

            if let Some(limit) = state.line_limit() {
                outcome.styled = outcome.styled.first_lines(limit);
            }

            match &outcome.result {
                Ok(stats) => tracing::debug!(
                    "Applied pass for view {}, revision {} ({} tokens, {} clamped)",
                    view.0,
                    revision,
                    stats.tokens,
                    stats.clamped
                ),
                Err(e) => tracing::warn!(
                    "Pass for view {} revision {} failed, applying base styling: {}",
                    view.0,
                    revision,
                    e
                ),
            }

            Some(Cmd::ApplyStyledText {
                view,
                revision,
                outcome,
            })
        }
    }
}

/// Schedule a pass for the view's current inputs (call after any change)
///
/// Bumps the revision so that every older request and result becomes stale.
/// Views that never run the lexer are styled synchronously.
pub fn schedule_highlight(state: &mut ViewState, delay_ms: u64) -> Cmd {
    state.revision += 1;
    let revision = state.revision;

    if !state.should_lex() {
        return apply_base_styling(state);
    }

    state.scheduled = Some(revision);
    Cmd::DebouncedHighlight {
        view: state.id,
        revision,
        delay_ms,
    }
}

/// Snapshot the view and hand the pass to the worker
fn start_pass(state: &mut ViewState) -> Cmd {
    let revision = state.revision;
    state.in_flight = Some(revision);
    state.rerun_pending = false;

    tracing::debug!(
        "Starting pass for view {} revision {} ({} bytes)",
        state.id.0,
        revision,
        state.text.len()
    );

    Cmd::RunHighlight {
        view: state.id,
        revision,
        request: PassRequest {
            text: state.text.clone(),
            language: state.language.clone(),
            theme: Arc::clone(&state.theme),
            font: state.font.clone(),
        },
    }
}

/// After a stale result, start one pass for the current revision if a Ready
/// arrived while the worker was busy
fn rerun_if_pending(state: &mut ViewState) -> Option<Cmd> {
    if !state.rerun_pending || state.in_flight.is_some() {
        return None;
    }
    if state.scheduled == Some(state.revision) {
        // That revision's own timer will start it
        state.rerun_pending = false;
        return None;
    }
    Some(start_pass(state))
}

/// Plain languages and labels without highlighting
fn apply_base_styling(state: &mut ViewState) -> Cmd {
    let revision = state.revision;
    let mut outcome = highlight(&state.text, &Language::plain(), &state.theme, &state.font);
    if let Some(limit) = state.line_limit() {
        outcome.styled = outcome.styled.first_lines(limit);
    }

    state.scheduled = None;
    state.rerun_pending = false;
    state.applied_revision = Some(revision);
    state.last_error = None;

    Cmd::ApplyStyledText {
        view: state.id,
        revision,
        outcome,
    }
}

fn apply_theme(state: &mut ViewState, theme: Arc<Theme>) -> Option<Cmd> {
    if Arc::ptr_eq(&state.theme, &theme) || *state.theme == *theme {
        tracing::trace!("Theme {} unchanged for view {}", theme.name, state.id.0);
        return None;
    }
    tracing::debug!(
        "View {} theme {} -> {}",
        state.id.0,
        state.theme.name,
        theme.name
    );
    state.theme = theme;
    let surface = surface_attributes(state);
    let pass = schedule_highlight(state, 0);
    Cmd::batch(vec![surface, pass])
}

/// Base font and colors for the surface itself
fn surface_attributes(state: &ViewState) -> Cmd {
    let base = base_style(&state.theme, &state.font);
    Cmd::UpdateSurface {
        view: state.id,
        font: base.font,
        colors: SurfaceColors {
            foreground: state.theme.foreground,
            background: state.theme.background,
            caret: state.theme.caret,
        },
    }
}

/// Current view id list, sorted for deterministic iteration
pub fn view_ids(model: &HighlightModel) -> Vec<ViewId> {
    let mut ids: Vec<ViewId> = model.views.keys().copied().collect();
    ids.sort();
    ids
}
