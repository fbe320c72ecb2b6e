//! source-preview - print a file with syntax highlighting

mod cli;

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;

use cli::CliArgs;
use source_view::ansi::AnsiSurface;
use source_view::runtime::{HighlightRuntime, LabelOptions, ViewOptions};
use source_view::syntax::{Language, LanguageId};
use source_view::theme::{list_available_themes, load_theme, ThemeSet};
use source_view::SourceConfig;

/// How long to wait for the worker before giving up
const PASS_TIMEOUT: Duration = Duration::from_secs(10);

fn main() -> Result<()> {
    source_view::tracing::init();

    let args = CliArgs::parse();
    let mut config = SourceConfig::load();

    if args.list_themes {
        for info in list_available_themes() {
            println!("{:<20} {} ({:?})", info.id, info.name, info.source);
        }
        return Ok(());
    }

    if args.init_config {
        let themes = source_view::config_paths::ensure_themes_dir().map_err(anyhow::Error::msg)?;
        config.save().map_err(anyhow::Error::msg)?;
        println!("Config written; user themes go in {}", themes.display());
        return Ok(());
    }

    let Some(path) = args.path else {
        bail!("No file given");
    };
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let language = match &args.language {
        Some(name) => {
            let id = LanguageId::from_name(name)
                .with_context(|| format!("Unknown language '{}'", name))?;
            Language::for_id(id)
        }
        None => Language::from_path(&path),
    };

    if let Some(appearance) = args.appearance {
        config.appearance = appearance.into();
    }

    let themes = match &args.theme {
        Some(id) => {
            let theme = Arc::new(load_theme(id).map_err(anyhow::Error::msg)?);
            ThemeSet {
                light: Arc::clone(&theme),
                dark: theme,
            }
        }
        None => config.theme_set(),
    };

    let mut runtime = HighlightRuntime::from_config(&config);
    let surface = AnsiSurface::shared(&text, !args.no_color);

    let view = match args.lines {
        Some(limit) => runtime.attach_label(
            surface.clone(),
            LabelOptions {
                language,
                themes,
                line_limit: Some(limit),
                should_highlight: true,
                ..LabelOptions::from_config(&config)
            },
        ),
        None => runtime.attach_editor(
            surface.clone(),
            ViewOptions {
                language,
                themes,
                editable: false,
                ..ViewOptions::from_config(&config)
            },
        ),
    };

    if !runtime.pump_until_idle(PASS_TIMEOUT) {
        bail!("Timed out waiting for highlighting");
    }

    if let Some(error) = runtime.view(view).and_then(|v| v.last_error.as_ref()) {
        tracing::warn!("{}: {}", path.display(), error);
    }

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(surface.borrow().output().as_bytes())?;
    if args.lines.is_some() || !text.ends_with('\n') {
        writeln!(stdout)?;
    }
    Ok(())
}
