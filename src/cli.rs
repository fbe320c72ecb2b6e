//! Command-line argument parsing for the preview tool

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use source_view::theme::Appearance;

/// Print a source file with syntax highlighting
#[derive(Parser, Debug)]
#[command(
    name = "source-preview",
    version,
    about = "Print a source file with syntax highlighting"
)]
pub struct CliArgs {
    /// File to highlight
    #[arg(value_name = "PATH", required_unless_present_any = ["list_themes", "init_config"])]
    pub path: Option<PathBuf>,

    /// Language name, overriding detection by extension (e.g. "rust", "py")
    #[arg(short, long)]
    pub language: Option<String>,

    /// Light or dark appearance (defaults to the config file)
    #[arg(short, long, value_enum)]
    pub appearance: Option<AppearanceArg>,

    /// Theme id to use for both appearances
    #[arg(short, long)]
    pub theme: Option<String>,

    /// Render as a label showing at most N lines
    #[arg(long, value_name = "N")]
    pub lines: Option<usize>,

    /// Disable escape codes
    #[arg(long)]
    pub no_color: bool,

    /// List available theme ids and exit
    #[arg(long)]
    pub list_themes: bool,

    /// Write the default config file and themes directory, then exit
    #[arg(long)]
    pub init_config: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum AppearanceArg {
    Light,
    Dark,
}

impl From<AppearanceArg> for Appearance {
    fn from(arg: AppearanceArg) -> Self {
        match arg {
            AppearanceArg::Light => Appearance::Light,
            AppearanceArg::Dark => Appearance::Dark,
        }
    }
}
