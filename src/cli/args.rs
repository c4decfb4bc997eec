//! CLI argument parsing using clap.

use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use std::path::PathBuf;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Hot-reload supervisor for application specs
#[derive(Parser)]
#[command(
    name = "appreload",
    version = env!("CARGO_PKG_VERSION"),
    about = "Hot-reload supervisor for application specs",
    long_about = "Watch model, API, flow, plugin, table and chart specs and keep the running server in sync.",
    next_line_help = true,
    styles = clap_cargo_style()
)]
pub struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize project
    #[command(about = "Set up .appreload directory with default configuration")]
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Show current configuration
    #[command(about = "Display active settings")]
    Config,

    /// Load every spec once and report
    #[command(about = "Load all specs and report failures")]
    Check,

    /// Serve the application and reload specs on change
    #[command(about = "Start the server with hot reload")]
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        bind: Option<String>,

        /// Load specs once, do not watch for changes
        #[arg(long)]
        no_watch: bool,
    },
}
