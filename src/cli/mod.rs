//! Command-line interface.

mod config;
mod languages;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub(crate) use config::cmd_config;
pub(crate) use languages::cmd_languages;
pub(crate) use serve::cmd_serve;

#[derive(Parser, Debug)]
#[command(name = "polyfaq", version, about = "Multilingual FAQ service with cached live translation")]
pub(crate) struct Cli {
    /// Config file (default: ~/.polyfaq/config.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Run the HTTP API server
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        bind: Option<String>,
        /// Port (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },
    /// List supported language codes
    Languages {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub(crate) enum ConfigAction {
    /// Print the effective configuration (file + environment)
    Show,
    /// Print the config file path
    Path,
    /// Validate the config file and report errors
    Check,
}
