//! PolyFAQ CLI entry point.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use polyfaq::config::Config;

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("polyfaq=info,tower_http=info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config_path = cli.config.clone().unwrap_or_else(Config::path);

    match cli.command {
        Command::Serve { bind, port } => {
            let config = Config::load_with_env(&config_path)
                .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
            cli::cmd_serve(config, bind, port).await
        }
        Command::Languages { json } => cli::cmd_languages(json),
        Command::Config { action } => cli::cmd_config(action, &config_path),
    }
}
