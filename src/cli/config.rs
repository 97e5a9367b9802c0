//! `polyfaq config` command.

use std::path::Path;

use anyhow::{Context, Result};

use polyfaq::config::Config;

use super::ConfigAction;

pub(crate) fn cmd_config(action: ConfigAction, path: &Path) -> Result<()> {
    match action {
        ConfigAction::Path => {
            println!("{}", path.display());
        }
        ConfigAction::Show => {
            let mut config = Config::load_with_env(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            if config.translator.api_key.is_some() {
                config.translator.api_key = Some("[REDACTED]".to_string());
            }
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Check => {
            if !path.exists() {
                println!("No config file at {} (defaults apply)", path.display());
                return Ok(());
            }
            let config = Config::load_from_path(path)?;
            config.validate()?;
            println!("{} is valid", path.display());
        }
    }
    Ok(())
}
