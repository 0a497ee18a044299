//! `pricechart language` - default UI language in global_config.json.

use std::path::PathBuf;

use clap::Subcommand;

use pricechart_config::settings::DEFAULT_CONFIG_FILE;
use pricechart_config::{language_code, GlobalConfig};

use crate::CliError;

#[derive(Subcommand)]
pub enum LanguageCommands {
    /// Show the configured languages and the default
    #[command(after_help = "\
Examples:
  pricechart language show
  pricechart language show --json")]
    Show {
        /// Path to global_config.json
        #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,

        /// Output JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// Change the default language
    #[command(after_help = "\
Examples:
  pricechart language set Tamil
  pricechart language set Japanese --config ~/charts/global_config.json")]
    Set {
        /// One of the configured languages
        name: String,

        /// Path to global_config.json
        #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
    },
}

pub fn cmd_language(cmd: LanguageCommands) -> Result<(), CliError> {
    match cmd {
        LanguageCommands::Show { config, json } => cmd_language_show(config, json),
        LanguageCommands::Set { name, config } => cmd_language_set(config, &name),
    }
}

fn cmd_language_show(path: PathBuf, json: bool) -> Result<(), CliError> {
    let config = GlobalConfig::load(&path).map_err(CliError::config)?;

    if json {
        let json_str = serde_json::to_string_pretty(&config)
            .map_err(|e| CliError::internal(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
        return Ok(());
    }

    for name in &config.language {
        let marker = if *name == config.default_language { "*" } else { " " };
        println!("{marker} {name} ({})", language_code(name));
    }
    Ok(())
}

fn cmd_language_set(path: PathBuf, name: &str) -> Result<(), CliError> {
    let mut config = GlobalConfig::load(&path).map_err(CliError::config)?;
    config.set_default_language(name).map_err(CliError::config)?;
    config.save(&path).map_err(CliError::config)?;
    eprintln!("default language: {} ({})", config.default_language, config.language_code());
    Ok(())
}
