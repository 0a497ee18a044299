// pricechart CLI - stock vs index chart from exchange CSV exports

mod chart;
mod exit_codes;
mod language;
mod remarks;
mod util;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::{config_exit_code, pipeline_exit_code, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "pricechart")]
#[command(about = "Chart a stock against its index, with dated remarks")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the chart for the stock, index and remarks files
    #[command(after_help = "\
Examples:
  pricechart chart
  pricechart chart --style candlestick --preset 3m
  pricechart chart --from 2024-01-01 --to 2024-03-31 --output figure.json
  pricechart chart --stock HDFCBANK.csv --stock-label HDFCBANK --json
  cat upload.csv | pricechart chart --stock -

Missing default files (STOCK.csv, NIFTYBANK.csv, REMARKS.csv) are skipped.
Exit code 3 means neither file had plottable rows.")]
    Chart(chart::ChartArgs),

    /// Maintain the remarks file
    #[command(subcommand)]
    Remarks(remarks::RemarksCommands),

    /// Show or change the default UI language
    #[command(subcommand)]
    Language(language::LanguageCommands),
}

fn main() -> ExitCode {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Chart(args) => chart::cmd_chart(args),
        Commands::Remarks(cmd) => remarks::cmd_remarks(cmd),
        Commands::Language(cmd) => language::cmd_language(cmd),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn args(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(EXIT_ERROR, msg)
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::new(exit_codes::EXIT_IO, msg)
    }

    pub fn pipeline(err: pricechart_pipeline::PipelineError) -> Self {
        Self::new(pipeline_exit_code(&err), err.to_string())
    }

    pub fn config(err: pricechart_config::ConfigError) -> Self {
        let hint = match &err {
            pricechart_config::ConfigError::UnknownLanguage { .. } => {
                Some("add it to the \"language\" list in global_config.json first".to_string())
            }
            _ => None,
        };
        Self { code: config_exit_code(&err), message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
