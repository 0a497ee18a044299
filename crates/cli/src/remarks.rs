//! `pricechart remarks` - maintain REMARKS.csv.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Subcommand;

use pricechart_pipeline::store::DEFAULT_REMARKS_FILE;
use pricechart_pipeline::RemarksStore;

use crate::util::{fit_cell, parse_day};
use crate::CliError;

const COMMENT_WIDTH: usize = 60;

#[derive(Subcommand)]
pub enum RemarksCommands {
    /// List remarks ordered by date
    #[command(after_help = "\
Examples:
  pricechart remarks list
  pricechart remarks list --file notes/REMARKS.csv --json")]
    List {
        /// Remarks file
        #[arg(long, default_value = DEFAULT_REMARKS_FILE)]
        file: PathBuf,

        /// Output JSON to stdout instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Add a remark (exact duplicates are ignored)
    #[command(after_help = "\
Examples:
  pricechart remarks add 2024-03-05 \"RBI policy\"
  pricechart remarks add 05/03/2024 \"RBI policy\" --file notes/REMARKS.csv")]
    Add {
        /// Date of the remark
        #[arg(value_parser = parse_day)]
        date: NaiveDate,

        /// Remark text
        comment: String,

        /// Remarks file
        #[arg(long, default_value = DEFAULT_REMARKS_FILE)]
        file: PathBuf,
    },

    /// Delete every remark with this date and comment
    #[command(after_help = "\
Examples:
  pricechart remarks delete 2024-03-05 \"RBI policy\"")]
    Delete {
        /// Date as stored in the file (YYYY-MM-DD)
        date: String,

        /// Remark text
        comment: String,

        /// Remarks file
        #[arg(long, default_value = DEFAULT_REMARKS_FILE)]
        file: PathBuf,
    },
}

pub fn cmd_remarks(cmd: RemarksCommands) -> Result<(), CliError> {
    match cmd {
        RemarksCommands::List { file, json } => cmd_remarks_list(file, json),
        RemarksCommands::Add { date, comment, file } => cmd_remarks_add(file, date, &comment),
        RemarksCommands::Delete { date, comment, file } => cmd_remarks_delete(file, &date, &comment),
    }
}

fn cmd_remarks_list(file: PathBuf, json: bool) -> Result<(), CliError> {
    let store = RemarksStore::open(file).map_err(CliError::pipeline)?;
    let sorted = store.sorted();

    if json {
        let json_str = serde_json::to_string_pretty(&sorted)
            .map_err(|e| CliError::internal(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
        return Ok(());
    }

    if sorted.is_empty() {
        eprintln!("no remarks in {}", store.path().display());
        return Ok(());
    }

    println!("{}  Comment", fit_cell("Date", 10));
    for remark in sorted {
        println!("{}  {}", fit_cell(&remark.date, 10), fit_cell(&remark.comment, COMMENT_WIDTH).trim_end());
    }
    Ok(())
}

fn cmd_remarks_add(file: PathBuf, date: NaiveDate, comment: &str) -> Result<(), CliError> {
    let mut store = RemarksStore::open(file).map_err(CliError::pipeline)?;
    let added = store.add(date, comment).map_err(CliError::pipeline)?;
    if !added {
        eprintln!("already present: {} {}", date.format("%Y-%m-%d"), comment.trim());
        return Ok(());
    }
    store.save().map_err(CliError::pipeline)?;
    eprintln!("added to {} ({} remarks)", store.path().display(), store.len());
    Ok(())
}

fn cmd_remarks_delete(file: PathBuf, date: &str, comment: &str) -> Result<(), CliError> {
    let mut store = RemarksStore::open(file).map_err(CliError::pipeline)?;
    let removed = store.delete(date, comment);
    if removed == 0 {
        eprintln!("no matching remark");
        return Ok(());
    }
    store.save().map_err(CliError::pipeline)?;
    eprintln!("deleted {removed} from {}", store.path().display());
    Ok(())
}
