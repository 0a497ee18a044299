//! `pricechart chart` - one render of the stock/index chart.

use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::builder::{PossibleValuesParser, TypedValueParser};
use clap::Args;
use log::debug;

use pricechart_config::labels::DEFAULT_LABELS_FILE;
use pricechart_config::settings::DEFAULT_CONFIG_FILE;
use pricechart_config::{GlobalConfig, LabelKey, LabelTables};
use pricechart_pipeline::figure::{build_figure, FigureText};
use pricechart_pipeline::store::DEFAULT_REMARKS_FILE;
use pricechart_pipeline::{run, ChartOutput, ChartRequest, ChartStyle, InputSource, Preset, Severity};

use crate::exit_codes::EXIT_NO_DATA;
use crate::util::parse_day;
use crate::CliError;

const STDIN_MARKER: &str = "-";

#[derive(Args)]
pub struct ChartArgs {
    /// Stock price CSV (`-` reads stdin)
    #[arg(long, default_value = "STOCK.csv")]
    stock: PathBuf,

    /// Index price CSV (`-` reads stdin)
    #[arg(long, default_value = "NIFTYBANK.csv")]
    index: PathBuf,

    /// Remarks CSV with Date and Comment columns (`-` reads stdin)
    #[arg(long, default_value = DEFAULT_REMARKS_FILE)]
    remarks: PathBuf,

    /// Chart style
    #[arg(
        long,
        default_value = "line",
        value_parser = PossibleValuesParser::new(["line", "candlestick", "ohlc"]).try_map(|s| s.parse::<ChartStyle>())
    )]
    style: ChartStyle,

    /// Time range preset
    #[arg(
        long,
        default_value = "full",
        value_parser = PossibleValuesParser::new(["full", "3m", "ytd"]).try_map(|s| s.parse::<Preset>())
    )]
    preset: Preset,

    /// Narrow the window to start on this date
    #[arg(long, value_parser = parse_day)]
    from: Option<NaiveDate>,

    /// Narrow the window to end on this date
    #[arg(long, value_parser = parse_day)]
    to: Option<NaiveDate>,

    /// Don't draw remark markers (the summary is still printed)
    #[arg(long)]
    hide_remarks: bool,

    /// Chart title (default: from labels)
    #[arg(long)]
    title: Option<String>,

    /// Chart subtitle (default: from labels)
    #[arg(long)]
    subtitle: Option<String>,

    /// Legend name for the stock (default: from labels)
    #[arg(long)]
    stock_label: Option<String>,

    /// Legend name for the index (default: from labels)
    #[arg(long)]
    index_label: Option<String>,

    /// Path to global_config.json
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Path to labels.json
    #[arg(long, default_value = DEFAULT_LABELS_FILE)]
    labels: PathBuf,

    /// Print the chart result as JSON to stdout
    #[arg(long)]
    json: bool,

    /// Write the Plotly figure JSON to a file
    #[arg(long)]
    output: Option<PathBuf>,
}

pub fn cmd_chart(args: ChartArgs) -> Result<(), CliError> {
    let config = GlobalConfig::load(&args.config).map_err(CliError::config)?;
    let tables = LabelTables::load(&args.labels).map_err(CliError::config)?;
    let labels = tables.for_code(config.language_code());
    debug!("labels: {} ({})", config.default_language, config.language_code());

    let stdin_count = [&args.stock, &args.index, &args.remarks]
        .into_iter()
        .filter(|p| is_stdin(p))
        .count();
    if stdin_count > 1 {
        return Err(CliError::args("only one of --stock, --index, --remarks can read stdin"));
    }

    let request = ChartRequest {
        instrument: Some(source_for(&args.stock)?),
        index: Some(source_for(&args.index)?),
        remarks: Some(source_for(&args.remarks)?),
        style: args.style,
        preset: args.preset,
        range_start: args.from,
        range_end: args.to,
        show_remarks: !args.hide_remarks,
        instrument_label: args.stock_label.unwrap_or_else(|| labels.get(LabelKey::LegendStock).to_string()),
        index_label: args.index_label.unwrap_or_else(|| labels.get(LabelKey::LegendNifty).to_string()),
        ..ChartRequest::default()
    };

    let output = run(&request);

    for message in &output.messages {
        match message.severity {
            Severity::Info => eprintln!("{}", message.text),
            Severity::Warning => eprintln!("warning: {}", message.text),
            Severity::Error => eprintln!("error: {}", message.text),
        }
    }

    if args.json {
        let json_str = serde_json::to_string_pretty(&output)
            .map_err(|e| CliError::internal(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    }

    if !output.plottable {
        return Err(CliError::new(EXIT_NO_DATA, "").with_hint("point --stock / --index at exchange CSV exports"));
    }

    if let Some(ref path) = args.output {
        let text = FigureText {
            title: args.title.unwrap_or_else(|| labels.get(LabelKey::ChartTitle).to_string()),
            subtitle: args.subtitle.unwrap_or_else(|| labels.get(LabelKey::ChartSubtitle).to_string()),
            instrument_label: request.instrument_label.clone(),
            index_label: request.index_label.clone(),
            ..FigureText::default()
        };
        write_figure(&output, &text, path)?;
    }

    print_summary(&output, &request, labels.get(LabelKey::NotesSummary));
    Ok(())
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == STDIN_MARKER
}

/// `-` becomes an uploaded payload read from stdin; anything else is a
/// default path that may be absent.
fn source_for(path: &Path) -> Result<InputSource, CliError> {
    if !is_stdin(path) {
        return Ok(InputSource::default_path(path));
    }
    let mut bytes = Vec::new();
    std::io::stdin()
        .read_to_end(&mut bytes)
        .map_err(|e| CliError::io(format!("cannot read stdin: {e}")))?;
    debug!("read {} bytes from stdin for {}", bytes.len(), path.display());
    Ok(InputSource::uploaded("stdin", bytes))
}

fn write_figure(output: &ChartOutput, text: &FigureText, path: &Path) -> Result<(), CliError> {
    let Some(figure) = build_figure(output, text) else {
        return Ok(());
    };
    let json_str = serde_json::to_string_pretty(&figure)
        .map_err(|e| CliError::internal(format!("JSON serialization error: {e}")))?;
    std::fs::write(path, json_str)
        .map_err(|e| CliError::io(format!("cannot write {}: {e}", path.display())))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

/// Human summary to stderr.
fn print_summary(output: &ChartOutput, request: &ChartRequest, notes_heading: &str) {
    let window = output.window.map(|w| w.to_string()).unwrap_or_else(|| "-".into());
    let names: Vec<&str> = output.price_traces().map(|t| t.name()).collect();
    eprintln!(
        "{} chart, {}: {} ({}), {} remark markers",
        request.style,
        request.preset,
        window,
        names.join(", "),
        output.marker_count(),
    );

    if !output.remarks_summary.is_empty() {
        eprintln!("{notes_heading}:");
        for line in &output.remarks_summary {
            eprintln!("  {line}");
        }
    }
}
