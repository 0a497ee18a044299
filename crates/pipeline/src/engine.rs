use log::{info, warn};

use crate::assemble::{assemble, SeriesInput};
use crate::columns::ColumnAliasMap;
use crate::model::{Axis, ChartOutput, ChartRequest, Message};
use crate::remarks;
use crate::series::{clean_series, TabularSeries};
use crate::table::InputSource;
use crate::window::{available_range, DateWindow};

pub const NO_DATA_PROMPT: &str =
    "Upload valid CSVs or place default files (NIFTYBANK.csv, STOCK.csv) to get started.";

/// Run one render: load, clean, window, assemble, overlay remarks.
///
/// Never fails. Problems with individual inputs become messages and the
/// input is treated as absent.
pub fn run(request: &ChartRequest) -> ChartOutput {
    let mut out = ChartOutput::default();

    let instrument = load_series(request.instrument.as_ref(), &request.aliases, &mut out.messages);
    let index = load_series(request.index.as_ref(), &request.aliases, &mut out.messages);

    out.available = available_range(instrument.iter().chain(index.iter()));
    out.window = out.available.map(|available| resolve_window(request, &available, &mut out.messages));

    let (instrument, index) = match out.window {
        Some(ref w) => (
            instrument.map(|s| s.filtered(w)),
            index.map(|s| s.filtered(w)),
        ),
        None => (instrument, index),
    };

    let inputs = [
        SeriesInput {
            label: &request.instrument_label,
            axis: Axis::Left,
            series: instrument.as_ref(),
        },
        SeriesInput {
            label: &request.index_label,
            axis: Axis::Right,
            series: index.as_ref(),
        },
    ];
    let assembly = assemble(&inputs, request.style);
    out.traces = assembly.traces;
    out.plottable = assembly.plottable;

    if let Some(ref source) = request.remarks {
        let overlay = remarks::overlay(source, out.window.as_ref(), request.show_remarks);
        out.traces.extend(overlay.markers);
        out.remarks_summary = overlay.summary;
        out.messages.extend(overlay.messages);
    }

    if !out.plottable {
        out.messages.push(Message::info(NO_DATA_PROMPT));
    }

    info!(
        "render: {} price traces, {} remark markers, window {}",
        out.price_traces().count(),
        out.marker_count(),
        out.window.map(|w| w.to_string()).unwrap_or_else(|| "none".into()),
    );
    out
}

fn load_series(
    source: Option<&InputSource>,
    aliases: &ColumnAliasMap,
    messages: &mut Vec<Message>,
) -> Option<TabularSeries> {
    let source = source?;
    match source.load() {
        Ok(Some(table)) => {
            let (series, stats) = clean_series(&table, aliases);
            if stats.dropped() > 0 {
                info!("{}: kept {} rows, dropped {}", source.display_name(), series.rows.len(), stats.dropped());
            }
            Some(series)
        }
        Ok(None) => None,
        Err(e) => {
            warn!("{}: {e}", source.display_name());
            messages.push(Message::error(format!("Error reading {}: {e}", source.display_name())));
            None
        }
    }
}

/// Preset window, or the explicit range clamped into the available range.
/// An omitted bound keeps the preset's. A bad explicit range is reported and
/// the preset window is used instead.
fn resolve_window(request: &ChartRequest, available: &DateWindow, messages: &mut Vec<Message>) -> DateWindow {
    let preset = request.preset.resolve(available);
    if request.range_start.is_none() && request.range_end.is_none() {
        return preset;
    }
    let start = request.range_start.unwrap_or(preset.start);
    let end = request.range_end.unwrap_or(preset.end);
    match available.narrow(Some(start), Some(end)) {
        Ok(w) => w,
        Err(e) => {
            messages.push(Message::warning(format!("Ignoring date range: {e}")));
            preset
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChartStyle, Severity, Trace};
    use crate::window::Preset;
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn upload(name: &str, csv: &str) -> Option<InputSource> {
        Some(InputSource::uploaded(name, csv.as_bytes().to_vec()))
    }

    const STOCK: &str = "Date,Open,High,Low,Close\n\
        01/01/2024,10,12,9,11\n\
        01/03/2024,11,13,10,12\n\
        30/06/2024,12,14,11,13\n";
    const INDEX: &str = "Date,Close Price\n2024-01-15,100\n2024-05-01,110\n";
    const REMARKS: &str = "Date,Comment\n2024-01-02,Early\n2024-05-02,Late\n";

    fn request() -> ChartRequest {
        ChartRequest {
            instrument: upload("STOCK.csv", STOCK),
            index: upload("NIFTYBANK.csv", INDEX),
            remarks: upload("REMARKS.csv", REMARKS),
            ..ChartRequest::default()
        }
    }

    #[test]
    fn full_render() {
        let out = run(&request());
        assert!(out.plottable);
        assert_eq!(out.available, Some(DateWindow::new(ymd(2024, 1, 1), ymd(2024, 6, 30))));
        assert_eq!(out.window, out.available);
        assert_eq!(out.price_traces().count(), 2);
        assert_eq!(out.marker_count(), 2);
        assert_eq!(out.remarks_summary, vec!["2024-01-02: Early", "2024-05-02: Late"]);
        assert!(out.messages.is_empty());
    }

    #[test]
    fn preset_filters_series_and_remarks() {
        let req = ChartRequest { preset: Preset::LastThreeMonths, ..request() };
        let out = run(&req);
        assert_eq!(out.window, Some(DateWindow::new(ymd(2024, 4, 1), ymd(2024, 6, 30))));
        match &out.traces[0] {
            Trace::Line { x, .. } => assert_eq!(x, &vec![ymd(2024, 6, 30)]),
            other => panic!("expected line, got {other:?}"),
        }
        assert_eq!(out.remarks_summary, vec!["2024-05-02: Late"]);
    }

    #[test]
    fn explicit_range_narrows() {
        let req = ChartRequest {
            range_start: Some(ymd(2024, 1, 10)),
            range_end: Some(ymd(2024, 3, 1)),
            ..request()
        };
        let out = run(&req);
        assert_eq!(out.window, Some(DateWindow::new(ymd(2024, 1, 10), ymd(2024, 3, 1))));
        assert!(out.remarks_summary.is_empty());
    }

    #[test]
    fn explicit_range_reaches_before_preset() {
        let req = ChartRequest {
            preset: Preset::LastThreeMonths,
            range_start: Some(ymd(2024, 1, 1)),
            range_end: Some(ymd(2024, 6, 30)),
            ..request()
        };
        let out = run(&req);
        assert_eq!(out.window, Some(DateWindow::new(ymd(2024, 1, 1), ymd(2024, 6, 30))));
        assert_eq!(out.remarks_summary.len(), 2);
    }

    #[test]
    fn lone_bound_keeps_preset_end() {
        let req = ChartRequest {
            preset: Preset::LastThreeMonths,
            range_start: Some(ymd(2023, 6, 1)),
            ..request()
        };
        let out = run(&req);
        // Clamped to the first available day.
        assert_eq!(out.window, Some(DateWindow::new(ymd(2024, 1, 1), ymd(2024, 6, 30))));
    }

    #[test]
    fn inverted_range_warns_and_keeps_preset() {
        let req = ChartRequest {
            range_start: Some(ymd(2024, 3, 1)),
            range_end: Some(ymd(2024, 1, 10)),
            ..request()
        };
        let out = run(&req);
        assert_eq!(out.window, out.available);
        assert_eq!(out.warnings().count(), 1);
    }

    #[test]
    fn malformed_remarks_do_not_stop_chart() {
        let req = ChartRequest { remarks: upload("REMARKS.csv", "Date,Note\n2024-01-02,x\n"), ..request() };
        let out = run(&req);
        assert!(out.plottable);
        assert_eq!(out.price_traces().count(), 2);
        assert_eq!(out.marker_count(), 0);
        assert_eq!(out.messages.len(), 1);
        assert_eq!(out.messages[0].severity, Severity::Warning);
    }

    #[test]
    fn absent_remarks_file_reported_chart_continues() {
        let dir = tempfile::tempdir().unwrap();
        let req = ChartRequest {
            remarks: Some(InputSource::default_path(dir.path().join("REMARKS.csv"))),
            ..request()
        };
        let out = run(&req);
        assert!(out.plottable);
        assert_eq!(out.price_traces().count(), 2);
        assert_eq!(out.marker_count(), 0);
        assert_eq!(out.messages.len(), 1);
        assert_eq!(out.messages[0].severity, Severity::Error);
        assert!(out.messages[0].text.starts_with("Error reading notes file"));
    }

    #[test]
    fn only_index_plottable() {
        let req = ChartRequest { instrument: upload("STOCK.csv", "Date,Close\n"), ..request() };
        let out = run(&req);
        assert!(out.plottable);
        let prices: Vec<&Trace> = out.price_traces().collect();
        assert_eq!(prices.len(), 1);
        assert_eq!(prices[0].axis(), Some(Axis::Right));
    }

    #[test]
    fn no_data_reports_prompt_and_keeps_remarks() {
        let req = ChartRequest { instrument: None, index: None, ..request() };
        let out = run(&req);
        assert!(!out.plottable);
        assert!(out.window.is_none());
        assert_eq!(out.price_traces().count(), 0);
        assert_eq!(out.remarks_summary.len(), 2);
        assert_eq!(out.messages.last(), Some(&Message::info(NO_DATA_PROMPT)));
    }

    #[test]
    fn candlestick_skips_close_only_index() {
        let req = ChartRequest { style: ChartStyle::Candlestick, show_remarks: false, ..request() };
        let out = run(&req);
        assert_eq!(out.traces.len(), 1);
        assert!(matches!(out.traces[0], Trace::Candlestick { .. }));
        assert_eq!(out.remarks_summary.len(), 2);
    }

    #[test]
    fn unreadable_price_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let req = ChartRequest {
            instrument: Some(InputSource::default_path(dir.path())),
            ..request()
        };
        let out = run(&req);
        assert!(out.plottable);
        assert_eq!(out.price_traces().count(), 1);
        assert!(out.messages.iter().any(|m| m.severity == Severity::Error));
    }
}
