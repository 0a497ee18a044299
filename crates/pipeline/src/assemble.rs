use chrono::NaiveDate;
use log::debug;

use crate::columns::Canonical;
use crate::model::{Axis, ChartStyle, OhlcBars, Trace};
use crate::series::TabularSeries;

/// One series offered to the assembler.
pub struct SeriesInput<'a> {
    pub label: &'a str,
    pub axis: Axis,
    pub series: Option<&'a TabularSeries>,
}

/// Traces built so far and whether anything was plottable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assembly {
    pub traces: Vec<Trace>,
    pub plottable: bool,
}

impl Assembly {
    fn push(&mut self, trace: Trace) {
        self.traces.push(trace);
        self.plottable = true;
    }
}

/// Build one trace per plottable series, in input order.
///
/// Series without DATE + CLOSE, or without OPEN/HIGH/LOW for the bar
/// styles, are skipped silently. Empty series are skipped too.
pub fn assemble(inputs: &[SeriesInput<'_>], style: ChartStyle) -> Assembly {
    let mut assembly = Assembly::default();
    for input in inputs {
        match build_trace(input, style) {
            Some(trace) => assembly.push(trace),
            None => debug!("series '{}' not plottable as {style}", input.label),
        }
    }
    assembly
}

fn build_trace(input: &SeriesInput<'_>, style: ChartStyle) -> Option<Trace> {
    let series = input.series?;
    if series.is_empty() || !series.columns.is_plottable() {
        return None;
    }

    let x: Vec<NaiveDate> = series.dates().collect();
    let name = input.label.to_string();
    let axis = input.axis;

    match style {
        ChartStyle::Line => Some(Trace::Line { name, axis, x, y: series.column(Canonical::Close) }),
        ChartStyle::Candlestick => ohlc_bars(series, x).map(|bars| Trace::Candlestick { name, axis, bars }),
        ChartStyle::Ohlc => ohlc_bars(series, x).map(|bars| Trace::Ohlc { name, axis, bars }),
    }
}

fn ohlc_bars(series: &TabularSeries, x: Vec<NaiveDate>) -> Option<OhlcBars> {
    if !series.columns.has_ohlc() {
        return None;
    }
    Some(OhlcBars {
        x,
        open: series.column(Canonical::Open),
        high: series.column(Canonical::High),
        low: series.column(Canonical::Low),
        close: series.column(Canonical::Close),
    })
}
