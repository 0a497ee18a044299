//! Plotly-compatible figure document for a rendered chart.
//!
//! The pipeline only emits data; this module maps traces and axes onto the
//! `{ "data": [...], "layout": {...} }` shape a Plotly front end consumes.

use serde_json::{json, Value};

use crate::model::{Axis, ChartOutput, Trace};

pub const FIGURE_HEIGHT: u32 = 750;

/// Text shown around the chart.
#[derive(Debug, Clone)]
pub struct FigureText {
    pub title: String,
    pub subtitle: String,
    pub instrument_label: String,
    pub index_label: String,
    /// Suffix for axis titles, e.g. `₹`.
    pub currency: String,
}

impl Default for FigureText {
    fn default() -> Self {
        Self {
            title: "Price Chart".into(),
            subtitle: String::new(),
            instrument_label: "Stock".into(),
            index_label: "Index".into(),
            currency: "₹".into(),
        }
    }
}

fn axis_ref(axis: Axis) -> &'static str {
    match axis {
        Axis::Left => "y",
        Axis::Right => "y2",
    }
}

fn trace_json(trace: &Trace) -> Value {
    match trace {
        Trace::Line { name, axis, x, y } => json!({
            "type": "scatter",
            "mode": "lines+markers",
            "name": name,
            "x": x,
            "y": y,
            "yaxis": axis_ref(*axis),
        }),
        Trace::Candlestick { name, axis, bars } | Trace::Ohlc { name, axis, bars } => {
            let kind = if matches!(trace, Trace::Candlestick { .. }) { "candlestick" } else { "ohlc" };
            json!({
                "type": kind,
                "name": name,
                "x": bars.x,
                "open": bars.open,
                "high": bars.high,
                "low": bars.low,
                "close": bars.close,
                "yaxis": axis_ref(*axis),
            })
        }
        Trace::RemarkMarker { date, text } => json!({
            "type": "scatter",
            "mode": "markers",
            "name": "Note",
            "x": [date],
            "y": [Value::Null],
            "marker": { "size": 10, "color": "orange", "symbol": "circle" },
            "hoverinfo": "text",
            "hovertext": text,
        }),
    }
}

/// Build the figure. Returns `None` when nothing is plottable; the shell
/// shows its guidance prompt instead.
pub fn build_figure(output: &ChartOutput, text: &FigureText) -> Option<Value> {
    if !output.plottable {
        return None;
    }

    let data: Vec<Value> = output.traces.iter().map(trace_json).collect();
    let layout = json!({
        "title": {
            "text": format!("<b>{}</b><br><sub>{}</sub>", text.title, text.subtitle),
            "x": 0.5,
        },
        "xaxis": { "title": "Date" },
        "yaxis": {
            "title": format!("{} ({})", text.instrument_label, text.currency),
            "side": "left",
        },
        "yaxis2": {
            "title": format!("{} ({})", text.index_label, text.currency),
            "overlaying": "y",
            "side": "right",
            "showgrid": false,
        },
        "legend": { "orientation": "h", "y": -0.2 },
        "height": FIGURE_HEIGHT,
    });

    Some(json!({ "data": data, "layout": layout }))
}
