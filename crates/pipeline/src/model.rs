use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use crate::columns::ColumnAliasMap;
use crate::error::PipelineError;
use crate::table::InputSource;
use crate::window::{DateWindow, Preset};

// ---------------------------------------------------------------------------
// Chart style
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ChartStyle {
    #[default]
    Line,
    Candlestick,
    #[serde(rename = "OHLC")]
    Ohlc,
}

impl std::fmt::Display for ChartStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Line => write!(f, "Line"),
            Self::Candlestick => write!(f, "Candlestick"),
            Self::Ohlc => write!(f, "OHLC"),
        }
    }
}

impl FromStr for ChartStyle {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "line" => Ok(Self::Line),
            "candlestick" | "candle" => Ok(Self::Candlestick),
            "ohlc" => Ok(Self::Ohlc),
            _ => Err(PipelineError::UnknownStyle(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Traces
// ---------------------------------------------------------------------------

/// Vertical axis a trace is drawn against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Axis {
    /// Primary instrument.
    #[serde(rename = "y1")]
    Left,
    /// Reference index.
    #[serde(rename = "y2")]
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OhlcBars {
    pub x: Vec<NaiveDate>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
}

/// One renderable plot element.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Trace {
    /// Close prices joined by a line, with point markers.
    Line { name: String, axis: Axis, x: Vec<NaiveDate>, y: Vec<f64> },
    Candlestick {
        name: String,
        axis: Axis,
        #[serde(flatten)]
        bars: OhlcBars,
    },
    Ohlc {
        name: String,
        axis: Axis,
        #[serde(flatten)]
        bars: OhlcBars,
    },
    /// Zero-height marker carrying a remark as hover text.
    RemarkMarker { date: NaiveDate, text: String },
}

impl Trace {
    /// Axis for price traces; remark markers float on the shared x-axis.
    pub fn axis(&self) -> Option<Axis> {
        match self {
            Self::Line { axis, .. } | Self::Candlestick { axis, .. } | Self::Ohlc { axis, .. } => {
                Some(*axis)
            }
            Self::RemarkMarker { .. } => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Line { name, .. } | Self::Candlestick { name, .. } | Self::Ohlc { name, .. } => name,
            Self::RemarkMarker { .. } => "Note",
        }
    }

    pub fn is_marker(&self) -> bool {
        matches!(self, Self::RemarkMarker { .. })
    }
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Text the shell displays verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub severity: Severity,
    pub text: String,
}

impl Message {
    pub fn info(text: impl Into<String>) -> Self {
        Self { severity: Severity::Info, text: text.into() }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self { severity: Severity::Warning, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { severity: Severity::Error, text: text.into() }
    }
}

// ---------------------------------------------------------------------------
// Request / output
// ---------------------------------------------------------------------------

/// Everything the shell selected for one render.
#[derive(Debug, Clone)]
pub struct ChartRequest {
    pub instrument: Option<InputSource>,
    pub index: Option<InputSource>,
    pub remarks: Option<InputSource>,
    pub style: ChartStyle,
    pub preset: Preset,
    /// Explicit selection, clamped into the available range (inclusive).
    pub range_start: Option<NaiveDate>,
    pub range_end: Option<NaiveDate>,
    pub show_remarks: bool,
    pub instrument_label: String,
    pub index_label: String,
    pub aliases: ColumnAliasMap,
}

impl Default for ChartRequest {
    fn default() -> Self {
        Self {
            instrument: None,
            index: None,
            remarks: None,
            style: ChartStyle::Line,
            preset: Preset::FullRange,
            range_start: None,
            range_end: None,
            show_remarks: true,
            instrument_label: "Stock".to_string(),
            index_label: "Index".to_string(),
            aliases: ColumnAliasMap::default(),
        }
    }
}

/// Result of one render.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChartOutput {
    /// Min/max date over the price series, `None` when there is no data.
    pub available: Option<DateWindow>,
    /// Window every series and remark was filtered to.
    pub window: Option<DateWindow>,
    pub traces: Vec<Trace>,
    /// At least one price trace was emitted.
    pub plottable: bool,
    /// `YYYY-MM-DD: comment`, one per remark in the window.
    pub remarks_summary: Vec<String>,
    pub messages: Vec<Message>,
}

impl ChartOutput {
    pub fn price_traces(&self) -> impl Iterator<Item = &Trace> {
        self.traces.iter().filter(|t| !t.is_marker())
    }

    pub fn marker_count(&self) -> usize {
        self.traces.iter().filter(|t| t.is_marker()).count()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| m.severity != Severity::Info)
    }
}
