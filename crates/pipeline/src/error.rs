use std::fmt;

#[derive(Debug)]
pub enum PipelineError {
    /// File read / write error.
    Io(String),
    /// Malformed CSV (bad quoting, unreadable record).
    Csv(String),
    /// Required column absent from a table.
    MissingColumn { table: String, column: String },
    /// Value could not be parsed as a calendar date.
    DateParse(String),
    /// Preset name not recognized.
    UnknownPreset(String),
    /// Chart style name not recognized.
    UnknownStyle(String),
    /// Explicit range with start after end.
    InvertedRange { start: chrono::NaiveDate, end: chrono::NaiveDate },
    /// Remark rejected before it reached the store.
    InvalidRemark(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "IO error: {msg}"),
            Self::Csv(msg) => write!(f, "CSV error: {msg}"),
            Self::MissingColumn { table, column } => {
                write!(f, "{table}: missing column '{column}'")
            }
            Self::DateParse(value) => write!(f, "cannot parse date '{value}'"),
            Self::UnknownPreset(name) => write!(
                f,
                "unknown preset: \"{name}\" (expected \"Full Range\", \"Last 3 Months\" or \"Year to Date\")"
            ),
            Self::UnknownStyle(name) => write!(
                f,
                "unknown chart style: \"{name}\" (expected \"Line\", \"Candlestick\" or \"OHLC\")"
            ),
            Self::InvertedRange { start, end } => {
                write!(f, "range start {start} is after range end {end}")
            }
            Self::InvalidRemark(msg) => write!(f, "invalid remark: {msg}"),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<std::io::Error> for PipelineError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<csv::Error> for PipelineError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e.to_string())
    }
}
