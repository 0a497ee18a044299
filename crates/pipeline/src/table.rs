// CSV ingestion: input sources, decoding, delimiter sniffing.

use std::path::{Path, PathBuf};

use log::debug;

use crate::columns::normalize_headers;
use crate::error::PipelineError;

/// Where one input table comes from, resolved once before the pipeline runs.
#[derive(Debug, Clone)]
pub enum InputSource {
    /// Bytes supplied directly by the user (upload, stdin).
    Uploaded { name: String, bytes: Vec<u8> },
    /// Fallback file on disk. Absence is "no input", not an error.
    DefaultPath(PathBuf),
}

impl InputSource {
    pub fn uploaded(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::Uploaded { name: name.into(), bytes }
    }

    pub fn default_path(path: impl Into<PathBuf>) -> Self {
        Self::DefaultPath(path.into())
    }

    /// Short name for messages.
    pub fn display_name(&self) -> String {
        match self {
            Self::Uploaded { name, .. } => name.clone(),
            Self::DefaultPath(path) => path.display().to_string(),
        }
    }

    /// Load the table, or `None` when a default file is not present.
    pub fn load(&self) -> Result<Option<RawTable>, PipelineError> {
        match self {
            Self::Uploaded { bytes, .. } => RawTable::from_bytes(bytes).map(Some),
            Self::DefaultPath(path) => {
                if !path.exists() {
                    debug!("default file {} not found, treating as no input", path.display());
                    return Ok(None);
                }
                RawTable::from_path(path).map(Some)
            }
        }
    }
}

/// Header row plus string cells, in file column order.
///
/// Column order is preserved because alias matching is first-match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn from_path(path: &Path) -> Result<Self, PipelineError> {
        let bytes = std::fs::read(path)
            .map_err(|e| PipelineError::Io(format!("cannot read {}: {e}", path.display())))?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PipelineError> {
        let content = decode_utf8(bytes);
        Self::from_str_content(&content)
    }

    pub fn from_str_content(content: &str) -> Result<Self, PipelineError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let delimiter = sniff_delimiter(content);

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
        let width = headers.len();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let mut row: Vec<String> = record.iter().take(width).map(|c| c.to_string()).collect();
            row.resize(width, String::new());
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }

    /// Same table with every header run through the column normalizer.
    pub fn normalized(mut self) -> Self {
        self.headers = normalize_headers(&self.headers);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Decode as UTF-8, falling back to Windows-1252 (Excel-exported CSVs).
pub fn decode_utf8(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            decoded.into_owned()
        }
    }
}

/// Non-blank lines read when guessing the delimiter.
const SNIFF_LINES: usize = 10;

/// Guess the delimiter of a price or remarks export.
///
/// Broker downloads use commas, sheets pasted from a spreadsheet use tabs,
/// and decimal-comma locales write semicolons. A candidate must split the
/// header row in two or more; the winner is the one whose data rows most
/// often match the header's width, first candidate on ties. Comma otherwise.
fn sniff_delimiter(content: &str) -> u8 {
    const CANDIDATES: [u8; 4] = [b'\t', b';', b',', b'|'];

    let mut lines = content.lines().filter(|l| !l.trim().is_empty()).take(SNIFF_LINES);
    let Some(header) = lines.next() else {
        return b',';
    };
    let rows: Vec<&str> = lines.collect();

    let mut best = (b',', 0usize);
    for delim in CANDIDATES {
        let width = field_count(header, delim);
        if width < 2 {
            continue;
        }
        let matching = 1 + rows.iter().filter(|row| field_count(row, delim) == width).count();
        let score = matching * width;
        if score > best.1 {
            best = (delim, score);
        }
    }
    best.0
}

/// Fields in one line under `delim`, honoring quotes.
fn field_count(line: &str, delim: u8) -> usize {
    csv::ReaderBuilder::new()
        .delimiter(delim)
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes())
        .records()
        .next()
        .and_then(|r| r.ok())
        .map_or(1, |r| r.len())
}
