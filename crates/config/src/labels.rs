// Per-language UI labels
// Loaded from ./labels.json: { "en": { "page_title": "...", ... }, "ta": { ... } }

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::debug;

use crate::{strip_comment_lines, ConfigError};

pub const DEFAULT_LABELS_FILE: &str = "labels.json";

const FALLBACK_CODE: &str = "en";

/// Every label the dashboards read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelKey {
    PageTitle,
    UploadNifty,
    UploadStock,
    UploadNotes,
    ShowNotes,
    ChartTitle,
    ChartSubtitle,
    LegendNifty,
    LegendStock,
    Preset,
    SliderLabel,
    NotesSummary,
    AnnotationText,
}

impl LabelKey {
    pub const ALL: [LabelKey; 13] = [
        Self::PageTitle,
        Self::UploadNifty,
        Self::UploadStock,
        Self::UploadNotes,
        Self::ShowNotes,
        Self::ChartTitle,
        Self::ChartSubtitle,
        Self::LegendNifty,
        Self::LegendStock,
        Self::Preset,
        Self::SliderLabel,
        Self::NotesSummary,
        Self::AnnotationText,
    ];

    /// Key as written in labels.json.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PageTitle => "page_title",
            Self::UploadNifty => "upload_nifty",
            Self::UploadStock => "upload_stock",
            Self::UploadNotes => "upload_notes",
            Self::ShowNotes => "show_notes",
            Self::ChartTitle => "chart_title",
            Self::ChartSubtitle => "chart_subtitle",
            Self::LegendNifty => "legend_nifty",
            Self::LegendStock => "legend_stock",
            Self::Preset => "preset",
            Self::SliderLabel => "slider_label",
            Self::NotesSummary => "notes_summary",
            Self::AnnotationText => "annotation_text",
        }
    }

    /// Built-in English text, used when no table has the key.
    pub fn builtin(&self) -> &'static str {
        match self {
            Self::PageTitle => "Stock vs Index Chart",
            Self::UploadNifty => "Upload index CSV",
            Self::UploadStock => "Upload stock CSV",
            Self::UploadNotes => "Upload remarks CSV",
            Self::ShowNotes => "Show remarks",
            Self::ChartTitle => "Stock vs Index",
            Self::ChartSubtitle => "Daily closing prices",
            Self::LegendNifty => "NIFTY BANK",
            Self::LegendStock => "Stock",
            Self::Preset => "Time range",
            Self::SliderLabel => "Select date range",
            Self::NotesSummary => "Remarks summary",
            Self::AnnotationText => "Remarks",
        }
    }
}

/// All label tables, keyed by language code.
#[derive(Debug, Clone, Default)]
pub struct LabelTables {
    tables: HashMap<String, HashMap<String, String>>,
}

impl LabelTables {
    /// Load from disk. A missing file gives empty tables (built-ins only).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!("{} not found, using built-in labels", path.display());
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json(&contents).map_err(|e| match e {
            ConfigError::Parse(msg) => ConfigError::Parse(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        let tables = serde_json::from_str(&strip_comment_lines(contents))
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        Ok(Self { tables })
    }

    /// Labels for one language code.
    pub fn for_code(&self, code: &str) -> Labels<'_> {
        Labels {
            primary: self.tables.get(code),
            fallback: self.tables.get(FALLBACK_CODE),
        }
    }
}

/// Label lookup for one language: its table, then English, then built-ins.
#[derive(Debug, Clone, Copy)]
pub struct Labels<'a> {
    primary: Option<&'a HashMap<String, String>>,
    fallback: Option<&'a HashMap<String, String>>,
}

impl<'a> Labels<'a> {
    pub fn get(&self, key: LabelKey) -> &'a str {
        let k = key.as_str();
        self.primary
            .and_then(|t| t.get(k))
            .or_else(|| self.fallback.and_then(|t| t.get(k)))
            .map(String::as_str)
            .unwrap_or_else(|| key.builtin())
    }
}
