use chrono::NaiveDate;
use log::{debug, warn};
use serde::Serialize;

use crate::columns::first_match;
use crate::dates::{parse_date, DateOrder};
use crate::error::PipelineError;
use crate::model::{Message, Trace};
use crate::table::{InputSource, RawTable};
use crate::window::DateWindow;

pub const MISSING_COLUMNS_WARNING: &str = "Notes file must contain 'Date' and 'Comment' columns.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemarkEntry {
    pub date: NaiveDate,
    pub comment: String,
}

impl RemarkEntry {
    /// `YYYY-MM-DD: comment`
    pub fn summary_line(&self) -> String {
        format!("{}: {}", self.date, self.comment)
    }
}

/// What the remarks file contributes to one render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemarksOverlay {
    pub markers: Vec<Trace>,
    pub summary: Vec<String>,
    pub messages: Vec<Message>,
}

/// Extract remark entries from a table whose headers resolve to DATE and
/// COMMENT (case and spacing insensitive). Rows with an unparseable date or
/// an empty comment are dropped.
pub fn parse_remarks(table: &RawTable) -> Result<Vec<RemarkEntry>, PipelineError> {
    let table = table.clone().normalized();
    let date_col = first_match(&table.headers, &["DATE"]).ok_or_else(|| PipelineError::MissingColumn {
        table: "remarks".into(),
        column: "Date".into(),
    })?;
    let comment_col = first_match(&table.headers, &["COMMENT"]).ok_or_else(|| PipelineError::MissingColumn {
        table: "remarks".into(),
        column: "Comment".into(),
    })?;

    let mut dropped = 0usize;
    let entries: Vec<RemarkEntry> = table
        .rows
        .iter()
        .filter_map(|cells| {
            let comment = cells[comment_col].trim();
            let date = parse_date(&cells[date_col], DateOrder::MonthFirst).ok();
            match date {
                Some(date) if !comment.is_empty() => Some(RemarkEntry { date, comment: comment.to_string() }),
                _ => {
                    dropped += 1;
                    None
                }
            }
        })
        .collect();

    if dropped > 0 {
        debug!("dropped {dropped} unusable remark rows");
    }
    Ok(entries)
}

/// Load remarks, filter them to the window, and build markers + summary.
///
/// Never fails: a malformed file yields a warning, a missing or unreadable
/// file an error message, and in every case no markers. With no window (no
/// price data) every valid entry is kept.
pub fn overlay(source: &InputSource, window: Option<&DateWindow>, show_markers: bool) -> RemarksOverlay {
    let mut out = RemarksOverlay::default();

    let table = match source.load() {
        Ok(Some(table)) => table,
        Ok(None) => {
            warn!("remarks file {} not found", source.display_name());
            out.messages.push(Message::error(format!(
                "Error reading notes file: {}: file not found",
                source.display_name()
            )));
            return out;
        }
        Err(e) => {
            warn!("remarks file {}: {e}", source.display_name());
            out.messages.push(Message::error(format!("Error reading notes file: {e}")));
            return out;
        }
    };

    let entries = match parse_remarks(&table) {
        Ok(entries) => entries,
        Err(PipelineError::MissingColumn { .. }) => {
            out.messages.push(Message::warning(MISSING_COLUMNS_WARNING));
            return out;
        }
        Err(e) => {
            out.messages.push(Message::error(format!("Error reading notes file: {e}")));
            return out;
        }
    };

    let in_window: Vec<&RemarkEntry> = entries
        .iter()
        .filter(|e| window.map_or(true, |w| w.contains(e.date)))
        .collect();

    if show_markers {
        out.markers = in_window
            .iter()
            .map(|e| Trace::RemarkMarker { date: e.date, text: e.comment.clone() })
            .collect();
    }
    out.summary = in_window.iter().map(|e| e.summary_line()).collect();
    out
}
