// Remarks file maintenance: REMARKS.csv with `Date,Comment` columns.
//
// Plain read-modify-write of the whole file. No locking: two writers racing
// on the same file can lose an update.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::debug;
use serde::Serialize;

use crate::error::PipelineError;
use crate::table::RawTable;

pub const DEFAULT_REMARKS_FILE: &str = "REMARKS.csv";

const DATE_HEADER: &str = "Date";
const COMMENT_HEADER: &str = "Comment";

/// A stored remark. The date is kept as written so deletes match the file text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredRemark {
    pub date: String,
    pub comment: String,
}

#[derive(Debug, Clone)]
pub struct RemarksStore {
    path: PathBuf,
    remarks: Vec<StoredRemark>,
}

impl RemarksStore {
    /// Load the store. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PipelineError> {
        let path = path.into();
        if !path.exists() {
            debug!("{} not found, starting empty", path.display());
            return Ok(Self { path, remarks: Vec::new() });
        }
        let table = RawTable::from_path(&path)?;
        let remarks = Self::remarks_from_table(&table)?;
        Ok(Self { path, remarks })
    }

    /// Headers are trimmed and capitalized (`date` → `Date`); rows with an
    /// empty Date or Comment are dropped.
    fn remarks_from_table(table: &RawTable) -> Result<Vec<StoredRemark>, PipelineError> {
        let headers: Vec<String> = table.headers.iter().map(|h| capitalize(h.trim())).collect();
        let idx = |name: &str| -> Result<usize, PipelineError> {
            headers.iter().position(|h| h == name).ok_or_else(|| PipelineError::MissingColumn {
                table: "remarks".into(),
                column: name.into(),
            })
        };
        let date_idx = idx(DATE_HEADER)?;
        let comment_idx = idx(COMMENT_HEADER)?;

        Ok(table
            .rows
            .iter()
            .filter(|cells| !cells[date_idx].is_empty() && !cells[comment_idx].is_empty())
            .map(|cells| StoredRemark {
                date: cells[date_idx].clone(),
                comment: cells[comment_idx].clone(),
            })
            .collect())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.remarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remarks.is_empty()
    }

    /// Remarks in file order.
    pub fn remarks(&self) -> &[StoredRemark] {
        &self.remarks
    }

    /// Remarks ordered by date text (stable for equal dates).
    pub fn sorted(&self) -> Vec<&StoredRemark> {
        let mut sorted: Vec<&StoredRemark> = self.remarks.iter().collect();
        sorted.sort_by(|a, b| a.date.cmp(&b.date));
        sorted
    }

    /// Append a remark dated `YYYY-MM-DD`. Returns `false` when the exact
    /// (date, comment) pair already existed.
    pub fn add(&mut self, date: NaiveDate, comment: &str) -> Result<bool, PipelineError> {
        let comment = comment.trim();
        if comment.is_empty() {
            return Err(PipelineError::InvalidRemark("comment is empty".into()));
        }
        let remark = StoredRemark {
            date: date.format("%Y-%m-%d").to_string(),
            comment: comment.to_string(),
        };
        let before = self.remarks.len();
        self.remarks.push(remark);
        self.dedupe();
        Ok(self.remarks.len() > before)
    }

    /// Remove every remark whose date and comment equal the trimmed inputs.
    /// Returns the number removed.
    pub fn delete(&mut self, date: &str, comment: &str) -> usize {
        let (date, comment) = (date.trim(), comment.trim());
        let before = self.remarks.len();
        self.remarks.retain(|r| !(r.date == date && r.comment == comment));
        before - self.remarks.len()
    }

    /// Keep the first occurrence of each (date, comment) pair.
    fn dedupe(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.remarks.retain(|r| seen.insert((r.date.clone(), r.comment.clone())));
    }

    /// Rewrite the whole file.
    pub fn save(&self) -> Result<(), PipelineError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = csv::Writer::from_path(&self.path)?;
        writer.write_record([DATE_HEADER, COMMENT_HEADER])?;
        for r in &self.remarks {
            writer.write_record([&r.date, &r.comment])?;
        }
        writer.flush()?;
        debug!("wrote {} remarks to {}", self.remarks.len(), self.path.display());
        Ok(())
    }
}

/// First character upper-cased, the rest lower-cased.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = RemarksStore::open(dir.path().join(DEFAULT_REMARKS_FILE)).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn headers_capitalized_and_blank_rows_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("r.csv");
        std::fs::write(&path, " DATE ,comment\n2024-01-05,Results\n,orphan\n2024-01-06,\n").unwrap();
        let store = RemarksStore::open(&path).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.remarks()[0].comment, "Results");
    }

    #[test]
    fn wrong_columns_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("r.csv");
        std::fs::write(&path, "Date,Note\n2024-01-05,x\n").unwrap();
        let err = RemarksStore::open(&path).unwrap_err();
        assert!(err.to_string().contains("Comment"));
    }

    #[test]
    fn add_trims_and_dedupes() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = RemarksStore::open(dir.path().join("r.csv")).unwrap();
        assert!(store.add(ymd(2024, 1, 5), "  Results  ").unwrap());
        assert!(!store.add(ymd(2024, 1, 5), "Results").unwrap());
        assert!(store.add(ymd(2024, 1, 5), "Other").unwrap());
        assert_eq!(store.len(), 2);
        assert_eq!(store.remarks()[0], StoredRemark { date: "2024-01-05".into(), comment: "Results".into() });
    }

    #[test]
    fn add_rejects_blank_comment() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = RemarksStore::open(dir.path().join("r.csv")).unwrap();
        assert!(matches!(store.add(ymd(2024, 1, 5), "   "), Err(PipelineError::InvalidRemark(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn delete_matches_exact_text() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = RemarksStore::open(dir.path().join("r.csv")).unwrap();
        store.add(ymd(2024, 1, 5), "Results").unwrap();
        store.add(ymd(2024, 2, 5), "Dividend").unwrap();
        assert_eq!(store.delete("2024-01-05", "results"), 0);
        assert_eq!(store.delete(" 2024-01-05 ", " Results "), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn sorted_by_date() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = RemarksStore::open(dir.path().join("r.csv")).unwrap();
        store.add(ymd(2024, 3, 1), "c").unwrap();
        store.add(ymd(2024, 1, 1), "a").unwrap();
        store.add(ymd(2024, 2, 1), "b").unwrap();
        let comments: Vec<&str> = store.sorted().iter().map(|r| r.comment.as_str()).collect();
        assert_eq!(comments, vec!["a", "b", "c"]);
        // File order untouched.
        assert_eq!(store.remarks()[0].comment, "c");
    }

    #[test]
    fn save_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("REMARKS.csv");
        let mut store = RemarksStore::open(&path).unwrap();
        store.add(ymd(2024, 1, 5), "Results, Q3").unwrap();
        store.save().unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Date,Comment\n"));
        assert!(text.contains("\"Results, Q3\""));

        let reopened = RemarksStore::open(&path).unwrap();
        assert_eq!(reopened.remarks(), store.remarks());
    }

    #[test]
    fn capitalize_matches_header_convention() {
        assert_eq!(capitalize("DATE"), "Date");
        assert_eq!(capitalize("comment"), "Comment");
        assert_eq!(capitalize(""), "");
    }
}
