use chrono::NaiveDate;
use log::debug;
use serde::Serialize;

use crate::columns::{Canonical, ColumnAliasMap, ColumnMatch};
use crate::dates::{parse_date, DateOrder};
use crate::table::RawTable;
use crate::window::DateWindow;

/// One cleaned row. A field is `None` only when its column was not resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceRow {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
}

impl PriceRow {
    pub fn value(&self, field: Canonical) -> Option<f64> {
        match field {
            Canonical::Date => None,
            Canonical::Open => self.open,
            Canonical::High => self.high,
            Canonical::Low => self.low,
            Canonical::Close => self.close,
        }
    }
}

/// Date-indexed price rows plus the canonical fields the source resolved.
/// Duplicate dates are kept; file order is kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TabularSeries {
    pub columns: ColumnMatch,
    pub rows: Vec<PriceRow>,
}

/// Counts of what cleaning threw away.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanStats {
    pub missing_value: usize,
    pub bad_date: usize,
    pub bad_number: usize,
}

impl CleanStats {
    pub fn dropped(&self) -> usize {
        self.missing_value + self.bad_date + self.bad_number
    }
}

impl TabularSeries {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.rows.iter().map(|r| r.date)
    }

    /// Earliest and latest DATE, if any row survived cleaning.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.dates().min()?;
        let max = self.dates().max()?;
        Some((min, max))
    }

    /// Rows with DATE inside the inclusive window.
    pub fn filtered(&self, window: &DateWindow) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| window.contains(r.date)).cloned().collect(),
        }
    }

    /// Values of one field in row order. Fields not resolved yield nothing.
    pub fn column(&self, field: Canonical) -> Vec<f64> {
        self.rows.iter().filter_map(|r| r.value(field)).collect()
    }
}

/// Normalize headers, resolve aliases, and drop unusable rows.
///
/// A row is dropped when any of its cells is empty (every column counts,
/// not only the canonical ones), when its DATE does not parse day-first, or
/// when a resolved OPEN/HIGH/LOW/CLOSE cell is not numeric. A table without
/// a DATE column cleans to an empty series.
pub fn clean_series(table: &RawTable, aliases: &ColumnAliasMap) -> (TabularSeries, CleanStats) {
    let table = table.clone().normalized();
    let columns = aliases.resolve(&table.headers);
    let mut stats = CleanStats::default();

    let Some(date_col) = columns.get(Canonical::Date).map(|m| m.index) else {
        debug!("table has no DATE column (headers: {:?})", table.headers);
        return (TabularSeries { columns, rows: Vec::new() }, stats);
    };

    let numeric_index = |field: Canonical| columns.get(field).map(|m| m.index);
    let open_col = numeric_index(Canonical::Open);
    let high_col = numeric_index(Canonical::High);
    let low_col = numeric_index(Canonical::Low);
    let close_col = numeric_index(Canonical::Close);

    let mut rows = Vec::with_capacity(table.rows.len());

    for cells in &table.rows {
        if cells.iter().any(|c| c.is_empty()) {
            stats.missing_value += 1;
            continue;
        }

        let Ok(date) = parse_date(&cells[date_col], DateOrder::DayFirst) else {
            stats.bad_date += 1;
            continue;
        };

        // Outer None: resolved but not numeric. Inner None: not resolved.
        let parse_field = |idx: Option<usize>| -> Option<Option<f64>> {
            match idx {
                Some(i) => parse_number(&cells[i]).map(Some),
                None => Some(None),
            }
        };

        let (Some(open), Some(high), Some(low), Some(close)) = (
            parse_field(open_col),
            parse_field(high_col),
            parse_field(low_col),
            parse_field(close_col),
        ) else {
            stats.bad_number += 1;
            continue;
        };

        rows.push(PriceRow { date, open, high, low, close });
    }

    if stats != CleanStats::default() {
        debug!(
            "dropped rows: {} with missing values, {} with bad dates, {} with bad numbers",
            stats.missing_value, stats.bad_date, stats.bad_number
        );
    }

    (TabularSeries { columns, rows }, stats)
}

/// Parse a price cell, tolerating thousands separators (`1,234.50`).
fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    cleaned.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
