use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use log::info;
use serde::Serialize;

use crate::error::PipelineError;
use crate::series::TabularSeries;

/// Look-back for [`Preset::LastThreeMonths`].
pub const LAST_THREE_MONTHS_DAYS: i64 = 90;

/// Inclusive calendar-date bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    fn clamp(&self, date: NaiveDate) -> NaiveDate {
        date.clamp(self.start, self.end)
    }

    /// Narrow to an explicit user selection, clamped into `self`.
    ///
    /// Either bound may be omitted (keeps the current one). A selection whose
    /// start falls after its end is rejected.
    pub fn narrow(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<DateWindow, PipelineError> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(PipelineError::InvertedRange { start: s, end: e });
            }
        }
        let start = start.map(|d| self.clamp(d)).unwrap_or(self.start);
        let end = end.map(|d| self.clamp(d)).unwrap_or(self.end);
        if start > end {
            return Err(PipelineError::InvertedRange { start, end });
        }
        Ok(DateWindow { start, end })
    }
}

impl std::fmt::Display for DateWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Named shortcut producing a default window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Preset {
    #[default]
    FullRange,
    LastThreeMonths,
    YearToDate,
}

impl Preset {
    pub fn label(&self) -> &'static str {
        match self {
            Self::FullRange => "Full Range",
            Self::LastThreeMonths => "Last 3 Months",
            Self::YearToDate => "Year to Date",
        }
    }

    /// Default window for this preset within the available range.
    /// The window always ends at the latest available date.
    pub fn resolve(&self, available: &DateWindow) -> DateWindow {
        let end = available.end;
        let start = match self {
            Self::FullRange => available.start,
            Self::LastThreeMonths => end - Duration::days(LAST_THREE_MONTHS_DAYS),
            Self::YearToDate => NaiveDate::from_ymd_opt(end.year(), 1, 1).unwrap_or(end),
        };
        DateWindow::new(start.max(available.start), end)
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Preset {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s.chars().filter(|c| c.is_ascii_alphanumeric()).collect::<String>().to_lowercase();
        match key.as_str() {
            "fullrange" | "full" | "all" => Ok(Self::FullRange),
            "last3months" | "3m" | "3months" => Ok(Self::LastThreeMonths),
            "yeartodate" | "ytd" => Ok(Self::YearToDate),
            _ => Err(PipelineError::UnknownPreset(s.to_string())),
        }
    }
}

/// Min/max DATE across every series; `None` when no series has a valid date.
pub fn available_range<'a, I>(series: I) -> Option<DateWindow>
where
    I: IntoIterator<Item = &'a TabularSeries>,
{
    let range = series
        .into_iter()
        .filter_map(TabularSeries::date_bounds)
        .reduce(|(min_a, max_a), (min_b, max_b)| (min_a.min(min_b), max_a.max(max_b)))
        .map(|(min, max)| DateWindow::new(min, max));

    if let Some(ref r) = range {
        info!("available date range: {r}");
    }
    range
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::ColumnAliasMap;
    use crate::series::clean_series;
    use crate::table::RawTable;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn series(csv: &str) -> TabularSeries {
        clean_series(&RawTable::from_str_content(csv).unwrap(), &ColumnAliasMap::default()).0
    }

    #[test]
    fn last_three_months_is_ninety_days_back() {
        let available = DateWindow::new(ymd(2023, 1, 1), ymd(2024, 6, 30));
        let w = Preset::LastThreeMonths.resolve(&available);
        assert_eq!(w, DateWindow::new(ymd(2024, 4, 1), ymd(2024, 6, 30)));
    }

    #[test]
    fn last_three_months_clips_to_minimum() {
        let available = DateWindow::new(ymd(2024, 5, 15), ymd(2024, 6, 30));
        let w = Preset::LastThreeMonths.resolve(&available);
        assert_eq!(w.start, ymd(2024, 5, 15));
    }

    #[test]
    fn year_to_date_starts_january_first() {
        let available = DateWindow::new(ymd(2022, 3, 1), ymd(2024, 6, 30));
        assert_eq!(Preset::YearToDate.resolve(&available).start, ymd(2024, 1, 1));

        let late = DateWindow::new(ymd(2024, 3, 1), ymd(2024, 6, 30));
        assert_eq!(Preset::YearToDate.resolve(&late).start, ymd(2024, 3, 1));
    }

    #[test]
    fn full_range_is_available_range() {
        let available = DateWindow::new(ymd(2022, 3, 1), ymd(2024, 6, 30));
        assert_eq!(Preset::FullRange.resolve(&available), available);
    }

    #[test]
    fn narrow_clamps_into_window() {
        let w = DateWindow::new(ymd(2024, 1, 1), ymd(2024, 6, 30));
        let n = w.narrow(Some(ymd(2023, 1, 1)), Some(ymd(2024, 3, 1))).unwrap();
        assert_eq!(n, DateWindow::new(ymd(2024, 1, 1), ymd(2024, 3, 1)));

        let n = w.narrow(None, Some(ymd(2025, 1, 1))).unwrap();
        assert_eq!(n, w);
    }

    #[test]
    fn narrow_rejects_inverted() {
        let w = DateWindow::new(ymd(2024, 1, 1), ymd(2024, 6, 30));
        let err = w.narrow(Some(ymd(2024, 5, 1)), Some(ymd(2024, 2, 1))).unwrap_err();
        assert!(err.to_string().contains("after"));
        // A lone start past the end clamps to a one-day window.
        assert!(w.narrow(Some(ymd(2025, 1, 1)), None).is_ok_and(|n| n.start == n.end));
    }

    #[test]
    fn window_is_inclusive() {
        let w = DateWindow::new(ymd(2024, 1, 1), ymd(2024, 1, 31));
        assert!(w.contains(ymd(2024, 1, 1)));
        assert!(w.contains(ymd(2024, 1, 31)));
        assert!(!w.contains(ymd(2024, 2, 1)));
    }

    #[test]
    fn preset_parsing() {
        assert_eq!("Full Range".parse::<Preset>().unwrap(), Preset::FullRange);
        assert_eq!("Last 3 Months".parse::<Preset>().unwrap(), Preset::LastThreeMonths);
        assert_eq!("ytd".parse::<Preset>().unwrap(), Preset::YearToDate);
        assert_eq!("3m".parse::<Preset>().unwrap(), Preset::LastThreeMonths);
        assert!("last week".parse::<Preset>().is_err());
        for p in [Preset::FullRange, Preset::LastThreeMonths, Preset::YearToDate] {
            assert_eq!(p.label().parse::<Preset>().unwrap(), p);
        }
    }

    #[test]
    fn available_range_spans_union() {
        let a = series("Date,Close\n2024-02-01,1\n2024-03-01,2\n");
        let b = series("Date,Close\n2024-01-15,1\n2024-02-20,2\n");
        let empty = series("Date,Close\n");
        let r = available_range([&a, &b, &empty]).unwrap();
        assert_eq!(r, DateWindow::new(ymd(2024, 1, 15), ymd(2024, 3, 1)));
    }

    #[test]
    fn available_range_none_without_dates() {
        let empty = series("Date,Close\n");
        assert!(available_range([&empty]).is_none());
        assert!(available_range(std::iter::empty::<&TabularSeries>()).is_none());
    }
}
