//! Calendar-date coercion for loosely formatted CSV exports.
//!
//! Year-first forms (`2023-02-01`) are unambiguous and parse the same under
//! either policy. Ambiguous day/month forms are resolved by [`DateOrder`]:
//! price exports are read day-first, so `01/02/2023` is 1 February. A form
//! that is only valid in the other order (`12/25/2023`) still parses.

use chrono::{Datelike, NaiveDate};

use crate::error::PipelineError;

/// How to resolve `NN/NN/YYYY` style dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateOrder {
    #[default]
    DayFirst,
    MonthFirst,
}

const YEAR_FIRST: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%Y%m%d"];
const DAY_FIRST: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%d/%m/%y", "%d-%m-%y"];
const MONTH_FIRST: &[&str] = &["%m/%d/%Y", "%m-%d-%Y", "%m.%d.%Y", "%m/%d/%y", "%m-%d-%y"];
const NAMED_MONTH: &[&str] = &["%d-%b-%Y", "%d %b %Y", "%d-%B-%Y", "%d %B %Y", "%b %d, %Y", "%B %d, %Y", "%d-%b-%y"];

/// Parse a date cell, discarding any time-of-day suffix.
pub fn parse_date(raw: &str, order: DateOrder) -> Result<NaiveDate, PipelineError> {
    let value = strip_time(raw.trim());
    if value.is_empty() {
        return Err(PipelineError::DateParse(raw.to_string()));
    }

    let (preferred, fallback) = match order {
        DateOrder::DayFirst => (DAY_FIRST, MONTH_FIRST),
        DateOrder::MonthFirst => (MONTH_FIRST, DAY_FIRST),
    };

    YEAR_FIRST
        .iter()
        .chain(preferred)
        .chain(fallback)
        .chain(NAMED_MONTH)
        .filter_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .find(plausible_year)
        .ok_or_else(|| PipelineError::DateParse(raw.to_string()))
}

/// Drop a trailing time component: `2023-02-01 09:15:00`, `2023-02-01T09:15`.
fn strip_time(value: &str) -> &str {
    if let Some((date, _)) = value.split_once('T') {
        if date.len() >= 8 && date.chars().all(|c| c.is_ascii_digit() || c == '-') {
            return date;
        }
    }
    match value.find(' ') {
        // Only strip when the suffix looks like a clock (`09:15`), so
        // `01 Feb 2023` keeps its spaces.
        Some(pos) if value[pos + 1..].contains(':') => value[..pos].trim_end(),
        _ => value,
    }
}

/// `%Y` accepts short years; `01/02/23` must not become year 23 AD.
fn plausible_year(date: &NaiveDate) -> bool {
    date.year() >= 1000
}
