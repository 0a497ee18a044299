use chrono::NaiveDate;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use pricechart_pipeline::dates::{parse_date, DateOrder};

/// clap value parser for `--from`, `--to` and remark dates.
/// Accepts ISO dates and the day-first forms the price files use.
pub(crate) fn parse_day(s: &str) -> Result<NaiveDate, String> {
    parse_date(s, DateOrder::DayFirst).map_err(|e| e.to_string())
}

/// Fit one cell of the `remarks list` table to exactly `width` terminal columns.
///
/// Comments longer than the column are cut on a char boundary and marked with
/// "..". Widths come from `unicode-width`, so Tamil and CJK remarks line up
/// with ASCII ones; a wide char that would straddle the edge becomes padding.
pub(crate) fn fit_cell(text: &str, width: usize) -> String {
    let full = text.width();
    if full <= width {
        return format!("{text}{}", " ".repeat(width - full));
    }

    let marker = if width >= 3 { ".." } else { "" };
    let room = width - marker.len();
    let mut used = 0;
    let kept: String = text
        .chars()
        .take_while(|ch| {
            used += ch.width().unwrap_or(0);
            used <= room
        })
        .collect();

    let cell = format!("{kept}{marker}");
    let gap = width.saturating_sub(cell.width());
    format!("{cell}{}", " ".repeat(gap))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_day_forms() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(parse_day("2024-03-05"), Ok(expected));
        assert_eq!(parse_day("05/03/2024"), Ok(expected));
        assert!(parse_day("someday").is_err());
    }

    #[test]
    fn short_comment_is_padded() {
        assert_eq!(fit_cell("abc", 6), "abc   ");
        assert_eq!(fit_cell("Date", 4), "Date");
    }

    #[test]
    fn long_comment_is_cut_with_marker() {
        assert_eq!(fit_cell("RBI policy meeting", 8), "RBI po..");
    }

    #[test]
    fn wide_chars_keep_column_width() {
        // Each CJK char is two columns.
        let padded = fit_cell("決算発表", 10);
        assert_eq!(padded.width(), 10);
        // 決算 fills four of the five columns before the marker.
        assert_eq!(fit_cell("決算発表会議", 7), "決算.. ");
    }

    #[test]
    fn narrow_column_drops_marker() {
        assert_eq!(fit_cell("abc", 1), "a");
        assert_eq!(fit_cell("決算", 1), " ");
    }
}
