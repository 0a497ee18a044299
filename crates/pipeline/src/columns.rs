use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

fn dots_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\.+").expect("static pattern"))
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static pattern"))
}

/// Canonical header form: trimmed, dots removed, whitespace runs joined
/// with `_`, upper-cased. `" Close Price. "` becomes `CLOSE_PRICE`.
pub fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim();
    let no_dots = dots_re().replace_all(trimmed, "");
    let joined = whitespace_re().replace_all(&no_dots, "_");
    joined.to_uppercase()
}

/// Normalize every header of a table, keeping column order.
pub fn normalize_headers(headers: &[String]) -> Vec<String> {
    headers.iter().map(|h| normalize_header(h)).collect()
}

// ---------------------------------------------------------------------------
// Canonical fields
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Canonical {
    Date,
    Open,
    High,
    Low,
    Close,
}

impl Canonical {
    pub const ALL: [Canonical; 5] = [Self::Date, Self::Open, Self::High, Self::Low, Self::Close];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "DATE",
            Self::Open => "OPEN",
            Self::High => "HIGH",
            Self::Low => "LOW",
            Self::Close => "CLOSE",
        }
    }
}

impl std::fmt::Display for Canonical {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Alias map
// ---------------------------------------------------------------------------

/// Accepted header spellings per canonical field.
///
/// Aliases compare case-insensitively against already-normalized headers,
/// so `Close Price` in a file matches the `CLOSE_PRICE` alias.
#[derive(Debug, Clone)]
pub struct ColumnAliasMap {
    entries: Vec<(Canonical, Vec<String>)>,
}

impl Default for ColumnAliasMap {
    fn default() -> Self {
        let entries = vec![
            (Canonical::Date, vec!["DATE".to_string()]),
            (Canonical::Open, vec!["OPEN".to_string(), "OPEN_PRICE".to_string()]),
            (Canonical::High, vec!["HIGH".to_string(), "HIGH_PRICE".to_string()]),
            (Canonical::Low, vec!["LOW".to_string(), "LOW_PRICE".to_string()]),
            (Canonical::Close, vec!["CLOSE".to_string(), "CLOSE_PRICE".to_string()]),
        ];
        Self { entries }
    }
}

impl ColumnAliasMap {
    /// Resolve canonical fields against a table's normalized headers.
    pub fn resolve(&self, headers: &[String]) -> ColumnMatch {
        let mut found = BTreeMap::new();
        for (field, aliases) in &self.entries {
            if let Some(index) = first_match(headers, aliases) {
                found.insert(
                    *field,
                    MatchedColumn {
                        index,
                        header: headers[index].clone(),
                    },
                );
            }
        }
        ColumnMatch { found }
    }
}

/// Index of the first header (in table order) equal to any alias, ignoring case.
pub fn first_match<S: AsRef<str>>(headers: &[String], aliases: &[S]) -> Option<usize> {
    let wanted: Vec<String> = aliases.iter().map(|a| a.as_ref().to_uppercase()).collect();
    headers
        .iter()
        .position(|h| wanted.iter().any(|w| *w == h.to_uppercase()))
}

// ---------------------------------------------------------------------------
// Match result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedColumn {
    pub index: usize,
    pub header: String,
}

/// Canonical field → header actually present in one table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnMatch {
    found: BTreeMap<Canonical, MatchedColumn>,
}

impl ColumnMatch {
    pub fn get(&self, field: Canonical) -> Option<&MatchedColumn> {
        self.found.get(&field)
    }

    pub fn header(&self, field: Canonical) -> Option<&str> {
        self.found.get(&field).map(|m| m.header.as_str())
    }

    pub fn contains(&self, field: Canonical) -> bool {
        self.found.contains_key(&field)
    }

    pub fn contains_all(&self, fields: &[Canonical]) -> bool {
        fields.iter().all(|f| self.contains(*f))
    }

    /// DATE and CLOSE both resolved: the minimum for any chart.
    pub fn is_plottable(&self) -> bool {
        self.contains_all(&[Canonical::Date, Canonical::Close])
    }

    /// All five canonical fields resolved: candlestick / OHLC capable.
    pub fn has_ohlc(&self) -> bool {
        self.contains_all(&Canonical::ALL)
    }

    pub fn fields(&self) -> impl Iterator<Item = Canonical> + '_ {
        self.found.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn headers(raw: &[&str]) -> Vec<String> {
        normalize_headers(&raw.iter().map(|s| s.to_string()).collect::<Vec<_>>())
    }

    #[test]
    fn normalize_basic() {
        assert_eq!(normalize_header("Date"), "DATE");
        assert_eq!(normalize_header("  Close Price "), "CLOSE_PRICE");
        assert_eq!(normalize_header("Prev. Close"), "PREV_CLOSE");
        assert_eq!(normalize_header("No.  of\tTrades"), "NO_OF_TRADES");
        assert_eq!(normalize_header("..."), "");
    }

    #[test]
    fn normalize_trims_before_removing_dots() {
        // The leading space survives trimming because the dot shields it.
        assert_eq!(normalize_header(". Close"), "_CLOSE");
    }

    #[test]
    fn alias_resolution_ignores_case() {
        let aliases = ColumnAliasMap::default();
        for spelling in ["close_price", "CLOSE_PRICE", "Close_Price", "Close Price"] {
            let m = aliases.resolve(&headers(&["Date", spelling]));
            assert_eq!(m.get(Canonical::Close).map(|c| c.index), Some(1), "{spelling}");
        }
        // Raw, un-normalized headers still match case-insensitively.
        let raw = vec!["date".to_string(), "Close_Price".to_string()];
        let m = aliases.resolve(&raw);
        assert_eq!(m.header(Canonical::Close), Some("Close_Price"));
    }

    #[test]
    fn first_header_in_table_order_wins() {
        let aliases = ColumnAliasMap::default();
        let m = aliases.resolve(&headers(&["Date", "Close Price", "Close"]));
        assert_eq!(m.header(Canonical::Close), Some("CLOSE_PRICE"));

        let m = aliases.resolve(&headers(&["Close", "Date", "Close Price"]));
        assert_eq!(m.get(Canonical::Close).map(|c| c.index), Some(0));
    }

    #[test]
    fn missing_fields_are_absent() {
        let m = ColumnAliasMap::default().resolve(&headers(&["Date", "LTP"]));
        assert!(m.contains(Canonical::Date));
        assert!(!m.contains(Canonical::Close));
        assert!(!m.is_plottable());
        assert!(!m.has_ohlc());
    }

    #[test]
    fn ohlc_detection() {
        let m = ColumnAliasMap::default()
            .resolve(&headers(&["Date", "Open Price", "High Price", "Low Price", "Close Price"]));
        assert!(m.is_plottable());
        assert!(m.has_ohlc());
        assert_eq!(m.fields().count(), 5);
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(raw in "[ -~\t]{0,24}") {
            let once = normalize_header(&raw);
            prop_assert_eq!(normalize_header(&once), once.clone());
        }

        #[test]
        fn normalized_headers_have_no_dots_or_spaces(raw in "[ -~\t]{0,24}") {
            let n = normalize_header(&raw);
            prop_assert!(!n.contains('.'));
            prop_assert!(!n.chars().any(char::is_whitespace));
        }
    }
}
