//! Localisation string extraction.
//!
//! Strings come from three places: `tr("...")` calls already collected by the
//! script extractor, `msgid` entries of gettext catalogs, and the key column
//! of translation spreadsheets. Duplicates are kept on purpose so the audit
//! can see every occurrence.

use std::sync::LazyLock;

use regex::Regex;

use gdindex_core::{ScriptSymbols, StringEntry, StringOrigin};

static MSGID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^msgid[ \t]+"(.*)"[ \t]*\r?$"#)
        .expect("valid msgid regex")
});

/// First-column values treated as a spreadsheet header.
const HEADER_KEYS: &[&str] = &["key", "keys"];

/// Which localisation source a file is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum I18nFormat {
    /// gettext `.po` / `.pot`.
    Catalog,
    /// Comma-separated translation table.
    Spreadsheet,
}

impl I18nFormat {
    /// Detect the format from a path's extension.
    pub fn from_path(path: &str) -> Option<Self> {
        let ext = path.rsplit_once('.')?.1.to_ascii_lowercase();
        match ext.as_str() {
            "po" | "pot" => Some(Self::Catalog),
            "csv" => Some(Self::Spreadsheet),
            _ => None,
        }
    }
}

/// Strings of an i18n file, dispatched on its format.
pub fn extract_i18n_strings(path: &str, text: &str) -> Vec<StringEntry> {
    match I18nFormat::from_path(path) {
        Some(I18nFormat::Catalog) => extract_catalog_strings(path, text),
        Some(I18nFormat::Spreadsheet) => extract_spreadsheet_strings(path, text),
        None => Vec::new(),
    }
}

/// Every `msgid "..."` line, including the empty header entry.
pub fn extract_catalog_strings(path: &str, text: &str) -> Vec<StringEntry> {
    MSGID_RE
        .captures_iter(text)
        .map(|caps| StringEntry::new(&caps[1], path, StringOrigin::Catalog))
        .collect()
}

/// First column of every data row with at least two columns.
pub fn extract_spreadsheet_strings(path: &str, text: &str) -> Vec<StringEntry> {
    csv_records(text)
        .into_iter()
        .filter_map(|record| {
            let (key, has_more_columns) = first_csv_field(record);
            let key = key.trim();
            let is_header = HEADER_KEYS.iter().any(|h| key.eq_ignore_ascii_case(h));
            (has_more_columns && !key.is_empty() && !is_header)
                .then(|| StringEntry::new(key, path, StringOrigin::Spreadsheet))
        })
        .collect()
}

/// The `tr(...)` literals of a script, tagged as script strings.
pub fn script_strings(symbols: &ScriptSymbols) -> Vec<StringEntry> {
    symbols
        .tr_strings
        .iter()
        .map(|key| StringEntry::new(key.as_str(), symbols.file.as_str(), StringOrigin::Script))
        .collect()
}

/// Split CSV text into records. Line breaks inside quoted fields stay part
/// of the record.
fn csv_records(text: &str) -> Vec<&str> {
    let mut records = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;

    for (i, byte) in text.bytes().enumerate() {
        match byte {
            b'"' => in_quotes = !in_quotes,
            b'\n' if !in_quotes => {
                records.push(text[start..i].trim_end_matches('\r'));
                start = i + 1;
            }
            _ => {}
        }
    }
    if start < text.len() {
        records.push(text[start..].trim_end_matches('\r'));
    }

    records
}

/// Split off the first field of a CSV record.
///
/// Returns the unquoted field and whether another column follows it.
fn first_csv_field(line: &str) -> (String, bool) {
    let trimmed = line.trim_start();
    let Some(quoted) = trimmed.strip_prefix('"') else {
        return match line.split_once(',') {
            Some((first, _)) => (first.to_string(), true),
            None => (line.to_string(), false),
        };
    };

    let mut field = String::new();
    let mut chars = quoted.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '"' {
            field.push(c);
            continue;
        }
        if chars.peek() == Some(&'"') {
            chars.next();
            field.push('"');
            continue;
        }
        // Closing quote: a column follows if a comma comes next.
        let rest: String = chars.collect();
        return (field, rest.trim_start().starts_with(','));
    }

    // Unterminated quote.
    (field, false)
}
