//! Inline document metadata extraction.
//!
//! Source documents carry a handful of typed annotations as reStructuredText
//! field markers anywhere in their text:
//!
//! ```text
//! :date: 01-06-2021
//! :draft: true
//! :tags: rust, web, notes
//! :language: spanish
//! ```
//!
//! ## Value classification
//!
//! Each `:key: value` match is classified in this order:
//!
//! 1. The key is lowercased.
//! 2. `true` / `false` (any case) become [`MetaValue::Bool`].
//! 3. Any key containing `date` is parsed as day/month/year and stored under
//!    the fixed `date` key. A value that is not a valid date is kept as a
//!    string under its own key.
//! 4. Values containing a comma become a [`MetaValue::List`] of trimmed items.
//! 5. Everything else is a trimmed [`MetaValue::Str`].
//!
//! The last occurrence of a key wins.
//!
//! ## Accepted limitation
//!
//! Values are drawn from a restricted character set (word characters, spaces,
//! hyphens, slashes and commas). A value starting with anything else is simply
//! not matched and the field is absent; a value containing such a character is
//! cut at that character. Neither case is an error.

use chrono::NaiveDate;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum MetaError {
    #[error("document does not have a title")]
    MissingTitle,
}

/// `:key: value` where the value must start on the same line as the key.
static ATTR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r":([A-Za-z_-]+):[ \t]*([\w/ ,-]+)").expect("attribute pattern is valid")
});

/// A line made only of heading-marker characters (over/underline).
static TITLE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[#=]+$").expect("title marker pattern is valid"));

const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

/// One coerced metadata value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetaValue {
    Bool(bool),
    Date(#[serde(serialize_with = "serialize_date")] NaiveDate),
    List(Vec<String>),
    Str(String),
}

fn serialize_date<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_date(date))
}

impl MetaValue {
    /// Whether the value counts as "set" for flag-style keys such as `draft`.
    pub fn is_truthy(&self) -> bool {
        match self {
            MetaValue::Bool(b) => *b,
            MetaValue::Date(_) => true,
            MetaValue::List(items) => !items.is_empty(),
            MetaValue::Str(s) => !s.is_empty(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Lowercase key → coerced value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, MetaValue>);

impl Metadata {
    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &MetaValue)> {
        self.0.iter()
    }

    /// The parsed `date` entry, if any `*date*` key carried a valid date.
    pub fn date(&self) -> Option<NaiveDate> {
        match self.0.get("date") {
            Some(MetaValue::Date(d)) => Some(*d),
            _ => None,
        }
    }

    pub fn is_draft(&self) -> bool {
        self.0.get("draft").is_some_and(MetaValue::is_truthy)
    }

    /// Raw `language` value, used to pick CV labels.
    pub fn language(&self) -> Option<&str> {
        self.0.get("language").and_then(MetaValue::as_str)
    }

    /// Classify and store one raw `key`/`value` pair.
    pub fn insert_raw(&mut self, key: &str, value: &str) {
        let key = key.to_lowercase();
        let value = value.trim();
        let lowered = value.to_lowercase();

        if lowered == "true" {
            self.0.insert(key, MetaValue::Bool(true));
        } else if lowered == "false" {
            self.0.insert(key, MetaValue::Bool(false));
        } else if key.contains("date") {
            match parse_date(value) {
                Some(date) => {
                    self.0.insert("date".to_string(), MetaValue::Date(date));
                }
                None => {
                    tracing::debug!(key = %key, value, "metadata date is not day/month/year");
                    self.0.insert(key, MetaValue::Str(value.to_string()));
                }
            }
        } else if value.contains(',') {
            let items = value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
            self.0.insert(key, MetaValue::List(items));
        } else {
            self.0.insert(key, MetaValue::Str(value.to_string()));
        }
    }
}

/// Title plus the metadata found above it.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub title: String,
    pub meta: Metadata,
}

/// Extract every `:key: value` annotation in `text`.
pub fn parse_meta(text: &str) -> Metadata {
    let mut meta = Metadata::default();
    for caps in ATTR_PATTERN.captures_iter(text) {
        meta.insert_raw(&caps[1], &caps[2]);
    }
    meta
}

/// Extract the document title and the metadata preceding it.
///
/// The title is the line right after the first line made only of `#` or `=`
/// characters. When that line is blank or another marker (an underlined
/// heading followed by a blank line) the text line just above the marker is
/// the title instead. Each line up to the marker contributes its first
/// annotation; nothing after the first marker is read.
pub fn parse_header(text: &str) -> Result<Header, MetaError> {
    let mut meta = Metadata::default();
    let mut previous: Option<&str> = None;
    let mut lines = text.lines().map(str::trim);

    while let Some(line) = lines.next() {
        if let Some(caps) = ATTR_PATTERN.captures(line) {
            meta.insert_raw(&caps[1], &caps[2]);
        }
        if !TITLE_MARKER.is_match(line) {
            previous = Some(line);
            continue;
        }

        let title = lines
            .next()
            .filter(|next| is_title_text(next))
            .or(previous.filter(|prev| is_title_text(prev)))
            .ok_or(MetaError::MissingTitle)?;
        return Ok(Header {
            title: title.to_string(),
            meta,
        });
    }

    Err(MetaError::MissingTitle)
}

fn is_title_text(line: &str) -> bool {
    !line.is_empty() && !TITLE_MARKER.is_match(line)
}

/// Parse a day/month/year date written with `-` or `/` separators.
///
/// Year-first ISO dates are accepted as a fallback.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let normalized = value.trim().replace('-', "/");
    NaiveDate::parse_from_str(&normalized, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(&normalized, "%Y/%m/%d"))
        .ok()
}

/// Format a date as `dd/mm/YYYY`.
pub fn format_date(date: &NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // =========================================================================
    // parse_meta() tests
    // =========================================================================

    #[test]
    fn parse_meta_lowercases_keys() {
        let meta = parse_meta(":Author: santi");
        assert_eq!(meta.get("author"), Some(&MetaValue::Str("santi".into())));
    }

    #[test]
    fn parse_meta_booleans_any_case() {
        let meta = parse_meta(":draft: TRUE\n:public: False\n");
        assert_eq!(meta.get("draft"), Some(&MetaValue::Bool(true)));
        assert_eq!(meta.get("public"), Some(&MetaValue::Bool(false)));
    }

    #[test]
    fn parse_meta_date_keys_stored_under_date() {
        let meta = parse_meta(":publish-date: 31-12-2020");
        assert_eq!(meta.get("date"), Some(&MetaValue::Date(date(2020, 12, 31))));
        assert!(meta.get("publish-date").is_none());
    }

    #[test]
    fn parse_meta_invalid_date_kept_as_string() {
        let meta = parse_meta(":date: someday");
        assert_eq!(meta.date(), None);
        assert_eq!(meta.get("date"), Some(&MetaValue::Str("someday".into())));
    }

    #[test]
    fn parse_meta_comma_values_become_lists() {
        let meta = parse_meta(":tags: rust, web ,notes");
        assert_eq!(
            meta.get("tags"),
            Some(&MetaValue::List(vec![
                "rust".into(),
                "web".into(),
                "notes".into()
            ]))
        );
    }

    #[test]
    fn parse_meta_last_occurrence_wins() {
        let meta = parse_meta(":language: english\n:language: spanish\n");
        assert_eq!(meta.language(), Some("spanish"));
        assert_eq!(meta.len(), 1);
    }

    #[test]
    fn parse_meta_value_outside_charset_not_matched() {
        let meta = parse_meta(":link: <https://example.com>");
        assert!(meta.get("link").is_none());
        assert!(meta.is_empty());
    }

    #[test]
    fn parse_meta_empty_field_does_not_swallow_next_line() {
        let meta = parse_meta(":empty:\nplain text\n");
        assert!(meta.get("empty").is_none());
    }

    #[test]
    fn parse_meta_several_fields_on_one_line() {
        let meta = parse_meta(":lang: es :draft: true");
        assert_eq!(meta.get("lang"), Some(&MetaValue::Str("es".into())));
        assert_eq!(meta.get("draft"), Some(&MetaValue::Bool(true)));
    }

    // =========================================================================
    // Date helpers
    // =========================================================================

    #[test]
    fn date_round_trips_to_slash_format() {
        let parsed = parse_date("31-12-2020").unwrap();
        assert_eq!(format_date(&parsed), "31/12/2020");
    }

    #[test]
    fn date_accepts_slashes_and_iso() {
        assert_eq!(parse_date("01/06/2021"), Some(date(2021, 6, 1)));
        assert_eq!(parse_date("2021-06-01"), Some(date(2021, 6, 1)));
        assert_eq!(parse_date("32-01-2021"), None);
    }

    #[test]
    fn serialized_metadata_formats_dates() {
        let meta = parse_meta(":date: 01-06-2021\n:draft: false");
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["date"], "01/06/2021");
        assert_eq!(json["draft"], false);
    }

    // =========================================================================
    // Truthiness
    // =========================================================================

    #[test]
    fn draft_flag_truthiness() {
        assert!(parse_meta(":draft: true").is_draft());
        assert!(!parse_meta(":draft: false").is_draft());
        assert!(parse_meta(":draft: yes").is_draft());
        assert!(!parse_meta("nothing here").is_draft());
    }

    // =========================================================================
    // parse_header() tests
    // =========================================================================

    #[test]
    fn header_title_after_overline() {
        let text = ":date: 01-01-2021\n\n=========\nMy Post\n=========\n\nBody\n";
        let header = parse_header(text).unwrap();
        assert_eq!(header.title, "My Post");
        assert_eq!(header.meta.date(), Some(date(2021, 1, 1)));
    }

    #[test]
    fn header_title_after_hash_marker() {
        let header = parse_header("####\n  Spaced Title  \n####\n").unwrap();
        assert_eq!(header.title, "Spaced Title");
    }

    #[test]
    fn header_ignores_metadata_after_title() {
        let text = "====\nTitle\n====\n:draft: true\n";
        let header = parse_header(text).unwrap();
        assert!(!header.meta.is_draft());
    }

    #[test]
    fn header_title_above_underline() {
        let header = parse_header("My Title\n========\n\nBody text.\n").unwrap();
        assert_eq!(header.title, "My Title");
    }

    #[test]
    fn header_underline_keeps_fields_above_it() {
        let text = ":date: 01-06-2021\n\nUnderlined\n==========\n\n:draft: true\n";
        let header = parse_header(text).unwrap();
        assert_eq!(header.title, "Underlined");
        assert_eq!(header.meta.date(), Some(date(2021, 6, 1)));
        assert!(!header.meta.is_draft());
    }

    #[test]
    fn header_stops_at_first_marker() {
        let text = "\n=====\n\nBody\n=====\nLater Title\n=====\n";
        assert_eq!(parse_header(text), Err(MetaError::MissingTitle));
    }

    #[test]
    fn header_line_after_marker_wins_over_line_above() {
        let header = parse_header("Intro\n=====\nNext Line\n").unwrap();
        assert_eq!(header.title, "Next Line");
    }

    #[test]
    fn header_missing_title_is_error() {
        let err = parse_header("just some text\nwith no heading\n").unwrap_err();
        assert_eq!(err, MetaError::MissingTitle);
    }

    #[test]
    fn header_dash_underline_is_not_a_marker() {
        assert!(parse_header("-----\nNot a title\n-----\n").is_err());
    }
}
