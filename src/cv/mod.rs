//! CV sections loaded from a structured data file.
//!
//! One data file (`.toml` or `.json`) holds every CV section:
//!
//! ```toml
//! [[experience]]
//! position = "Data Engineer"
//! employer = "Acme"
//! start = "2021-03"
//! end = "Now"
//!
//! [[experience.projects]]
//! description = "Streaming ingestion"
//! tech-stack = ["Spark", "Python"]
//!
//! [[aptitude]]
//! name = "Python"
//! score = 9
//! ```
//!
//! Each directive loads one section, maps entries into records, sorts them by
//! the record kind's key and renders one `<ul>`.
//!
//! ## Errors
//!
//! - Missing data file → [`LoadError::NotFound`]
//! - Extension other than `toml`/`json` → [`LoadError::WrongExtension`]
//! - Missing or empty section → `Ok(None)`; the caller warns and renders an
//!   empty list.
//! - Entry without a required field → [`LoadError::InvalidEntry`]

pub mod icons;
pub mod records;
pub mod timeline;

pub use records::{
    Aptitude, Event, Experience, ExperienceProject, SideProject, SideProjectCollaborator,
};
pub use timeline::Timeline;

use crate::language::Language;
use crate::types::Order;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Data file '{0}' does not exist")]
    NotFound(PathBuf),
    #[error("Data file '{0}' is not a TOML or JSON file")]
    WrongExtension(PathBuf),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Section '{section}' must be a list of entries")]
    InvalidSection { section: String },
    #[error("Section '{section}' entry {index} is invalid: {source}")]
    InvalidEntry {
        section: String,
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// A record kind that can be loaded from a CV section and rendered.
pub trait CvRecord: Sized {
    /// Map a section value into records, in file order.
    fn from_section(section: &str, value: &Value) -> Result<Vec<Self>, LoadError>;

    /// Sort records by this kind's key.
    fn sort(records: &mut [Self], order: Order, timeline: &Timeline);

    /// HTML fragment for one record.
    fn to_html(&self, indent: usize, lang: Language) -> String;

    /// One-line description used by CLI output.
    fn summary(&self) -> String;
}

/// Read a data file into a JSON value tree.
pub fn load_data_file(path: &Path) -> Result<Value, LoadError> {
    if !path.is_file() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "toml" => {
            let table: toml::Table = toml::from_str(&fs::read_to_string(path)?)?;
            Ok(toml_to_json(toml::Value::Table(table)))
        }
        "json" => Ok(serde_json::from_str(&fs::read_to_string(path)?)?),
        _ => Err(LoadError::WrongExtension(path.to_path_buf())),
    }
}

/// Load one section. Missing and empty sections are `Ok(None)`.
pub fn load_section(path: &Path, section: &str) -> Result<Option<Value>, LoadError> {
    let data = load_data_file(path)?;
    let value = match data {
        Value::Object(mut map) => map.remove(section),
        _ => None,
    };
    Ok(value.filter(|v| !is_empty_section(v)))
}

/// Load, build and sort the records of one section.
pub fn load_records<T: CvRecord>(
    path: &Path,
    section: &str,
    order: Order,
    timeline: &Timeline,
) -> Result<Option<Vec<T>>, LoadError> {
    let Some(value) = load_section(path, section)? else {
        return Ok(None);
    };
    let mut records = T::from_section(section, &value)?;
    T::sort(&mut records, order, timeline);
    Ok(Some(records))
}

/// Render records into `<ul class="{css_class}">`.
pub fn render_list<T: CvRecord>(css_class: &str, records: &[T], lang: Language) -> String {
    let mut out = format!("<ul class=\"{css_class}\">");
    for record in records {
        out.push('\n');
        out.push_str(&record.to_html(2, lang));
    }
    out.push_str("\n</ul>");
    out
}

/// Deserialize every entry of a list section.
pub(crate) fn entries<E: DeserializeOwned>(
    section: &str,
    value: &Value,
) -> Result<Vec<E>, LoadError> {
    let Value::Array(items) = value else {
        return Err(LoadError::InvalidSection {
            section: section.to_string(),
        });
    };
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            <E as serde::Deserialize>::deserialize(item).map_err(|source| LoadError::InvalidEntry {
                section: section.to_string(),
                index,
                source,
            })
        })
        .collect()
}

fn is_empty_section(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// TOML datetimes become strings so date-like fields read as text.
fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => Value::from(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::write_file;
    use tempfile::TempDir;

    const CV_TOML: &str = r#"
[[aptitude]]
name = "Python"
score = 9

[[education]]
title = "MSc"
institution = "Uni"
when = 2019-06-30
"#;

    #[test]
    fn missing_file_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let result = load_section(&tmp.path().join("cv.toml"), "aptitude");
        assert!(matches!(result, Err(LoadError::NotFound(_))));
    }

    #[test]
    fn wrong_extension_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = write_file(tmp.path(), "cv.yaml", "aptitude: []\n");
        assert!(matches!(
            load_section(&path, "aptitude"),
            Err(LoadError::WrongExtension(_))
        ));
    }

    #[test]
    fn toml_section_loaded() {
        let tmp = TempDir::new().unwrap();
        let path = write_file(tmp.path(), "cv.toml", CV_TOML);
        let section = load_section(&path, "aptitude").unwrap().unwrap();
        assert_eq!(section[0]["name"], "Python");
    }

    #[test]
    fn toml_datetimes_become_strings() {
        let tmp = TempDir::new().unwrap();
        let path = write_file(tmp.path(), "cv.toml", CV_TOML);
        let section = load_section(&path, "education").unwrap().unwrap();
        assert_eq!(section[0]["when"], "2019-06-30");
    }

    #[test]
    fn json_section_loaded() {
        let tmp = TempDir::new().unwrap();
        let path = write_file(
            tmp.path(),
            "cv.JSON",
            r#"{"aptitude": [{"name": "Go", "score": 15}]}"#,
        );
        let section = load_section(&path, "aptitude").unwrap().unwrap();
        assert_eq!(section[0]["score"], 15);
    }

    #[test]
    fn missing_and_empty_sections_are_none() {
        let tmp = TempDir::new().unwrap();
        let path = write_file(tmp.path(), "cv.toml", "aptitude = []\n");
        assert!(load_section(&path, "aptitude").unwrap().is_none());
        assert!(load_section(&path, "experience").unwrap().is_none());
    }

    #[test]
    fn malformed_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = write_file(tmp.path(), "cv.toml", "[[aptitude]\n");
        assert!(matches!(load_section(&path, "aptitude"), Err(LoadError::Toml(_))));
    }

    #[test]
    fn invalid_entry_reports_section_and_index() {
        let tmp = TempDir::new().unwrap();
        let path = write_file(
            tmp.path(),
            "cv.toml",
            "[[education]]\ntitle = \"A\"\ninstitution = \"B\"\nwhen = \"2020\"\n\n[[education]]\ntitle = \"C\"\n",
        );
        let result =
            load_records::<Event>(&path, "education", Order::Descending, &Timeline::new("Now"));
        assert!(matches!(
            result,
            Err(LoadError::InvalidEntry { ref section, index: 1, .. }) if section == "education"
        ));
    }

    #[test]
    fn scalar_section_is_invalid() {
        let tmp = TempDir::new().unwrap();
        let path = write_file(tmp.path(), "cv.toml", "education = \"oops\"\n");
        let result =
            load_records::<Event>(&path, "education", Order::Descending, &Timeline::new("Now"));
        assert!(matches!(result, Err(LoadError::InvalidSection { .. })));
    }

    #[test]
    fn aptitude_table_ties_keep_file_order() {
        let tmp = TempDir::new().unwrap();
        let toml = write_file(tmp.path(), "cv.toml", "[aptitude]\nZig = 7\nAda = 7\nGo = 9\n");
        let json = write_file(tmp.path(), "cv.json", r#"{"aptitude": {"Zig": 7, "Ada": 7, "Go": 9}}"#);

        for path in [toml, json] {
            let records =
                load_records::<Aptitude>(&path, "aptitude", Order::Descending, &Timeline::new("Now"))
                    .unwrap()
                    .unwrap();
            let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
            assert_eq!(names, vec!["Go", "Zig", "Ada"], "{}", path.display());
        }
    }

    #[test]
    fn render_list_wraps_records() {
        let records = vec![Aptitude::new("Rust", 8)];
        let html = render_list("cv-aptitudes", &records, Language::English);
        assert!(html.starts_with("<ul class=\"cv-aptitudes\">\n  <li class=\"cv-aptitude\">"));
        assert!(html.ends_with("</li>\n</ul>"));
    }

    #[test]
    fn render_empty_list() {
        let html = render_list::<Aptitude>("cv-aptitudes", &[], Language::English);
        assert_eq!(html, "<ul class=\"cv-aptitudes\">\n</ul>");
    }
}
