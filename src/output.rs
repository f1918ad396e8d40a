//! CLI output formatting for the inspection commands.
//!
//! Output leads with what a thing *is* (positional index + title), with file
//! paths and other context on indented lines below.
//!
//! # Output Format
//!
//! ## Posts
//!
//! ```text
//! Posts in blog (2)
//! 001 Ownership (01/06/2021)
//!     Group: rust
//!     Source: blog/rust/ownership.rst
//! 002 Hello, World! (01/01/2021)
//!     Source: blog/hello.rst
//! ```
//!
//! ## CV
//!
//! ```text
//! cv-experiences from data/cv.toml (2)
//! 001 Data Engineer at Acme (2019-03 - Now)
//! 002 Data Analyst at Initech (2016-09 - 2019-02)
//! ```
//!
//! ## Check
//!
//! ```text
//! 001 cv → 5 placeholders, 10 records
//! 002 index → 1 placeholder, 2 records
//! 003 notes → 1 placeholder, 0 records
//!     Warning: data/cv.toml does not contain 'aptitude' section
//!
//! Checked 3 documents: 7 placeholders, 12 records, 1 warning
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure.

use crate::cv::CvRecord;
use crate::posts::{Post, display_date};
use crate::processor::ResolveReport;
use crate::types::ContentKind;
use std::path::Path;

const SUMMARY_WIDTH: usize = 72;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 record`, `2 records`.
fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Truncate to `max` characters, appending `...` if truncated.
fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

// ============================================================================
// Posts
// ============================================================================

pub fn format_posts(
    posts: &[Post],
    source: &str,
    base_dir: &Path,
    date_format: &str,
) -> Vec<String> {
    let mut lines = vec![format!("Posts in {} ({})", source, posts.len())];
    for (i, post) in posts.iter().enumerate() {
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            post.title,
            display_date(&post.date, date_format)
        ));
        if !post.group.is_empty() {
            lines.push(format!("{}Group: {}", indent(1), post.group));
        }
        let rel = post.path.strip_prefix(base_dir).unwrap_or(&post.path);
        lines.push(format!("{}Source: {}", indent(1), rel.display()));
    }
    lines
}

pub fn print_posts(posts: &[Post], source: &str, base_dir: &Path, date_format: &str) {
    for line in format_posts(posts, source, base_dir, date_format) {
        println!("{}", line);
    }
}

// ============================================================================
// CV
// ============================================================================

pub fn format_cv<T: CvRecord>(kind: ContentKind, source: &str, records: &[T]) -> Vec<String> {
    let mut lines = vec![format!("{} from {} ({})", kind, source, records.len())];
    for (i, record) in records.iter().enumerate() {
        lines.push(format!(
            "{} {}",
            format_index(i + 1),
            truncate(&record.summary(), SUMMARY_WIDTH)
        ));
    }
    lines
}

pub fn print_cv<T: CvRecord>(kind: ContentKind, source: &str, records: &[T]) {
    for line in format_cv(kind, source, records) {
        println!("{}", line);
    }
}

// ============================================================================
// Resolution reports
// ============================================================================

/// One document's resolution summary plus its warnings.
pub fn format_report(index: usize, name: &str, report: &ResolveReport) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {} → {}, {}",
        format_index(index),
        name,
        plural(report.resolved, "placeholder"),
        plural(report.records, "record")
    )];
    for warning in &report.warnings {
        lines.push(format!("{}Warning: {}", indent(1), warning));
    }
    lines
}

/// Every document in a tree check, then totals.
pub fn format_check(results: &[(String, ResolveReport)]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, (name, report)) in results.iter().enumerate() {
        lines.extend(format_report(i + 1, name, report));
    }

    let resolved: usize = results.iter().map(|(_, r)| r.resolved).sum();
    let records: usize = results.iter().map(|(_, r)| r.records).sum();
    let warnings: usize = results.iter().map(|(_, r)| r.warnings.len()).sum();
    lines.push(String::new());
    lines.push(format!(
        "Checked {}: {}, {}, {}",
        plural(results.len(), "document"),
        plural(resolved, "placeholder"),
        plural(records, "record"),
        plural(warnings, "warning")
    ));
    lines
}

pub fn print_check(results: &[(String, ResolveReport)]) {
    for line in format_check(results) {
        println!("{}", line);
    }
}
