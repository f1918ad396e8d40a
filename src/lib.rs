//! # pj-theme
//!
//! Content directives for a personal blog and CV documentation theme. Pages
//! written in reStructuredText insert generated lists with one-line
//! directives; the data comes from the documents themselves (blog posts) or
//! from one structured data file (CV sections).
//!
//! # Architecture: Two Passes
//!
//! A document goes through two independent passes:
//!
//! ```text
//! 1. Directive   source text  →  Document { Text | Placeholder }   (parse time)
//! 2. Processor   placeholders →  Document { Text | Raw }           (resolution time)
//! ```
//!
//! The directive pass only records *what* to insert: content kind, data
//! source as written, ordering flag and, for CV content, the page language.
//! The processor pass resolves the source against the content root, builds
//! the sorted collection, renders it and swaps the placeholder for raw HTML.
//! Keeping the passes apart means a document can be parsed and inspected
//! without any data present.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`metadata`] | `:key: value` field extraction and post header (title) parsing |
//! | [`posts`] | Post discovery: directory walk, draft filter, date sort, listing markup |
//! | [`cv`] | CV data file loading, record kinds, sort keys and markup |
//! | [`directive`] | Parse-time pass: directive lines → placeholders |
//! | [`processor`] | Resolution pass: placeholders → rendered HTML |
//! | [`document`] | Flat document model shared by both passes |
//! | [`types`] | Shared types: collection [`types::Order`], [`types::ContentKind`] table |
//! | [`language`] | Page languages, CV labels, flag and file-suffix tables |
//! | [`context`] | Values injected into every rendered page |
//! | [`config`] | `config.toml` loading, merging and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## One Static Kind Table
//!
//! Every directive name, CV data section and list CSS class lives in
//! [`types::ContentKind`]. Adding a content kind is one enum variant plus a
//! record type implementing [`cv::CvRecord`]; nothing is registered at
//! runtime.
//!
//! ## Missing Sections Render Empty
//!
//! A CV data file without the requested section is a content gap, not a
//! broken build: the list renders empty and the resolution report carries a
//! warning. A missing file, a wrong extension or an untitled post still abort
//! the document.
//!
//! ## Maud for Escaping
//!
//! All text coming from documents and data files goes through
//! [Maud](https://maud.lambda.xyz/) escaping. Icon markup comes from a static
//! table and is inserted as is.

pub mod config;
pub mod context;
pub mod cv;
pub mod directive;
pub mod document;
pub mod language;
pub mod metadata;
pub mod output;
pub mod posts;
pub mod processor;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
