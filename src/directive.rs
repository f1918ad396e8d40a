//! Content directives: the parse-time pass.
//!
//! Splits a reStructuredText source into text blocks and placeholders. A
//! directive is a marker line followed by an optional indented block:
//!
//! ```text
//! .. cv-experiences:: data/cv.toml
//!    :reverse:
//!
//!    Body lines are kept on the placeholder but never rendered.
//! ```
//!
//! The first argument is the data source (a directory for `posts`, a data
//! file for CV kinds), kept as written and resolved later by
//! [`crate::processor`]. A second argument is accepted and carried along.
//!
//! Option lines come first in the block. `:opposite:` and `:reverse:` flip
//! the default newest-first ordering; any other option is an error.
//!
//! Directive names that are not content kinds are left in the text.

use crate::document::{Document, Node, Placeholder};
use crate::language::Language;
use crate::metadata;
use crate::types::{ContentKind, Order};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static DIRECTIVE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\.\.\s+([A-Za-z][A-Za-z0-9-]*)::(.*)$").expect("directive pattern is valid")
});

static OPTION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^:([A-Za-z_-]+):\s*(.*)$").expect("option pattern is valid")
});

const FLIP_OPTIONS: &[&str] = &["opposite", "reverse"];

#[derive(Error, Debug, PartialEq)]
pub enum DirectiveError {
    #[error("line {line}: '{directive}' takes one data source and one optional argument, found {found}")]
    Arity {
        directive: String,
        line: usize,
        found: usize,
    },
    #[error("line {line}: unknown option ':{option}:' for '{directive}'")]
    UnknownOption {
        directive: String,
        option: String,
        line: usize,
    },
}

/// Parse `text` with English as the fallback CV language.
pub fn parse_document(name: &str, text: &str) -> Result<Document, DirectiveError> {
    parse_document_with_language(name, text, Language::default())
}

/// Parse `text`; CV placeholders use the document's `:language:` field, or
/// `fallback` when it has none.
pub fn parse_document_with_language(
    name: &str,
    text: &str,
    fallback: Language,
) -> Result<Document, DirectiveError> {
    let language = metadata::parse_meta(text)
        .language()
        .map(Language::from_name)
        .unwrap_or(fallback);

    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    let mut nodes = Vec::new();
    let mut pending = String::new();
    let mut i = 0;

    while i < lines.len() {
        let Some((kind, args)) = directive_at(lines[i]) else {
            pending.push_str(lines[i]);
            i += 1;
            continue;
        };

        let line = i + 1;
        if args.is_empty() || args.len() > 2 {
            return Err(DirectiveError::Arity {
                directive: kind.directive_name().to_string(),
                line,
                found: args.len(),
            });
        }

        let end = block_end(&lines, i);
        let (flip, children) = parse_block(kind, &lines[i + 1..end], line)?;

        if !pending.is_empty() {
            nodes.push(Node::Text(std::mem::take(&mut pending)));
        }
        let mut args = args.into_iter();
        nodes.push(Node::Placeholder(Placeholder {
            kind,
            source: args.next().unwrap_or_default(),
            extra: args.next(),
            order: Order::flipped(flip),
            language: kind.is_cv().then_some(language),
            line,
            children,
        }));
        i = end;
    }

    if !pending.is_empty() {
        nodes.push(Node::Text(pending));
    }

    Ok(Document {
        name: name.to_string(),
        nodes,
    })
}

/// Content kind and arguments of a directive marker line.
fn directive_at(line: &str) -> Option<(ContentKind, Vec<String>)> {
    let caps = DIRECTIVE_LINE.captures(line.trim_end())?;
    let kind = ContentKind::from_directive(&caps[1])?;
    let args = caps[2].split_whitespace().map(String::from).collect();
    Some((kind, args))
}

/// Index one past the directive's indented block.
///
/// Blank lines inside the block belong to it; trailing blank lines don't.
fn block_end(lines: &[&str], start: usize) -> usize {
    let mut end = start + 1;
    for (j, line) in lines.iter().enumerate().skip(start + 1) {
        if line.trim().is_empty() {
            continue;
        }
        if line.starts_with([' ', '\t']) {
            end = j + 1;
        } else {
            break;
        }
    }
    end
}

/// Split a directive block into the flip flag and body lines.
fn parse_block(
    kind: ContentKind,
    block: &[&str],
    line: usize,
) -> Result<(bool, Vec<String>), DirectiveError> {
    let mut flip = false;
    let mut in_options = true;
    let mut children = Vec::new();

    for raw in block {
        let trimmed = raw.trim();
        if in_options {
            if let Some(caps) = OPTION_LINE.captures(trimmed) {
                let option = caps[1].to_lowercase();
                if !FLIP_OPTIONS.contains(&option.as_str()) {
                    return Err(DirectiveError::UnknownOption {
                        directive: kind.directive_name().to_string(),
                        option,
                        line,
                    });
                }
                flip = true;
                continue;
            }
            in_options = false;
        }
        if !trimmed.is_empty() {
            children.push(trimmed.to_string());
        }
    }

    Ok((flip, children))
}
