//! Flat document model shared by the directive and processor passes.
//!
//! A source document becomes a sequence of nodes: plain text blocks copied
//! verbatim, placeholders left by content directives, and raw HTML blocks
//! that replaced resolved placeholders. Rendering concatenates them back.

use crate::language::Language;
use crate::types::{ContentKind, Order};

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    Placeholder(Placeholder),
    /// Rendered HTML, terminal.
    Raw(String),
}

/// A directive occurrence waiting for its data.
#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    pub kind: ContentKind,
    /// Data source exactly as written, resolved later against the base dir.
    pub source: String,
    /// Optional second directive argument; carried but not rendered.
    pub extra: Option<String>,
    pub order: Order,
    /// Document language, set for CV content only.
    pub language: Option<Language>,
    /// 1-based line of the directive marker.
    pub line: usize,
    /// Indented body lines below the options. Discarded on resolution.
    pub children: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub name: String,
    pub nodes: Vec<Node>,
}

impl Document {
    pub fn placeholders(&self) -> impl Iterator<Item = &Placeholder> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Placeholder(p) => Some(p),
            _ => None,
        })
    }

    pub fn is_resolved(&self) -> bool {
        self.placeholders().next().is_none()
    }

    /// Join text and raw blocks back into one string.
    ///
    /// A placeholder that was never resolved renders as an HTML comment.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Raw(html) => {
                    out.push_str(html);
                    out.push('\n');
                }
                Node::Placeholder(p) => {
                    out.push_str(&format!(
                        "<!-- unresolved {} {} -->\n",
                        p.kind.directive_name(),
                        p.source
                    ));
                }
            }
        }
        out
    }
}
