//! Blog post discovery and listing.
//!
//! A `.. posts:: <dir>` directive lists every post document found below
//! `<dir>`, newest first:
//!
//! ```text
//! blog/                          # Scan root
//! ├── hello.rst                  # group ""
//! ├── rust/
//! │   └── ownership.rst          # group "rust"
//! └── wip.rst                    # :draft: true → never listed
//! ```
//!
//! ## Post header
//!
//! Titles and metadata come from [`crate::metadata::parse_header`]: the title
//! is the line after the first `====`/`####` marker line (or the line above
//! it for an underlined heading), and any `:key: value` fields above it are
//! collected. A `*date*` field sets the post date; without one the file
//! modification day is used.
//!
//! A post without a title fails the whole listing.

use crate::config::PostsConfig;
use crate::metadata::{self, Metadata};
use crate::types::Order;
use chrono::{DateTime, Local, NaiveDate};
use maud::{Markup, html};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum PostsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Posts directory not found: {0}")]
    NotFound(PathBuf),
    #[error("File {0} does not have a title")]
    MissingTitle(PathBuf),
}

/// One listed post.
#[derive(Debug, Clone)]
pub struct Post {
    pub path: PathBuf,
    pub title: String,
    pub date: NaiveDate,
    /// Containing directory relative to the scan root, `/`-separated.
    pub group: String,
    pub meta: Metadata,
}

impl Post {
    /// Read a post document found under `root`.
    pub fn from_file(path: &Path, root: &Path) -> Result<Self, PostsError> {
        let text = fs::read_to_string(path)?;
        let header = metadata::parse_header(&text)
            .map_err(|_| PostsError::MissingTitle(path.to_path_buf()))?;

        let date = match header.meta.date() {
            Some(date) => date,
            None => modified_day(path)?,
        };

        let group = path
            .parent()
            .and_then(|parent| parent.strip_prefix(root).ok())
            .map(slash_path)
            .unwrap_or_default();

        Ok(Post {
            path: path.to_path_buf(),
            title: header.title,
            date,
            group,
            meta: header.meta,
        })
    }

    /// Document name relative to `base_dir`, without extension.
    ///
    /// Posts outside `base_dir` keep their full path.
    pub fn doc_name(&self, base_dir: &Path) -> String {
        let rel = self.path.strip_prefix(base_dir).unwrap_or(&self.path);
        slash_path(&rel.with_extension(""))
    }

    pub fn href(&self, base_dir: &Path) -> String {
        format!("{}.html", self.doc_name(base_dir))
    }

    pub fn to_html(&self, base_dir: &Path, date_format: &str) -> Markup {
        html! {
            li {
                a href=(self.href(base_dir)) {
                    @if !self.group.is_empty() {
                        span.post-group { (self.group) }
                    }
                    span.post-title { (self.title) }
                    span.post-date { (display_date(&self.date, date_format)) }
                }
            }
        }
    }
}

/// Build the listing for `root`: every post, drafts removed, sorted by day.
pub fn build_posts(
    root: &Path,
    config: &PostsConfig,
    order: Order,
) -> Result<Vec<Post>, PostsError> {
    if !root.is_dir() {
        return Err(PostsError::NotFound(root.to_path_buf()));
    }

    let mut posts = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() || !config.accepts(entry.path()) {
            continue;
        }
        let post = Post::from_file(entry.path(), root)?;
        if post.meta.is_draft() {
            tracing::debug!(path = %entry.path().display(), "skipping draft post");
            continue;
        }
        posts.push(post);
    }

    order.sort_by_key(&mut posts, |post| post.date);
    Ok(posts)
}

/// Render a full `<ul class="posts-list">`.
pub fn render_posts_list(posts: &[Post], base_dir: &Path, date_format: &str) -> String {
    html! {
        ul.posts-list {
            @for post in posts {
                (post.to_html(base_dir, date_format))
            }
        }
    }
    .into_string()
}

fn modified_day(path: &Path) -> Result<NaiveDate, PostsError> {
    let modified = fs::metadata(path)?.modified()?;
    Ok(DateTime::<Local>::from(modified).date_naive())
}

/// Format with `date_format`, falling back to `dd/mm/YYYY` on a bad format.
pub fn display_date(date: &NaiveDate, date_format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", date.format(date_format)).is_err() {
        return metadata::format_date(date);
    }
    out
}

/// Join path components with `/` regardless of platform.
pub(crate) fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
