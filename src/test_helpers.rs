//! Shared test utilities for the pj-theme test suite.
//!
//! Provides fixture writers for post documents and CV data files, and lookup
//! helpers over built collections.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_file(tmp.path(), "blog/a.rst", &post_source("A", &[("date", "01-01-2021")]));
//! let posts = build_posts(&tmp.path().join("blog"), &PostsConfig::default(), Order::Descending)?;
//! assert_eq!(post_titles(&posts), vec!["A"]);
//! ```

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::posts::Post;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Write `content` to `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}

/// A minimal post document: metadata fields, an overlined title, a body.
pub fn post_source(title: &str, fields: &[(&str, &str)]) -> String {
    let marker = "=".repeat(title.len().max(3));
    let mut out = String::new();
    for (key, value) in fields {
        out.push_str(&format!(":{key}: {value}\n"));
    }
    out.push_str(&format!("\n{marker}\n{title}\n{marker}\n\nBody text.\n"));
    out
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// All post titles in listing order.
pub fn post_titles(posts: &[Post]) -> Vec<&str> {
    posts.iter().map(|p| p.title.as_str()).collect()
}

/// Find a post by title. Panics if not found.
pub fn find_post<'a>(posts: &'a [Post], title: &str) -> &'a Post {
    posts.iter().find(|p| p.title == title).unwrap_or_else(|| {
        let titles = post_titles(posts);
        panic!("post '{title}' not found. Available: {titles:?}")
    })
}
