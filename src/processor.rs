//! Node processors: the resolution pass.
//!
//! Every placeholder left by [`crate::directive`] is resolved against the
//! base content directory, built into a sorted collection, rendered into one
//! `<ul>` and replaced by a raw HTML node:
//!
//! ```text
//! Placeholder { kind, source }  →  base_dir/source  →  records  →  Node::Raw
//! ```
//!
//! A CV data file without the requested section is not an error: the
//! placeholder becomes an empty list and the report carries one warning.
//! Everything else (missing file, wrong extension, untitled post, invalid
//! entry) aborts resolution of the document.

use crate::config::ThemeConfig;
use crate::cv::{
    self, Aptitude, CvRecord, Event, Experience, LoadError, SideProject, Timeline,
};
use crate::directive::{self, DirectiveError};
use crate::document::{Document, Node, Placeholder};
use crate::posts::{self, PostsError};
use crate::types::ContentKind;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error(transparent)]
    Directive(#[from] DirectiveError),
    #[error(transparent)]
    Posts(#[from] PostsError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("{name}: {source}")]
    InDocument {
        name: String,
        #[source]
        source: Box<ProcessError>,
    },
}

/// Everything a resolution needs besides the document.
#[derive(Debug, Clone)]
pub struct ResolveContext {
    /// Directory that directive sources are relative to.
    pub base_dir: PathBuf,
    pub config: ThemeConfig,
    pub timeline: Timeline,
}

impl ResolveContext {
    pub fn new(base_dir: impl Into<PathBuf>, config: ThemeConfig) -> Self {
        let timeline = Timeline::new(&config.cv.ongoing);
        Self {
            base_dir: base_dir.into(),
            config,
            timeline,
        }
    }
}

/// Outcome of resolving one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolveReport {
    /// Placeholders replaced.
    pub resolved: usize,
    /// Records rendered across all placeholders.
    pub records: usize,
    pub warnings: Vec<String>,
}

/// Replace every placeholder in `doc` with rendered HTML.
pub fn resolve_document(
    doc: &mut Document,
    ctx: &ResolveContext,
) -> Result<ResolveReport, ProcessError> {
    let mut report = ResolveReport::default();
    for node in &mut doc.nodes {
        let Node::Placeholder(placeholder) = node else {
            continue;
        };
        let html = resolve_placeholder(placeholder, ctx, &mut report)?;
        *node = Node::Raw(html);
        report.resolved += 1;
    }
    Ok(report)
}

/// Run both passes over one source text.
pub fn process_source(
    name: &str,
    text: &str,
    ctx: &ResolveContext,
) -> Result<(String, ResolveReport), ProcessError> {
    let mut doc =
        directive::parse_document_with_language(name, text, ctx.config.cv.default_language())?;
    let report = resolve_document(&mut doc, ctx)?;
    Ok((doc.render(), report))
}

/// Run both passes over a document file. Its name is the path relative to
/// the base directory, without extension.
pub fn process_file(path: &Path, ctx: &ResolveContext) -> Result<(String, ResolveReport), ProcessError> {
    let text = fs::read_to_string(path)?;
    let name = document_name(path, &ctx.base_dir);
    process_source(&name, &text, ctx).map_err(|source| ProcessError::InDocument {
        name,
        source: Box::new(source),
    })
}

/// Resolve every document below the base directory, in file-name order.
///
/// Documents are recognised by `posts.extensions`, the same list the posts
/// listing scans, so one setting names the site's source format.
pub fn process_tree(ctx: &ResolveContext) -> Result<Vec<(String, ResolveReport)>, ProcessError> {
    let mut results = Vec::new();
    for entry in WalkDir::new(&ctx.base_dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() || !ctx.config.posts.accepts(entry.path()) {
            continue;
        }
        let (_, report) = process_file(entry.path(), ctx)?;
        results.push((document_name(entry.path(), &ctx.base_dir), report));
    }
    Ok(results)
}

fn resolve_placeholder(
    placeholder: &Placeholder,
    ctx: &ResolveContext,
    report: &mut ResolveReport,
) -> Result<String, ProcessError> {
    match placeholder.kind {
        ContentKind::Posts => render_posts(placeholder, ctx, report),
        ContentKind::Experiences => render_cv::<Experience>(placeholder, ctx, report),
        ContentKind::Educations | ContentKind::Certifications => {
            render_cv::<Event>(placeholder, ctx, report)
        }
        ContentKind::SideProjects => render_cv::<SideProject>(placeholder, ctx, report),
        ContentKind::Aptitudes => render_cv::<Aptitude>(placeholder, ctx, report),
    }
}

fn render_posts(
    placeholder: &Placeholder,
    ctx: &ResolveContext,
    report: &mut ResolveReport,
) -> Result<String, ProcessError> {
    let root = ctx.base_dir.join(&placeholder.source);
    let posts = posts::build_posts(&root, &ctx.config.posts, placeholder.order)?;
    tracing::info!(count = posts.len(), root = %root.display(), "loaded posts");
    report.records += posts.len();
    Ok(posts::render_posts_list(
        &posts,
        &ctx.base_dir,
        &ctx.config.posts.date_format,
    ))
}

fn render_cv<T: CvRecord>(
    placeholder: &Placeholder,
    ctx: &ResolveContext,
    report: &mut ResolveReport,
) -> Result<String, ProcessError> {
    let path = ctx.base_dir.join(&placeholder.source);
    let section = placeholder.kind.section().unwrap_or_default();
    let css_class = placeholder.kind.css_class();
    let lang = placeholder
        .language
        .unwrap_or_else(|| ctx.config.cv.default_language());

    match cv::load_records::<T>(&path, section, placeholder.order, &ctx.timeline)? {
        Some(records) => {
            tracing::info!(count = records.len(), section, path = %path.display(), "loaded CV records");
            report.records += records.len();
            Ok(cv::render_list(css_class, &records, lang))
        }
        None => {
            let warning = format!("{} does not contain '{section}' section", path.display());
            tracing::warn!(section, path = %path.display(), line = placeholder.line, "missing CV section");
            report.warnings.push(warning);
            Ok(cv::render_list::<T>(css_class, &[], lang))
        }
    }
}

fn document_name(path: &Path, base_dir: &Path) -> String {
    let rel = path.strip_prefix(base_dir).unwrap_or(path);
    posts::slash_path(&rel.with_extension(""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;
    use crate::posts::build_posts;
    use crate::test_helpers::*;
    use crate::types::Order;
    use tempfile::TempDir;

    fn fixture_context(root: &Path) -> ResolveContext {
        ResolveContext::new(root, load_config(root).unwrap())
    }

    #[test]
    fn posts_placeholder_resolved_from_fixtures() {
        let tmp = setup_fixtures();
        let ctx = fixture_context(tmp.path());

        let (html, report) = process_file(&tmp.path().join("index.rst"), &ctx).unwrap();
        assert_eq!(report.resolved, 1);
        assert_eq!(report.records, 2);
        assert!(report.warnings.is_empty());

        let ownership = html.find("blog/rust/ownership.html").unwrap();
        let hello = html.find("blog/hello.html").unwrap();
        assert!(ownership < hello);
        assert!(!html.contains("Unfinished"));
        assert!(html.contains("Latest writing"));
        assert!(html.contains("Older notes live in the archive."));
    }

    #[test]
    fn fixture_posts_match_built_listing() {
        let tmp = setup_fixtures();
        let ctx = fixture_context(tmp.path());
        let posts = build_posts(
            &tmp.path().join("blog"),
            &ctx.config.posts,
            Order::Descending,
        )
        .unwrap();
        let post = find_post(&posts, "Ownership");
        assert_eq!(post.group, "rust");
        assert_eq!(post.href(tmp.path()), "blog/rust/ownership.html");
    }

    #[test]
    fn every_cv_kind_resolves() {
        let tmp = setup_fixtures();
        let ctx = fixture_context(tmp.path());

        let (html, report) = process_file(&tmp.path().join("cv.rst"), &ctx).unwrap();
        assert_eq!(report.resolved, 5);
        assert_eq!(report.records, 2 + 2 + 1 + 2 + 3);
        for class in [
            "cv-experiences",
            "cv-educations",
            "cv-certifications",
            "cv-side-projects",
            "cv-aptitudes",
        ] {
            assert!(html.contains(&format!("<ul class=\"{class}\">")), "{class}");
        }
        assert!(html.contains(" at <span class=\"cv-job-employer\">Acme</span>"));
        assert!(!html.contains("unresolved"));
    }

    #[test]
    fn spanish_document_uses_spanish_labels_and_flipped_order() {
        let tmp = setup_fixtures();
        let ctx = fixture_context(tmp.path());

        let (html, _) = process_file(&tmp.path().join("cv-es.rst"), &ctx).unwrap();
        assert!(html.contains(" para <span class=\"cv-job-employer\">"));
        assert!(html.contains("Colaboradores:"));
        let alpha = html.find(">Alpha</p>").unwrap();
        let beta = html.find(">Beta</p>").unwrap();
        assert!(alpha < beta);
    }

    #[test]
    fn missing_section_warns_and_renders_empty_list() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "data/cv.toml", "[[aptitude]]\nname = \"Go\"\nscore = 5\n");
        let ctx = ResolveContext::new(tmp.path(), ThemeConfig::default());

        let (html, report) =
            process_source("cv", ".. cv-experiences:: data/cv.toml\n", &ctx).unwrap();
        assert_eq!(html, "<ul class=\"cv-experiences\">\n</ul>\n");
        assert_eq!(report.resolved, 1);
        assert_eq!(report.records, 0);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("'experience'"));
    }

    #[test]
    fn missing_data_file_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let ctx = ResolveContext::new(tmp.path(), ThemeConfig::default());
        let err = process_source("cv", ".. cv-aptitudes:: nope.toml\n", &ctx).unwrap_err();
        assert!(matches!(err, ProcessError::Load(LoadError::NotFound(_))));
    }

    #[test]
    fn untitled_post_aborts_document() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "blog/a.rst", &post_source("Fine", &[]));
        write_file(tmp.path(), "blog/b.rst", "no title\n");
        write_file(tmp.path(), "index.rst", ".. posts:: blog\n");
        let ctx = ResolveContext::new(tmp.path(), ThemeConfig::default());

        let err = process_file(&tmp.path().join("index.rst"), &ctx).unwrap_err();
        match err {
            ProcessError::InDocument { name, source } => {
                assert_eq!(name, "index");
                assert!(matches!(*source, ProcessError::Posts(PostsError::MissingTitle(_))));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn directive_errors_propagate() {
        let tmp = TempDir::new().unwrap();
        let ctx = ResolveContext::new(tmp.path(), ThemeConfig::default());
        let err = process_source("cv", ".. cv-aptitudes::\n", &ctx).unwrap_err();
        assert!(matches!(err, ProcessError::Directive(DirectiveError::Arity { .. })));
    }

    #[test]
    fn configured_default_language_applies_without_language_field() {
        let tmp = TempDir::new().unwrap();
        write_file(
            tmp.path(),
            "cv.json",
            r#"{"side-project": [{"title": "T", "description": "D", "collaborators": [{"name": "N"}]}]}"#,
        );
        let mut config = ThemeConfig::default();
        config.cv.default_language = "spanish".into();
        let ctx = ResolveContext::new(tmp.path(), config);

        let (html, _) = process_source("cv", ".. cv-side-projects:: cv.json\n", &ctx).unwrap();
        assert!(html.contains("Colaboradores:"));
    }

    #[test]
    fn tree_processing_reports_every_document() {
        let tmp = setup_fixtures();
        let ctx = fixture_context(tmp.path());
        let results = process_tree(&ctx).unwrap();
        let names: Vec<_> = results.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(
            names,
            vec!["blog/hello", "blog/rust/ownership", "blog/wip", "cv-es", "cv", "index"]
        );
        let total: usize = results.iter().map(|(_, r)| r.resolved).sum();
        assert_eq!(total, 5 + 2 + 1);
    }

    #[test]
    fn tree_processing_follows_document_extensions() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "notes.txt", "Plain notes.\n");
        write_file(tmp.path(), "skipped.rst", ".. cv-aptitudes:: missing.toml\n");
        let mut config = ThemeConfig::default();
        config.posts.extensions = vec!["TXT".into()];
        let ctx = ResolveContext::new(tmp.path(), config);

        let results = process_tree(&ctx).unwrap();
        let names: Vec<_> = results.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["notes"]);
    }

    #[test]
    fn document_names_are_relative_and_extensionless() {
        assert_eq!(
            document_name(Path::new("/site/blog/rust/p.rst"), Path::new("/site")),
            "blog/rust/p"
        );
    }
}
