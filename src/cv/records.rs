//! CV record kinds and their HTML rendering.
//!
//! Records are built from one entry of a data section. Entry fields that read
//! as text accept strings or numbers, so `start = 2019` and `start = "2019"`
//! are the same thing. Optional fields default to empty.
//!
//! Rendering is indented line by line for readable page source; empty
//! optional parts produce no line at all.

use super::icons::icon_for;
use super::{CvRecord, LoadError, Timeline, entries};
use crate::language::Language;
use crate::types::Order;
use maud::Escaper;
use regex::Regex;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt::Write as _;
use std::sync::LazyLock;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.+-]+@([\w-]+\.)+\w{2,}$").expect("valid regex"));

// =========================================================================
// Records
// =========================================================================

/// One project inside an experience.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperienceProject {
    pub description: String,
    pub tech_stack: Vec<String>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Experience {
    pub position: String,
    pub employer: String,
    pub start: String,
    pub end: String,
    pub description: String,
    pub projects: Vec<ExperienceProject>,
}

/// An education or certification entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub title: String,
    pub institution: String,
    pub when: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SideProjectCollaborator {
    pub name: String,
    /// Link target; bare email addresses are turned into `mailto:` links.
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SideProject {
    pub title: String,
    pub description: String,
    pub url: String,
    pub collaborators: Vec<SideProjectCollaborator>,
}

/// A skill with a 0-10 score.
#[derive(Debug, Clone, PartialEq)]
pub struct Aptitude {
    pub name: String,
    pub score: u8,
}

impl ExperienceProject {
    pub fn to_html(&self, indent: usize) -> String {
        let mut lines = Lines::default();
        lines.push(indent, r#"<li class="cv-item-inner">"#);
        if !self.url.is_empty() {
            lines.push(indent + 2, format!(r#"<a href="{}">"#, escape(&self.url)));
        }
        lines.push(indent + 2, escape(&self.description));
        if !self.url.is_empty() {
            lines.push(indent + 2, "</a>");
        }
        lines.block(self.tech_stack_html(indent + 2));
        lines.push(indent, "</li>");
        lines.finish()
    }

    fn tech_stack_html(&self, indent: usize) -> String {
        if self.tech_stack.is_empty() {
            return String::new();
        }
        let mut lines = Lines::default();
        lines.push(indent, r#"<p class="cv-tech-stack">"#);
        for tech in &self.tech_stack {
            let icon = icon_for(tech).map(|i| format!("{i} ")).unwrap_or_default();
            lines.push(
                indent + 2,
                format!(
                    r#"<span class="cv-tech-stack-tag">{icon}{}</span>"#,
                    escape(tech)
                ),
            );
        }
        lines.push(indent, "</p>");
        lines.finish()
    }
}

impl SideProjectCollaborator {
    pub fn new(name: &str, url: &str) -> Self {
        let url = url.trim();
        let url = if EMAIL_PATTERN.is_match(url) {
            format!("mailto:{url}")
        } else {
            url.to_string()
        };
        Self {
            name: name.to_string(),
            url,
        }
    }

    pub fn to_html(&self, indent: usize) -> String {
        let mut lines = Lines::default();
        lines.push(indent, r#"<li class="cv-item-inner">"#);
        if self.url.is_empty() {
            lines.push(indent + 2, escape(&self.name));
        } else {
            lines.push(
                indent + 2,
                format!(r#"<a href="{}">{}</a>"#, escape(&self.url), escape(&self.name)),
            );
        }
        lines.push(indent, "</li>");
        lines.finish()
    }
}

impl Aptitude {
    /// Build an aptitude, clamping the score into `0..=10`.
    pub fn new(name: &str, score: i64) -> Self {
        Self {
            name: name.to_string(),
            score: score.clamp(0, 10) as u8,
        }
    }

    /// Progress-bar width, `0..=100` in steps of 10.
    pub fn percent(&self) -> u32 {
        u32::from(self.score) * 10
    }
}

// =========================================================================
// CvRecord implementations
// =========================================================================

impl CvRecord for Experience {
    fn from_section(section: &str, value: &Value) -> Result<Vec<Self>, LoadError> {
        Ok(entries::<ExperienceEntry>(section, value)?
            .into_iter()
            .map(|e| Experience {
                position: e.position,
                employer: e.employer,
                start: e.start,
                end: e.end,
                description: e.description,
                projects: e
                    .projects
                    .into_iter()
                    .map(|p| ExperienceProject {
                        description: p.description,
                        tech_stack: p.tech_stack,
                        url: p.url,
                    })
                    .collect(),
            })
            .collect())
    }

    fn sort(records: &mut [Self], order: Order, timeline: &Timeline) {
        order.sort_by_key(records, |r| {
            (
                timeline.as_date(&r.end),
                timeline.as_date(&r.start),
                r.position.clone(),
            )
        });
    }

    fn to_html(&self, indent: usize, lang: Language) -> String {
        let mut lines = Lines::default();
        lines.push(indent, r#"<li class="cv-item">"#);
        lines.push(indent + 2, r#"<div class="cv-item-main">"#);
        lines.push(
            indent + 4,
            format!(
                r#"<p class="cv-job"><span class="cv-job-position">{}</span> {} <span class="cv-job-employer">{}</span></p>"#,
                escape(&self.position),
                lang.employer_ligature(),
                escape(&self.employer)
            ),
        );
        lines.push(
            indent + 4,
            format!(
                r#"<span class="cv-when">{} - {}</span>"#,
                escape(&self.start),
                escape(&self.end)
            ),
        );
        lines.push(indent + 2, "</div>");
        lines.push(indent + 2, r#"<div class="cv-item-info">"#);
        if !self.description.is_empty() {
            lines.push(indent + 4, format!("<p>{}</p>", escape(&self.description)));
        }
        if !self.projects.is_empty() {
            lines.push(indent + 4, r#"<ul class="cv-experience-projects">"#);
            for project in &self.projects {
                lines.block(project.to_html(indent + 6));
            }
            lines.push(indent + 4, "</ul>");
        }
        lines.push(indent + 2, "</div>");
        lines.push(indent, "</li>");
        lines.finish()
    }

    fn summary(&self) -> String {
        format!(
            "{} at {} ({} - {})",
            self.position, self.employer, self.start, self.end
        )
    }
}

impl CvRecord for Event {
    fn from_section(section: &str, value: &Value) -> Result<Vec<Self>, LoadError> {
        Ok(entries::<EventEntry>(section, value)?
            .into_iter()
            .map(|e| Event {
                title: e.title,
                institution: e.institution,
                when: e.when,
                url: e.url,
            })
            .collect())
    }

    fn sort(records: &mut [Self], order: Order, timeline: &Timeline) {
        order.sort_by_key(records, |r| (timeline.as_date(&r.when), r.title.clone()));
    }

    fn to_html(&self, indent: usize, _lang: Language) -> String {
        let mut lines = Lines::default();
        lines.push(indent, r#"<li class="cv-item">"#);
        lines.push(indent + 2, r#"<div class="cv-item-main">"#);
        if self.url.is_empty() {
            lines.push(indent + 4, escape(&self.title));
        } else {
            lines.push(indent + 4, format!(r#"<a href="{}">"#, escape(&self.url)));
            lines.push(indent + 4, escape(&self.title));
            lines.push(indent + 4, "</a>");
        }
        lines.push(
            indent + 4,
            format!(r#"<span class="cv-when">{}</span>"#, escape(&self.when)),
        );
        lines.push(indent + 2, "</div>");
        lines.push(indent + 2, r#"<div class="cv-item-info">"#);
        lines.push(indent + 4, format!("<p>{}</p>", escape(&self.institution)));
        lines.push(indent + 2, "</div>");
        lines.push(indent, "</li>");
        lines.finish()
    }

    fn summary(&self) -> String {
        format!("{}, {} ({})", self.title, self.institution, self.when)
    }
}

impl CvRecord for SideProject {
    fn from_section(section: &str, value: &Value) -> Result<Vec<Self>, LoadError> {
        Ok(entries::<SideProjectEntry>(section, value)?
            .into_iter()
            .map(|e| SideProject {
                title: e.title,
                description: e.description,
                url: e.url,
                collaborators: e
                    .collaborators
                    .iter()
                    .map(|c| SideProjectCollaborator::new(&c.name, &c.url))
                    .collect(),
            })
            .collect())
    }

    fn sort(records: &mut [Self], order: Order, _timeline: &Timeline) {
        order.sort_by_key(records, |r| r.title.clone());
    }

    fn to_html(&self, indent: usize, lang: Language) -> String {
        let mut lines = Lines::default();
        lines.push(indent, r#"<li class="cv-item">"#);
        lines.push(indent + 2, r#"<div class="cv-item-main">"#);
        if !self.url.is_empty() {
            lines.push(indent + 4, format!(r#"<a href="{}">"#, escape(&self.url)));
        }
        lines.push(
            indent + 4,
            format!(
                r#"<p class="cv-side-project-title">{}</p>"#,
                escape(&self.title)
            ),
        );
        if !self.url.is_empty() {
            lines.push(indent + 4, "</a>");
        }
        lines.push(indent + 2, "</div>");
        lines.push(indent + 2, r#"<div class="cv-item-info">"#);
        lines.push(
            indent + 4,
            format!(
                r#"<p class="cv-side-project-description">{}</p>"#,
                escape(&self.description)
            ),
        );
        if !self.collaborators.is_empty() {
            lines.push(
                indent + 4,
                format!(
                    r#"<p class="cv-side-project-collaborators">{}:</p>"#,
                    lang.collaborators_label()
                ),
            );
            lines.push(indent + 4, r#"<ul class="cv-side-project-collaborators">"#);
            for collaborator in &self.collaborators {
                lines.block(collaborator.to_html(indent + 6));
            }
            lines.push(indent + 4, "</ul>");
        }
        lines.push(indent + 2, "</div>");
        lines.push(indent, "</li>");
        lines.finish()
    }

    fn summary(&self) -> String {
        match self.collaborators.len() {
            0 => self.title.clone(),
            n => format!("{} ({n} collaborators)", self.title),
        }
    }
}

impl CvRecord for Aptitude {
    /// Accepts a list of `{name, score}` entries or a `name = score` table.
    fn from_section(section: &str, value: &Value) -> Result<Vec<Self>, LoadError> {
        if let Value::Object(table) = value {
            return Ok(table
                .iter()
                .map(|(name, score)| Aptitude::new(name, coerce_score(name, score)))
                .collect());
        }
        Ok(entries::<AptitudeEntry>(section, value)?
            .into_iter()
            .map(|e| Aptitude::new(&e.name, coerce_score(&e.name, &e.score)))
            .collect())
    }

    fn sort(records: &mut [Self], order: Order, _timeline: &Timeline) {
        order.sort_by_key(records, |r| r.score);
    }

    fn to_html(&self, indent: usize, _lang: Language) -> String {
        let mut lines = Lines::default();
        lines.push(
            indent,
            format!(
                r#"<li class="cv-aptitude"><p>{}</p><div class="progress-bar"><span class="progress" style="max-width:{}%;"></span><span></span></div></li>"#,
                escape(&self.name),
                self.percent()
            ),
        );
        lines.finish()
    }

    fn summary(&self) -> String {
        format!("{}: {}/10", self.name, self.score)
    }
}

/// Integer score from a number or numeric string; anything else is 0.
fn coerce_score(name: &str, value: &Value) -> i64 {
    let score = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    score.unwrap_or_else(|| {
        tracing::warn!(aptitude = name, value = %value, "non-numeric score, using 0");
        0
    })
}

// =========================================================================
// Data file entries
// =========================================================================

#[derive(Deserialize)]
struct ExperienceEntry {
    #[serde(deserialize_with = "text")]
    position: String,
    #[serde(deserialize_with = "text")]
    employer: String,
    #[serde(deserialize_with = "text")]
    start: String,
    #[serde(deserialize_with = "text")]
    end: String,
    #[serde(default, deserialize_with = "text")]
    description: String,
    #[serde(default)]
    projects: Vec<ProjectEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ProjectEntry {
    #[serde(deserialize_with = "text")]
    description: String,
    #[serde(default, deserialize_with = "tech_stack")]
    tech_stack: Vec<String>,
    #[serde(default, deserialize_with = "text")]
    url: String,
}

#[derive(Deserialize)]
struct EventEntry {
    #[serde(deserialize_with = "text")]
    title: String,
    #[serde(deserialize_with = "text")]
    institution: String,
    #[serde(deserialize_with = "text")]
    when: String,
    #[serde(default, deserialize_with = "text")]
    url: String,
}

#[derive(Deserialize)]
struct SideProjectEntry {
    #[serde(deserialize_with = "text")]
    title: String,
    #[serde(deserialize_with = "text")]
    description: String,
    #[serde(default, deserialize_with = "text")]
    url: String,
    #[serde(default)]
    collaborators: Vec<CollaboratorEntry>,
}

#[derive(Deserialize)]
struct CollaboratorEntry {
    #[serde(deserialize_with = "text")]
    name: String,
    #[serde(default, deserialize_with = "text")]
    url: String,
}

#[derive(Deserialize)]
struct AptitudeEntry {
    #[serde(deserialize_with = "text")]
    name: String,
    score: Value,
}

/// A string, or a number/bool written without quotes.
fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(D::Error::custom(format!("expected text, found {other}"))),
    }
}

/// A list of tags, or one comma-separated string.
fn tech_stack<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let tags = match Value::deserialize(deserializer)? {
        Value::String(s) => s.split(',').map(str::to_string).collect::<Vec<_>>(),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                other => Err(D::Error::custom(format!(
                    "expected a tech-stack tag, found {other}"
                ))),
            })
            .collect::<Result<_, _>>()?,
        other => {
            return Err(D::Error::custom(format!(
                "expected a tech-stack list, found {other}"
            )));
        }
    };
    Ok(tags
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect())
}

// =========================================================================
// Rendering helpers
// =========================================================================

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    // Writing into a String cannot fail.
    let _ = Escaper::new(&mut out).write_str(text);
    out
}

#[derive(Default)]
struct Lines(Vec<String>);

impl Lines {
    fn push(&mut self, indent: usize, text: impl AsRef<str>) {
        self.0
            .push(format!("{}{}", " ".repeat(indent), text.as_ref()));
    }

    /// Append a pre-rendered block, skipping empty ones.
    fn block(&mut self, block: String) {
        if !block.is_empty() {
            self.0.push(block);
        }
    }

    fn finish(self) -> String {
        self.0.join("\n")
    }
}
