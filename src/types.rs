//! Shared types used by the directive, builder and processor stages.

use std::cmp::Reverse;
use std::fmt;

/// Ordering of a built collection.
///
/// Collections are newest/highest first unless a directive flips them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    #[default]
    Descending,
    Ascending,
}

impl Order {
    /// `Ascending` when the directive carries a flip flag.
    pub fn flipped(flip: bool) -> Self {
        if flip {
            Order::Ascending
        } else {
            Order::Descending
        }
    }

    /// Stable sort of `items` by `key` in this order.
    ///
    /// Equal keys keep their input order in both directions.
    pub fn sort_by_key<T, K, F>(self, items: &mut [T], mut key: F)
    where
        K: Ord,
        F: FnMut(&T) -> K,
    {
        match self {
            Order::Descending => items.sort_by_cached_key(|item| Reverse(key(item))),
            Order::Ascending => items.sort_by_cached_key(key),
        }
    }
}

/// Every kind of content a directive can insert.
///
/// One static table drives directive names, data sections, and list classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Posts,
    Experiences,
    Educations,
    Certifications,
    SideProjects,
    Aptitudes,
}

impl ContentKind {
    pub const ALL: [ContentKind; 6] = [
        ContentKind::Posts,
        ContentKind::Experiences,
        ContentKind::Educations,
        ContentKind::Certifications,
        ContentKind::SideProjects,
        ContentKind::Aptitudes,
    ];

    /// Name used in `.. <name>:: <source>`.
    pub fn directive_name(self) -> &'static str {
        match self {
            ContentKind::Posts => "posts",
            ContentKind::Experiences => "cv-experiences",
            ContentKind::Educations => "cv-educations",
            ContentKind::Certifications => "cv-certifications",
            ContentKind::SideProjects => "cv-side-projects",
            ContentKind::Aptitudes => "cv-aptitudes",
        }
    }

    /// Section of the CV data file, `None` for posts.
    pub fn section(self) -> Option<&'static str> {
        match self {
            ContentKind::Posts => None,
            ContentKind::Experiences => Some("experience"),
            ContentKind::Educations => Some("education"),
            ContentKind::Certifications => Some("certification"),
            ContentKind::SideProjects => Some("side-project"),
            ContentKind::Aptitudes => Some("aptitude"),
        }
    }

    /// CSS class of the generated `<ul>`.
    pub fn css_class(self) -> &'static str {
        match self {
            ContentKind::Posts => "posts-list",
            other => other.directive_name(),
        }
    }

    pub fn from_directive(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.directive_name() == name)
    }

    pub fn is_cv(self) -> bool {
        self.section().is_some()
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.directive_name())
    }
}
