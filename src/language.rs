//! Page languages and their lookup tables.
//!
//! Documents declare their language with a `:language:` field. CV labels
//! switch between English and Spanish; templates use the flag and filename
//! suffix tables to link translated versions of a page.

use serde::Serialize;
use std::fmt;

/// Language used for CV labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Spanish,
}

/// Language name → flag emoji.
pub const LANGUAGE_FLAG_MAPPING: &[(&str, &str)] = &[
    ("spanish", "🇪🇸"),
    ("español", "🇪🇸"),
    ("es", "🇪🇸"),
    ("english", "🇬🇧"),
    ("inglés", "🇬🇧"),
    ("en", "🇬🇧"),
];

/// Language name → suffix appended to translated document names.
pub const LANGUAGE_FILE_END_MAPPING: &[(&str, &str)] = &[
    ("spanish", "-es"),
    ("español", "-es"),
    ("es", "-es"),
    ("english", ""),
    ("inglés", ""),
    ("en", ""),
];

impl Language {
    /// Resolve a free-form language name. Unknown or empty names are English.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "spanish" | "español" | "es" => Language::Spanish,
            _ => Language::English,
        }
    }

    /// Connective between a job position and its employer.
    pub fn employer_ligature(self) -> &'static str {
        match self {
            Language::English => "at",
            Language::Spanish => "para",
        }
    }

    pub fn collaborators_label(self) -> &'static str {
        match self {
            Language::English => "Collaborators",
            Language::Spanish => "Colaboradores",
        }
    }

    pub fn flag(self) -> &'static str {
        lookup(LANGUAGE_FLAG_MAPPING, self.name()).unwrap_or_default()
    }

    pub fn file_suffix(self) -> &'static str {
        lookup(LANGUAGE_FILE_END_MAPPING, self.name()).unwrap_or_default()
    }

    pub fn name(self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Spanish => "spanish",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn lookup(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}
