//! Values injected into every rendered page.

use crate::language::{LANGUAGE_FILE_END_MAPPING, LANGUAGE_FLAG_MAPPING};
use serde::Serialize;
use std::collections::BTreeMap;

/// Theme version reported to templates.
pub const THEME_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Per-page template context.
#[derive(Debug, Clone, Serialize)]
pub struct PageContext {
    pub pjnotes_version: &'static str,
    pub language_flag_mapping: BTreeMap<&'static str, &'static str>,
    pub language_file_end_mapping: BTreeMap<&'static str, &'static str>,
}

pub fn page_context() -> PageContext {
    PageContext {
        pjnotes_version: THEME_VERSION,
        language_flag_mapping: LANGUAGE_FLAG_MAPPING.iter().copied().collect(),
        language_file_end_mapping: LANGUAGE_FILE_END_MAPPING.iter().copied().collect(),
    }
}
