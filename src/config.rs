//! Theme configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! overridden by a user config file placed in the content root.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [posts]
//! extensions = ["rst"]      # Source document extensions (posts and check)
//! date_format = "%d/%m/%Y"  # Display format of post dates
//!
//! [cv]
//! default_language = "english"  # Labels when a page declares no :language:
//! ongoing = "Now"               # End value meaning "still active"
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse; override just the values you want:
//!
//! ```toml
//! [cv]
//! ongoing = "Present"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::language::Language;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Theme configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Post listing settings.
    pub posts: PostsConfig,
    /// CV section settings.
    pub cv: CvConfig,
}

impl ThemeConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.posts.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "posts.extensions must not be empty".into(),
            ));
        }
        if self.posts.extensions.iter().any(|e| e.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "posts.extensions must not contain empty values".into(),
            ));
        }
        if self.posts.date_format.trim().is_empty() {
            return Err(ConfigError::Validation(
                "posts.date_format must not be empty".into(),
            ));
        }
        if StrftimeItems::new(&self.posts.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::Validation(format!(
                "posts.date_format is not a valid strftime format: {}",
                self.posts.date_format
            )));
        }
        if self.cv.ongoing.trim().is_empty() {
            return Err(ConfigError::Validation("cv.ongoing must not be empty".into()));
        }
        Ok(())
    }
}

/// Post listing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PostsConfig {
    /// File extensions (without dot, case-insensitive) of source documents:
    /// scanned as posts and resolved by `check`.
    pub extensions: Vec<String>,
    /// `strftime` format for the date shown next to each post.
    pub date_format: String,
}

impl Default for PostsConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["rst".to_string()],
            date_format: "%d/%m/%Y".to_string(),
        }
    }
}

impl PostsConfig {
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| {
                let ext = ext.to_string_lossy();
                self.extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext))
            })
            .unwrap_or(false)
    }
}

/// CV section settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CvConfig {
    /// Language for pages without a `:language:` field.
    pub default_language: String,
    /// End/when value meaning "still active"; sorts as tomorrow.
    pub ongoing: String,
}

impl Default for CvConfig {
    fn default() -> Self {
        Self {
            default_language: "english".to_string(),
            ongoing: "Now".to_string(),
        }
    }
}

impl CvConfig {
    pub fn default_language(&self) -> Language {
        Language::from_name(&self.default_language)
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ThemeConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ThemeConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ThemeConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
pub fn load_config(root: &Path) -> Result<ThemeConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# pj-theme Configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Place this file in the content root.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Posts listing (`.. posts:: <dir>`)
# ---------------------------------------------------------------------------
[posts]
# Extensions (without dot) of source documents. Posts listings and
# `pj-theme check` only pick up files with these extensions.
extensions = ["rst"]

# strftime format of the date shown next to each post.
date_format = "%d/%m/%Y"

# ---------------------------------------------------------------------------
# CV sections (`.. cv-experiences:: <file>` and friends)
# ---------------------------------------------------------------------------
[cv]
# Language for pages that declare no `:language:` field.
# "spanish", "español" and "es" select Spanish labels; anything else English.
default_language = "english"

# End value meaning "still active". Sorts as if dated tomorrow.
ongoing = "Now"
"##
}
