//! Build configuration.
//!
//! Handles loading, validating, and merging the `config.toml` at the content
//! root. Stock defaults are serialized to a TOML table and the user file is
//! merged on top, so a config file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! legacy_collection = "legacy"  # Collection whose slugs are date-based
//! excerpt_length = 250          # Max characters of plain-text excerpt
//!
//! [bundler]
//! project_root = "."            # Base for module roots and ./ aliases
//! source_dirs = ["src"]         # Module search roots before node_modules
//!
//! [bundler.alias]
//! "react-dom" = "@hot-loader/react-dom"
//! "$components" = "./src/components"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Build configuration loaded from `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Collection whose posts get `blog/YYYY/MM/DD/title` slugs.
    pub legacy_collection: String,
    /// Maximum length of the plain-text excerpt attached to each node.
    pub excerpt_length: usize,
    /// Module resolution handed to the bundler.
    pub bundler: BundlerConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            legacy_collection: "legacy".to_string(),
            excerpt_length: 250,
            bundler: BundlerConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.legacy_collection.trim().is_empty() {
            return Err(ConfigError::Validation(
                "legacy_collection must not be empty".into(),
            ));
        }
        if self.excerpt_length == 0 {
            return Err(ConfigError::Validation(
                "excerpt_length must be greater than 0".into(),
            ));
        }
        if self.bundler.source_dirs.iter().any(|d| d.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "bundler.source_dirs entries must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Bundler module-resolution settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BundlerConfig {
    /// Directory that relative module roots and `./` aliases resolve against.
    pub project_root: String,
    /// Module search roots, searched before `node_modules`.
    pub source_dirs: Vec<String>,
    /// Import aliases. Targets starting with `./` are project-relative paths,
    /// anything else is a package name.
    pub alias: BTreeMap<String, String>,
}

impl Default for BundlerConfig {
    fn default() -> Self {
        let mut alias = BTreeMap::new();
        alias.insert(
            "react-dom".to_string(),
            "@hot-loader/react-dom".to_string(),
        );
        alias.insert("$components".to_string(), "./src/components".to_string());
        Self {
            project_root: ".".to_string(),
            source_dirs: vec!["src".to_string()],
            alias,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(SiteConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key by key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                let merged = match table.remove(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => value,
                };
                table.insert(key, merged);
            }
            toml::Value::Table(table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no `config.toml`.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    Ok(Some(toml::from_str(&content)?))
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(dir: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match load_raw_config(dir)? {
        Some(overlay) => merge_toml(base, overlay),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# blog-routes configuration
# =========================
# All settings are optional. Values shown below are the defaults.
# Place this file at the root of the content directory.
# Unknown keys will cause an error.

# Posts in this collection get date-based slugs: blog/YYYY/MM/DD/<title>.
# Every other collection uses the frontmatter `slug`, falling back to the
# filename with its three-segment prefix removed.
legacy_collection = "legacy"

# Maximum number of characters in the plain-text excerpt of each post.
excerpt_length = 250

# ---------------------------------------------------------------------------
# Bundler module resolution
# ---------------------------------------------------------------------------
[bundler]
# Base directory for module roots and ./-relative alias targets.
project_root = "."

# Module search roots, searched in order before node_modules.
source_dirs = ["src"]

[bundler.alias]
"react-dom" = "@hot-loader/react-dom"
"$components" = "./src/components"
"##
}
