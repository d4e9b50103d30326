//! Converter configuration.
//!
//! Everything works without a config file; the stock defaults reproduce the
//! plain behavior (`output.twig`, `converted.scss`, literal strategy). A
//! `twigify.toml` in the working directory, or a file passed with
//! `--config`, overrides any subset of the defaults.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [markup]
//! output = "output.twig"      # Artifact file name for templated markup
//! manifest = true             # Emit the leading placeholder comments
//!
//! [stylesheet]
//! output = "converted.scss"   # Artifact file name for the rewritten stylesheet
//! strategy = "literal"        # "literal" or "case-insensitive"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::stylesheet::Strategy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the working directory when `--config` is absent.
pub const CONFIG_FILE_NAME: &str = "twigify.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Converter configuration loaded from `twigify.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConverterConfig {
    /// HTML → Twig settings.
    pub markup: MarkupConfig,
    /// CSS → SCSS settings.
    pub stylesheet: StylesheetConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkupConfig {
    /// Artifact file name.
    pub output: String,
    /// Whether to emit one documentation comment per content placeholder.
    pub manifest: bool,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            output: "output.twig".to_string(),
            manifest: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StylesheetConfig {
    /// Artifact file name.
    pub output: String,
    /// Variable parsing and color matching strategy.
    pub strategy: Strategy,
}

impl Default for StylesheetConfig {
    fn default() -> Self {
        Self {
            output: "converted.scss".to_string(),
            strategy: Strategy::Literal,
        }
    }
}

impl ConverterConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_file_name("markup.output", &self.markup.output)?;
        validate_file_name("stylesheet.output", &self.stylesheet.output)?;
        Ok(())
    }
}

fn validate_file_name(key: &str, name: &str) -> Result<(), ConfigError> {
    if name.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{key} must not be empty")));
    }
    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(ConfigError::Validation(format!(
            "{key} must be a plain file name, got {name:?}"
        )));
    }
    Ok(())
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ConverterConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key by key; any other overlay value replaces the base value.
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

/// Read a config file as a raw TOML value.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Merge an optional overlay onto the stock defaults, deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<ConverterConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ConverterConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load configuration.
///
/// An explicit `path` must exist. Without one, `twigify.toml` in `dir` is used
/// if present; otherwise the stock defaults apply.
pub fn load_config(path: Option<&Path>, dir: &Path) -> Result<ConverterConfig, ConfigError> {
    let overlay = match path {
        Some(path) => Some(load_raw_config(path)?),
        None => {
            let default_path = dir.join(CONFIG_FILE_NAME);
            if default_path.exists() {
                Some(load_raw_config(&default_path)?)
            } else {
                None
            }
        }
    };
    resolve_config(overlay)
}

/// Returns a fully-commented stock `twigify.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# twigify configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file in the directory you run twigify from, or pass it
# explicitly with --config. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# HTML -> Twig
# ---------------------------------------------------------------------------
[markup]
# File name written to --out-dir.
output = "output.twig"

# Start the template with one comment per content placeholder, e.g.
#   <!-- `{{ p_content }}`: Content for <p> -->
manifest = true

# ---------------------------------------------------------------------------
# CSS -> SCSS
# ---------------------------------------------------------------------------
[stylesheet]
# File name written to --out-dir.
output = "converted.scss"

# How variables are matched against the stylesheet:
#   "literal"          exact-case substitution, longest value first,
#                      /* comments */ left untouched, aliases resolved
#   "case-insensitive" #ABC and #abc both match $x: #AbC; comments are
#                      rewritten too
strategy = "literal"
"##
}
