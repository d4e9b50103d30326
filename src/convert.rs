//! Conversion boundary.
//!
//! Wraps the three text transformations with everything the CLI needs around
//! them: reading and decoding input files, turning results into named
//! [`Artifact`]s, and collapsing failures into one [`ConvertError`] per
//! transformation. Nothing here panics on bad input; a failed conversion
//! produces an error and no artifact.

use crate::config::{MarkupConfig, StylesheetConfig};
use crate::markup::MarkupError;
use crate::stylesheet::{self, Strategy};
use crate::template;
use crate::variables;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not valid UTF-8 text: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },
    #[error("Error converting HTML to Twig: {0}")]
    Markup(#[from] MarkupError),
}

/// A produced file: fixed name plus text content.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub file_name: String,
    pub content: String,
}

impl Artifact {
    pub const CONTENT_TYPE: &'static str = "text/plain";

    /// Write into `dir`, creating it if needed. Returns the written path.
    pub fn write_to(&self, dir: &Path) -> std::io::Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.content)?;
        Ok(path)
    }
}

/// Result of HTML → Twig.
#[derive(Debug, Clone, PartialEq)]
pub struct TwigConversion {
    pub artifact: Artifact,
    /// Tags that received content placeholders, sorted.
    pub manifest: Vec<String>,
}

/// Result of CSS + variables → SCSS.
#[derive(Debug, Clone, PartialEq)]
pub struct ScssConversion {
    pub artifact: Artifact,
    pub strategy: Strategy,
    /// Distinct variables that ended up in the mapping.
    pub variables: usize,
    pub replacements: usize,
}

impl ScssConversion {
    /// A user-facing notice when nothing was found or replaced.
    pub fn notice(&self) -> Option<&'static str> {
        if self.variables == 0 {
            Some("No valid color variables found in the variables file.")
        } else if self.replacements == 0 {
            Some("No color values matched; stylesheet unchanged.")
        } else {
            None
        }
    }
}

/// Read a whole file and decode it as UTF-8.
pub fn read_input(path: &Path) -> Result<String, ConvertError> {
    let bytes = fs::read(path).map_err(|source| ConvertError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_text(bytes, path)
}

/// Decode raw bytes as UTF-8; `path` only labels the error.
pub fn decode_text(bytes: Vec<u8>, path: &Path) -> Result<String, ConvertError> {
    String::from_utf8(bytes).map_err(|source| ConvertError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// HTML → Twig.
pub fn html_to_twig(html: &str, config: &MarkupConfig) -> Result<TwigConversion, ConvertError> {
    let templated = template::templatize(html)?;
    info!(placeholders = templated.manifest.len(), "converted HTML to Twig");
    Ok(TwigConversion {
        artifact: Artifact {
            file_name: config.output.clone(),
            content: templated.render(config.manifest),
        },
        manifest: templated.manifest,
    })
}

/// CSS + variables → SCSS.
pub fn css_to_scss(css: &str, variables: &str, config: &StylesheetConfig) -> ScssConversion {
    let map = variables::parse_with(config.strategy, variables);
    info!(variables = map.symbol_count(), strategy = ?config.strategy, "parsed variables");
    let rewrite = stylesheet::rewrite_with(config.strategy, css, &map);
    info!(replacements = rewrite.replacements, "converted CSS to SCSS");
    ScssConversion {
        artifact: Artifact {
            file_name: config.output.clone(),
            content: rewrite.text,
        },
        strategy: config.strategy,
        variables: map.symbol_count(),
        replacements: rewrite.replacements,
    }
}
