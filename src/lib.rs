//! # twigify
//!
//! Turns static front-end assets into templates. Hand it the HTML, CSS and
//! SCSS variables of a finished page and it gives back a Twig skeleton and a
//! stylesheet that uses your variables instead of hard-coded colors.
//!
//! # Architecture: Three Independent Transformations
//!
//! ```text
//! variables.scss  →  ColorMap          (parse `$name: #hex;` declarations)
//! style.css + map →  converted.scss    (literal colors → `$name`)
//! index.html      →  output.twig       (text and attributes → `{{ ... }}`)
//! ```
//!
//! Each transformation is a pure function from text to text. None of them
//! holds state between calls or depends on another; the CLI simply feeds the
//! variables parser's output into the stylesheet rewriter.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`variables`] | SCSS variable file → [`variables::ColorMap`] (literal and case-insensitive strategies, alias resolution) |
//! | [`stylesheet`] | Rewrites stylesheet text using a `ColorMap`, longest literal first, comments protected |
//! | [`markup`] | Tolerant HTML parsing into an owned element tree, plus the pretty printer |
//! | [`template`] | Replaces leaf text and attribute values with Twig placeholders and builds the manifest |
//! | [`convert`] | Boundary: input decoding, artifacts, one error type per conversion |
//! | [`config`] | Optional `twigify.toml`: artifact names, manifest toggle, strategy |
//! | [`output`] | CLI summaries |
//!
//! # Design Decisions
//!
//! ## Text In, Text Out
//!
//! There is no CSS parser and no attempt at valid Twig. The stylesheet is
//! treated as lines of text and the markup as a tree that only ever changes
//! its text and attribute values. The output is a starting point for a human,
//! not a finished template.
//!
//! ## Owned Element Tree
//!
//! html5ever does the hard part (repairing real-world HTML), but its DOM is
//! reference-counted and interior-mutable. [`markup`] copies it into plain
//! owned types right after parsing, so templating is ordinary `&mut` code.
//!
//! ## Known Limitations
//!
//! - Attribute placeholders are named `{{ <attr>_<tag> }}`. Repeated
//!   elements share names.
//! - Only leaf text is templated; mixed text and element content is kept.
//! - The case-insensitive strategy does not protect stylesheet comments.

pub mod config;
pub mod convert;
pub mod markup;
pub mod output;
pub mod stylesheet;
pub mod template;
pub mod variables;

#[cfg(test)]
pub(crate) mod test_helpers;
