//! CLI output formatting.
//!
//! Every command shows the produced text itself first, then a short summary:
//!
//! ```text
//! Twig → output.twig
//!     Placeholders:
//!     {{ h1_content }}  <h1>
//!     {{ p_content }}  <p>
//!
//! SCSS → converted.scss
//!     Strategy: literal
//!     Variables: 12
//!     Replacements: 31
//! ```
//!
//! Summaries go to stderr so stdout carries only the converted text and can be
//! redirected straight into a file.
//!
//! Each summary has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that does the writing. Format functions
//! are pure.

use crate::convert::{ScssConversion, TwigConversion};
use crate::stylesheet::Strategy;
use crate::template::content_placeholder;
use crate::variables::ColorMap;
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn strategy_name(strategy: Strategy) -> &'static str {
    match strategy {
        Strategy::Literal => "literal",
        Strategy::CaseInsensitive => "case-insensitive",
    }
}

/// Summary of an HTML → Twig conversion.
pub fn format_twig_summary(conversion: &TwigConversion, written: Option<&Path>) -> Vec<String> {
    let mut lines = vec![format!("Twig → {}", conversion.artifact.file_name)];
    if let Some(path) = written {
        lines.push(format!("{}Written: {}", indent(1), path.display()));
    }
    if conversion.manifest.is_empty() {
        lines.push(format!("{}No content placeholders", indent(1)));
    } else {
        lines.push(format!("{}Placeholders:", indent(1)));
        for tag in &conversion.manifest {
            lines.push(format!("{}{}  <{}>", indent(1), content_placeholder(tag), tag));
        }
    }
    lines
}

/// Summary of a CSS → SCSS conversion, including any "nothing found" notice.
pub fn format_scss_summary(conversion: &ScssConversion, written: Option<&Path>) -> Vec<String> {
    let mut lines = vec![format!("SCSS → {}", conversion.artifact.file_name)];
    if let Some(path) = written {
        lines.push(format!("{}Written: {}", indent(1), path.display()));
    }
    lines.push(format!(
        "{}Strategy: {}",
        indent(1),
        strategy_name(conversion.strategy)
    ));
    lines.push(format!("{}Variables: {}", indent(1), conversion.variables));
    lines.push(format!("{}Replacements: {}", indent(1), conversion.replacements));
    if let Some(notice) = conversion.notice() {
        lines.push(format!("{}{}", indent(1), notice));
    }
    lines
}

/// One line per literal: `#3366ff → $primary, $link`.
///
/// The active symbol is listed last.
pub fn format_color_map(map: &ColorMap) -> Vec<String> {
    if map.is_empty() {
        return vec!["No color variables found".to_string()];
    }
    let mut lines: Vec<String> = map
        .iter()
        .map(|(literal, _)| format!("{} → {}", literal, map.symbols(literal).join(", ")))
        .collect();
    lines.push(format!("Total variables found: {}", map.symbol_count()));
    lines
}

/// Print `lines` to stderr.
fn eprint_lines(lines: &[String]) {
    for line in lines {
        eprintln!("{}", line);
    }
}

pub fn print_twig_summary(conversion: &TwigConversion, written: Option<&Path>) {
    eprint_lines(&format_twig_summary(conversion, written));
}

pub fn print_scss_summary(conversion: &ScssConversion, written: Option<&Path>) {
    eprint_lines(&format_scss_summary(conversion, written));
}

pub fn print_color_map(map: &ColorMap) {
    for line in format_color_map(map) {
        println!("{}", line);
    }
}
