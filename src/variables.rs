//! SCSS variable file parsing.
//!
//! Builds the literal → symbol mapping that the stylesheet rewriter consumes.
//! Only color declarations matter here; everything else in the file is
//! silently ignored.
//!
//! ## Declaration Shapes
//!
//! ```scss
//! $primary: #3366ff;              // direct: #3366ff → $primary
//! $overlay: rgba(0, 0, 0, .5);    // direct, functional notation
//! $brand: #ff0000 !default;       // direct, !default tolerated
//! $link: $primary;                // alias: #3366ff → $link as well
//! ```
//!
//! ## Two Strategies
//!
//! - [`parse_variables`] (literal): exact-case keys, skips `map-merge` lines,
//!   resolves aliases.
//! - [`parse_variables_case_insensitive`]: accepts any value, strips quotes and
//!   `!default`, stores every literal both upper- and lower-case so the
//!   rewriter can match either spelling. Aliases resolve the same way.
//!
//! Parsing never fails. Lines that do not match are dropped, and an empty
//! file produces an empty [`ColorMap`].

use crate::stylesheet::Strategy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::debug;

/// Prefix that marks a symbolic reference.
pub const SYMBOL_MARKER: char = '$';

static DIRECT_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\$([\w-]+):\s*(#[a-fA-F0-9]{3,6}|rgba?\([^)]+\))\s*(!default)?\s*;")
        .expect("direct declaration pattern is valid")
});

static ALIAS_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\$([\w-]+):\s*\$([\w-]+)\s*(!default)?\s*;")
        .expect("alias declaration pattern is valid")
});

static ANY_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\$([\w-]+):\s*([^;]+);").expect("declaration pattern is valid")
});

static COLOR_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(#[a-fA-F0-9]{3,6}|rgba?\([^)]+\))$").expect("color literal pattern is valid")
});

/// Mapping from literal color values to the symbols that stand for them.
///
/// Each literal has an ordered list of symbols. The last one is *active*: it
/// is what the rewriter substitutes. Direct declarations replace the list
/// (last write wins); alias resolution appends to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ColorMap {
    entries: BTreeMap<String, Vec<String>>,
}

impl ColorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `literal` to `symbol`, discarding whatever it was bound to before.
    pub fn bind(&mut self, literal: impl Into<String>, symbol: impl Into<String>) {
        self.entries.insert(literal.into(), vec![symbol.into()]);
    }

    /// Add `symbol` to an existing literal and make it the active symbol.
    ///
    /// Returns `false` if the literal is not in the map.
    pub fn alias(&mut self, literal: &str, symbol: &str) -> bool {
        match self.entries.get_mut(literal) {
            Some(symbols) => {
                symbols.retain(|s| s != symbol);
                symbols.push(symbol.to_string());
                true
            }
            None => false,
        }
    }

    /// The active symbol for `literal`.
    pub fn get(&self, literal: &str) -> Option<&str> {
        self.entries
            .get(literal)
            .and_then(|symbols| symbols.last())
            .map(String::as_str)
    }

    /// Every symbol bound to `literal`, in binding order.
    pub fn symbols(&self, literal: &str) -> &[String] {
        self.entries.get(literal).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All literals currently bound to `symbol`, in map order.
    pub fn literals_for<'a>(&'a self, symbol: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |(_, symbols)| symbols.iter().any(|s| s == symbol))
            .map(|(literal, _)| literal.as_str())
    }

    /// Literal/active-symbol pairs in map order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().filter_map(|(literal, symbols)| {
            symbols.last().map(|s| (literal.as_str(), s.as_str()))
        })
    }

    /// Substitution candidates, longest literal first.
    ///
    /// Literals that are themselves symbolic are excluded. Ties keep map order.
    pub fn candidates(&self) -> Vec<(&str, &str)> {
        let mut candidates: Vec<(&str, &str)> = self
            .iter()
            .filter(|(literal, _)| !literal.starts_with(SYMBOL_MARKER))
            .collect();
        candidates.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        candidates
    }

    /// Number of literal keys (upper and lower spellings count separately).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct symbols across the whole map.
    pub fn symbol_count(&self) -> usize {
        let mut all: Vec<&str> = self
            .entries
            .values()
            .flatten()
            .map(String::as_str)
            .collect();
        all.sort_unstable();
        all.dedup();
        all.len()
    }
}

/// Parse a variables file with the given strategy.
pub fn parse_with(strategy: Strategy, content: &str) -> ColorMap {
    match strategy {
        Strategy::Literal => parse_variables(content),
        Strategy::CaseInsensitive => parse_variables_case_insensitive(content),
    }
}

/// Literal strategy: exact-case keys, aliases resolved.
pub fn parse_variables(content: &str) -> ColorMap {
    let mut map = ColorMap::new();
    let mut aliases: Vec<(String, String)> = Vec::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("//") || line.contains("map-merge") {
            continue;
        }

        if let Some(caps) = DIRECT_DECL.captures(line) {
            let symbol = format!("{SYMBOL_MARKER}{}", &caps[1]);
            debug!(symbol = %symbol, value = &caps[2], "found color variable");
            map.bind(&caps[2], symbol);
            continue;
        }

        if let Some(caps) = ALIAS_DECL.captures(line) {
            aliases.push((caps[1].to_string(), caps[2].to_string()));
        }
    }

    resolve_aliases(&mut map, &aliases, false);
    map
}

/// Case-insensitive strategy: lenient values, upper- and lower-case keys.
pub fn parse_variables_case_insensitive(content: &str) -> ColorMap {
    let mut map = ColorMap::new();
    let mut aliases: Vec<(String, String)> = Vec::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }

        let Some(caps) = ANY_DECL.captures(line) else {
            continue;
        };
        let name = &caps[1];
        let value = clean_value(&caps[2]);

        if COLOR_LITERAL.is_match(value) {
            let symbol = format!("{SYMBOL_MARKER}{name}");
            debug!(symbol = %symbol, value, "found color variable");
            map.bind(value.to_uppercase(), symbol.clone());
            map.bind(value.to_lowercase(), symbol);
        } else if let Some(target) = value.strip_prefix(SYMBOL_MARKER) {
            if is_identifier(target) {
                aliases.push((name.to_string(), target.to_string()));
            }
        }
    }

    resolve_aliases(&mut map, &aliases, true);
    map
}

/// Strip `!default`, whitespace and surrounding quotes from a raw value.
fn clean_value(raw: &str) -> &str {
    let value = raw.trim();
    let value = value.strip_suffix("!default").unwrap_or(value).trim_end();
    value.trim_matches(|c| c == '"' || c == '\'')
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

/// Attach each alias to the literal(s) its target is bound to.
///
/// With `all_spellings` every matching literal receives the alias (the
/// case-insensitive map holds two spellings per color); otherwise only the
/// first literal in map order does.
fn resolve_aliases(map: &mut ColorMap, aliases: &[(String, String)], all_spellings: bool) {
    for (alias, target) in aliases {
        let target_symbol = format!("{SYMBOL_MARKER}{target}");
        let alias_symbol = format!("{SYMBOL_MARKER}{alias}");

        let literals: Vec<String> = if all_spellings {
            map.literals_for(&target_symbol).map(str::to_string).collect()
        } else {
            map.literals_for(&target_symbol)
                .next()
                .map(|l| vec![l.to_string()])
                .unwrap_or_default()
        };

        if literals.is_empty() {
            debug!(alias = %alias_symbol, target = %target_symbol, "alias target has no color");
            continue;
        }
        for literal in &literals {
            map.alias(literal, &alias_symbol);
            debug!(alias = %alias_symbol, value = %literal, "resolved color alias");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Literal strategy
    // =========================================================================

    #[test]
    fn direct_hex_declaration() {
        let map = parse_variables("$x: #abc123;");
        assert_eq!(map.get("#abc123"), Some("$x"));
    }

    #[test]
    fn short_hex_and_functional_colors() {
        let map = parse_variables(
            "$white: #fff;\n$shadow: rgba(0, 0, 0, 0.5);\n$red: rgb(255,0,0);",
        );
        assert_eq!(map.get("#fff"), Some("$white"));
        assert_eq!(map.get("rgba(0, 0, 0, 0.5)"), Some("$shadow"));
        assert_eq!(map.get("rgb(255,0,0)"), Some("$red"));
    }

    #[test]
    fn default_marker_is_tolerated() {
        let map = parse_variables("$brand: #ff0000 !default;\n  $accent:#00ff00!default ;");
        assert_eq!(map.get("#ff0000"), Some("$brand"));
        assert_eq!(map.get("#00ff00"), Some("$accent"));
    }

    #[test]
    fn hyphenated_names() {
        let map = parse_variables("$gray-100: #f8f9fa;");
        assert_eq!(map.get("#f8f9fa"), Some("$gray-100"));
    }

    #[test]
    fn alias_binds_both_symbols() {
        let map = parse_variables("$a: #111;\n$b: $a;");
        let symbols = map.symbols("#111");
        assert!(symbols.contains(&"$a".to_string()));
        assert!(symbols.contains(&"$b".to_string()));
    }

    #[test]
    fn alias_becomes_active_symbol() {
        let map = parse_variables("$primary: #3366ff;\n$link-color: $primary !default;");
        assert_eq!(map.get("#3366ff"), Some("$link-color"));
    }

    #[test]
    fn alias_declared_before_target_still_resolves() {
        let map = parse_variables("$b: $a;\n$a: #222;");
        assert_eq!(map.symbols("#222"), ["$a", "$b"]);
    }

    #[test]
    fn alias_to_unknown_variable_is_dropped() {
        let map = parse_variables("$a: #111;\n$b: $missing;");
        assert_eq!(map.symbols("#111"), ["$a"]);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn later_declaration_overwrites() {
        let map = parse_variables("$one: #123456;\n$two: #123456;");
        assert_eq!(map.symbols("#123456"), ["$two"]);
    }

    #[test]
    fn comments_blank_lines_and_map_merge_are_skipped() {
        let content = "\
// $commented: #999;

$theme-colors: map-merge((\"primary\": #123), $theme-colors);
$real: #456;
";
        let map = parse_variables(content);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("#456"), Some("$real"));
    }

    #[test]
    fn non_color_values_are_dropped() {
        let map = parse_variables("$font: \"Helvetica\";\n$size: 12px;\n$broken: #12;");
        assert!(map.is_empty());
    }

    #[test]
    fn literal_strategy_keeps_case() {
        let map = parse_variables("$x: #ABC;");
        assert_eq!(map.get("#ABC"), Some("$x"));
        assert_eq!(map.get("#abc"), None);
    }

    #[test]
    fn empty_and_whitespace_files_yield_empty_map() {
        assert!(parse_variables("").is_empty());
        assert!(parse_variables("  \n\t\n").is_empty());
    }

    // =========================================================================
    // Case-insensitive strategy
    // =========================================================================

    #[test]
    fn case_insensitive_stores_both_spellings() {
        let map = parse_variables_case_insensitive("$x: #AbC;");
        assert_eq!(map.get("#ABC"), Some("$x"));
        assert_eq!(map.get("#abc"), Some("$x"));
        assert_eq!(map.len(), 2);
        assert_eq!(map.symbol_count(), 1);
    }

    #[test]
    fn case_insensitive_strips_quotes_and_default() {
        let map = parse_variables_case_insensitive(
            "$a: \"#ff0000\";\n$b: '#00FF00' !default;\n$c: rgb(1, 2, 3) ;",
        );
        assert_eq!(map.get("#ff0000"), Some("$a"));
        assert_eq!(map.get("#00ff00"), Some("$b"));
        assert_eq!(map.get("RGB(1, 2, 3)"), Some("$c"));
    }

    #[test]
    fn case_insensitive_rejects_non_colors() {
        let map = parse_variables_case_insensitive("$pad: 1rem;\n$mix: darken(#fff, 10%);");
        assert!(map.is_empty());
    }

    #[test]
    fn case_insensitive_resolves_aliases_on_every_spelling() {
        let map = parse_variables_case_insensitive("$a: #Ab1;\n$b: $a;");
        assert_eq!(map.get("#AB1"), Some("$b"));
        assert_eq!(map.get("#ab1"), Some("$b"));
        assert_eq!(map.symbols("#ab1"), ["$a", "$b"]);
    }

    #[test]
    fn case_insensitive_does_not_skip_map_merge_lines() {
        let map = parse_variables_case_insensitive("$c: #123; // map-merge note");
        assert_eq!(map.get("#123"), Some("$c"));
    }

    // =========================================================================
    // ColorMap
    // =========================================================================

    #[test]
    fn candidates_are_longest_first_and_skip_symbols() {
        let mut map = ColorMap::new();
        map.bind("#fff", "$white");
        map.bind("#ffffff", "$white6");
        map.bind("$already", "$oops");
        let candidates = map.candidates();
        assert_eq!(candidates, vec![("#ffffff", "$white6"), ("#fff", "$white")]);
    }

    #[test]
    fn alias_on_missing_literal_returns_false() {
        let mut map = ColorMap::new();
        assert!(!map.alias("#000", "$black"));
        assert!(map.is_empty());
    }

    #[test]
    fn parse_with_dispatches_on_strategy() {
        let content = "$x: #ABC;";
        assert_eq!(parse_with(Strategy::Literal, content).len(), 1);
        assert_eq!(parse_with(Strategy::CaseInsensitive, content).len(), 2);
    }

    #[test]
    fn serializes_as_literal_to_symbols() {
        let map = parse_variables("$a: #111;\n$b: $a;");
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json, serde_json::json!({ "#111": ["$a", "$b"] }));
    }
}
