//! Stylesheet rewriting: literal colors → SCSS variable references.
//!
//! Works line by line on plain text. There is no CSS parser here; the two
//! strategies differ only in how they find the literals to replace.
//!
//! ## Literal Strategy
//!
//! Plain substring substitution driven by the mapping. Candidates are tried
//! longest first, so `#ffffff` wins over `#fff`:
//!
//! ```text
//! color: #ffffff;  →  color: $white6;     (not $white6fff)
//! ```
//!
//! Complete `/* ... */` spans on a line are left untouched:
//!
//! ```text
//! color: #fff; /* #fff kept */  →  color: $white; /* #fff kept */
//! ```
//!
//! A block comment that opens on one line and closes on a later one is not
//! tracked; its lines are rewritten like any other.
//!
//! ## Case-Insensitive Strategy
//!
//! Scans each line for hex tokens (`#[0-9a-fA-F]{3,6}\b`) and functional
//! colors (`rgb(...)`, `rgba(...)`) and looks each one up upper-case first,
//! then lower-case. Comments get no special treatment, so colors inside them
//! are rewritten too.
//!
//! Both strategies keep line endings exactly as they were, so a rewrite with
//! nothing to replace returns its input unchanged.

use crate::variables::ColorMap;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::debug;

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#[0-9a-fA-F]{3,6}\b").expect("hex color pattern is valid"));

static FUNCTIONAL_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"rgba?\([^)]+\)").expect("functional color pattern is valid")
});

const COMMENT_OPEN: &str = "/*";
const COMMENT_CLOSE: &str = "*/";

/// How variables are parsed and how the stylesheet is scanned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Exact-case substring substitution with comment protection.
    #[default]
    Literal,
    /// Regex scan for color tokens, matched in either case.
    CaseInsensitive,
}

/// Result of rewriting a stylesheet.
#[derive(Debug, Clone, PartialEq)]
pub struct Rewrite {
    pub text: String,
    /// Number of literal occurrences replaced.
    pub replacements: usize,
}

/// Rewrite `css` with the given strategy.
pub fn rewrite_with(strategy: Strategy, css: &str, map: &ColorMap) -> Rewrite {
    match strategy {
        Strategy::Literal => rewrite_literal(css, map),
        Strategy::CaseInsensitive => rewrite_case_insensitive(css, map),
    }
}

/// Literal strategy. See the module docs.
pub fn rewrite_literal(css: &str, map: &ColorMap) -> Rewrite {
    let candidates = map.candidates();
    rewrite_lines(css, |line| {
        let mut count = 0;
        let text = replace_outside_comments(line, &candidates, &mut count);
        (text, count)
    })
}

/// Case-insensitive strategy. See the module docs.
pub fn rewrite_case_insensitive(css: &str, map: &ColorMap) -> Rewrite {
    rewrite_lines(css, |line| {
        let mut count = 0;
        let text = HEX_COLOR
            .replace_all(line, |caps: &Captures| lookup_either_case(map, &caps[0], &mut count))
            .into_owned();
        let text = FUNCTIONAL_COLOR
            .replace_all(&text, |caps: &Captures| lookup_either_case(map, &caps[0], &mut count))
            .into_owned();
        (text, count)
    })
}

/// Upper-case spelling first, then lower-case; unknown tokens come back as-is.
fn lookup_either_case(map: &ColorMap, token: &str, count: &mut usize) -> String {
    match map
        .get(&token.to_uppercase())
        .or_else(|| map.get(&token.to_lowercase()))
    {
        Some(symbol) => {
            *count += 1;
            symbol.to_string()
        }
        None => token.to_string(),
    }
}

/// Apply `rewrite` to every line body, keeping `\n` / `\r\n` endings intact.
fn rewrite_lines<F>(css: &str, mut rewrite: F) -> Rewrite
where
    F: FnMut(&str) -> (String, usize),
{
    let mut text = String::with_capacity(css.len());
    let mut replacements = 0;

    for (number, raw) in css.split_inclusive('\n').enumerate() {
        let (body, ending) = split_line_ending(raw);
        let (rewritten, count) = rewrite(body);
        if count > 0 {
            debug!(line = number + 1, from = body, to = %rewritten, "replaced colors in line");
        }
        replacements += count;
        text.push_str(&rewritten);
        text.push_str(ending);
    }

    Rewrite { text, replacements }
}

fn split_line_ending(raw: &str) -> (&str, &str) {
    if let Some(body) = raw.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = raw.strip_suffix('\n') {
        (body, "\n")
    } else {
        (raw, "")
    }
}

/// Replace candidates in `segment`, skipping every complete comment span.
fn replace_outside_comments(segment: &str, candidates: &[(&str, &str)], count: &mut usize) -> String {
    let Some(start) = segment.find(COMMENT_OPEN) else {
        return replace_all(segment, candidates, count);
    };
    let Some(close) = segment[start + COMMENT_OPEN.len()..].find(COMMENT_CLOSE) else {
        return replace_all(segment, candidates, count);
    };
    let end = start + COMMENT_OPEN.len() + close + COMMENT_CLOSE.len();

    let mut out = replace_all(&segment[..start], candidates, count);
    out.push_str(&segment[start..end]);
    out.push_str(&replace_outside_comments(&segment[end..], candidates, count));
    out
}

fn replace_all(segment: &str, candidates: &[(&str, &str)], count: &mut usize) -> String {
    let mut text = segment.to_string();
    for (literal, symbol) in candidates {
        let hits = text.matches(literal).count();
        if hits > 0 {
            *count += hits;
            text = text.replace(literal, symbol);
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variables::{parse_variables, parse_variables_case_insensitive};

    fn white_map() -> ColorMap {
        let mut map = ColorMap::new();
        map.bind("#fff", "$white");
        map.bind("#ffffff", "$white6");
        map
    }

    // =========================================================================
    // Literal strategy
    // =========================================================================

    #[test]
    fn longest_literal_wins() {
        let out = rewrite_literal("color: #ffffff;", &white_map());
        assert_eq!(out.text, "color: $white6;");
        assert_eq!(out.replacements, 1);
    }

    #[test]
    fn comment_literal_is_preserved() {
        let out = rewrite_literal("color: #fff; /* #fff kept */", &white_map());
        assert_eq!(out.text, "color: $white; /* #fff kept */");
        assert_eq!(out.replacements, 1);
    }

    #[test]
    fn text_after_comment_is_rewritten() {
        let out = rewrite_literal("/* #fff */ a { color: #fff; }", &white_map());
        assert_eq!(out.text, "/* #fff */ a { color: $white; }");
    }

    #[test]
    fn every_comment_on_a_line_is_preserved() {
        let out = rewrite_literal("#fff /* #fff */ #fff /* #fff */ #fff", &white_map());
        assert_eq!(out.text, "$white /* #fff */ $white /* #fff */ $white");
        assert_eq!(out.replacements, 3);
    }

    #[test]
    fn unclosed_comment_is_not_protected() {
        let out = rewrite_literal("color: #fff; /* #fff", &white_map());
        assert_eq!(out.text, "color: $white; /* $white");
    }

    #[test]
    fn close_before_open_is_not_a_comment_span() {
        let out = rewrite_literal("*/ #fff /*", &white_map());
        assert_eq!(out.text, "*/ $white /*");
    }

    #[test]
    fn functional_colors_are_replaced_verbatim() {
        let map = parse_variables("$shadow: rgba(0, 0, 0, 0.5);");
        let out = rewrite_literal("box-shadow: 0 1px rgba(0, 0, 0, 0.5);", &map);
        assert_eq!(out.text, "box-shadow: 0 1px $shadow;");
    }

    #[test]
    fn literal_strategy_is_case_sensitive() {
        let map = parse_variables("$x: #abc;");
        let out = rewrite_literal("color: #ABC;", &map);
        assert_eq!(out.text, "color: #ABC;");
        assert_eq!(out.replacements, 0);
    }

    #[test]
    fn aliased_literal_uses_active_symbol() {
        let map = parse_variables("$primary: #3366ff;\n$link: $primary;");
        let out = rewrite_literal("a { color: #3366ff; }", &map);
        assert_eq!(out.text, "a { color: $link; }");
    }

    #[test]
    fn rewrite_is_idempotent() {
        let map = parse_variables("$white: #fff;\n$white6: #ffffff;\n$black: #000;");
        let css = "body { color: #000; background: #ffffff; }\n.a { border-color: #fff; }\n";
        let first = rewrite_literal(css, &map);
        let second = rewrite_literal(&first.text, &map);
        assert_eq!(second.text, first.text);
        assert_eq!(second.replacements, 0);
    }

    #[test]
    fn empty_map_leaves_text_unchanged() {
        let map = parse_variables("   \n\n");
        let css = "a {\r\n  color: #fff;\r\n}\n\n";
        let out = rewrite_literal(css, &map);
        assert_eq!(out.text, css);
        assert_eq!(out.replacements, 0);
    }

    #[test]
    fn line_endings_are_preserved() {
        let css = "a { color: #fff; }\r\nb { color: #fff; }\n";
        let out = rewrite_literal(css, &white_map());
        assert_eq!(out.text, "a { color: $white; }\r\nb { color: $white; }\n");
        assert_eq!(out.replacements, 2);
    }

    #[test]
    fn symbolic_keys_are_never_substituted() {
        let mut map = ColorMap::new();
        map.bind("$white", "$other");
        let out = rewrite_literal("color: $white;", &map);
        assert_eq!(out.text, "color: $white;");
    }

    // =========================================================================
    // Case-insensitive strategy
    // =========================================================================

    #[test]
    fn case_insensitive_matches_either_spelling() {
        let map = parse_variables_case_insensitive("$x: #ABC;");
        let out = rewrite_case_insensitive("a { color: #abc; } b { color: #AbC; }", &map);
        assert_eq!(out.text, "a { color: $x; } b { color: $x; }");
        assert_eq!(out.replacements, 2);
    }

    #[test]
    fn case_insensitive_rewrites_functional_colors() {
        let map = parse_variables_case_insensitive("$overlay: rgba(0,0,0,.5);");
        let out = rewrite_case_insensitive("background: rgba(0,0,0,.5);", &map);
        assert_eq!(out.text, "background: $overlay;");
        assert_eq!(out.replacements, 1);
    }

    #[test]
    fn case_insensitive_function_name_must_be_lowercase() {
        let map = parse_variables_case_insensitive("$overlay: rgba(0,0,0,.5);");
        let out = rewrite_case_insensitive("background: RGBA(0,0,0,.5);", &map);
        assert_eq!(out.text, "background: RGBA(0,0,0,.5);");
        assert_eq!(out.replacements, 0);
    }

    #[test]
    fn case_insensitive_leaves_unknown_tokens() {
        let map = parse_variables_case_insensitive("$x: #ABC;");
        let out = rewrite_case_insensitive("color: #123456; fill: rgb(1,2,3);", &map);
        assert_eq!(out.text, "color: #123456; fill: rgb(1,2,3);");
        assert_eq!(out.replacements, 0);
    }

    #[test]
    fn case_insensitive_matches_whole_hex_tokens_only() {
        let map = parse_variables_case_insensitive("$x: #fff;");
        let out = rewrite_case_insensitive("color: #ffffff; fill: #fff;", &map);
        assert_eq!(out.text, "color: #ffffff; fill: $x;");
    }

    #[test]
    fn case_insensitive_rewrites_inside_comments() {
        let map = parse_variables_case_insensitive("$x: #fff;");
        let out = rewrite_case_insensitive("color: #fff; /* #fff */", &map);
        assert_eq!(out.text, "color: $x; /* $x */");
    }

    #[test]
    fn case_insensitive_is_idempotent() {
        let map = parse_variables_case_insensitive("$x: #ABC;\n$y: rgb(1, 2, 3);");
        let first = rewrite_case_insensitive("a { color: #abc; fill: rgb(1, 2, 3); }", &map);
        let second = rewrite_case_insensitive(&first.text, &map);
        assert_eq!(second.text, first.text);
        assert_eq!(second.replacements, 0);
    }

    #[test]
    fn rewrite_with_dispatches_on_strategy() {
        let map = parse_variables_case_insensitive("$x: #ABC;");
        assert_eq!(rewrite_with(Strategy::Literal, "#Abc", &map).replacements, 0);
        assert_eq!(rewrite_with(Strategy::CaseInsensitive, "#Abc", &map).replacements, 1);
    }

    #[test]
    fn strategy_deserializes_kebab_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            strategy: Strategy,
        }
        let w: Wrapper = toml::from_str("strategy = \"case-insensitive\"").unwrap();
        assert_eq!(w.strategy, Strategy::CaseInsensitive);
    }
}
