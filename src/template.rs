//! HTML → Twig skeleton.
//!
//! Every leaf text node and every attribute value is swapped for a Twig
//! placeholder, and the result is prefixed with one comment per placeholder
//! tag so the template documents its own inputs:
//!
//! ```text
//! <a href="/about">About</a>
//! ```
//!
//! becomes
//!
//! ```text
//! <!-- `{{ a_content }}`: Content for <a> -->
//! <a href="{{ href_a }}">
//!  {{ a_content }}
//! </a>
//! ```
//!
//! ## Limitations
//!
//! - Placeholder names come from tag and attribute names only. Two `<a>`
//!   elements both get `{{ href_a }}`; nothing disambiguates them.
//! - Only leaf text is templated. An element mixing text with child
//!   elements (`<p>Hello <b>you</b></p>`) keeps its text; its leaf children
//!   are still templated.

use crate::markup::{Document, MarkupError};
use std::collections::BTreeSet;
use tracing::debug;

/// A templated document plus the tags that received content placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplatedMarkup {
    /// Tag names with a content placeholder, sorted and deduplicated.
    pub manifest: Vec<String>,
    pub document: Document,
}

impl TemplatedMarkup {
    /// Render the manifest comments (optionally) followed by the pretty tree.
    pub fn render(&self, include_manifest: bool) -> String {
        let mut out = String::new();
        if include_manifest {
            for tag in &self.manifest {
                out.push_str(&manifest_comment(tag));
                out.push('\n');
            }
        }
        out.push_str(&self.document.to_pretty_string());
        out
    }
}

/// Parse `html` and replace its content with placeholders.
pub fn templatize(html: &str) -> Result<TemplatedMarkup, MarkupError> {
    let mut document = Document::parse(html)?;
    let manifest = apply_placeholders(&mut document);
    Ok(TemplatedMarkup { manifest, document })
}

/// Replace leaf text and attribute values in place; returns the manifest.
pub fn apply_placeholders(document: &mut Document) -> Vec<String> {
    let manifest: BTreeSet<String> = document
        .elements()
        .filter(|el| has_content(el.text()))
        .map(|el| el.name().to_string())
        .collect();

    document.for_each_element_mut(|el| {
        let tag = el.name().to_string();
        if has_content(el.text()) {
            el.set_text(content_placeholder(&tag));
        }
        let names: Vec<String> = el.attributes().iter().map(|a| a.name.clone()).collect();
        for name in names {
            el.set_attribute(&name, attribute_placeholder(&name, &tag));
        }
    });

    debug!(tags = ?manifest, "templated markup");
    manifest.into_iter().collect()
}

fn has_content(text: Option<&str>) -> bool {
    text.is_some_and(|t| !t.trim().is_empty())
}

/// `{{ <tag>_content }}`
pub fn content_placeholder(tag: &str) -> String {
    format!("{{{{ {tag}_content }}}}")
}

/// `{{ <attribute>_<tag> }}`
pub fn attribute_placeholder(attribute: &str, tag: &str) -> String {
    format!("{{{{ {attribute}_{tag} }}}}")
}

/// The documentation comment emitted for one manifest entry.
pub fn manifest_comment(tag: &str) -> String {
    format!("<!-- `{}`: Content for <{tag}> -->", content_placeholder(tag))
}
