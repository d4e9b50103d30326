//! Pretty-printing serializer.
//!
//! One node per line, indented by one space per nesting level:
//!
//! ```text
//! <div class="card">
//!  <h2>
//!   Title
//!  </h2>
//!  <img src="a.png"/>
//! </div>
//! ```
//!
//! Whitespace-only text nodes are dropped and other text is trimmed.
//! `<pre>` and `<textarea>` are written inline so their whitespace survives.
//! `<script>` and `<style>` bodies are written without escaping.

use super::{Attribute, Document, Element, Node};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

const PRESERVE_WHITESPACE: &[&str] = &["pre", "textarea"];

const RAW_TEXT: &[&str] = &["script", "style"];

/// Serialize `doc` one node per line.
pub fn prettify(doc: &Document) -> String {
    let mut out = String::new();
    for node in doc.nodes() {
        write_pretty(&mut out, node, 0, false);
    }
    out
}

fn indent(depth: usize) -> String {
    " ".repeat(depth)
}

fn write_pretty(out: &mut String, node: &Node, depth: usize, raw: bool) {
    match node {
        Node::Element(element) => write_element(out, element, depth),
        Node::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                return;
            }
            out.push_str(&indent(depth));
            if raw {
                out.push_str(text);
            } else {
                out.push_str(&escape_text(text));
            }
            out.push('\n');
        }
        Node::Comment(text) => {
            out.push_str(&indent(depth));
            out.push_str(&format!("<!--{text}-->\n"));
        }
        Node::Doctype(name) => {
            out.push_str(&indent(depth));
            out.push_str(&format!("<!DOCTYPE {name}>\n"));
        }
    }
}

fn write_element(out: &mut String, element: &Element, depth: usize) {
    let name = element.name();
    out.push_str(&indent(depth));

    if VOID_ELEMENTS.contains(&name) {
        out.push_str(&open_tag(element, true));
        out.push('\n');
        return;
    }

    if PRESERVE_WHITESPACE.contains(&name) {
        write_inline_element(out, element);
        out.push('\n');
        return;
    }

    out.push_str(&open_tag(element, false));
    out.push('\n');
    let raw = RAW_TEXT.contains(&name);
    for child in element.children() {
        write_pretty(out, child, depth + 1, raw);
    }
    out.push_str(&indent(depth));
    out.push_str(&format!("</{name}>\n"));
}

/// Compact serialization with whitespace left exactly as parsed.
fn write_inline(out: &mut String, node: &Node, raw: bool) {
    match node {
        Node::Element(element) => write_inline_element(out, element),
        Node::Text(text) if raw => out.push_str(text),
        Node::Text(text) => out.push_str(&escape_text(text)),
        Node::Comment(text) => out.push_str(&format!("<!--{text}-->")),
        Node::Doctype(name) => out.push_str(&format!("<!DOCTYPE {name}>")),
    }
}

fn write_inline_element(out: &mut String, element: &Element) {
    let name = element.name();
    if VOID_ELEMENTS.contains(&name) {
        out.push_str(&open_tag(element, true));
        return;
    }
    out.push_str(&open_tag(element, false));
    let raw = RAW_TEXT.contains(&name);
    for child in element.children() {
        write_inline(out, child, raw);
    }
    out.push_str(&format!("</{name}>"));
}

fn open_tag(element: &Element, self_closing: bool) -> String {
    let mut tag = format!("<{}", element.name());
    for Attribute { name, value } in element.attributes() {
        tag.push_str(&format!(" {name}=\"{}\"", escape_attribute(value)));
    }
    tag.push_str(if self_closing { "/>" } else { ">" });
    tag
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
