//! html5ever → owned tree conversion.

use super::{Attribute, Document, Element, MarkupError, Node};
use html5ever::tendril::TendrilSink;
use html5ever::{ParseOpts, parse_document, parse_fragment};
use markup5ever::{QualName, local_name, namespace_url, ns};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use regex::Regex;
use std::sync::LazyLock;

/// Deepest element nesting accepted before parsing is abandoned.
pub const MAX_DEPTH: usize = 512;

static DOCUMENT_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\A\s*<!doctype|<(?:html|head|body)[\s/>]")
        .expect("document tag pattern is valid")
});

pub(super) fn parse(html: &str) -> Result<Document, MarkupError> {
    let nodes = if looks_like_document(html) {
        let dom = parse_document(RcDom::default(), ParseOpts::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())?;
        convert_children(&dom.document, 0)?
    } else {
        // A <template> context accepts table parts, list items and options on
        // their own, where a <body> context would drop those tags.
        let context = QualName::new(None, ns!(html), local_name!("template"));
        let dom = parse_fragment(RcDom::default(), ParseOpts::default(), context, Vec::new())
            .from_utf8()
            .read_from(&mut html.as_bytes())?;
        // Fragment parsing hangs the parsed nodes under a synthetic <html> root.
        let root = dom.document.children.borrow().first().cloned();
        match root {
            Some(root) if is_element_named(&root, "html") => convert_children(&root, 0)?,
            _ => convert_children(&dom.document, 0)?,
        }
    };
    Ok(Document::new(nodes))
}

fn looks_like_document(html: &str) -> bool {
    DOCUMENT_TAG.is_match(html)
}

fn is_element_named(handle: &Handle, tag: &str) -> bool {
    matches!(&handle.data, NodeData::Element { name, .. } if name.local.as_ref() == tag)
}

fn convert_children(handle: &Handle, depth: usize) -> Result<Vec<Node>, MarkupError> {
    let mut nodes = Vec::new();
    for child in handle.children.borrow().iter() {
        if let Some(node) = convert(child, depth)? {
            nodes.push(node);
        }
    }
    Ok(nodes)
}

fn convert(handle: &Handle, depth: usize) -> Result<Option<Node>, MarkupError> {
    let node = match &handle.data {
        NodeData::Element {
            name,
            attrs,
            template_contents,
            ..
        } => {
            if depth >= MAX_DEPTH {
                return Err(MarkupError::TooDeep { limit: MAX_DEPTH });
            }
            let attributes = attrs
                .borrow()
                .iter()
                .map(|attr| Attribute {
                    name: attribute_name(&attr.name),
                    value: attr.value.to_string(),
                })
                .collect();
            // <template> keeps its children in a separate document fragment.
            let children = match template_contents.borrow().as_ref() {
                Some(contents) => convert_children(contents, depth + 1)?,
                None => convert_children(handle, depth + 1)?,
            };
            Node::Element(Element {
                name: name.local.to_string(),
                attributes,
                children,
            })
        }
        NodeData::Text { contents } => Node::Text(contents.borrow().to_string()),
        NodeData::Comment { contents } => Node::Comment(contents.to_string()),
        NodeData::Doctype { name, .. } => Node::Doctype(name.to_string()),
        NodeData::Document | NodeData::ProcessingInstruction { .. } => return Ok(None),
    };
    Ok(Some(node))
}

fn attribute_name(name: &QualName) -> String {
    match &name.prefix {
        Some(prefix) => format!("{}:{}", prefix, name.local),
        None => name.local.to_string(),
    }
}
