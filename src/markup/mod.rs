//! Owned HTML element tree.
//!
//! HTML is parsed tolerantly with html5ever and immediately converted into the
//! plain [`Document`] / [`Element`] / [`Node`] types defined here. Those types
//! are what the templater mutates; the parser's reference-counted DOM never
//! leaves [`parse`].
//!
//! ## Document vs. Fragment
//!
//! Input that looks like a full page (a leading `<!DOCTYPE ...>`, or an
//! `<html>`, `<head>` or `<body>` tag) is parsed as a document. Anything else
//! is parsed as a fragment in a `<template>` context, so that a snippet like
//! `<p>Hello</p>` round-trips without gaining `<html><head></head><body>`
//! wrappers, and `<tr>`, `<td>` or `<option>` snippets keep their tags.
//!
//! ## Direct Text
//!
//! [`Element::text`] only reports text for *leaf* elements whose single child
//! is a text node. Elements mixing text and child elements report `None`.

mod parse;
mod render;

pub use parse::MAX_DEPTH;
pub use render::prettify;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarkupError {
    #[error("failed to read markup: {0}")]
    Read(#[from] std::io::Error),
    #[error("markup nests deeper than {limit} levels")]
    TooDeep { limit: usize },
}

/// A parsed HTML document or fragment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    nodes: Vec<Node>,
}

/// A node in the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
    /// Doctype name, e.g. `html`.
    Doctype(String),
}

/// A single attribute. Attribute order is source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// An element: tag name, ordered attributes and children.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: String,
    attributes: Vec<Attribute>,
    children: Vec<Node>,
}

impl Document {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Parse markup. See the module docs for document/fragment detection.
    pub fn parse(html: &str) -> Result<Self, MarkupError> {
        parse::parse(html)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All elements in document order (pre-order).
    pub fn elements(&self) -> Elements<'_> {
        Elements {
            stack: self.nodes.iter().rev().collect(),
        }
    }

    /// Visit every element mutably, parents before their children.
    pub fn for_each_element_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut Element),
    {
        visit_mut(&mut self.nodes, &mut f);
    }

    /// Pretty-printed serialization.
    pub fn to_pretty_string(&self) -> String {
        prettify(self)
    }
}

fn visit_mut<F>(nodes: &mut [Node], f: &mut F)
where
    F: FnMut(&mut Element),
{
    for node in nodes {
        if let Node::Element(element) = node {
            f(element);
            visit_mut(&mut element.children, f);
        }
    }
}

/// Pre-order iterator over the elements of a [`Document`].
pub struct Elements<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Elements<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            if let Node::Element(element) = node {
                self.stack.extend(element.children.iter().rev());
                return Some(element);
            }
        }
        None
    }
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(Attribute {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Replace an attribute's value in place, or append it if absent.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(attr) => attr.value = value,
            None => self.attributes.push(Attribute {
                name: name.to_string(),
                value,
            }),
        }
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Direct text content, if this element's only child is a text node.
    pub fn text(&self) -> Option<&str> {
        match self.children.as_slice() {
            [Node::Text(text)] => Some(text),
            _ => None,
        }
    }

    /// Replace all children with a single text node.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children = vec![Node::Text(text.into())];
    }
}
