//! Minimal owned XML element tree.
//!
//! `vk.xml` embeds C declarations as mixed content
//! (`const <type>char</type>* <name>pName</name>`), so the tree keeps text
//! nodes interleaved with child elements in document order.

use std::io::Read;

use xml::reader::{EventReader, XmlEvent};

use super::errors::RegistryError;

/// A node inside an element.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An XML element with its attributes and children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element without attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Get an attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Iterate over child elements.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// Iterate over child elements with the given name.
    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements().filter(move |e| e.name == name)
    }

    /// Get the first child element with the given name.
    pub fn find(&self, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.name == name)
    }

    /// Text of the first child element with the given name.
    pub fn find_text(&self, name: &str) -> Option<String> {
        self.find(name).map(Element::text_content)
    }

    /// Text preceding the first child element.
    pub fn leading_text(&self) -> &str {
        match self.children.first() {
            Some(Node::Text(text)) => text,
            _ => "",
        }
    }

    /// Text directly following the first child element named `name`.
    pub fn tail_of(&self, name: &str) -> &str {
        let mut found = false;
        for node in &self.children {
            match node {
                Node::Element(e) if !found && e.name == name => found = true,
                Node::Text(text) if found => return text,
                _ if found => return "",
                _ => {}
            }
        }
        ""
    }

    /// Concatenated text of this element and all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    /// Concatenated text of everything after the first child named `name`.
    pub fn text_after(&self, name: &str) -> String {
        let mut out = String::new();
        let mut found = false;
        for node in &self.children {
            match node {
                Node::Element(e) if !found && e.name == name => found = true,
                Node::Element(e) if found => e.collect_text(&mut out),
                Node::Text(text) if found => out.push_str(text),
                _ => {}
            }
        }
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                Node::Element(e) => e.collect_text(out),
                Node::Text(text) => out.push_str(text),
            }
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(Node::Text(last)) = self.children.last_mut() {
            last.push_str(text);
        } else {
            self.children.push(Node::Text(text.to_string()));
        }
    }
}

/// Parse a document and return its root element.
pub fn parse_document<R: Read>(source: R) -> Result<Element, RegistryError> {
    let reader = EventReader::new(source);
    let mut stack: Vec<Element> = Vec::new();
    let mut root = None;

    for event in reader {
        match event? {
            XmlEvent::StartElement {
                name, attributes, ..
            } => {
                let mut element = Element::new(name.local_name);
                element.attributes = attributes
                    .into_iter()
                    .map(|a| (a.name.local_name, a.value))
                    .collect();
                stack.push(element);
            }
            XmlEvent::EndElement { .. } => {
                let Some(element) = stack.pop() else {
                    continue;
                };
                match stack.last_mut() {
                    Some(parent) => parent.children.push(Node::Element(element)),
                    None => root = Some(element),
                }
            }
            XmlEvent::Characters(text) | XmlEvent::Whitespace(text) | XmlEvent::CData(text) => {
                if let Some(current) = stack.last_mut() {
                    current.push_text(&text);
                }
            }
            _ => {}
        }
    }

    root.ok_or(RegistryError::MissingRoot)
}
