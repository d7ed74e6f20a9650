// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Scale Invariant

/// Minimal Element Tree
///
/// Layout loading needs random access to the document (includes, templates,
/// legacy pane scans, rewriting on copy), so documents are read once with
/// quick_xml into an owned element tree. Text nodes and comments are dropped;
/// layout and geometry documents carry everything in attributes.

use std::fs;
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::olge_error::LayoutError;
use crate::olgt_types::Attributes;

#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    pub name: String,
    /// In document order
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
}

// ============================================================================
// SECTION 1: Reading
// ============================================================================

impl XmlElement {
    pub fn new(name: &str) -> Self {
        XmlElement { name: name.to_string(), attributes: Vec::new(), children: Vec::new() }
    }

    /// Read and parse a whole document, returning its root element
    pub fn load(path: &Path) -> Result<Self, LayoutError> {
        let xml = fs::read_to_string(path).map_err(|e| LayoutError::io(path, e))?;
        Self::parse(&xml, path)
    }

    /// Parse a document held in memory; `path` is only used for error context
    pub fn parse(xml: &str, path: &Path) -> Result<Self, LayoutError> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut buf = Vec::new();
        let root = loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    let mut element = Self::from_start(e).map_err(|e| LayoutError::xml(path, e))?;
                    let complete = Self::parse_children(&mut reader, &mut element)
                        .map_err(|e| LayoutError::xml(path, e))?;
                    if !complete {
                        return Err(LayoutError::resource(path, format!("unexpected EOF in <{}>", element.name)));
                    }
                    break element;
                }
                Ok(Event::Empty(ref e)) => {
                    break Self::from_start(e).map_err(|e| LayoutError::xml(path, e))?;
                }
                Ok(Event::Eof) => return Err(LayoutError::resource(path, "document has no root element")),
                Err(e) => return Err(LayoutError::xml(path, e)),
                _ => {}
            }
            buf.clear();
        };

        Ok(root)
    }

    fn from_start(e: &BytesStart) -> Result<Self, quick_xml::Error> {
        let mut element = XmlElement::new(&String::from_utf8_lossy(e.name().as_ref()));
        for attr in e.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            let value = attr.unescape_value()?.to_string();
            element.attributes.push((key, value));
        }
        Ok(element)
    }

    /// Read children until the matching end tag. Returns false on premature EOF.
    fn parse_children(reader: &mut Reader<&[u8]>, element: &mut XmlElement) -> Result<bool, quick_xml::Error> {
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) => {
                    let mut child = Self::from_start(e)?;
                    if !Self::parse_children(reader, &mut child)? {
                        return Ok(false);
                    }
                    element.children.push(child);
                }
                Event::Empty(ref e) => element.children.push(Self::from_start(e)?),
                Event::End(_) => return Ok(true),
                Event::Eof => return Ok(false),
                _ => {}
            }
            buf.clear();
        }
    }
}

// ============================================================================
// SECTION 2: Queries
// ============================================================================

impl XmlElement {
    /// Tag name without namespace prefix
    pub fn local_name(&self) -> &str {
        match self.name.rsplit_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// Replace an attribute in place or append it
    pub fn set_attr(&mut self, key: &str, value: &str) {
        match self.attributes.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value.to_string(),
            None => self.attributes.push((key.to_string(), value.to_string())),
        }
    }

    pub fn attribute_map(&self) -> Attributes {
        self.attributes.iter().cloned().collect()
    }

    /// All elements below this one with the given local name, in document order
    pub fn descendants<'a>(&'a self, name: &str) -> Vec<&'a XmlElement> {
        let mut found = Vec::new();
        for child in &self.children {
            child.collect_named(name, &mut found);
        }
        found
    }

    fn collect_named<'a>(&'a self, name: &str, found: &mut Vec<&'a XmlElement>) {
        if self.local_name() == name {
            found.push(self);
        }
        for child in &self.children {
            child.collect_named(name, found);
        }
    }

    /// Pre-order walk over this element and everything below it
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a XmlElement)) {
        f(self);
        for child in &self.children {
            child.walk(f);
        }
    }

    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut XmlElement)) {
        f(self);
        for child in &mut self.children {
            child.walk_mut(f);
        }
    }
}

// ============================================================================
// SECTION 3: Writing
// ============================================================================

impl XmlElement {
    pub fn to_pretty_xml(&self) -> Result<String, quick_xml::Error> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        self.write_to(&mut writer)?;
        let mut xml = String::from_utf8_lossy(&writer.into_inner()).to_string();
        xml.push('\n');
        Ok(xml)
    }

    fn write_to(&self, writer: &mut Writer<Vec<u8>>) -> Result<(), quick_xml::Error> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() {
            writer.write_event(Event::Empty(start))?;
        } else {
            writer.write_event(Event::Start(start))?;
            for child in &self.children {
                child.write_to(writer)?;
            }
            writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))?;
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<(), LayoutError> {
        let xml = self.to_pretty_xml().map_err(|e| LayoutError::xml(path, e))?;
        fs::write(path, xml).map_err(|e| LayoutError::io(path, e))
    }
}
