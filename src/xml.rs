//! Namespace-normalized view over a parsed XML export.
//!
//! The PMS emits reporting-services XML with namespace-qualified tags; all of
//! our structure matching works on local names only. Rather than mutating a
//! parsed tree, names are stripped to their local part while the tree is
//! built, so detection and extraction stay pure functions over this view.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{IngestError, Result};

/// One element of the normalized document tree. Tag and attribute names are
/// local names with any namespace prefix removed; text content is not kept
/// because the export carries all data in attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Look up an attribute by local name, case-insensitively.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_named(&self, local: &str) -> bool {
        self.name.eq_ignore_ascii_case(local)
    }

    /// Depth-first traversal of this element and everything below it.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// All descendants (self included) with the given local name, in
    /// document order.
    pub fn descendants_named<'a>(
        &'a self,
        local: &'a str,
    ) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.descendants().filter(move |e| e.is_named(local))
    }

    /// First descendant (self included) with the given local name.
    pub fn find_named<'a>(&'a self, local: &'a str) -> Option<&'a XmlElement> {
        self.descendants_named(local).next()
    }
}

pub struct Descendants<'a> {
    stack: Vec<&'a XmlElement>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a XmlElement;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        // Reverse so children come back out in document order.
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement> {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        attributes.push((key, value));
    }
    Ok(XmlElement {
        name,
        attributes,
        children: Vec::new(),
    })
}

/// Parse raw document bytes into the normalized element tree.
///
/// Returns the root element, or a structural error when the bytes are not
/// well-formed XML. This is the only place the raw bytes are touched.
pub fn parse_document(bytes: &[u8]) -> Result<XmlElement> {
    let mut reader = Reader::from_reader(bytes);
    let mut buf = Vec::new();
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(start) => {
                stack.push(element_from_start(&start)?);
            }
            Event::Empty(start) => {
                let element = element_from_start(&start)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => {
                        root.get_or_insert(element);
                    }
                }
            }
            Event::End(_) => {
                if let Some(done) = stack.pop() {
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(done),
                        None => {
                            root.get_or_insert(done);
                        }
                    }
                }
            }
            Event::Eof => break,
            // Text, comments, declarations and PIs carry nothing we need.
            _ => {}
        }
        buf.clear();
    }

    root.ok_or(IngestError::NoRoot)
}
