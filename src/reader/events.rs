//! XML Event Types
//!
//! Event types for pull-parser style XML processing.

use crate::core::attributes::Attribute;
use std::borrow::Cow;

/// XML parsing event
#[derive(Debug, Clone)]
pub enum XmlEvent<'a> {
    /// Start of an element: <name attrs...>
    StartElement(StartElement<'a>),
    /// End of an element: </name>
    EndElement(EndElement<'a>),
    /// Empty element: <name attrs.../>
    EmptyElement(StartElement<'a>),
    /// Text content between tags (entities decoded)
    Text(Cow<'a, [u8]>),
    /// CDATA section content
    CData(Cow<'a, [u8]>),
    /// Comment content
    Comment(Cow<'a, [u8]>),
    /// Processing instruction target: <?target data?> (data is skipped)
    ProcessingInstruction { target: Cow<'a, [u8]> },
    /// XML declaration: <?xml version="1.0"?>
    XmlDeclaration {
        version: Cow<'a, [u8]>,
        encoding: Option<Cow<'a, [u8]>>,
    },
    /// DOCTYPE declaration (raw, unparsed)
    DocType(Cow<'a, [u8]>),
    /// End of document
    EndDocument,
}

/// Start element event data
#[derive(Debug, Clone)]
pub struct StartElement<'a> {
    /// Full element name (may include prefix)
    pub name: Cow<'a, [u8]>,
    /// Element attributes in source order
    pub attributes: Vec<Attribute<'a>>,
    /// Byte offset of the opening '<'
    pub offset: usize,
}

impl<'a> StartElement<'a> {
    pub fn new(name: &'a [u8], attributes: Vec<Attribute<'a>>, offset: usize) -> Self {
        StartElement {
            name: Cow::Borrowed(name),
            attributes,
            offset,
        }
    }

    pub fn name_str(&self) -> Option<&str> {
        std::str::from_utf8(self.name.as_ref()).ok()
    }

    /// Get an attribute value by name as string
    pub fn get_attribute_value(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name_str() == Some(name))
            .and_then(|a| a.value_str())
    }

    /// First attribute name that appears more than once
    pub fn duplicate_attribute(&self) -> Option<&[u8]> {
        let attrs = &self.attributes;
        attrs.iter().enumerate().find_map(|(i, a)| {
            attrs[i + 1..]
                .iter()
                .any(|b| b.name == a.name)
                .then(|| a.name.as_ref())
        })
    }
}

/// End element event data
#[derive(Debug, Clone)]
pub struct EndElement<'a> {
    /// Full element name
    pub name: Cow<'a, [u8]>,
    /// Byte offset of the opening '<'
    pub offset: usize,
}

impl<'a> EndElement<'a> {
    pub fn new(name: &'a [u8], offset: usize) -> Self {
        EndElement {
            name: Cow::Borrowed(name),
            offset,
        }
    }

    pub fn name_str(&self) -> Option<&str> {
        std::str::from_utf8(self.name.as_ref()).ok()
    }
}
