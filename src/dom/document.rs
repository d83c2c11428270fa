//! XML Document - Arena-based DOM representation
//!
//! The document owns every node, attribute and string. Node 0 is the
//! document node; the root element is one of its children.

use super::handle::Node;
use super::iter::{ChildIter, DescendantIter};
use super::node::{NodeId, NodeKind, XmlAttribute, XmlNode};
use super::strings::StringPool;
use super::DocumentAccess;
use crate::error::{Result, XmlError};
use crate::reader::events::{StartElement, XmlEvent};
use crate::reader::SliceReader;

/// An XML document stored in arena format
#[derive(Debug)]
pub struct Document {
    /// Arena of nodes
    nodes: Vec<XmlNode>,
    /// Arena of attributes
    attributes: Vec<XmlAttribute>,
    /// Interned strings
    strings: StringPool,
    /// Root element node ID (not document node)
    root_element: Option<NodeId>,
}

impl Document {
    fn empty() -> Self {
        let mut doc = Document {
            nodes: Vec::with_capacity(256),
            attributes: Vec::with_capacity(128),
            strings: StringPool::new(),
            root_element: None,
        };
        doc.nodes.push(XmlNode::document());
        doc
    }

    /// Parse an XML document (lenient mode).
    ///
    /// Never fails: parsing stops at the first unrecoverable construct and
    /// whatever was built up to that point is kept.
    pub fn parse(input: &[u8]) -> Self {
        let mut doc = Self::empty();
        // lenient mode never returns an error
        let _ = doc.build_from_events(input, false);
        doc
    }

    /// Parse an XML document in strict mode.
    ///
    /// Returns `XmlError::Document` if the input is not well-formed.
    pub fn parse_strict(input: &[u8]) -> Result<Self> {
        if let Err(e) = std::str::from_utf8(input) {
            let err = XmlError::document("Invalid UTF-8 in document", e.valid_up_to());
            log::debug!("rejected XML document: {}", err);
            return Err(err);
        }

        let mut doc = Self::empty();
        match doc.build_from_events(input, true) {
            Ok(()) => {
                log::debug!("loaded XML document with {} nodes", doc.nodes.len());
                Ok(doc)
            }
            Err(err) => {
                log::debug!("rejected XML document: {}", err);
                Err(err)
            }
        }
    }

    /// Build DOM from XML events
    fn build_from_events(&mut self, input: &[u8], strict: bool) -> Result<()> {
        let mut reader = if strict {
            SliceReader::new_strict(input)
        } else {
            SliceReader::new(input)
        };
        let mut stack: Vec<NodeId> = vec![0];
        let mut seen_doctype = false;

        loop {
            let offset = reader.position();
            let Some(event) = reader.next_event() else {
                break;
            };
            let at_top = stack.len() == 1;

            match event {
                XmlEvent::StartElement(elem) | XmlEvent::EmptyElement(elem)
                    if strict && at_top && self.root_element.is_some() =>
                {
                    return Err(XmlError::document(
                        "Document has multiple root elements",
                        elem.offset,
                    ));
                }

                XmlEvent::StartElement(elem) => {
                    if strict {
                        Self::check_attributes(&elem)?;
                    }
                    let id = self.handle_element(&elem, &stack);
                    stack.push(id);
                }

                XmlEvent::EmptyElement(elem) => {
                    if strict {
                        Self::check_attributes(&elem)?;
                    }
                    self.handle_element(&elem, &stack);
                }

                XmlEvent::EndElement(end) => {
                    let open = stack
                        .iter()
                        .rposition(|&id| id != 0 && self.name_bytes(id) == end.name.as_ref());
                    match open {
                        Some(pos) if !strict || pos == stack.len() - 1 => stack.truncate(pos),
                        _ if strict => {
                            let end_name = String::from_utf8_lossy(&end.name);
                            let message = match stack.last() {
                                Some(&id) if id != 0 => format!(
                                    "Tag mismatch: <{}> closed with </{}>",
                                    String::from_utf8_lossy(self.name_bytes(id)),
                                    end_name
                                ),
                                _ => format!("Unexpected end tag: </{}>", end_name),
                            };
                            return Err(XmlError::document(message, end.offset));
                        }
                        // lenient: stray end tag
                        _ => {}
                    }
                }

                XmlEvent::Text(content) => {
                    if strict && at_top && !crate::core::scanner::is_blank(&content) {
                        return Err(XmlError::document(
                            "Text content not allowed at document level",
                            offset,
                        ));
                    }
                    let id = self.strings.intern(&content);
                    self.push_node(&stack, |parent| XmlNode::text(id, parent));
                }

                XmlEvent::CData(content) => {
                    if strict && at_top {
                        return Err(XmlError::document(
                            "CDATA section not allowed at document level",
                            offset,
                        ));
                    }
                    let id = self.strings.intern(&content);
                    self.push_node(&stack, |parent| XmlNode::cdata(id, parent));
                }

                XmlEvent::Comment(content) => {
                    let id = self.strings.intern(&content);
                    self.push_node(&stack, |parent| XmlNode::comment(id, parent));
                }

                XmlEvent::ProcessingInstruction { target } => {
                    let id = self.strings.intern(&target);
                    self.push_node(&stack, |parent| {
                        XmlNode::processing_instruction(id, parent)
                    });
                }

                XmlEvent::DocType(content) => {
                    log::trace!("skipping DOCTYPE ({} bytes)", content.len());
                    if strict {
                        if seen_doctype {
                            return Err(XmlError::document(
                                "Multiple DOCTYPE declarations not allowed",
                                offset,
                            ));
                        }
                        if self.root_element.is_some() || !at_top {
                            return Err(XmlError::document(
                                "DOCTYPE must come before root element",
                                offset,
                            ));
                        }
                    }
                    seen_doctype = true;
                }

                XmlEvent::XmlDeclaration { version, encoding } => {
                    if strict {
                        Self::check_declaration(&version, encoding.as_deref(), offset)?;
                    }
                }

                XmlEvent::EndDocument => {}
            }
        }

        if !strict {
            return Ok(());
        }

        if let Some(err) = reader.error() {
            return Err(XmlError::document(err.message, err.offset));
        }
        if let Some(&open) = stack.get(1) {
            let name = String::from_utf8_lossy(self.name_bytes(open)).into_owned();
            return Err(XmlError::document(format!("Unclosed tag: <{}>", name), input.len()));
        }
        if self.root_element.is_none() {
            return Err(XmlError::document("Document has no root element", input.len()));
        }

        Ok(())
    }

    fn check_attributes(elem: &StartElement<'_>) -> Result<()> {
        match elem.duplicate_attribute() {
            Some(dup) => Err(XmlError::document(
                format!("Duplicate attribute: {}", String::from_utf8_lossy(dup)),
                elem.offset,
            )),
            None => Ok(()),
        }
    }

    /// Only XML 1.x in UTF-8 (or its ASCII subset) is accepted
    fn check_declaration(version: &[u8], encoding: Option<&[u8]>, offset: usize) -> Result<()> {
        if !version.starts_with(b"1.") {
            return Err(XmlError::document(
                format!("Unsupported XML version: {}", String::from_utf8_lossy(version)),
                offset,
            ));
        }
        match encoding {
            Some(enc) if !enc.eq_ignore_ascii_case(b"UTF-8") && !enc.eq_ignore_ascii_case(b"US-ASCII") => {
                Err(XmlError::document(
                    format!("Unsupported encoding: {}", String::from_utf8_lossy(enc)),
                    offset,
                ))
            }
            _ => Ok(()),
        }
    }

    /// Add an element under the top of `stack`, returning its id
    fn handle_element(&mut self, elem: &StartElement<'_>, stack: &[NodeId]) -> NodeId {
        let name_id = self.strings.intern(&elem.name);

        let attr_start = self.attributes.len() as u32;
        for attr in &elem.attributes {
            let attr_name_id = self.strings.intern(&attr.name);
            let attr_value_id = self.strings.intern(&attr.value);
            self.attributes.push(XmlAttribute::new(attr_name_id, attr_value_id));
        }
        let attr_count = self.attributes.len() as u32 - attr_start;

        let node_id = self.push_node(stack, |parent| {
            let mut node = XmlNode::element(name_id, parent);
            node.attr_start = attr_start;
            node.attr_count = attr_count;
            node
        });

        if self.root_element.is_none() && stack.len() == 1 {
            self.root_element = Some(node_id);
        }
        node_id
    }

    /// Create a node under the top of `stack` and link it in
    fn push_node<F>(&mut self, stack: &[NodeId], make: F) -> NodeId
    where
        F: FnOnce(Option<NodeId>) -> XmlNode,
    {
        let parent_id = stack.last().copied().unwrap_or(0);
        let node_id = self.nodes.len() as NodeId;
        self.nodes.push(make(Some(parent_id)));
        self.link_child(parent_id, node_id);
        node_id
    }

    /// Link a child node to its parent
    fn link_child(&mut self, parent_id: NodeId, child_id: NodeId) {
        let last_child_opt = self.nodes[parent_id as usize].last_child;

        if let Some(last_child_id) = last_child_opt {
            self.nodes[child_id as usize].prev_sibling = Some(last_child_id);
            self.nodes[last_child_id as usize].next_sibling = Some(child_id);
        } else {
            self.nodes[parent_id as usize].first_child = Some(child_id);
        }
        self.nodes[parent_id as usize].last_child = Some(child_id);
    }

    fn name_bytes(&self, id: NodeId) -> &[u8] {
        self.nodes
            .get(id as usize)
            .and_then(|n| self.strings.get(n.name_id))
            .unwrap_or_default()
    }

    /// Handle to the document node
    pub fn document_node(&self) -> Node<'_, Self> {
        Node::new(self, 0)
    }

    /// Handle to the root element
    pub fn root_element(&self) -> Option<Node<'_, Self>> {
        self.root_element.map(|id| Node::new(self, id))
    }

    /// Handle to an arbitrary node
    pub fn node(&self, id: NodeId) -> Option<Node<'_, Self>> {
        self.nodes.get(id as usize).map(|_| Node::new(self, id))
    }

    /// Get root element name
    pub fn root_name(&self) -> Option<&str> {
        self.root_element.and_then(|id| self.node_name(id))
    }

    /// Iterate over children of a node (all kinds)
    pub fn children(&self, id: NodeId) -> ChildIter<'_, Self> {
        ChildIter::new(self, id)
    }

    /// Iterate over all descendants of a node, depth-first
    pub fn descendants(&self, id: NodeId) -> DescendantIter<'_, Self> {
        DescendantIter::new(self, id)
    }

    /// Get total number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl DocumentAccess for Document {
    fn root_element_id(&self) -> Option<NodeId> {
        self.root_element
    }

    fn get_node(&self, id: NodeId) -> Option<&XmlNode> {
        self.nodes.get(id as usize)
    }

    fn attributes(&self, id: NodeId) -> &[XmlAttribute] {
        match self.get_node(id) {
            Some(node) => {
                let start = node.attr_start as usize;
                let end = start + node.attr_count as usize;
                self.attributes.get(start..end).unwrap_or_default()
            }
            None => &[],
        }
    }

    fn strings(&self) -> &StringPool {
        &self.strings
    }
}
