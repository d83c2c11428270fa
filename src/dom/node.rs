//! XML Node representation
//!
//! Uses NodeId (u32) for compact, cache-friendly node references.

/// Compact node identifier (index into arena)
pub type NodeId = u32;

/// Type of XML node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Document root
    Document,
    /// Element node
    Element,
    /// Text content
    Text,
    /// CDATA section
    CData,
    /// Comment
    Comment,
    /// Processing instruction
    ProcessingInstruction,
}

/// An XML node in the arena
#[derive(Debug, Clone)]
pub struct XmlNode {
    /// Type of this node
    pub kind: NodeKind,
    /// Parent node (None for the document node)
    pub parent: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub last_child: Option<NodeId>,
    pub prev_sibling: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    /// String pool id of the name (elements, PIs) or of the content
    /// (text, CDATA, comments)
    pub name_id: u32,
    /// Start of attributes in attribute arena (for elements)
    pub attr_start: u32,
    /// Number of attributes
    pub attr_count: u32,
}

impl XmlNode {
    fn new(kind: NodeKind, name_id: u32, parent: Option<NodeId>) -> Self {
        XmlNode {
            kind,
            parent,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            name_id,
            attr_start: 0,
            attr_count: 0,
        }
    }

    /// Create the document node
    pub fn document() -> Self {
        Self::new(NodeKind::Document, 0, None)
    }

    pub fn element(name_id: u32, parent: Option<NodeId>) -> Self {
        Self::new(NodeKind::Element, name_id, parent)
    }

    pub fn text(content_id: u32, parent: Option<NodeId>) -> Self {
        Self::new(NodeKind::Text, content_id, parent)
    }

    pub fn cdata(content_id: u32, parent: Option<NodeId>) -> Self {
        Self::new(NodeKind::CData, content_id, parent)
    }

    pub fn comment(content_id: u32, parent: Option<NodeId>) -> Self {
        Self::new(NodeKind::Comment, content_id, parent)
    }

    pub fn processing_instruction(target_id: u32, parent: Option<NodeId>) -> Self {
        Self::new(NodeKind::ProcessingInstruction, target_id, parent)
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        self.kind == NodeKind::Element
    }

    /// Text or CDATA
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text | NodeKind::CData)
    }

    #[inline]
    pub fn has_children(&self) -> bool {
        self.first_child.is_some()
    }

    #[inline]
    pub fn has_attributes(&self) -> bool {
        self.attr_count > 0
    }
}

/// Stored attribute
#[derive(Debug, Clone, Copy)]
pub struct XmlAttribute {
    /// Index into string pool for attribute name
    pub name_id: u32,
    /// Index into string pool for attribute value
    pub value_id: u32,
}

impl XmlAttribute {
    pub fn new(name_id: u32, value_id: u32) -> Self {
        XmlAttribute { name_id, value_id }
    }
}
