//! DOM Module - Arena-based XML Document
//!
//! Implements an efficient DOM representation using:
//! - Arena allocation for nodes
//! - NodeId (u32) indices for cache-friendly traversal
//! - String interning for names, values and text
//! - Borrowed `Node` handles whose lifetime is tied to the document

pub mod document;
pub mod handle;
pub mod iter;
pub mod node;
pub mod strings;

pub use document::Document;
pub use handle::{attribute_value, text, Node};
pub use iter::{ChildIter, Children, DescendantIter, NamedChildren};
pub use node::{NodeId, NodeKind, XmlAttribute, XmlNode};
pub use strings::StringPool;

/// Read access to a parsed document.
///
/// This is everything the selector engine needs from a DOM: node lookup,
/// names, attributes, text, and parent / first-child / next-sibling links.
/// Implementors must be immutable while borrowed; concurrent readers are
/// fine, concurrent writers are the caller's problem.
pub trait DocumentAccess {
    /// Get root element ID
    fn root_element_id(&self) -> Option<NodeId>;

    /// Get a node by ID
    fn get_node(&self, id: NodeId) -> Option<&XmlNode>;

    /// Get attributes for an element
    fn attributes(&self, id: NodeId) -> &[XmlAttribute];

    /// Get the string pool for direct access
    fn strings(&self) -> &StringPool;

    /// ID of the document node (parent of the root element)
    fn document_node_id(&self) -> NodeId {
        0
    }

    /// Name of an element or processing instruction
    fn node_name(&self, id: NodeId) -> Option<&str> {
        let node = self.get_node(id)?;
        match node.kind {
            NodeKind::Element | NodeKind::ProcessingInstruction => {
                self.strings().get_str(node.name_id)
            }
            _ => None,
        }
    }

    /// Content of a text or CDATA node
    fn text_content(&self, id: NodeId) -> Option<&str> {
        let node = self.get_node(id)?;
        if node.is_text() {
            self.strings().get_str(node.name_id)
        } else {
            None
        }
    }

    /// Get attribute value by name
    fn get_attribute(&self, node_id: NodeId, name: &str) -> Option<&str> {
        let strings = self.strings();
        self.attributes(node_id)
            .iter()
            .find(|attr| strings.get_str(attr.name_id) == Some(name))
            .and_then(|attr| strings.get_str(attr.value_id))
    }

    fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.get_node(id)?.parent
    }

    fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get_node(id)?.first_child
    }

    fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get_node(id)?.next_sibling
    }
}
