//! Borrowed node handles
//!
//! A `Node` pairs a document reference with a `NodeId`. It is `Copy`, never
//! owns anything, and cannot outlive the document it points into.

use super::document::Document;
use super::iter::{ChildIter, Children, DescendantIter, NamedChildren};
use super::node::{NodeId, NodeKind, XmlNode};
use super::DocumentAccess;
use crate::core::scanner::is_blank;
use std::fmt;

/// Handle to a node inside a document
pub struct Node<'d, D = Document> {
    doc: &'d D,
    id: NodeId,
}

impl<'d, D: DocumentAccess> Node<'d, D> {
    pub fn new(doc: &'d D, id: NodeId) -> Self {
        debug_assert!(doc.get_node(id).is_some(), "node id {} outside document", id);
        Node { doc, id }
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The document this node belongs to
    #[inline]
    pub fn document(&self) -> &'d D {
        self.doc
    }

    fn raw(&self) -> Option<&'d XmlNode> {
        self.doc.get_node(self.id)
    }

    pub fn kind(&self) -> Option<NodeKind> {
        self.raw().map(|n| n.kind)
    }

    pub fn is_element(&self) -> bool {
        self.raw().is_some_and(|n| n.is_element())
    }

    /// Element name, or "" for nodes without one
    pub fn name(&self) -> &'d str {
        self.doc.node_name(self.id).unwrap_or("")
    }

    /// Attribute value, or None when the attribute is absent
    pub fn attribute(&self, name: &str) -> Option<&'d str> {
        self.doc.get_attribute(self.id, name)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// All attributes as (name, value) pairs in source order
    pub fn attributes(&self) -> impl Iterator<Item = (&'d str, &'d str)> + 'd {
        let strings = self.doc.strings();
        self.doc
            .attributes(self.id)
            .iter()
            .filter_map(move |attr| {
                Some((strings.get_str(attr.name_id)?, strings.get_str(attr.value_id)?))
            })
    }

    /// Parent node (an element or the document node)
    pub fn parent(&self) -> Option<Self> {
        self.doc.parent_of(self.id).map(|id| Node::new(self.doc, id))
    }

    /// Parent node if it is an element
    pub fn parent_element(&self) -> Option<Self> {
        self.parent().filter(|p| p.is_element())
    }

    /// The document node, found by walking parent links
    pub fn document_node(&self) -> Self {
        let mut current = self.id;
        while let Some(parent) = self.doc.parent_of(current) {
            current = parent;
        }
        debug_assert_eq!(current, self.doc.document_node_id());
        Node::new(self.doc, current)
    }

    /// Child elements in document order
    pub fn children(&self) -> Children<'d, D> {
        Children::new(self.doc, self.id)
    }

    /// Child elements with the given name, in document order
    pub fn children_named<'n>(&self, name: &'n str) -> NamedChildren<'d, 'n, D> {
        NamedChildren::new(self.doc, self.id, name)
    }

    /// First child element with the given name
    pub fn first_child_named(&self, name: &str) -> Option<Self> {
        self.children_named(name).next()
    }

    /// Next sibling that is an element
    pub fn next_sibling_element(&self) -> Option<Self> {
        let next = super::iter::element_from(self.doc, self.doc.next_sibling(self.id))?;
        Some(Node::new(self.doc, next))
    }

    /// Text of the first text or CDATA child that is not whitespace-only,
    /// trimmed of surrounding whitespace. Empty when there is none.
    pub fn text(&self) -> &'d str {
        let doc = self.doc;
        ChildIter::new(doc, self.id)
            .filter_map(|id| doc.text_content(id))
            .find(|t| !is_blank(t.as_bytes()))
            .map(|t| t.trim_matches(|c| matches!(c, ' ' | '\t' | '\n' | '\r')))
            .unwrap_or("")
    }

    /// All descendant text and CDATA concatenated in document order
    pub fn text_content(&self) -> String {
        let doc = self.doc;
        DescendantIter::new(doc, self.id)
            .filter_map(|id| doc.text_content(id))
            .collect()
    }
}

impl<D> Clone for Node<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for Node<'_, D> {}

impl<D> PartialEq for Node<'_, D> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

impl<D> Eq for Node<'_, D> {}

impl<D: DocumentAccess> fmt::Debug for Node<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("name", &self.name())
            .finish()
    }
}

impl<'d, D: DocumentAccess> IntoIterator for Node<'d, D> {
    type Item = Node<'d, D>;
    type IntoIter = Children<'d, D>;

    fn into_iter(self) -> Self::IntoIter {
        self.children()
    }
}

/// Attribute value of a node, or "" when the node or attribute is absent
pub fn attribute_value<'d, D: DocumentAccess + 'd>(
    node: impl Into<Option<Node<'d, D>>>,
    name: &str,
) -> &'d str {
    node.into().and_then(|n| n.attribute(name)).unwrap_or("")
}

/// Text of a node (see [`Node::text`]), or "" when the node is absent
pub fn text<'d, D: DocumentAccess + 'd>(node: impl Into<Option<Node<'d, D>>>) -> &'d str {
    node.into().map(|n| n.text()).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    const XML: &[u8] = b"<A>\n  <B id=\"one\" org=\"\">\n    <C code=\"1234\">\n      A-B(one)-C.1234\n    </C>\n    <C>\n      <![CDATA[A-B(one)-C.5678]]>\n    </C>\n  </B>\n</A>";

    #[test]
    fn test_attribute_value_present_and_absent() {
        let doc = Document::parse(XML);
        let b = doc.root_element().unwrap().first_child_named("B").unwrap();
        assert_eq!(attribute_value(b, "id"), "one");
        assert_eq!(attribute_value(b, "org"), "");
        assert_eq!(attribute_value(b, "missing"), "");
        assert_eq!(b.attribute("org"), Some(""));
        assert_eq!(b.attribute("missing"), None);
        assert!(b.has_attribute("org"));
        assert!(!b.has_attribute("missing"));
        assert_eq!(attribute_value(None::<Node<'_>>, "id"), "");
    }

    #[test]
    fn test_text_skips_whitespace_and_trims() {
        let doc = Document::parse(XML);
        let b = doc.root_element().unwrap().first_child_named("B").unwrap();
        let texts: Vec<_> = b.children().map(text).collect();
        assert_eq!(texts, ["A-B(one)-C.1234", "A-B(one)-C.5678"]);
        assert_eq!(text(b), "");
        assert_eq!(text(None::<Node<'_>>), "");
    }

    #[test]
    fn test_text_content_concatenates() {
        let doc = Document::parse(b"<p>a<b>b</b><![CDATA[c]]></p>");
        assert_eq!(doc.root_element().unwrap().text_content(), "abc");
    }

    #[test]
    fn test_parent_and_document_node() {
        let doc = Document::parse(XML);
        let root = doc.root_element().unwrap();
        let c = root.first_child_named("B").unwrap().first_child_named("C").unwrap();
        assert_eq!(c.parent_element().unwrap().name(), "B");
        assert_eq!(c.document_node(), doc.document_node());
        assert_eq!(root.parent(), Some(doc.document_node()));
        assert_eq!(root.parent_element(), None);
        assert_eq!(doc.document_node().kind(), Some(NodeKind::Document));
    }

    #[test]
    fn test_attributes_iter() {
        let doc = Document::parse(XML);
        let b = doc.root_element().unwrap().first_child_named("B").unwrap();
        let attrs: Vec<_> = b.attributes().collect();
        assert_eq!(attrs, [("id", "one"), ("org", "")]);
    }

    #[test]
    fn test_next_sibling_element() {
        let doc = Document::parse(b"<A><B/>x<C/></A>");
        let b = doc.root_element().unwrap().children().next().unwrap();
        assert_eq!(b.next_sibling_element().map(|n| n.name()), Some("C"));
    }
}
