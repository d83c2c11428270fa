//! Tree iterators
//!
//! Two layers:
//! - `ChildIter` / `DescendantIter` walk raw `NodeId`s of every kind
//! - `Children` / `NamedChildren` walk child *elements* as `Node` handles
//!
//! All of them are plain `Iterator`s, so any iterator adapter or `for` loop
//! works over a node's children without knowing how the tree is stored.
//! They are cheap to clone, and cloning restarts from the clone point.

use super::handle::Node;
use super::node::NodeId;
use super::DocumentAccess;
use std::iter::FusedIterator;

/// Iterator over child node ids (all node kinds)
pub struct ChildIter<'d, D> {
    doc: &'d D,
    next: Option<NodeId>,
}

impl<'d, D: DocumentAccess> ChildIter<'d, D> {
    pub fn new(doc: &'d D, parent: NodeId) -> Self {
        ChildIter {
            doc,
            next: doc.first_child(parent),
        }
    }
}

impl<'d, D: DocumentAccess> Iterator for ChildIter<'d, D> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.next_sibling(current);
        Some(current)
    }
}

/// Iterator over descendant node ids (depth-first, document order)
pub struct DescendantIter<'d, D> {
    doc: &'d D,
    stack: Vec<NodeId>,
}

impl<'d, D: DocumentAccess> DescendantIter<'d, D> {
    pub fn new(doc: &'d D, root: NodeId) -> Self {
        let mut iter = DescendantIter {
            doc,
            stack: Vec::new(),
        };
        iter.push_children(root);
        iter
    }

    /// Push children in reverse order so the first child pops first
    fn push_children(&mut self, id: NodeId) {
        let mut child_id = self.doc.get_node(id).and_then(|n| n.last_child);
        while let Some(cid) = child_id {
            self.stack.push(cid);
            child_id = self.doc.get_node(cid).and_then(|n| n.prev_sibling);
        }
    }
}

impl<'d, D: DocumentAccess> Iterator for DescendantIter<'d, D> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        self.push_children(current);
        Some(current)
    }
}

/// First element at or after `id` in its sibling chain
pub(crate) fn element_from<D: DocumentAccess>(doc: &D, mut id: Option<NodeId>) -> Option<NodeId> {
    while let Some(current) = id {
        if doc.get_node(current).is_some_and(|n| n.is_element()) {
            return Some(current);
        }
        id = doc.next_sibling(current);
    }
    None
}

/// Child elements of a node, in document order
pub struct Children<'d, D> {
    doc: &'d D,
    next: Option<NodeId>,
}

impl<'d, D: DocumentAccess> Children<'d, D> {
    pub(crate) fn new(doc: &'d D, parent: NodeId) -> Self {
        Children {
            doc,
            next: element_from(doc, doc.first_child(parent)),
        }
    }
}

impl<D> Clone for Children<'_, D> {
    fn clone(&self) -> Self {
        Children {
            doc: self.doc,
            next: self.next,
        }
    }
}

impl<'d, D: DocumentAccess> Iterator for Children<'d, D> {
    type Item = Node<'d, D>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = element_from(self.doc, self.doc.next_sibling(current));
        Some(Node::new(self.doc, current))
    }
}

impl<D: DocumentAccess> FusedIterator for Children<'_, D> {}

/// Child elements of a node with a given name, in document order
pub struct NamedChildren<'d, 'n, D> {
    inner: Children<'d, D>,
    name: &'n str,
}

impl<'d, 'n, D: DocumentAccess> NamedChildren<'d, 'n, D> {
    pub(crate) fn new(doc: &'d D, parent: NodeId, name: &'n str) -> Self {
        NamedChildren {
            inner: Children::new(doc, parent),
            name,
        }
    }
}

impl<D> Clone for NamedChildren<'_, '_, D> {
    fn clone(&self) -> Self {
        NamedChildren {
            inner: self.inner.clone(),
            name: self.name,
        }
    }
}

impl<'d, D: DocumentAccess> Iterator for NamedChildren<'d, '_, D> {
    type Item = Node<'d, D>;

    fn next(&mut self) -> Option<Self::Item> {
        let name = self.name;
        self.inner.find(|child| child.name() == name)
    }
}

impl<D: DocumentAccess> FusedIterator for NamedChildren<'_, '_, D> {}

#[cfg(test)]
mod tests {
    use crate::dom::{Document, DocumentAccess};

    const XML: &[u8] = b"<A>text<B id=\"1\"/><!--c--><C/><B id=\"2\"/>tail</A>";

    #[test]
    fn test_children_skip_non_elements() {
        let doc = Document::parse(XML);
        let root = doc.root_element().unwrap();
        let names: Vec<_> = root.children().map(|n| n.name()).collect();
        assert_eq!(names, ["B", "C", "B"]);
    }

    #[test]
    fn test_named_children() {
        let doc = Document::parse(XML);
        let root = doc.root_element().unwrap();
        let ids: Vec<_> = root.children_named("B").map(|n| n.attribute("id")).collect();
        assert_eq!(ids, [Some("1"), Some("2")]);
        assert_eq!(root.children_named("Z").count(), 0);
    }

    #[test]
    fn test_restartable() {
        let doc = Document::parse(XML);
        let root = doc.root_element().unwrap();
        let mut iter = root.children();
        iter.next();
        let rest_a: Vec<_> = iter.clone().collect();
        let rest_b: Vec<_> = iter.collect();
        assert_eq!(rest_a, rest_b);
        assert_eq!(root.children().count(), 3);
        assert_eq!(root.children().count(), 3);
    }

    #[test]
    fn test_for_loop_over_node() {
        let doc = Document::parse(XML);
        let mut seen = Vec::new();
        for child in doc.root_element().unwrap() {
            seen.push(child.name());
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_generic_algorithms() {
        let doc = Document::parse(XML);
        let root = doc.root_element().unwrap();
        // any iterator adapter works on the sequence
        let mut count = 0;
        root.children().for_each(|_| count += 1);
        assert_eq!(count, 3);
        assert!(root.children().any(|c| c.name() == "C"));
        assert_eq!(root.children().last().and_then(|c| c.attribute("id")), Some("2"));
    }

    #[test]
    fn test_fused_at_end() {
        let doc = Document::parse(b"<A><B/></A>");
        let mut iter = doc.root_element().unwrap().children();
        assert!(iter.next().is_some());
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_raw_child_iter_includes_text() {
        let doc = Document::parse(XML);
        let root = doc.root_element_id().unwrap();
        assert_eq!(doc.children(root).count(), 6);
    }
}
