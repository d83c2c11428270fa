//! Selector / matcher engine
//!
//! A `Selector` pairs an anchor node with a parsed path. Matching is lazy:
//! `Matches` keeps one sibling cursor per step and walks the tree depth-first,
//! which yields the same nodes in the same order as expanding the frontier
//! one level at a time, without materializing any frontier.

use super::parser::{ParsedPath, PathStep};
use crate::dom::iter::element_from;
use crate::dom::{Document, DocumentAccess, Node, NodeId};
use crate::error::Result;
use std::iter::FusedIterator;
use std::sync::Arc;

/// A path bound to the node it is evaluated from
pub struct Selector<'d, D = Document> {
    anchor: Node<'d, D>,
    path: Arc<ParsedPath>,
}

impl<'d, D: DocumentAccess> Selector<'d, D> {
    /// Parse `path` and bind it to `node`. Fails only on malformed path text.
    pub fn new(node: Node<'d, D>, path: &str) -> Result<Self> {
        Ok(Self::from_parsed(node, ParsedPath::parse(path)?))
    }

    /// Bind an already parsed path to `node`
    pub fn from_parsed(node: Node<'d, D>, path: impl Into<Arc<ParsedPath>>) -> Self {
        let path = path.into();
        log::trace!("selector {} from node {}", path, node.id());
        Selector { anchor: node, path }
    }

    pub fn anchor(&self) -> Node<'d, D> {
        self.anchor
    }

    pub fn path(&self) -> &ParsedPath {
        &self.path
    }

    /// Fresh cursor over the matches. Every call starts from the beginning.
    pub fn iter(&self) -> Matches<'d, D> {
        let start = if self.path.is_absolute() {
            self.anchor.document_node()
        } else {
            self.anchor
        };
        Matches::new(start, Arc::clone(&self.path))
    }
}

impl<D> Clone for Selector<'_, D> {
    fn clone(&self) -> Self {
        Selector {
            anchor: self.anchor,
            path: Arc::clone(&self.path),
        }
    }
}

impl<'d, D: DocumentAccess> IntoIterator for &Selector<'d, D> {
    type Item = Node<'d, D>;
    type IntoIter = Matches<'d, D>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'d, D: DocumentAccess> IntoIterator for Selector<'d, D> {
    type Item = Node<'d, D>;
    type IntoIter = Matches<'d, D>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy cursor over the elements a path selects
pub struct Matches<'d, D> {
    doc: &'d D,
    path: Arc<ParsedPath>,
    /// `cursors[i]` is the next candidate for step `i`
    cursors: Vec<Option<NodeId>>,
}

impl<'d, D: DocumentAccess> Matches<'d, D> {
    fn new(start: Node<'d, D>, path: Arc<ParsedPath>) -> Self {
        let doc = start.document();
        let mut cursors = Vec::with_capacity(path.steps().len());
        // a path with no steps selects nothing
        if !path.steps().is_empty() {
            cursors.push(element_from(doc, doc.first_child(start.id())));
        }
        Matches { doc, path, cursors }
    }

    fn step(&self, level: usize) -> &PathStep {
        &self.path.steps()[level]
    }
}

impl<D> Clone for Matches<'_, D> {
    fn clone(&self) -> Self {
        Matches {
            doc: self.doc,
            path: Arc::clone(&self.path),
            cursors: self.cursors.clone(),
        }
    }
}

impl<'d, D: DocumentAccess> Iterator for Matches<'d, D> {
    type Item = Node<'d, D>;

    fn next(&mut self) -> Option<Self::Item> {
        let doc = self.doc;
        let last = self.path.steps().len().checked_sub(1)?;

        loop {
            let level = self.cursors.len().checked_sub(1)?;
            let Some(current) = self.cursors[level] else {
                self.cursors.pop();
                continue;
            };
            self.cursors[level] = element_from(doc, doc.next_sibling(current));

            if !self.step(level).matches(doc, current) {
                continue;
            }
            if level == last {
                return Some(Node::new(doc, current));
            }
            self.cursors.push(element_from(doc, doc.first_child(current)));
        }
    }
}

impl<D: DocumentAccess> FusedIterator for Matches<'_, D> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::text;
    use crate::path::SAMPLE;

    fn load() -> Document {
        Document::parse_strict(SAMPLE.as_bytes()).unwrap()
    }

    fn select<'d>(node: Node<'d>, path: &str) -> Vec<Node<'d>> {
        Selector::new(node, path).unwrap().iter().collect()
    }

    #[test]
    fn test_relative_child_descent() {
        let doc = load();
        let a = doc.root_element().unwrap();
        let cs = select(a, "B/C");
        assert_eq!(cs.len(), 5);
        assert!(cs.iter().all(|c| c.name() == "C"));
        let texts: Vec<_> = cs.iter().map(|&c| text(c)).collect();
        assert_eq!(
            texts,
            [
                "A-B(one)-C.1234",
                "A-B(one)-C.5678",
                "A-B(one)-C.9ABC",
                "A-B(three)-C.1234",
                "A-B(three)-C.9ABC",
            ]
        );
    }

    #[test]
    fn test_absolute_from_any_anchor() {
        let doc = load();
        let expected = select(doc.document_node(), "/A/B[@id='three']/C");
        assert_eq!(expected.len(), 2);
        for anchor in doc.descendants(0).filter_map(|id| doc.node(id)).filter(|n| n.is_element()) {
            assert_eq!(select(anchor, "/A/B[@id='three']/C"), expected);
        }
    }

    #[test]
    fn test_relative_from_document_node() {
        let doc = load();
        assert_eq!(select(doc.document_node(), "A/B").len(), 4);
        assert_eq!(select(doc.document_node(), "B").len(), 0);
    }

    #[test]
    fn test_wildcard_with_predicate_mixed_names() {
        let doc = load();
        let b_three = doc.root_element().unwrap().children_named("B").nth(2).unwrap();
        let found = select(b_three, "/A/B/[@code='9ABC']");
        let names: Vec<_> = found
            .iter()
            .map(|n| (n.parent().unwrap().attribute("id").unwrap(), n.name()))
            .collect();
        assert_eq!(names, [("one", "C"), ("one", "D"), ("three", "C")]);
        assert_eq!(select(b_three, "/A/B/*[@code='9ABC']"), found);
    }

    #[test]
    fn test_predicates_are_case_sensitive() {
        let doc = load();
        assert!(select(doc.document_node(), "/A/B/C[@code='9abc']").is_empty());
        assert!(select(doc.document_node(), "/A/b").is_empty());
        assert_eq!(select(doc.document_node(), "/A/B/C[@code='9ABC']").len(), 2);
    }

    #[test]
    fn test_existence_predicate_is_superset() {
        let doc = load();
        let root = doc.document_node();
        let any = select(root, "/A/B/C[@code]");
        assert_eq!(any.len(), 5);
        for value in ["1234", "5678", "9ABC", "nope"] {
            let exact = select(root, &format!("/A/B/C[@code='{value}']"));
            assert!(exact.iter().all(|n| any.contains(n)));
        }
        assert_eq!(select(root, "/A/B/D[@id]").len(), 2);
        assert_eq!(select(root, "/A/B[@org]").len(), 1);
    }

    #[test]
    fn test_missing_attribute_never_matches() {
        let doc = load();
        assert!(select(doc.document_node(), "/A/B/C[@missing='']").is_empty());
        assert!(select(doc.document_node(), "/A/B[@four]").is_empty());
    }

    #[test]
    fn test_empty_frontier_ends_iteration() {
        let doc = load();
        let mut matches = Selector::new(doc.document_node(), "/A/Z/C").unwrap().iter();
        assert!(matches.next().is_none());
        assert!(matches.next().is_none());
        assert!(select(doc.document_node(), "/Z").is_empty());
    }

    #[test]
    fn test_restartable() {
        let doc = load();
        let selector = Selector::new(doc.root_element().unwrap(), "B/C").unwrap();
        let first: Vec<_> = selector.iter().collect();
        let second: Vec<_> = (&selector).into_iter().collect();
        assert_eq!(first, second);

        let mut cursor = selector.iter();
        cursor.next();
        let rest: Vec<_> = cursor.clone().collect();
        assert_eq!(rest.len(), 4);
        assert_eq!(cursor.collect::<Vec<_>>(), rest);
    }

    #[test]
    fn test_lazy_prefix() {
        let doc = load();
        let selector = Selector::new(doc.document_node(), "/A/B/*").unwrap();
        let first_two: Vec<_> = selector.iter().take(2).map(|n| n.attribute("code")).collect();
        assert_eq!(first_two, [Some("1234"), Some("5678")]);
    }

    #[test]
    fn test_from_parsed_shared_path() {
        let doc = load();
        let path = Arc::new(ParsedPath::parse("C").unwrap());
        let total: usize = doc
            .root_element()
            .unwrap()
            .children()
            .map(|b| Selector::from_parsed(b, Arc::clone(&path)).iter().count())
            .sum();
        assert_eq!(total, 5);
    }

    #[test]
    fn test_empty_step_list_selects_nothing() {
        let doc = load();
        let path = ParsedPath {
            absolute: false,
            steps: Vec::new(),
        };
        assert_eq!(Selector::from_parsed(doc.document_node(), path).iter().count(), 0);
    }

    #[test]
    fn test_malformed_path_fails_at_construction() {
        let doc = load();
        for bad in ["", "B[@id='one'", "B[@id='one]", "B//C"] {
            let err = Selector::new(doc.document_node(), bad).err().unwrap();
            assert!(err.is_malformed_path());
        }
    }

    #[test]
    fn test_skips_non_element_children() {
        let doc = Document::parse(b"<r>t<!--c--><?pi x?><a/>u<![CDATA[v]]><a/></r>");
        assert_eq!(select(doc.document_node(), "/r/a").len(), 2);
        assert_eq!(select(doc.document_node(), "/r/*").len(), 2);
    }
}
