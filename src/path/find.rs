//! First-match helpers

use super::select::Selector;
use crate::dom::{DocumentAccess, Node};
use crate::error::Result;

/// First element `path` selects from `node`, in document order.
///
/// `Ok(None)` when nothing matches; a malformed path is an error.
pub fn find_element<'d, D: DocumentAccess>(node: Node<'d, D>, path: &str) -> Result<Option<Node<'d, D>>> {
    Ok(Selector::new(node, path)?.iter().next())
}

/// First child element named exactly `name`. No path syntax.
pub fn find_child<'d, D: DocumentAccess>(node: Node<'d, D>, name: &str) -> Option<Node<'d, D>> {
    node.first_child_named(name)
}
