//! Elixir Term Conversion Utilities
//!
//! Converts selected nodes and errors to Elixir terms.

use crate::dom::{DocumentAccess, Node, NodeKind};
use crate::error::XmlError;
use rustler::{Encoder, Env, NewBinary, Term};

// Pre-defined atoms for efficiency - created once at compile time
rustler::atoms! {
    ok,
    error,
    element,
    comment,
    pi,
}

/// Convert a node to an Elixir term
///
/// Elements become `{:element, name, attrs, children}`, text and CDATA become
/// binaries, comments `{:comment, text}` and processing instructions
/// `{:pi, target}`.
pub fn node_to_term<'a, D: DocumentAccess>(env: Env<'a>, node: Node<'_, D>) -> Term<'a> {
    let doc = node.document();
    let id = node.id();

    match node.kind() {
        Some(NodeKind::Element) => {
            let name_term = str_to_binary(env, node.name());

            // build lists back to front so prepend keeps source order
            let attrs_slice = doc.attributes(id);
            let mut attrs = Term::list_new_empty(env);
            for attr in attrs_slice.iter().rev() {
                let attr_name = doc.strings().get_str(attr.name_id).unwrap_or("");
                let attr_value = doc.strings().get_str(attr.value_id).unwrap_or("");
                let attr_tuple = (str_to_binary(env, attr_name), str_to_binary(env, attr_value));
                attrs = attrs.list_prepend(attr_tuple.encode(env));
            }

            let mut children = Term::list_new_empty(env);
            let mut child_id = doc.get_node(id).and_then(|n| n.last_child);
            while let Some(cid) = child_id {
                children = children.list_prepend(node_to_term(env, Node::new(doc, cid)));
                child_id = doc.get_node(cid).and_then(|n| n.prev_sibling);
            }

            (element(), name_term, attrs, children).encode(env)
        }
        Some(NodeKind::Text | NodeKind::CData) => {
            str_to_binary(env, doc.text_content(id).unwrap_or(""))
        }
        Some(NodeKind::Comment) => {
            let content = doc.strings().get_str(doc.get_node(id).map_or(0, |n| n.name_id));
            (comment(), str_to_binary(env, content.unwrap_or(""))).encode(env)
        }
        Some(NodeKind::ProcessingInstruction) => (pi(), str_to_binary(env, node.name())).encode(env),
        Some(NodeKind::Document) => match doc.root_element_id() {
            Some(root) => node_to_term(env, Node::new(doc, root)),
            None => rustler::types::atom::nil().encode(env),
        },
        None => rustler::types::atom::nil().encode(env),
    }
}

/// Convert a list of nodes to an Elixir list of node terms
pub fn nodes_to_term<'a, D: DocumentAccess>(env: Env<'a>, nodes: &[Node<'_, D>]) -> Term<'a> {
    let mut list = Term::list_new_empty(env);
    for &node in nodes.iter().rev() {
        list = list.list_prepend(node_to_term(env, node));
    }
    list
}

/// `{:error, reason}` with the error's display text as a binary
pub fn error_to_term<'a>(env: Env<'a>, err: &XmlError) -> Term<'a> {
    (error(), str_to_binary(env, &err.to_string())).encode(env)
}

/// Convert a string to a binary term (more efficient than .encode())
#[inline]
pub fn str_to_binary<'a>(env: Env<'a>, s: &str) -> Term<'a> {
    let bytes = s.as_bytes();
    let mut binary = NewBinary::new(env, bytes.len());
    binary.as_mut_slice().copy_from_slice(bytes);
    binary.into()
}
