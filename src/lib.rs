//! xmlselect - XPath-style element selection over a parsed XML document
//!
//! Layers, bottom up:
//! - `core` / `reader`: memchr-based scanner and pull parser
//! - `dom`: arena document, borrowed `Node` handles, child iterators
//! - `path`: path parser, lazy `Selector`, find helpers, path cache,
//!   parallel selection
//! - NIF surface (`Elixir.XmlSelect.Native`) over the above
//!
//! ```
//! use xmlselect::{attribute_value, find_element, load_document, text, Selector};
//!
//! let doc = load_document(r#"<A><B id="one"><C code="1">x</C><C>y</C></B></A>"#).unwrap();
//! let a = doc.root_element().unwrap();
//!
//! let codes: Vec<_> = Selector::new(a, "B/C").unwrap().iter().map(|c| attribute_value(c, "code")).collect();
//! assert_eq!(codes, ["1", ""]);
//!
//! let c = find_element(a, "/A/B[@id='one']/C[@code='1']").unwrap();
//! assert_eq!(text(c), "x");
//! ```

use rustler::{Binary, Encoder, Env, NifResult, ResourceArc, Term};

mod core;
pub mod dom;
pub mod error;
pub mod path;
mod reader;
mod resource;
mod term;

pub use dom::{attribute_value, text, Children, Document, DocumentAccess, NamedChildren, Node, NodeId};
pub use error::{Result, XmlError};
pub use path::{find_child, find_element, select_parallel, Matches, ParsedPath, PathCache, Selector};

use resource::{DocumentRef, DocumentResource};
use term::{error_to_term, node_to_term, nodes_to_term, str_to_binary};

/// Load a document strictly. Malformed XML is an `XmlError::Document`.
pub fn load_document(xml: &str) -> Result<Document> {
    Document::parse_strict(xml.as_bytes())
}

// ============================================================================
// Allocator Configuration
// ============================================================================

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

// ============================================================================
// Document loading
// ============================================================================

/// Parse XML into a document resource
/// Lenient mode - accepts malformed XML
#[rustler::nif]
fn parse(input: Binary) -> DocumentRef {
    ResourceArc::new(DocumentResource::parse(input.as_slice()))
}

/// Parse XML in strict mode (returns {:ok, doc} or {:error, reason})
#[rustler::nif]
fn parse_strict<'a>(env: Env<'a>, input: Binary<'a>) -> NifResult<Term<'a>> {
    match Document::parse_strict(input.as_slice()) {
        Ok(doc) => {
            let arc = ResourceArc::new(DocumentResource::new(doc));
            Ok((term::ok(), arc).encode(env))
        }
        Err(e) => Ok(error_to_term(env, &e)),
    }
}

// ============================================================================
// Selection
// ============================================================================

/// Run `path` from the document node, parsing through the shared cache
fn select_nodes<'d>(doc: &'d Document, path: &str) -> Result<Matches<'d, Document>> {
    let parsed = path::cache::compile(path)?;
    Ok(Selector::from_parsed(doc.document_node(), parsed).iter())
}

/// Select elements: list of {:element, name, attrs, children} or {:error, reason}
#[rustler::nif]
fn select<'a>(env: Env<'a>, doc_ref: DocumentRef, path: &str) -> NifResult<Term<'a>> {
    match select_nodes(doc_ref.document(), path) {
        Ok(matches) => {
            let nodes: Vec<_> = matches.collect();
            Ok(nodes_to_term(env, &nodes))
        }
        Err(e) => Ok(error_to_term(env, &e)),
    }
}

/// Select elements and return the text of each
#[rustler::nif]
fn select_text<'a>(env: Env<'a>, doc_ref: DocumentRef, path: &str) -> NifResult<Term<'a>> {
    match select_nodes(doc_ref.document(), path) {
        Ok(matches) => {
            let texts: Vec<_> = matches.map(text).collect();
            let mut list = Term::list_new_empty(env);
            for s in texts.into_iter().rev() {
                list = list.list_prepend(str_to_binary(env, s));
            }
            Ok(list)
        }
        Err(e) => Ok(error_to_term(env, &e)),
    }
}

/// First selected element, or nil
#[rustler::nif(name = "find_element")]
fn find_element_nif<'a>(env: Env<'a>, doc_ref: DocumentRef, path: &str) -> NifResult<Term<'a>> {
    match select_nodes(doc_ref.document(), path) {
        Ok(mut matches) => Ok(match matches.next() {
            Some(node) => node_to_term(env, node),
            None => rustler::types::atom::nil().encode(env),
        }),
        Err(e) => Ok(error_to_term(env, &e)),
    }
}

/// Run several paths in parallel; one result per path, in order
#[rustler::nif(schedule = "DirtyCpu", name = "select_parallel")]
fn select_parallel_nif<'a>(env: Env<'a>, doc_ref: DocumentRef, paths: Vec<&str>) -> NifResult<Term<'a>> {
    let doc = doc_ref.document();
    let results = select_parallel(doc.document_node(), &paths);

    let mut list = Term::list_new_empty(env);
    for result in results.into_iter().rev() {
        let term = match result {
            Ok(nodes) => nodes_to_term(env, &nodes),
            Err(e) => error_to_term(env, &e),
        };
        list = list.list_prepend(term);
    }
    Ok(list)
}

rustler::init!("Elixir.XmlSelect.Native");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_document_strict() {
        let doc = load_document("<A><B/></A>").unwrap();
        assert_eq!(doc.root_name(), Some("A"));

        let err = load_document("<A><B></A>").unwrap_err();
        assert!(matches!(err, XmlError::Document { .. }));
        assert!(load_document("").is_err());
        assert!(load_document("<A/><B/>").is_err());
    }

    #[test]
    fn test_load_sample_with_leading_newline() {
        assert!(path::SAMPLE.starts_with("\n<?xml"));
        let doc = load_document(path::SAMPLE).unwrap();
        assert_eq!(doc.root_name(), Some("A"));
        let c = find_element(doc.document_node(), "/A/B[@id='three']/C[@code='9ABC']").unwrap();
        assert_eq!(text(c), "A-B(three)-C.9ABC");
    }

    #[test]
    fn test_load_skips_utf8_bom() {
        let doc = load_document("\u{FEFF}<?xml version=\"1.0\" encoding=\"UTF-8\"?><A/>").unwrap();
        assert_eq!(doc.root_name(), Some("A"));
        assert_eq!(Document::parse("\u{FEFF}<A/>".as_bytes()).root_name(), Some("A"));
    }

    #[test]
    fn test_lenient_survives_many_targetless_instructions() {
        let input = "<??>".repeat(50_000) + "<a/>";
        assert_eq!(Document::parse(input.as_bytes()).root_name(), Some("a"));
    }

    #[test]
    fn test_select_nodes_relative_to_document() {
        let doc = load_document("<A><B id='1'/><B id='2'/></A>").unwrap();
        let ids: Vec<_> = select_nodes(&doc, "A/B").unwrap().map(|b| attribute_value(b, "id")).collect();
        assert_eq!(ids, ["1", "2"]);
        assert_eq!(select_nodes(&doc, "/A/B[@id='2']").unwrap().count(), 1);
        assert!(select_nodes(&doc, "A/B[").is_err());
    }
}
