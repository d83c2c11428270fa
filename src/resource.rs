//! ResourceArc wrapper for loaded documents
//!
//! A `Document` is immutable once built, so the resource hands out shared
//! references directly; every NIF call reads it without locking.

use crate::dom::Document;
use rustler::ResourceArc;

/// A parsed document held by the BEAM
pub struct DocumentResource {
    doc: Document,
}

impl DocumentResource {
    pub fn new(doc: Document) -> Self {
        DocumentResource { doc }
    }

    /// Lenient parse of raw bytes
    pub fn parse(input: &[u8]) -> Self {
        Self::new(Document::parse(input))
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }
}

#[rustler::resource_impl]
impl rustler::Resource for DocumentResource {}

/// Type alias for document ResourceArc
pub type DocumentRef = ResourceArc<DocumentResource>;
