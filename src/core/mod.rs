//! Core XML parsing primitives
//!
//! - Scanner: SIMD-accelerated delimiter detection using memchr
//! - Entities: XML entity decoding with Cow (zero-copy when possible)
//! - Attributes: Attribute parsing and extraction

pub mod attributes;
pub mod entities;
pub mod scanner;
