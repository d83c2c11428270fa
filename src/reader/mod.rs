//! XML Reader Module
//!
//! - SliceReader: zero-copy pull parser over a byte slice
//! - Events: XML event types for pull parsing

pub mod events;
pub mod slice;

pub use slice::SliceReader;
