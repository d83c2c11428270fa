//! String Interning Pool
//!
//! Deduplicated storage for element names, attribute names and values, and
//! text content. Every string lives once in a shared byte buffer and is
//! addressed by a `u32` id. Id 0 is the empty string.

use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};

/// Interned string: (offset_in_data, length)
#[derive(Debug, Clone, Copy)]
struct StringEntry {
    offset: u32,
    len: u32,
}

/// String interning pool
///
/// Memory layout:
/// - `entries`: offset/length for each interned string id
/// - `data`: concatenated bytes of all interned strings
/// - `hash_index`: hash -> list of ids (handles rare collisions)
#[derive(Debug)]
pub struct StringPool {
    entries: Vec<StringEntry>,
    data: Vec<u8>,
    hash_index: HashMap<u64, Vec<u32>>,
}

impl Default for StringPool {
    fn default() -> Self {
        Self::new()
    }
}

impl StringPool {
    pub fn new() -> Self {
        let mut pool = StringPool {
            entries: Vec::with_capacity(256),
            data: Vec::with_capacity(4096),
            hash_index: HashMap::new(),
        };
        // Entry 0 is reserved for the empty string
        pool.entries.push(StringEntry { offset: 0, len: 0 });
        pool
    }

    #[inline]
    fn compute_hash(s: &[u8]) -> u64 {
        let mut hasher = DefaultHasher::new();
        s.hash(&mut hasher);
        hasher.finish()
    }

    /// Intern a byte string, returning its id
    pub fn intern(&mut self, s: &[u8]) -> u32 {
        if s.is_empty() {
            return 0;
        }

        let hash = Self::compute_hash(s);
        if let Some(ids) = self.hash_index.get(&hash) {
            for &id in ids {
                if self.get(id) == Some(s) {
                    return id;
                }
            }
        }

        let id = self.entries.len() as u32;
        self.entries.push(StringEntry {
            offset: self.data.len() as u32,
            len: s.len() as u32,
        });
        self.data.extend_from_slice(s);
        self.hash_index.entry(hash).or_default().push(id);
        id
    }

    /// Get the bytes for a string id
    pub fn get(&self, id: u32) -> Option<&[u8]> {
        let entry = self.entries.get(id as usize)?;
        let start = entry.offset as usize;
        self.data.get(start..start + entry.len as usize)
    }

    /// Get a string id as `&str` (None if unknown or not UTF-8)
    pub fn get_str(&self, id: u32) -> Option<&str> {
        std::str::from_utf8(self.get(id)?).ok()
    }

    /// Number of interned strings, including the reserved empty string
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_dedup() {
        let mut pool = StringPool::new();
        let a = pool.intern(b"code");
        let b = pool.intern(b"id");
        let c = pool.intern(b"code");
        assert_eq!(a, c);
        assert_ne!(a, b);
        assert_eq!(pool.get_str(a), Some("code"));
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn test_empty_string() {
        let mut pool = StringPool::new();
        assert!(pool.is_empty());
        assert_eq!(pool.intern(b""), 0);
        assert_eq!(pool.get_str(0), Some(""));
        assert_eq!(pool.get_str(99), None);
    }
}
