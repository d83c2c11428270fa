//! SIMD-accelerated XML scanning using memchr
//!
//! Delimiter searches go through memchr, which picks SSE2/AVX2/NEON
//! at runtime where available.

use memchr::{memchr, memchr3, memmem};

/// Cursor over an input buffer
pub struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    #[inline]
    pub fn new(input: &'a [u8]) -> Self {
        Scanner { input, pos: 0 }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos.min(self.input.len());
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    #[inline]
    pub fn remaining(&self) -> &'a [u8] {
        &self.input[self.pos..]
    }

    #[inline]
    pub fn slice(&self, start: usize, end: usize) -> &'a [u8] {
        &self.input[start..end]
    }

    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.input.len());
    }

    #[inline]
    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        self.remaining().starts_with(prefix)
    }

    /// Absolute position of the next `byte` at or after the cursor
    #[inline]
    pub fn find_byte(&self, byte: u8) -> Option<usize> {
        memchr(byte, self.remaining()).map(|off| self.pos + off)
    }

    /// Absolute position of the next occurrence of `needle` at or after the cursor
    #[inline]
    pub fn find_seq(&self, needle: &[u8]) -> Option<usize> {
        memmem::find(self.remaining(), needle).map(|off| self.pos + off)
    }

    /// Absolute position of the `>` closing the tag the cursor is in.
    ///
    /// A `>` inside a quoted attribute value does not close the tag.
    pub fn find_tag_end(&self) -> Option<usize> {
        let mut pos = self.pos;
        loop {
            let off = memchr3(b'>', b'"', b'\'', &self.input[pos..])?;
            let at = pos + off;
            match self.input[at] {
                b'>' => return Some(at),
                quote => {
                    let close = memchr(quote, &self.input[at + 1..])?;
                    pos = at + 1 + close + 1;
                }
            }
        }
    }
}

#[inline]
pub fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

/// True if every byte is XML whitespace (an empty slice counts)
#[inline]
pub fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(|&b| is_whitespace(b))
}

/// Byte-level name classes for the reader. Every byte of a multi-byte UTF-8
/// sequence passes; use the `char` versions below to check code points.
#[inline]
pub fn is_name_start_char(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

#[inline]
pub fn is_name_char(b: u8) -> bool {
    is_name_start_char(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}

/// `NameStartChar` per XML 1.0 section 2.3
pub fn is_name_start_code_point(c: char) -> bool {
    matches!(c,
        ':' | 'A'..='Z' | '_' | 'a'..='z' |
        '\u{C0}'..='\u{D6}' | '\u{D8}'..='\u{F6}' | '\u{F8}'..='\u{2FF}' |
        '\u{370}'..='\u{37D}' | '\u{37F}'..='\u{1FFF}' |
        '\u{200C}'..='\u{200D}' | '\u{2070}'..='\u{218F}' |
        '\u{2C00}'..='\u{2FEF}' | '\u{3001}'..='\u{D7FF}' |
        '\u{F900}'..='\u{FDCF}' | '\u{FDF0}'..='\u{FFFD}' |
        '\u{10000}'..='\u{EFFFF}'
    )
}

/// `NameChar` per XML 1.0 section 2.3
pub fn is_name_code_point(c: char) -> bool {
    is_name_start_code_point(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}' |
            '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}'
        )
}
