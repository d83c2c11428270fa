//! XML Attribute Parsing
//!
//! Parses `name="value"` pairs from the inside of a start tag.

use super::entities::{decode_text, decode_text_strict};
use super::scanner::{is_name_char, is_name_start_char, is_whitespace};
use memchr::memchr;
use std::borrow::Cow;

/// A parsed XML attribute
#[derive(Debug, Clone)]
pub struct Attribute<'a> {
    /// Attribute name (may include namespace prefix)
    pub name: Cow<'a, [u8]>,
    /// Attribute value (entities decoded)
    pub value: Cow<'a, [u8]>,
}

impl<'a> Attribute<'a> {
    pub fn new(name: &'a [u8], value: Cow<'a, [u8]>) -> Self {
        Attribute {
            name: Cow::Borrowed(name),
            value,
        }
    }

    pub fn name_str(&self) -> Option<&str> {
        std::str::from_utf8(self.name.as_ref()).ok()
    }

    pub fn value_str(&self) -> Option<&str> {
        std::str::from_utf8(self.value.as_ref()).ok()
    }
}

/// Parse attributes from raw tag content (after the element name).
///
/// Malformed pairs are skipped.
pub fn parse_attributes(input: &[u8]) -> Vec<Attribute<'_>> {
    parse_with_validation(input, false).unwrap_or_default()
}

/// Parse attributes, failing on the first malformed pair
pub fn parse_attributes_strict(input: &[u8]) -> Result<Vec<Attribute<'_>>, &'static str> {
    parse_with_validation(input, true)
}

fn parse_with_validation(input: &[u8], strict: bool) -> Result<Vec<Attribute<'_>>, &'static str> {
    let mut attrs = Vec::new();
    let mut pos = 0;

    loop {
        let before_ws = pos;
        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }
        if pos >= input.len() {
            break;
        }
        if strict && pos == before_ws && !attrs.is_empty() {
            return Err("Attributes must be separated by whitespace");
        }

        if !is_name_start_char(input[pos]) {
            if strict {
                return Err("Attribute name must start with letter, underscore, or colon");
            }
            pos += 1;
            continue;
        }

        let name_start = pos;
        while pos < input.len() && is_name_char(input[pos]) {
            pos += 1;
        }
        let name = &input[name_start..pos];

        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }
        if pos >= input.len() || input[pos] != b'=' {
            if strict {
                return Err("Attribute without value");
            }
            continue;
        }
        pos += 1;
        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }

        let quote = match input.get(pos) {
            Some(&q) if q == b'"' || q == b'\'' => q,
            _ => {
                if strict {
                    return Err("Attribute value must be quoted");
                }
                continue;
            }
        };
        pos += 1;

        let Some(len) = memchr(quote, &input[pos..]) else {
            if strict {
                return Err("Unterminated attribute value");
            }
            break;
        };
        let raw = &input[pos..pos + len];
        pos += len + 1;

        let value = if strict {
            if memchr(b'<', raw).is_some() {
                return Err("'<' not allowed in attribute value");
            }
            decode_text_strict(raw)?
        } else {
            decode_text(raw)
        };

        attrs.push(Attribute::new(name, value));
    }

    Ok(attrs)
}
