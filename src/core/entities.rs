//! XML Entity Decoding
//!
//! Handles the five predefined entities (`&lt; &gt; &amp; &quot; &apos;`)
//! and numeric character references (`&#123; &#x7B;`).
//!
//! Uses Cow for zero-copy when no entities are present.

use memchr::memchr;
use std::borrow::Cow;

/// Decode text content, keeping unknown or broken references as-is
#[inline]
pub fn decode_text(input: &[u8]) -> Cow<'_, [u8]> {
    match decode(input, false) {
        Ok(decoded) => decoded,
        // lenient decoding never reports an error
        Err(_) => Cow::Borrowed(input),
    }
}

/// Decode text content, rejecting unknown entities and bad character references
pub fn decode_text_strict(input: &[u8]) -> Result<Cow<'_, [u8]>, &'static str> {
    decode(input, true)
}

fn decode(input: &[u8], strict: bool) -> Result<Cow<'_, [u8]>, &'static str> {
    // Fast path: no '&' means nothing to decode
    let Some(first) = memchr(b'&', input) else {
        return Ok(Cow::Borrowed(input));
    };

    let mut result = Vec::with_capacity(input.len());
    result.extend_from_slice(&input[..first]);
    let mut pos = first;

    while pos < input.len() {
        let Some(amp) = memchr(b'&', &input[pos..]) else {
            result.extend_from_slice(&input[pos..]);
            break;
        };
        result.extend_from_slice(&input[pos..pos + amp]);
        pos += amp;

        let Some(semi) = memchr(b';', &input[pos..]) else {
            if strict {
                return Err("Entity reference missing ';'");
            }
            result.push(b'&');
            pos += 1;
            continue;
        };

        let entity = &input[pos + 1..pos + semi];
        match decode_entity(entity) {
            Some(ch) => {
                let mut buf = [0u8; 4];
                result.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
                pos += semi + 1;
            }
            None if strict => {
                return Err(if entity.first() == Some(&b'#') {
                    "Invalid character reference"
                } else {
                    "Undefined entity reference"
                });
            }
            None => {
                result.push(b'&');
                pos += 1;
            }
        }
    }

    Ok(Cow::Owned(result))
}

/// Decode a single entity body (without `&` and `;`)
fn decode_entity(entity: &[u8]) -> Option<char> {
    match entity {
        b"lt" => Some('<'),
        b"gt" => Some('>'),
        b"amp" => Some('&'),
        b"quot" => Some('"'),
        b"apos" => Some('\''),
        [b'#', digits @ ..] => decode_char_ref(digits),
        _ => None,
    }
}

fn decode_char_ref(digits: &[u8]) -> Option<char> {
    let codepoint = match digits {
        [b'x' | b'X', hex @ ..] => u32::from_str_radix(std::str::from_utf8(hex).ok()?, 16).ok()?,
        dec => std::str::from_utf8(dec).ok()?.parse::<u32>().ok()?,
    };
    if !is_valid_xml_char(codepoint) {
        return None;
    }
    char::from_u32(codepoint)
}

/// Check if a code point is a valid XML 1.0 Char
/// Char ::= #x9 | #xA | #xD | [#x20-#xD7FF] | [#xE000-#xFFFD] | [#x10000-#x10FFFF]
#[inline]
pub fn is_valid_xml_char(codepoint: u32) -> bool {
    matches!(codepoint,
        0x9 | 0xA | 0xD |
        0x20..=0xD7FF |
        0xE000..=0xFFFD |
        0x10000..=0x10FFFF
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_entities() {
        let result = decode_text(b"Hello, World!");
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result.as_ref(), b"Hello, World!");
    }

    #[test]
    fn test_basic_entities() {
        let result = decode_text(b"&lt;hello&gt; &amp; &quot;world&quot; &apos;");
        assert_eq!(result.as_ref(), b"<hello> & \"world\" '");
    }

    #[test]
    fn test_numeric_references() {
        assert_eq!(decode_text(b"&#65;&#x42;&#X43;").as_ref(), b"ABC");
        assert_eq!(std::str::from_utf8(&decode_text(b"&#x1F600;")).unwrap(), "😀");
    }

    #[test]
    fn test_unknown_entity_lenient() {
        assert_eq!(decode_text(b"&unknown; & x").as_ref(), b"&unknown; & x");
    }

    #[test]
    fn test_strict_rejects() {
        assert!(decode_text_strict(b"&unknown;").is_err());
        assert!(decode_text_strict(b"&#0;").is_err());
        assert!(decode_text_strict(b"a & b").is_err());
        assert_eq!(decode_text_strict(b"a &amp; b").unwrap().as_ref(), b"a & b");
    }
}
