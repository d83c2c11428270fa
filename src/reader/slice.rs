//! Zero-Copy Slice Parser
//!
//! Pull parser over a byte slice. Names and undecoded content borrow from
//! the input; only content containing entity references is copied.

use super::events::{EndElement, StartElement, XmlEvent};
use crate::core::attributes::{parse_attributes, parse_attributes_strict};
use crate::core::entities::{decode_text, decode_text_strict};
use crate::core::scanner::{is_blank, is_name_char, is_name_start_char, is_whitespace, Scanner};
use std::borrow::Cow;

/// Error recorded by the reader when it stops on malformed input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: &'static str,
    /// Byte offset where the offending construct starts
    pub offset: usize,
}

impl ParseError {
    pub fn new(message: &'static str, offset: usize) -> Self {
        ParseError { message, offset }
    }
}

/// Zero-copy XML reader from a byte slice
pub struct SliceReader<'a> {
    scanner: Scanner<'a>,
    /// Offset of the first byte after a UTF-8 BOM
    content_start: usize,
    strict: bool,
    error: Option<ParseError>,
    done: bool,
}

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

impl<'a> SliceReader<'a> {
    /// Create a new slice reader (lenient mode)
    pub fn new(input: &'a [u8]) -> Self {
        let mut scanner = Scanner::new(input);
        // Skip UTF-8 BOM if present; offsets stay relative to `input`
        let content_start = if input.starts_with(UTF8_BOM) { UTF8_BOM.len() } else { 0 };
        scanner.set_position(content_start);
        SliceReader {
            scanner,
            content_start,
            strict: false,
            error: None,
            done: false,
        }
    }

    /// Create a new slice reader in strict mode
    pub fn new_strict(input: &'a [u8]) -> Self {
        SliceReader {
            strict: true,
            ..Self::new(input)
        }
    }

    /// Byte offset of the next construct to be read
    pub fn position(&self) -> usize {
        self.scanner.position()
    }

    /// Error that stopped the reader, if any
    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    fn fail(&mut self, message: &'static str, offset: usize) -> Option<XmlEvent<'a>> {
        self.error = Some(ParseError::new(message, offset));
        self.done = true;
        None
    }

    /// Get the next XML event
    pub fn next_event(&mut self) -> Option<XmlEvent<'a>> {
        loop {
            if self.done {
                return None;
            }
            if self.scanner.is_eof() {
                self.done = true;
                return Some(XmlEvent::EndDocument);
            }

            let start = self.scanner.position();
            let event = if self.scanner.peek() != Some(b'<') {
                self.read_text(start)
            } else if self.scanner.starts_with(b"<?") {
                self.read_processing_instruction(start)
            } else if self.scanner.starts_with(b"<!--") {
                self.read_comment(start)
            } else if self.scanner.starts_with(b"<![CDATA[") {
                self.read_cdata(start)
            } else if self.scanner.starts_with(b"<!DOCTYPE") {
                self.read_doctype(start)
            } else if self.scanner.starts_with(b"</") {
                self.read_end_tag(start)
            } else {
                self.read_start_tag(start)
            };

            // None without `done` means the construct was skipped
            if event.is_some() || self.done {
                return event;
            }
        }
    }

    fn read_text(&mut self, start: usize) -> Option<XmlEvent<'a>> {
        let end = self
            .scanner
            .find_byte(b'<')
            .unwrap_or(start + self.scanner.remaining().len());
        let raw = self.scanner.slice(start, end);
        self.scanner.set_position(end);

        let content = if self.strict {
            if memchr::memmem::find(raw, b"]]>").is_some() {
                return self.fail("']]>' not allowed in text content", start);
            }
            match decode_text_strict(raw) {
                Ok(content) => content,
                Err(msg) => return self.fail(msg, start),
            }
        } else {
            decode_text(raw)
        };
        Some(XmlEvent::Text(content))
    }

    fn read_comment(&mut self, start: usize) -> Option<XmlEvent<'a>> {
        self.scanner.advance(4);
        let Some(end) = self.scanner.find_seq(b"-->") else {
            return self.fail("Unterminated comment", start);
        };
        let content = self.scanner.slice(start + 4, end);
        if self.strict && memchr::memmem::find(content, b"--").is_some() {
            return self.fail("'--' not allowed inside comment", start);
        }
        self.scanner.set_position(end + 3);
        Some(XmlEvent::Comment(Cow::Borrowed(content)))
    }

    fn read_cdata(&mut self, start: usize) -> Option<XmlEvent<'a>> {
        self.scanner.advance(9);
        let Some(end) = self.scanner.find_seq(b"]]>") else {
            return self.fail("Unterminated CDATA section", start);
        };
        let content = self.scanner.slice(start + 9, end);
        self.scanner.set_position(end + 3);
        Some(XmlEvent::CData(Cow::Borrowed(content)))
    }

    fn read_processing_instruction(&mut self, start: usize) -> Option<XmlEvent<'a>> {
        self.scanner.advance(2);
        let Some(end) = self.scanner.find_seq(b"?>") else {
            return self.fail("Unterminated processing instruction", start);
        };
        let body = self.scanner.slice(start + 2, end);
        self.scanner.set_position(end + 2);

        let name_len = body.iter().take_while(|&&b| is_name_char(b)).count();
        let (target, rest) = body.split_at(name_len);
        if target.is_empty() || !is_name_start_char(target[0]) {
            if self.strict {
                return self.fail("Processing instruction without target", start);
            }
            return None;
        }
        if target.eq_ignore_ascii_case(b"xml") {
            // only whitespace may precede the declaration
            if self.strict && !is_blank(self.scanner.slice(self.content_start, start)) {
                return self.fail("XML declaration allowed only at the start of the document", start);
            }
            let data_start = rest.iter().take_while(|&&b| is_whitespace(b)).count();
            let attrs = parse_attributes(&rest[data_start..]);
            let find = |name: &[u8]| {
                attrs
                    .iter()
                    .find(|a| a.name.as_ref() == name)
                    .map(|a| a.value.clone())
            };
            return Some(XmlEvent::XmlDeclaration {
                version: find(b"version").unwrap_or(Cow::Borrowed(b"1.0")),
                encoding: find(b"encoding"),
            });
        }

        Some(XmlEvent::ProcessingInstruction {
            target: Cow::Borrowed(target),
        })
    }

    fn read_doctype(&mut self, start: usize) -> Option<XmlEvent<'a>> {
        // Skip to the '>' that closes the declaration, stepping over the
        // internal subset and quoted literals.
        let input = self.scanner.remaining();
        let mut depth = 0usize;
        let mut quote: Option<u8> = None;
        let mut close = None;
        for (i, &b) in input.iter().enumerate().skip(9) {
            match (quote, b) {
                (Some(q), _) if b == q => quote = None,
                (Some(_), _) => {}
                (None, b'"' | b'\'') => quote = Some(b),
                (None, b'[') => depth += 1,
                (None, b']') => depth = depth.saturating_sub(1),
                (None, b'>') if depth == 0 => {
                    close = Some(i);
                    break;
                }
                _ => {}
            }
        }
        let Some(close) = close else {
            return self.fail("Unterminated DOCTYPE declaration", start);
        };
        let content = self.scanner.slice(start + 9, start + close);
        self.scanner.set_position(start + close + 1);
        Some(XmlEvent::DocType(Cow::Borrowed(content)))
    }

    fn read_end_tag(&mut self, start: usize) -> Option<XmlEvent<'a>> {
        let Some(end) = self.scanner.find_byte(b'>') else {
            return self.fail("Unterminated end tag", start);
        };
        let inner = self.scanner.slice(start + 2, end);
        self.scanner.set_position(end + 1);

        let name_len = inner.iter().take_while(|&&b| is_name_char(b)).count();
        let (name, rest) = inner.split_at(name_len);
        if self.strict && (name.is_empty() || !rest.iter().all(|&b| is_whitespace(b))) {
            return self.fail("Malformed end tag", start);
        }
        Some(XmlEvent::EndElement(EndElement::new(name, start)))
    }

    fn read_start_tag(&mut self, start: usize) -> Option<XmlEvent<'a>> {
        let Some(end) = self.scanner.find_tag_end() else {
            return self.fail("Unterminated start tag", start);
        };
        let mut inner = self.scanner.slice(start + 1, end);
        self.scanner.set_position(end + 1);

        let is_empty = inner.last() == Some(&b'/');
        if is_empty {
            inner = &inner[..inner.len() - 1];
        }

        let name_len = inner.iter().take_while(|&&b| is_name_char(b)).count();
        let (name, attr_content) = inner.split_at(name_len);
        if name.is_empty() || !is_name_start_char(name[0]) {
            if self.strict {
                return self.fail("Invalid element name", start);
            }
            // Not a tag after all: surface the raw markup as text
            return Some(XmlEvent::Text(Cow::Borrowed(self.scanner.slice(start, end + 1))));
        }

        let attributes = if self.strict {
            if attr_content.first().is_some_and(|&b| !is_whitespace(b)) {
                return self.fail("Invalid character in element name", start);
            }
            match parse_attributes_strict(attr_content) {
                Ok(attrs) => attrs,
                Err(msg) => return self.fail(msg, start),
            }
        } else {
            parse_attributes(attr_content)
        };

        let elem = StartElement::new(name, attributes, start);
        Some(if is_empty {
            XmlEvent::EmptyElement(elem)
        } else {
            XmlEvent::StartElement(elem)
        })
    }
}

impl<'a> Iterator for SliceReader<'a> {
    type Item = XmlEvent<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_event()? {
            XmlEvent::EndDocument => None,
            event => Some(event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_element() {
        let events: Vec<_> = SliceReader::new(b"<root>hello</root>").collect();
        assert_eq!(events.len(), 3);

        assert!(matches!(&events[0], XmlEvent::StartElement(e) if e.name_str() == Some("root")));
        assert!(matches!(&events[1], XmlEvent::Text(t) if t.as_ref() == b"hello"));
        assert!(matches!(&events[2], XmlEvent::EndElement(e) if e.name_str() == Some("root")));
    }

    #[test]
    fn test_empty_element() {
        let events: Vec<_> = SliceReader::new(b"<D code=\"9ABC\" id=\"dd\" />").collect();
        assert_eq!(events.len(), 1);
        if let XmlEvent::EmptyElement(e) = &events[0] {
            assert_eq!(e.name_str(), Some("D"));
            assert_eq!(e.get_attribute_value("code"), Some("9ABC"));
            assert_eq!(e.get_attribute_value("id"), Some("dd"));
        } else {
            panic!("Expected EmptyElement");
        }
    }

    #[test]
    fn test_cdata_and_comment() {
        let events: Vec<_> =
            SliceReader::new(b"<C><!-- note --><![CDATA[a<b>&c]]></C>").collect();
        assert_eq!(events.len(), 4);
        assert!(matches!(&events[1], XmlEvent::Comment(c) if c.as_ref() == b" note "));
        assert!(matches!(&events[2], XmlEvent::CData(c) if c.as_ref() == b"a<b>&c"));
    }

    #[test]
    fn test_declaration_and_doctype() {
        let input = b"<?xml version=\"1.0\" encoding=\"UTF-8\"?><!DOCTYPE A [<!ELEMENT A ANY>]><A/>";
        let events: Vec<_> = SliceReader::new_strict(input).collect();
        assert_eq!(events.len(), 3);
        assert!(matches!(
            &events[0],
            XmlEvent::XmlDeclaration { encoding: Some(e), .. } if e.as_ref() == b"UTF-8"
        ));
        assert!(matches!(&events[1], XmlEvent::DocType(_)));
        assert!(matches!(&events[2], XmlEvent::EmptyElement(_)));
    }

    #[test]
    fn test_skips_utf8_bom() {
        let input = b"\xEF\xBB\xBF<?xml version=\"1.0\"?><A/>";
        let mut reader = SliceReader::new_strict(input);
        assert_eq!(reader.position(), 3);
        assert!(matches!(reader.next_event(), Some(XmlEvent::XmlDeclaration { .. })));
        assert!(matches!(reader.next_event(), Some(XmlEvent::EmptyElement(e)) if e.offset == 24));
    }

    #[test]
    fn test_declaration_after_leading_whitespace() {
        let events: Vec<_> = SliceReader::new_strict(b"\n\t<?xml version=\"1.0\"?><A/>").collect();
        assert!(matches!(&events[0], XmlEvent::Text(t) if t.as_ref() == b"\n\t"));
        assert!(matches!(&events[1], XmlEvent::XmlDeclaration { .. }));

        let mut reader = SliceReader::new_strict(b"<!--c--><?xml version=\"1.0\"?><A/>");
        while reader.next_event().is_some() {}
        assert_eq!(reader.error().map(|e| e.offset), Some(8));
    }

    #[test]
    fn test_many_targetless_instructions_skipped() {
        let input = "<??>".repeat(50_000) + "<a/>";
        let events: Vec<_> = SliceReader::new(input.as_bytes()).collect();
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], XmlEvent::EmptyElement(e) if e.name_str() == Some("a")));
    }

    #[test]
    fn test_processing_instruction() {
        let events: Vec<_> = SliceReader::new(b"<?style href=\"a.css\"?><a/>").collect();
        assert!(matches!(
            &events[0],
            XmlEvent::ProcessingInstruction { target } if target.as_ref() == b"style"
        ));
    }

    #[test]
    fn test_text_entities_decoded() {
        let events: Vec<_> = SliceReader::new(b"<a>x &lt; y</a>").collect();
        assert!(matches!(&events[1], XmlEvent::Text(t) if t.as_ref() == b"x < y"));
    }

    #[test]
    fn test_strict_unterminated_tag() {
        let mut reader = SliceReader::new_strict(b"<root><child attr=\"x\"");
        while reader.next_event().is_some() {}
        let err = reader.error().unwrap();
        assert_eq!(err.message, "Unterminated start tag");
        assert_eq!(err.offset, 6);
    }

    #[test]
    fn test_strict_unterminated_comment() {
        let mut reader = SliceReader::new_strict(b"<a><!-- open");
        while reader.next_event().is_some() {}
        assert_eq!(reader.error().map(|e| e.message), Some("Unterminated comment"));
    }

    #[test]
    fn test_lenient_bad_tag_becomes_text() {
        let events: Vec<_> = SliceReader::new(b"<a>1 <2 ok></a>").collect();
        assert!(events
            .iter()
            .any(|e| matches!(e, XmlEvent::Text(t) if t.as_ref() == b"<2 ok>")));
    }
}
