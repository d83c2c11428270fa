//! Path Expression Parser
//!
//! Grammar:
//!
//! ```text
//! path      := '/'? step ('/' step)*
//! step      := name predicate? | predicate
//! name      := '*' | NameChar+
//! predicate := '[' '@' NameChar+ ( '=' quoted )? ']'
//! quoted    := "'" [^']* "'" | '"' [^"]* '"'
//! ```
//!
//! A step with no name (only a predicate) matches children of any name,
//! the same as `*`.

use crate::core::scanner::{is_name_code_point, is_name_start_code_point};
use crate::dom::{DocumentAccess, NodeId};
use crate::error::{Result, XmlError};
use std::fmt;

/// Name filter of a step
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NameTest {
    /// `*` or an empty name
    Any,
    /// Exact element name
    Name(String),
}

/// Attribute filter of a step
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Predicate {
    pub attribute: String,
    /// Required value; `None` only requires the attribute to exist
    pub value: Option<String>,
}

impl Predicate {
    pub fn matches<D: DocumentAccess>(&self, doc: &D, id: NodeId) -> bool {
        match (doc.get_attribute(id, &self.attribute), &self.value) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(actual), Some(expected)) => actual == expected,
        }
    }
}

/// One `/`-separated segment of a path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathStep {
    pub name: NameTest,
    pub predicate: Option<Predicate>,
}

impl PathStep {
    /// True if `id` is an element passing the name test and predicate
    pub fn matches<D: DocumentAccess>(&self, doc: &D, id: NodeId) -> bool {
        if !doc.get_node(id).is_some_and(|n| n.is_element()) {
            return false;
        }
        let name_ok = match &self.name {
            NameTest::Any => true,
            NameTest::Name(name) => doc.node_name(id) == Some(name.as_str()),
        };
        name_ok && self.predicate.as_ref().is_none_or(|p| p.matches(doc, id))
    }
}

/// A parsed path expression. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParsedPath {
    /// Path began with `/`: match from the document node
    pub absolute: bool,
    pub steps: Vec<PathStep>,
}

impl ParsedPath {
    /// Parse a path expression
    pub fn parse(path: &str) -> Result<Self> {
        Parser::new(path).parse()
    }

    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }
}

impl std::str::FromStr for ParsedPath {
    type Err = XmlError;

    fn from_str(s: &str) -> Result<Self> {
        ParsedPath::parse(s)
    }
}

impl fmt::Display for ParsedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 || self.absolute {
                f.write_str("/")?;
            }
            match &step.name {
                NameTest::Any if step.predicate.is_none() => f.write_str("*")?,
                NameTest::Any => {}
                NameTest::Name(name) => f.write_str(name)?,
            }
            if let Some(pred) = &step.predicate {
                write!(f, "[@{}", pred.attribute)?;
                if let Some(value) = &pred.value {
                    // pick the quote the value does not contain
                    let quote = if value.contains('\'') { '"' } else { '\'' };
                    write!(f, "={quote}{value}{quote}")?;
                }
                f.write_str("]")?;
            }
        }
        Ok(())
    }
}

/// Cursor over the path text
struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Parser { input, pos: 0 }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.input.len());
    }

    fn error(&self, reason: impl Into<String>) -> XmlError {
        XmlError::malformed_path(self.input, reason)
    }

    fn parse(mut self) -> Result<ParsedPath> {
        if self.input.is_empty() {
            return Err(self.error("empty path"));
        }

        let absolute = self.peek() == Some(b'/');
        if absolute {
            self.advance(1);
        }

        let mut steps = Vec::new();
        loop {
            steps.push(self.parse_step()?);
            match self.peek() {
                None => break,
                Some(b'/') => self.advance(1),
                Some(b'[') => return Err(self.error("only one predicate per step is supported")),
                Some(_) => return Err(self.error(format!("unexpected character at {}", self.pos))),
            }
        }

        Ok(ParsedPath { absolute, steps })
    }

    fn parse_step(&mut self) -> Result<PathStep> {
        let name = self.read_name();
        let predicate = if self.peek() == Some(b'[') {
            Some(self.parse_predicate()?)
        } else {
            None
        };

        let name = match name {
            "*" => NameTest::Any,
            "" if predicate.is_some() => NameTest::Any,
            "" => return Err(self.error(format!("missing step name at {}", self.pos))),
            name => {
                if !name.starts_with(is_name_start_code_point) {
                    return Err(self.error(format!("invalid step name {:?}", name)));
                }
                NameTest::Name(name.to_string())
            }
        };

        Ok(PathStep { name, predicate })
    }

    /// Read a run of name characters, or a lone `*`
    fn read_name(&mut self) -> &'a str {
        let rest = self.remaining();
        if rest.starts_with('*') {
            self.advance(1);
            return &rest[..1];
        }
        let len = rest
            .char_indices()
            .find(|&(_, c)| !is_name_code_point(c))
            .map_or(rest.len(), |(i, _)| i);
        self.advance(len);
        &rest[..len]
    }

    fn parse_predicate(&mut self) -> Result<Predicate> {
        self.advance(1); // '['
        if self.peek() != Some(b'@') {
            return Err(self.error("predicate must start with '@'"));
        }
        self.advance(1);

        let attribute = self.read_name();
        if !attribute.starts_with(is_name_start_code_point) {
            return Err(self.error("predicate is missing an attribute name"));
        }

        let value = match self.peek() {
            Some(b'=') => {
                self.advance(1);
                Some(self.read_quoted()?)
            }
            _ => None,
        };

        match self.peek() {
            Some(b']') => self.advance(1),
            None => return Err(self.error("unterminated predicate")),
            Some(_) => return Err(self.error(format!("unexpected character in predicate at {}", self.pos))),
        }

        Ok(Predicate {
            attribute: attribute.to_string(),
            value,
        })
    }

    fn read_quoted(&mut self) -> Result<String> {
        let quote = match self.peek() {
            Some(q @ (b'\'' | b'"')) => q,
            None => return Err(self.error("unterminated predicate")),
            Some(_) => return Err(self.error("predicate value must be quoted")),
        };
        self.advance(1);
        let rest = self.remaining();
        let Some(len) = memchr::memchr(quote, rest.as_bytes()) else {
            return Err(self.error("unterminated quoted value"));
        };
        self.advance(len + 1);
        Ok(rest[..len].to_string())
    }
}
