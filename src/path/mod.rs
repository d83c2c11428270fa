//! Path queries over a document
//!
//! Supported syntax is a small XPath subset: child steps by name, `*` or an
//! empty name for any child, at most one `[@attr]` / `[@attr='value']`
//! predicate per step, and a leading `/` to anchor at the document node.
//!
//! - `parser` turns path text into a `ParsedPath`
//! - `select` evaluates it lazily from an anchor node
//! - `find` wraps the first match
//! - `cache` keeps parsed paths keyed by their text
//! - `parallel` evaluates several paths against one document with rayon

pub mod cache;
pub mod find;
pub mod parallel;
pub mod parser;
pub mod select;

pub use cache::PathCache;
pub use find::{find_child, find_element};
pub use parallel::select_parallel;
pub use parser::{NameTest, ParsedPath, PathStep, Predicate};
pub use select::{Matches, Selector};

#[cfg(test)]
pub(crate) const SAMPLE: &str = r#"
<?xml version="1.0" encoding="UTF-8"?>
<A>
	<B id="one">
		<C code="1234">
			A-B(one)-C.1234
		</C>
		<C code="5678">
			<![CDATA[A-B(one)-C.5678]]>
		</C>
		<C code="9ABC">A-B(one)-C.9ABC</C>
		<D code="9ABC" id="dd" />
	</B>
	<B id="two">
		<D id="dd" />
	</B>
	<B id="three" org="extern">
		<C code="1234">
			A-B(three)-C.1234
		</C>
		<C code="9ABC">A-B(three)-C.9ABC</C>
		<D description="A-B(three)-D.9ABC" />
	</B>
	<B id="four">
	</B>
</A>
"#;
