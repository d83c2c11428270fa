//! Parallel selection
//!
//! Uses Rayon to evaluate several paths against one document. The document
//! is only read, so any `DocumentAccess + Sync` implementor can be shared.
//! Paths are parsed through the process-wide cache.

use super::cache;
use super::select::Selector;
use crate::dom::{DocumentAccess, Node};
use crate::error::Result;
use rayon::prelude::*;

/// Evaluate each path from `anchor`; results come back in input order
pub fn select_parallel<'d, D>(anchor: Node<'d, D>, paths: &[&str]) -> Vec<Result<Vec<Node<'d, D>>>>
where
    D: DocumentAccess + Sync,
{
    paths
        .par_iter()
        .map(|path| {
            let parsed = cache::compile(path)?;
            Ok(Selector::from_parsed(anchor, parsed).iter().collect())
        })
        .collect()
}
