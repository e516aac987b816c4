//! Searcher collaborators.
//!
//! Query nodes compile into trees of [`Searcher`]s but never evaluate them.
//! The index side supplies the field mapping ([`IndexMapping`]) and the
//! builders for concrete searchers ([`SearcherFactory`]). [`memory`] is an
//! in-memory implementation of both.

pub mod memory;

use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub use memory::MemoryIndex;

/// Unique identifier for a document in the index
pub type DocId = u32;

/// A single document produced by a searcher
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentMatch {
    pub id: DocId,
    pub score: f64,
    /// Present only when the searcher was built with `explain` set
    pub explanation: Option<String>,
}

/// An executable search iterator.
///
/// Documents are produced in ascending id order. Searchers hold index
/// resources until [`Searcher::close`] is called; whoever owns a searcher
/// must close it exactly once.
pub trait Searcher: Send {
    /// Return the next matching document, or `None` once exhausted.
    fn next_match(&mut self) -> Result<Option<DocumentMatch>>;

    /// Position on the first document with id >= `target` and return it.
    ///
    /// If the last returned document already satisfies the bound it is
    /// returned again.
    fn advance_to(&mut self, target: DocId) -> Result<Option<DocumentMatch>>;

    /// Upper bound on the number of documents this searcher can produce.
    fn count(&self) -> u64;

    /// Release index resources held by this searcher.
    fn close(&mut self) -> Result<()>;
}

/// Mapping information consulted at compile time.
pub trait IndexMapping {
    /// Field searched by nodes that don't name one.
    fn default_search_field(&self) -> &str;
}

/// Builders for the concrete searchers a query tree compiles into.
pub trait SearcherFactory {
    /// Build a searcher matching documents matched by every child.
    ///
    /// Ownership of `children` moves into the factory, including on error.
    fn intersection_searcher(
        &self,
        children: Vec<Box<dyn Searcher>>,
        options: &SearcherOptions,
    ) -> Result<Box<dyn Searcher>>;

    /// Build a searcher over every term of `field` matched by `automaton`.
    fn regexp_searcher(
        &self,
        automaton: &Regex,
        field: &str,
        boost: f64,
        options: &SearcherOptions,
    ) -> Result<Box<dyn Searcher>>;

    /// Build a searcher that matches no documents.
    fn match_none_searcher(&self, options: &SearcherOptions) -> Result<Box<dyn Searcher>>;
}

/// Options threaded through every compile call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearcherOptions {
    /// Ask searchers to attach an explanation to each match
    pub explain: bool,
}

/// Everything a query node needs to compile into a searcher.
#[derive(Clone, Copy)]
pub struct SearchContext<'a> {
    pub mapping: &'a dyn IndexMapping,
    pub factory: &'a dyn SearcherFactory,
    pub options: SearcherOptions,
}

impl<'a> SearchContext<'a> {
    pub fn new(mapping: &'a dyn IndexMapping, factory: &'a dyn SearcherFactory) -> Self {
        Self {
            mapping,
            factory,
            options: SearcherOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SearcherOptions) -> Self {
        self.options = options;
        self
    }
}

/// Searchers built so far for a composite node.
///
/// Anything still held when the set is released or dropped gets closed.
/// [`SearcherSet::into_inner`] hands the searchers off without closing them.
#[derive(Default)]
pub struct SearcherSet {
    searchers: Vec<Box<dyn Searcher>>,
}

impl SearcherSet {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            searchers: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, searcher: Box<dyn Searcher>) {
        self.searchers.push(searcher);
    }

    pub fn len(&self) -> usize {
        self.searchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.searchers.is_empty()
    }

    /// Close every held searcher, in build order.
    ///
    /// Close failures are logged and counted, never propagated.
    pub fn release(mut self) -> usize {
        self.close_all()
    }

    /// Take the searchers out of the set; the caller now owns their release.
    pub fn into_inner(mut self) -> Vec<Box<dyn Searcher>> {
        std::mem::take(&mut self.searchers)
    }

    fn close_all(&mut self) -> usize {
        let mut failures = 0;
        for (index, mut searcher) in self.searchers.drain(..).enumerate() {
            if let Err(e) = searcher.close() {
                failures += 1;
                log::warn!("failed to release searcher {}: {:#}", index, e);
            }
        }
        failures
    }
}

impl Drop for SearcherSet {
    fn drop(&mut self) {
        self.close_all();
    }
}

/// Drain a searcher into its matching document ids.
pub fn collect_doc_ids(searcher: &mut dyn Searcher) -> Result<Vec<DocId>> {
    let mut ids = Vec::new();
    while let Some(m) = searcher.next_match()? {
        ids.push(m.id);
    }
    Ok(ids)
}
