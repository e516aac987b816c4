//! # Sift - query compilation for full-text search
//!
//! Sift turns a JSON query description into a tree of executable
//! searchers. It owns the query language and its compilation; the index
//! that stores postings and the executor that drives searchers to ranked
//! results plug in through the traits in [`search`].
//!
//! ## Architecture
//!
//! - [`query`] - Query nodes, JSON decoding, validation, wildcard translation
//! - [`search`] - Searcher collaborator traits and an in-memory index
//! - [`error`] - Error type shared by decoding, validation and compilation
//!
//! ## Quick Start
//!
//! ```
//! use sift::query::parse_query;
//! use sift::search::{MemoryIndex, SearchContext, collect_doc_ids};
//!
//! let mut index = MemoryIndex::new("body");
//! index.add_document(1, &[("body", "test text"), ("title", "intro")]);
//! index.add_document(2, &[("body", "toast"), ("title", "intro")]);
//!
//! let query = parse_query(r#"{"conjuncts": [
//!     {"wildcard": "te*t"},
//!     {"wildcard": "in???", "field": "title"}
//! ]}"#).unwrap();
//! query.validate().unwrap();
//!
//! let mut searcher = query.searcher(&SearchContext::new(&index, &index)).unwrap();
//! assert_eq!(collect_doc_ids(searcher.as_mut()).unwrap(), vec![1]);
//! searcher.close().unwrap();
//! ```

pub mod error;
pub mod query;
pub mod search;

pub use error::{QueryError, Result};
pub use query::{ConjunctionQuery, Query, WildcardQuery, parse_query};
pub use search::{SearchContext, Searcher, SearcherFactory, SearcherOptions};
