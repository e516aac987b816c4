//! Query trees and their compilation into searchers.
//!
//! A [`Query`] is decoded from a JSON document (see [`decode`]), optionally
//! validated, then compiled against a [`SearchContext`] into a tree of
//! searchers.

pub mod boost;
pub mod conjunction;
pub mod decode;
pub mod pattern;
pub mod wildcard;

pub use boost::Boost;
pub use conjunction::ConjunctionQuery;
pub use decode::{parse_query, parse_query_slice, parse_query_value};
pub use wildcard::WildcardQuery;

use crate::error::Result;
use crate::search::{SearchContext, Searcher};
use serde::{Deserialize, Deserializer, Serialize};

/// One node of a query tree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Query {
    /// Intersection of all conjuncts
    Conjunction(ConjunctionQuery),
    /// Terms matching a wildcard pattern
    Wildcard(WildcardQuery),
}

impl Query {
    /// Compile this node, and everything beneath it, into a searcher.
    pub fn searcher(&self, ctx: &SearchContext<'_>) -> Result<Box<dyn Searcher>> {
        match self {
            Query::Conjunction(q) => q.searcher(ctx),
            Query::Wildcard(q) => q.searcher(ctx),
        }
    }

    /// Structural self-check that needs no index.
    pub fn validate(&self) -> Result<()> {
        match self {
            Query::Conjunction(q) => q.validate(),
            Query::Wildcard(q) => q.validate(),
        }
    }

    pub fn boost(&self) -> Option<Boost> {
        match self {
            Query::Conjunction(q) => q.boost(),
            Query::Wildcard(q) => q.boost(),
        }
    }

    pub fn set_boost(&mut self, boost: f64) {
        match self {
            Query::Conjunction(q) => q.set_boost(boost),
            Query::Wildcard(q) => q.set_boost(boost),
        }
    }

    /// Name of the node kind, as used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Query::Conjunction(_) => "conjunction",
            Query::Wildcard(_) => "wildcard",
        }
    }

    /// Encode as a JSON document value.
    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl From<ConjunctionQuery> for Query {
    fn from(q: ConjunctionQuery) -> Self {
        Query::Conjunction(q)
    }
}

impl From<WildcardQuery> for Query {
    fn from(q: WildcardQuery) -> Self {
        Query::Wildcard(q)
    }
}

impl<'de> Deserialize<'de> for Query {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        parse_query_value(&value).map_err(serde::de::Error::custom)
    }
}
