use crate::error::{QueryError, Result};
use crate::query::boost::Boost;
use crate::query::pattern::compile_wildcard;
use crate::search::{SearchContext, Searcher};
use parking_lot::RwLock;
use regex::Regex;
use serde::Serialize;

/// Matches documents containing a term that matches a wildcard pattern.
///
/// `*` matches any sequence of zero or more characters and `?` matches any
/// single character. An empty field means the mapping's default search
/// field, resolved at compile time.
#[derive(Debug, Default, Serialize)]
pub struct WildcardQuery {
    wildcard: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    boost: Option<Boost>,
    #[serde(skip)]
    compiled: RwLock<Option<Regex>>,
}

impl WildcardQuery {
    pub fn new(wildcard: impl Into<String>) -> Self {
        Self {
            wildcard: wildcard.into(),
            ..Default::default()
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    pub fn with_boost(mut self, boost: f64) -> Self {
        self.set_boost(boost);
        self
    }

    pub fn set_field(&mut self, field: impl Into<String>) {
        self.field = field.into();
    }

    pub fn set_boost(&mut self, boost: f64) {
        self.boost = Some(Boost::new(boost));
    }

    pub(crate) fn set_boost_opt(&mut self, boost: Option<Boost>) {
        self.boost = boost;
    }

    pub fn pattern(&self) -> &str {
        &self.wildcard
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn boost(&self) -> Option<Boost> {
        self.boost
    }

    /// Whether the automaton has been compiled and cached
    pub fn is_compiled(&self) -> bool {
        self.compiled.read().is_some()
    }

    /// The cached automaton, compiling it on first use.
    ///
    /// Concurrent first calls may each compile; they store equal automata.
    pub fn compiled(&self) -> Result<Regex> {
        if let Some(re) = self.compiled.read().as_ref() {
            log::trace!("wildcard {:?}: cached automaton", self.wildcard);
            return Ok(re.clone());
        }
        let re = compile_wildcard(&self.wildcard)?;
        *self.compiled.write() = Some(re.clone());
        Ok(re)
    }

    pub fn searcher(&self, ctx: &SearchContext<'_>) -> Result<Box<dyn Searcher>> {
        let field = if self.field.is_empty() {
            ctx.mapping.default_search_field()
        } else {
            self.field.as_str()
        };
        let automaton = self.compiled()?;
        let searcher = ctx.factory.regexp_searcher(
            &automaton,
            field,
            Boost::value_of(self.boost),
            &ctx.options,
        )?;
        Ok(searcher)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(boost) = self.boost.filter(|b| !b.is_valid()) {
            return Err(QueryError::Validation(format!(
                "wildcard {:?} boost must be positive and finite, found {}",
                self.wildcard,
                boost.get()
            )));
        }
        self.compiled().map(|_| ())
    }
}

impl Clone for WildcardQuery {
    fn clone(&self) -> Self {
        Self {
            wildcard: self.wildcard.clone(),
            field: self.field.clone(),
            boost: self.boost,
            compiled: RwLock::new(self.compiled.read().clone()),
        }
    }
}

// The compiled automaton is derived from `wildcard` and takes no part in equality.
impl PartialEq for WildcardQuery {
    fn eq(&self, other: &Self) -> bool {
        self.wildcard == other.wildcard && self.field == other.field && self.boost == other.boost
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{MemoryIndex, SearcherOptions, collect_doc_ids};

    fn index() -> MemoryIndex {
        let mut index = MemoryIndex::new("body");
        index.add_document(1, &[("body", "test"), ("title", "intro")]);
        index.add_document(2, &[("body", "toast"), ("title", "test")]);
        index.add_document(3, &[("body", "text"), ("title", "tent")]);
        index
    }

    #[test]
    fn test_compiles_lazily_and_caches() {
        let q = WildcardQuery::new("te*t");
        assert!(!q.is_compiled());
        let first = q.compiled().unwrap();
        assert!(q.is_compiled());
        let second = q.compiled().unwrap();
        assert_eq!(first.as_str(), second.as_str());
    }

    #[test]
    fn test_validate_populates_cache() {
        let q = WildcardQuery::new("a?c");
        q.validate().unwrap();
        assert!(q.is_compiled());
    }

    #[test]
    fn test_validate_rejects_non_positive_boost() {
        let q = WildcardQuery::new("a*").with_boost(0.0);
        assert!(matches!(q.validate(), Err(QueryError::Validation(_))));
    }

    #[test]
    fn test_empty_field_uses_mapping_default() {
        let index = index();
        let q = WildcardQuery::new("te*t");
        let mut s = q.searcher(&SearchContext::new(&index, &index)).unwrap();
        assert_eq!(collect_doc_ids(s.as_mut()).unwrap(), vec![1, 3]);
    }

    #[test]
    fn test_explicit_field_overrides_default() {
        let index = index();
        let q = WildcardQuery::new("te*t").with_field("title");
        let mut s = q.searcher(&SearchContext::new(&index, &index)).unwrap();
        assert_eq!(collect_doc_ids(s.as_mut()).unwrap(), vec![2, 3]);
    }

    #[test]
    fn test_boost_reaches_searcher() {
        let index = index();
        let q = WildcardQuery::new("toast").with_boost(4.0);
        let ctx = SearchContext::new(&index, &index).with_options(SearcherOptions { explain: true });
        let mut s = q.searcher(&ctx).unwrap();
        let m = s.next_match().unwrap().unwrap();
        assert_eq!(m.id, 2);
        assert_eq!(m.score, 4.0);
        assert!(m.explanation.is_some());
    }

    #[test]
    fn test_equality_ignores_cache() {
        let a = WildcardQuery::new("x*").with_field("f");
        let b = a.clone();
        a.compiled().unwrap();
        assert_eq!(a, b);
        assert!(!b.is_compiled());
        assert!(a.clone().is_compiled());
    }

    #[test]
    fn test_serialize_omits_empty_optionals() {
        let q = WildcardQuery::new("te*t");
        assert_eq!(serde_json::to_string(&q).unwrap(), r#"{"wildcard":"te*t"}"#);

        let q = WildcardQuery::new("te*t").with_field("title").with_boost(2.0);
        assert_eq!(
            serde_json::to_string(&q).unwrap(),
            r#"{"wildcard":"te*t","field":"title","boost":2.0}"#
        );
    }
}
