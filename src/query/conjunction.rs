use crate::error::{QueryError, Result};
use crate::query::Query;
use crate::query::boost::Boost;
use crate::search::{SearchContext, Searcher, SearcherSet};
use serde::Serialize;

/// Matches documents matched by every conjunct.
///
/// Conjuncts compile in order. An empty conjunction matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConjunctionQuery {
    conjuncts: Vec<Query>,
    #[serde(skip_serializing_if = "Option::is_none")]
    boost: Option<Boost>,
}

impl ConjunctionQuery {
    pub fn new(conjuncts: Vec<Query>) -> Self {
        Self {
            conjuncts,
            boost: None,
        }
    }

    pub fn with_boost(mut self, boost: f64) -> Self {
        self.set_boost(boost);
        self
    }

    pub fn set_boost(&mut self, boost: f64) {
        self.boost = Some(Boost::new(boost));
    }

    pub(crate) fn set_boost_opt(&mut self, boost: Option<Boost>) {
        self.boost = boost;
    }

    pub fn add_query(&mut self, query: impl Into<Query>) {
        self.conjuncts.push(query.into());
    }

    pub fn add_queries<I>(&mut self, queries: I)
    where
        I: IntoIterator,
        I::Item: Into<Query>,
    {
        self.conjuncts.extend(queries.into_iter().map(Into::into));
    }

    pub fn conjuncts(&self) -> &[Query] {
        &self.conjuncts
    }

    pub fn boost(&self) -> Option<Boost> {
        self.boost
    }

    /// Compile every conjunct and hand the results to the intersection builder.
    ///
    /// If conjunct `k` fails, the searchers already built for `0..k` are
    /// closed before the error is returned and later conjuncts are never
    /// compiled.
    pub fn searcher(&self, ctx: &SearchContext<'_>) -> Result<Box<dyn Searcher>> {
        if self.conjuncts.is_empty() {
            log::debug!("empty conjunction compiles to match-none");
            return Ok(ctx.factory.match_none_searcher(&ctx.options)?);
        }

        let mut built = SearcherSet::with_capacity(self.conjuncts.len());
        for (index, conjunct) in self.conjuncts.iter().enumerate() {
            match conjunct.searcher(ctx) {
                Ok(searcher) => built.push(searcher),
                Err(err) => {
                    let released = built.len();
                    let cleanup_failures = built.release();
                    if cleanup_failures > 0 {
                        log::warn!(
                            "conjunct {} failed ({}); {} of {} earlier searchers failed to release",
                            index,
                            err,
                            cleanup_failures,
                            released
                        );
                    }
                    return Err(QueryError::ChildCompile {
                        index,
                        cleanup_failures,
                        source: Box::new(err),
                    });
                }
            }
        }

        Ok(ctx
            .factory
            .intersection_searcher(built.into_inner(), &ctx.options)?)
    }

    /// Check the boost, then each conjunct in order; the first failure wins.
    pub fn validate(&self) -> Result<()> {
        if let Some(boost) = self.boost.filter(|b| !b.is_valid()) {
            return Err(QueryError::Validation(format!(
                "conjunction boost must be positive and finite, found {}",
                boost.get()
            )));
        }
        for conjunct in &self.conjuncts {
            conjunct.validate()?;
        }
        Ok(())
    }
}
