//! In-memory index implementing the searcher collaborators.
//!
//! Postings are kept per field as a sorted term dictionary of roaring
//! bitmaps. Good for tests, fuzzing and small embedded corpora; no
//! persistence and no scoring beyond boosts.

use super::{
    DocId, DocumentMatch, IndexMapping, Searcher, SearcherFactory, SearcherOptions,
};
use anyhow::{Result, bail};
use regex::Regex;
use roaring::RoaringBitmap;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Terms longer than this are dropped at tokenization
const MAX_TERM_LENGTH: usize = 128;

/// Field -> term -> postings
#[derive(Debug, Default)]
pub struct MemoryIndex {
    default_field: String,
    fields: FxHashMap<String, BTreeMap<String, RoaringBitmap>>,
    closed: Arc<AtomicUsize>,
}

impl MemoryIndex {
    pub fn new(default_field: impl Into<String>) -> Self {
        Self {
            default_field: default_field.into(),
            ..Default::default()
        }
    }

    /// Tokenize each field value and index the terms under `doc_id`.
    pub fn add_document(&mut self, doc_id: DocId, fields: &[(&str, &str)]) {
        for &(field, text) in fields {
            for term in tokenize(text) {
                self.add_term(field, &term, doc_id);
            }
        }
    }

    /// Index a raw term, bypassing tokenization.
    pub fn add_term(&mut self, field: &str, term: &str, doc_id: DocId) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .entry(term.to_string())
            .or_default()
            .insert(doc_id);
    }

    /// Number of distinct terms indexed for a field
    pub fn term_count(&self, field: &str) -> usize {
        self.fields.get(field).map(|dict| dict.len()).unwrap_or(0)
    }

    /// Number of searchers built by this index that have been closed
    pub fn closed_searchers(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    fn close_guard(&self) -> CloseGuard {
        CloseGuard {
            counter: Arc::clone(&self.closed),
            closed: false,
        }
    }
}

impl IndexMapping for MemoryIndex {
    fn default_search_field(&self) -> &str {
        &self.default_field
    }
}

impl SearcherFactory for MemoryIndex {
    fn intersection_searcher(
        &self,
        children: Vec<Box<dyn Searcher>>,
        options: &SearcherOptions,
    ) -> Result<Box<dyn Searcher>> {
        Ok(Box::new(IntersectionSearcher {
            children,
            current: None,
            next_target: Some(0),
            explain: options.explain,
            guard: self.close_guard(),
        }))
    }

    fn regexp_searcher(
        &self,
        automaton: &Regex,
        field: &str,
        boost: f64,
        options: &SearcherOptions,
    ) -> Result<Box<dyn Searcher>> {
        let mut docs = RoaringBitmap::new();
        let mut matched_terms = 0usize;

        if let Some(dict) = self.fields.get(field) {
            for (term, postings) in dict {
                if automaton.is_match(term) {
                    docs |= postings;
                    matched_terms += 1;
                }
            }
        }

        log::trace!(
            "regexp {} on field {}: {} terms, {} docs",
            automaton.as_str(),
            field,
            matched_terms,
            docs.len()
        );

        let explanation = options
            .explain
            .then(|| format!("{}:{} (boost {})", field, automaton.as_str(), boost));

        Ok(Box::new(PostingsSearcher::new(
            docs.iter().collect(),
            boost,
            explanation,
            self.close_guard(),
        )))
    }

    fn match_none_searcher(&self, _options: &SearcherOptions) -> Result<Box<dyn Searcher>> {
        Ok(Box::new(PostingsSearcher::new(
            Vec::new(),
            0.0,
            None,
            self.close_guard(),
        )))
    }
}

/// Split on non-alphanumeric boundaries and lowercase.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty() && t.len() <= MAX_TERM_LENGTH)
        .map(str::to_lowercase)
}

/// Counts closes into the owning index and rejects a second close
#[derive(Debug)]
struct CloseGuard {
    counter: Arc<AtomicUsize>,
    closed: bool,
}

impl CloseGuard {
    fn close(&mut self) -> Result<()> {
        if self.closed {
            bail!("searcher already closed");
        }
        self.closed = true;
        self.counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Walks a fixed sorted doc list; every hit scores `boost`.
struct PostingsSearcher {
    docs: Vec<DocId>,
    cursor: usize,
    last: Option<DocId>,
    boost: f64,
    explanation: Option<String>,
    guard: CloseGuard,
}

impl PostingsSearcher {
    fn new(docs: Vec<DocId>, boost: f64, explanation: Option<String>, guard: CloseGuard) -> Self {
        Self {
            docs,
            cursor: 0,
            last: None,
            boost,
            explanation,
            guard,
        }
    }

    fn matched(&self, id: DocId) -> DocumentMatch {
        DocumentMatch {
            id,
            score: self.boost,
            explanation: self.explanation.clone(),
        }
    }
}

impl Searcher for PostingsSearcher {
    fn next_match(&mut self) -> Result<Option<DocumentMatch>> {
        match self.docs.get(self.cursor).copied() {
            Some(id) => {
                self.cursor += 1;
                self.last = Some(id);
                Ok(Some(self.matched(id)))
            }
            None => {
                self.last = None;
                Ok(None)
            }
        }
    }

    fn advance_to(&mut self, target: DocId) -> Result<Option<DocumentMatch>> {
        if let Some(last) = self.last.filter(|&last| last >= target) {
            return Ok(Some(self.matched(last)));
        }
        self.cursor += self.docs[self.cursor..].partition_point(|&id| id < target);
        self.next_match()
    }

    fn count(&self) -> u64 {
        self.docs.len() as u64
    }

    fn close(&mut self) -> Result<()> {
        self.guard.close()
    }
}

/// Leapfrog intersection over child searchers; score is the sum of the
/// children's scores.
struct IntersectionSearcher {
    children: Vec<Box<dyn Searcher>>,
    current: Option<DocumentMatch>,
    /// `None` once exhausted
    next_target: Option<DocId>,
    explain: bool,
    guard: CloseGuard,
}

impl IntersectionSearcher {
    fn align(&mut self, mut target: DocId) -> Result<Option<DocumentMatch>> {
        if self.children.is_empty() {
            self.next_target = None;
            return Ok(None);
        }

        'candidate: loop {
            let mut score = 0.0;
            let mut parts = Vec::new();

            for child in self.children.iter_mut() {
                match child.advance_to(target)? {
                    None => {
                        self.next_target = None;
                        self.current = None;
                        return Ok(None);
                    }
                    Some(m) if m.id > target => {
                        target = m.id;
                        continue 'candidate;
                    }
                    Some(m) => {
                        score += m.score;
                        parts.extend(m.explanation);
                    }
                }
            }

            let found = DocumentMatch {
                id: target,
                score,
                explanation: self
                    .explain
                    .then(|| format!("conjunction of [{}]", parts.join(", "))),
            };
            self.next_target = target.checked_add(1);
            self.current = Some(found.clone());
            return Ok(Some(found));
        }
    }
}

impl Searcher for IntersectionSearcher {
    fn next_match(&mut self) -> Result<Option<DocumentMatch>> {
        match self.next_target {
            Some(target) => self.align(target),
            None => Ok(None),
        }
    }

    fn advance_to(&mut self, target: DocId) -> Result<Option<DocumentMatch>> {
        if let Some(current) = self.current.as_ref().filter(|m| m.id >= target) {
            return Ok(Some(current.clone()));
        }
        match self.next_target {
            Some(next) => self.align(next.max(target)),
            None => Ok(None),
        }
    }

    fn count(&self) -> u64 {
        self.children.iter().map(|c| c.count()).min().unwrap_or(0)
    }

    fn close(&mut self) -> Result<()> {
        self.guard.close()?;
        let mut first_err = None;
        for child in self.children.iter_mut() {
            if let Err(e) = child.close() {
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
