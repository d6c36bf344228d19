use crate::analysis::Analyzer;
use crate::{DocId, Position, TermId};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};

/// Bijection between stemmed terms and dense term ids.
///
/// Ids are handed out by an explicit counter in first-seen order, so two
/// builds over the same corpus produce identical dictionaries. The id-ordered
/// term vector is the persisted representation.
#[derive(Debug, Default)]
pub struct TermDictionary {
    terms: Vec<String>,
    ids: HashMap<String, TermId>,
}

impl TermDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a dictionary from its persisted id-ordered term table.
    pub fn from_terms(terms: Vec<String>) -> Self {
        let ids = terms
            .iter()
            .enumerate()
            .map(|(id, term)| (term.clone(), id as TermId))
            .collect();
        Self { terms, ids }
    }

    /// Return the id for `term`, assigning the next dense id on first use.
    pub fn intern(&mut self, term: &str) -> TermId {
        if let Some(&id) = self.ids.get(term) {
            return id;
        }
        let id = self.terms.len() as TermId;
        self.terms.push(term.to_string());
        self.ids.insert(term.to_string(), id);
        id
    }

    pub fn id(&self, term: &str) -> Option<TermId> {
        self.ids.get(term).copied()
    }

    pub fn term(&self, id: TermId) -> Option<&str> {
        self.terms.get(id as usize).map(|s| s.as_str())
    }

    /// Terms in id order; index equals TermId.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Sparse positional postings: term id -> (doc id -> ascending positions).
///
/// Entries exist only for (term, doc) pairs where the term occurs. Position
/// lists are strictly increasing because positions are appended in token-scan
/// order within a single document.
#[derive(Debug, Default)]
pub struct PostingsStore {
    postings: HashMap<TermId, BTreeMap<DocId, Vec<Position>>>,
}

impl PostingsStore {
    pub fn push(&mut self, term: TermId, doc: DocId, pos: Position) {
        let list = self.postings.entry(term).or_default().entry(doc).or_default();
        debug_assert!(list.last().map_or(true, |&last| last < pos));
        list.push(pos);
    }

    /// All documents containing `term`, keyed in ascending doc-id order.
    pub fn documents(&self, term: TermId) -> Option<&BTreeMap<DocId, Vec<Position>>> {
        self.postings.get(&term)
    }

    pub fn positions(&self, term: TermId, doc: DocId) -> Option<&[Position]> {
        self.postings.get(&term)?.get(&doc).map(|v| v.as_slice())
    }

    pub fn num_terms(&self) -> usize {
        self.postings.len()
    }

    /// Flatten into rows sorted by term id then doc id, the persisted form.
    pub fn to_rows(&self) -> Vec<(TermId, Vec<(DocId, Vec<Position>)>)> {
        let mut rows: Vec<_> = self
            .postings
            .iter()
            .map(|(&tid, docs)| {
                let entries = docs.iter().map(|(&d, p)| (d, p.clone())).collect();
                (tid, entries)
            })
            .collect();
        rows.sort_by_key(|(tid, _)| *tid);
        rows
    }

    pub fn from_rows(rows: Vec<(TermId, Vec<(DocId, Vec<Position>)>)>) -> Self {
        let postings = rows
            .into_iter()
            .map(|(tid, entries)| (tid, entries.into_iter().collect()))
            .collect();
        Self { postings }
    }
}

/// An immutable positional inverted index. Built once, then read-only for
/// the lifetime of any number of queries.
#[derive(Debug)]
pub struct Index {
    pub dictionary: TermDictionary,
    pub postings: PostingsStore,
    pub num_docs: u32,
}

impl Index {
    /// Build from an ordered document stream. Documents get ids 1, 2, ...
    /// in stream order.
    ///
    /// Tokenization fans out across documents with rayon; the merge is a
    /// sequential fold in corpus order so term-id assignment stays
    /// deterministic. Merging is safe to split this way because each
    /// document contributes disjoint (term, doc) posting entries.
    pub fn build(documents: &[String], analyzer: &Analyzer) -> Index {
        let streams: Vec<Vec<(String, Position)>> =
            documents.par_iter().map(|doc| analyzer.tokenize(doc)).collect();

        let mut dictionary = TermDictionary::new();
        let mut postings = PostingsStore::default();
        for (i, stream) in streams.into_iter().enumerate() {
            let doc_id = (i + 1) as DocId;
            for (term, pos) in stream {
                let tid = dictionary.intern(&term);
                postings.push(tid, doc_id, pos);
            }
        }

        tracing::debug!(
            num_docs = documents.len(),
            num_terms = dictionary.len(),
            "index build complete"
        );
        Index { dictionary, postings, num_docs: documents.len() as u32 }
    }
}
