use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::concurrent_map::StripedMap;
use crate::error::SearchError;
use crate::query::Query;
use crate::tokenizer;
use crate::DocumentId;

/// Upper bound on the number of documents a single query returns.
pub const MAX_RESULT_DOCUMENT_COUNT: usize = 5;

/// Relevance values closer than this are treated as tied and broken by rating.
const RELEVANCE_EPSILON: f64 = 1e-6;

/// Bucket count for the striped relevance accumulator on the parallel path.
/// Sized for per-term fan-out within one query, not for the corpus.
const ACCUMULATOR_BUCKET_COUNT: usize = 3;

/// Lifecycle tag attached to every document. Opaque to ranking; queries
/// filter on it through the predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentStatus {
    Actual,
    Irrelevant,
    Banned,
    Removed,
}

/// A ranked query hit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub id: DocumentId,
    pub relevance: f64,
    pub rating: i32,
}

#[derive(Debug, Clone, Copy)]
struct DocumentData {
    rating: i32,
    status: DocumentStatus,
}

/// In-memory inverted index with TF-IDF ranking.
///
/// Two postings tables are kept in sync: word-indexed for scoring and
/// document-indexed for matching and removal. Every mutation updates both
/// under the same `&mut self` borrow, so readers never observe a half-applied
/// pair.
pub struct SearchIndex {
    stop_words: BTreeSet<String>,
    word_to_document_freqs: BTreeMap<String, BTreeMap<DocumentId, f64>>,
    document_to_word_freqs: BTreeMap<DocumentId, BTreeMap<String, f64>>,
    documents: BTreeMap<DocumentId, DocumentData>,
}

impl SearchIndex {
    /// Builds an index with the given stop words. Empty entries are dropped;
    /// a stop word with a control character fails with `InvalidToken`.
    pub fn new<I, S>(stop_words: I) -> Result<Self, SearchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut unique = BTreeSet::new();
        for word in stop_words {
            let word = word.as_ref();
            if word.is_empty() {
                continue;
            }
            if !tokenizer::is_valid_word(word) {
                return Err(SearchError::InvalidToken(word.to_owned()));
            }
            unique.insert(word.to_owned());
        }
        Ok(Self {
            stop_words: unique,
            word_to_document_freqs: BTreeMap::new(),
            document_to_word_freqs: BTreeMap::new(),
            documents: BTreeMap::new(),
        })
    }

    /// Convenience constructor: stop words given as one whitespace-separated
    /// string.
    pub fn from_stop_words_text(text: &str) -> Result<Self, SearchError> {
        Self::new(tokenizer::split_into_words(text))
    }

    /// Registers a document and indexes its words.
    ///
    /// Term frequency for each distinct non-stop word is its occurrence count
    /// divided by the document's total non-stop word count. A document whose
    /// text is all stop words (or empty) is registered with no postings.
    pub fn add_document(
        &mut self,
        document_id: DocumentId,
        text: &str,
        status: DocumentStatus,
        ratings: &[i32],
    ) -> Result<(), SearchError> {
        if document_id < 0 || self.documents.contains_key(&document_id) {
            return Err(SearchError::InvalidDocument(document_id));
        }
        let words = self.split_into_words_no_stop(text)?;
        if !words.is_empty() {
            let inv_word_count = 1.0 / words.len() as f64;
            for word in words {
                *self
                    .document_to_word_freqs
                    .entry(document_id)
                    .or_default()
                    .entry(word.clone())
                    .or_insert(0.0) += inv_word_count;
                *self
                    .word_to_document_freqs
                    .entry(word)
                    .or_default()
                    .entry(document_id)
                    .or_insert(0.0) += inv_word_count;
            }
        }
        self.documents.insert(
            document_id,
            DocumentData { rating: average_rating(ratings), status },
        );
        tracing::debug!(document_id, "document added");
        Ok(())
    }

    /// Removes a document and all its postings. No-op when the id is absent.
    pub fn remove_document(&mut self, document_id: DocumentId) {
        if self.documents.remove(&document_id).is_none() {
            return;
        }
        // The document-indexed table names exactly the words to touch; the
        // word keys are collected before the postings table is mutated.
        if let Some(word_freqs) = self.document_to_word_freqs.remove(&document_id) {
            for word in word_freqs.keys() {
                let now_empty = match self.word_to_document_freqs.get_mut(word) {
                    Some(postings) => {
                        postings.remove(&document_id);
                        postings.is_empty()
                    }
                    None => false,
                };
                if now_empty {
                    self.word_to_document_freqs.remove(word);
                }
            }
        }
        tracing::debug!(document_id, "document removed");
    }

    /// Word → term-frequency mapping for one document; empty when the id is
    /// absent.
    pub fn word_frequencies(&self, document_id: DocumentId) -> BTreeMap<String, f64> {
        self.document_to_word_freqs
            .get(&document_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// All present document ids, ascending.
    pub fn document_ids(&self) -> impl Iterator<Item = DocumentId> + '_ {
        self.documents.keys().copied()
    }

    /// Top-K search over documents with `Actual` status.
    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<ScoredDocument>, SearchError> {
        self.find_top_documents_with_status(raw_query, DocumentStatus::Actual)
    }

    /// Top-K search filtered by exact status.
    pub fn find_top_documents_with_status(
        &self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<ScoredDocument>, SearchError> {
        self.find_top_documents_filtered(raw_query, move |_, document_status, _| {
            document_status == status
        })
    }

    /// Top-K search with an arbitrary `(id, status, rating)` predicate.
    ///
    /// Per plus-term with postings, IDF is `ln(documents / documents
    /// containing the term)`; every posting passing the predicate adds
    /// `tf * idf` to its document's relevance. Documents holding any
    /// minus-term are then excluded unconditionally, predicate or not.
    /// Results are sorted by descending relevance, ties within 1e-6 broken by
    /// descending rating, and truncated to [`MAX_RESULT_DOCUMENT_COUNT`].
    pub fn find_top_documents_filtered<P>(
        &self,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<ScoredDocument>, SearchError>
    where
        P: Fn(DocumentId, DocumentStatus, i32) -> bool,
    {
        let query = Query::parse(raw_query, &self.stop_words)?;
        let mut matched = self.find_all_documents(&query, predicate);
        sort_and_truncate(&mut matched);
        Ok(matched)
    }

    /// Parallel form of [`find_top_documents`]. Same contract, same results.
    pub fn find_top_documents_par(
        &self,
        raw_query: &str,
    ) -> Result<Vec<ScoredDocument>, SearchError> {
        self.find_top_documents_par_with_status(raw_query, DocumentStatus::Actual)
    }

    /// Parallel form of [`find_top_documents_with_status`].
    pub fn find_top_documents_par_with_status(
        &self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<ScoredDocument>, SearchError> {
        self.find_top_documents_par_filtered(raw_query, move |_, document_status, _| {
            document_status == status
        })
    }

    /// Parallel form of [`find_top_documents_filtered`]: plus-term
    /// accumulation fans out over rayon, serialized per document through a
    /// [`StripedMap`] accumulator.
    pub fn find_top_documents_par_filtered<P>(
        &self,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<ScoredDocument>, SearchError>
    where
        P: Fn(DocumentId, DocumentStatus, i32) -> bool + Sync,
    {
        let query = Query::parse(raw_query, &self.stop_words)?;
        let mut matched = self.find_all_documents_par(&query, predicate);
        sort_and_truncate(&mut matched);
        Ok(matched)
    }

    /// Which plus-terms of `raw_query` occur in document `document_id`,
    /// lexicographically ordered and borrowed from the index, plus the
    /// document's status.
    ///
    /// If any minus-term occurs in the document the term list is empty: the
    /// document is excluded by the query, but its status is still reported.
    pub fn match_document(
        &self,
        raw_query: &str,
        document_id: DocumentId,
    ) -> Result<(Vec<&str>, DocumentStatus), SearchError> {
        let data = self
            .documents
            .get(&document_id)
            .ok_or(SearchError::DocumentNotFound(document_id))?;
        let query = Query::parse(raw_query, &self.stop_words)?;

        let excluded = query.minus_words.iter().any(|word| {
            self.word_to_document_freqs
                .get(word)
                .is_some_and(|postings| postings.contains_key(&document_id))
        });
        let matched_words = if excluded {
            Vec::new()
        } else {
            query
                .plus_words
                .iter()
                .filter_map(|word| {
                    self.word_to_document_freqs
                        .get_key_value(word.as_str())
                        .filter(|(_, postings)| postings.contains_key(&document_id))
                        .map(|(key, _)| key.as_str())
                })
                .collect()
        };
        Ok((matched_words, data.status))
    }

    fn split_into_words_no_stop(&self, text: &str) -> Result<Vec<String>, SearchError> {
        let mut words = Vec::new();
        for word in tokenizer::split_into_words(text) {
            if !tokenizer::is_valid_word(word) {
                return Err(SearchError::InvalidToken(word.to_owned()));
            }
            if !self.stop_words.contains(word) {
                words.push(word.to_owned());
            }
        }
        Ok(words)
    }

    fn inverse_document_freq(&self, postings: &BTreeMap<DocumentId, f64>) -> f64 {
        (self.documents.len() as f64 / postings.len() as f64).ln()
    }

    fn find_all_documents<P>(&self, query: &Query, predicate: P) -> Vec<ScoredDocument>
    where
        P: Fn(DocumentId, DocumentStatus, i32) -> bool,
    {
        let mut relevance: BTreeMap<DocumentId, f64> = BTreeMap::new();
        for word in &query.plus_words {
            let Some(postings) = self.word_to_document_freqs.get(word) else {
                continue;
            };
            let idf = self.inverse_document_freq(postings);
            for (&document_id, &term_freq) in postings {
                let Some(data) = self.documents.get(&document_id) else {
                    continue;
                };
                if predicate(document_id, data.status, data.rating) {
                    *relevance.entry(document_id).or_insert(0.0) += term_freq * idf;
                }
            }
        }
        for word in &query.minus_words {
            if let Some(postings) = self.word_to_document_freqs.get(word) {
                for &document_id in postings.keys() {
                    relevance.remove(&document_id);
                }
            }
        }
        self.collect_scored(relevance)
    }

    fn find_all_documents_par<P>(&self, query: &Query, predicate: P) -> Vec<ScoredDocument>
    where
        P: Fn(DocumentId, DocumentStatus, i32) -> bool + Sync,
    {
        let relevance: StripedMap<f64> = StripedMap::new(ACCUMULATOR_BUCKET_COUNT);
        query.plus_words.par_iter().for_each(|word| {
            let Some(postings) = self.word_to_document_freqs.get(word) else {
                return;
            };
            let idf = self.inverse_document_freq(postings);
            for (&document_id, &term_freq) in postings {
                let Some(data) = self.documents.get(&document_id) else {
                    continue;
                };
                if predicate(document_id, data.status, data.rating) {
                    relevance.access(document_id, |value| *value += term_freq * idf);
                }
            }
        });
        for word in &query.minus_words {
            if let Some(postings) = self.word_to_document_freqs.get(word) {
                for &document_id in postings.keys() {
                    relevance.erase(document_id);
                }
            }
        }
        self.collect_scored(relevance.snapshot())
    }

    fn collect_scored(&self, relevance: BTreeMap<DocumentId, f64>) -> Vec<ScoredDocument> {
        relevance
            .into_iter()
            .filter_map(|(id, relevance)| {
                self.documents
                    .get(&id)
                    .map(|data| ScoredDocument { id, relevance, rating: data.rating })
            })
            .collect()
    }
}

fn average_rating(ratings: &[i32]) -> i32 {
    if ratings.is_empty() {
        return 0;
    }
    // Summed in i64 so extreme ratings cannot overflow before the division.
    let sum: i64 = ratings.iter().map(|&rating| i64::from(rating)).sum();
    (sum / ratings.len() as i64) as i32
}

fn sort_and_truncate(matched: &mut Vec<ScoredDocument>) {
    matched.sort_by(|lhs, rhs| {
        if (lhs.relevance - rhs.relevance).abs() < RELEVANCE_EPSILON {
            rhs.rating.cmp(&lhs.rating)
        } else {
            rhs.relevance
                .partial_cmp(&lhs.relevance)
                .unwrap_or(Ordering::Equal)
        }
    });
    matched.truncate(MAX_RESULT_DOCUMENT_COUNT);
}
