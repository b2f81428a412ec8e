use std::collections::VecDeque;

use crate::index::{DocumentStatus, ScoredDocument, SearchIndex};
use crate::DocumentId;

/// Sliding window size: one slot per minute of a day.
const REQUEST_WINDOW: usize = 1440;

struct QueryResult {
    was_empty: bool,
}

/// Tracks the last [`REQUEST_WINDOW`] search requests against an index and
/// counts how many of them produced no results. When the window is full the
/// oldest request is evicted and, if it was empty, un-counted.
///
/// A malformed query is absorbed at this boundary: it returns an empty result
/// and is recorded as a no-result request.
pub struct RequestQueue<'a> {
    index: &'a SearchIndex,
    requests: VecDeque<QueryResult>,
    no_result_count: usize,
}

impl<'a> RequestQueue<'a> {
    pub fn new(index: &'a SearchIndex) -> Self {
        Self {
            index,
            requests: VecDeque::new(),
            no_result_count: 0,
        }
    }

    /// Runs the query against documents with `Actual` status.
    pub fn add_find_request(&mut self, raw_query: &str) -> Vec<ScoredDocument> {
        self.add_find_request_with_status(raw_query, DocumentStatus::Actual)
    }

    pub fn add_find_request_with_status(
        &mut self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Vec<ScoredDocument> {
        self.add_find_request_filtered(raw_query, move |_, document_status, _| {
            document_status == status
        })
    }

    pub fn add_find_request_filtered<P>(
        &mut self,
        raw_query: &str,
        predicate: P,
    ) -> Vec<ScoredDocument>
    where
        P: Fn(DocumentId, DocumentStatus, i32) -> bool,
    {
        let results = match self.index.find_top_documents_filtered(raw_query, predicate) {
            Ok(results) => results,
            Err(error) => {
                tracing::warn!(%error, query = %raw_query, "search request failed");
                Vec::new()
            }
        };
        self.record(results.is_empty());
        results
    }

    /// How many of the tracked requests produced no results.
    pub fn no_result_requests(&self) -> usize {
        self.no_result_count
    }

    fn record(&mut self, was_empty: bool) {
        if self.requests.len() == REQUEST_WINDOW {
            if let Some(oldest) = self.requests.pop_front() {
                if oldest.was_empty {
                    self.no_result_count -= 1;
                }
            }
        }
        if was_empty {
            self.no_result_count += 1;
        }
        self.requests.push_back(QueryResult { was_empty });
    }
}
