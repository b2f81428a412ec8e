use rayon::prelude::*;

use crate::index::{ScoredDocument, SearchIndex};

/// Evaluates a batch of independent queries in parallel, one result list per
/// query in input order. A malformed query yields an empty slot and never
/// aborts its siblings.
pub fn process_queries(index: &SearchIndex, queries: &[String]) -> Vec<Vec<ScoredDocument>> {
    queries
        .par_iter()
        .map(|raw_query| match index.find_top_documents(raw_query) {
            Ok(results) => results,
            Err(error) => {
                tracing::warn!(%error, query = %raw_query, "query failed in batch");
                Vec::new()
            }
        })
        .collect()
}

/// Like [`process_queries`], flattened into one sequence that preserves
/// per-query, then within-query, order.
pub fn process_queries_joined(index: &SearchIndex, queries: &[String]) -> Vec<ScoredDocument> {
    process_queries(index, queries).into_iter().flatten().collect()
}
