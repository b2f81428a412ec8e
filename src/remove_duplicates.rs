use std::collections::{BTreeSet, HashSet};

use crate::index::SearchIndex;
use crate::DocumentId;

/// Deletes every document whose word set is set-equal to an earlier one,
/// keeping the lowest id per set. Returns the removed ids, ascending.
///
/// Duplicates are collected in a first pass over the id sequence and removed
/// in a second, so no container is mutated while it is being walked.
pub fn remove_duplicates(index: &mut SearchIndex) -> Vec<DocumentId> {
    let mut seen: HashSet<BTreeSet<String>> = HashSet::new();
    let mut duplicates = Vec::new();
    let document_ids: Vec<DocumentId> = index.document_ids().collect();
    for document_id in document_ids {
        let words: BTreeSet<String> = index.word_frequencies(document_id).into_keys().collect();
        if !seen.insert(words) {
            duplicates.push(document_id);
        }
    }
    for &document_id in &duplicates {
        tracing::debug!(document_id, "removing duplicate document");
        index.remove_document(document_id);
    }
    duplicates
}
