//! Embedded document search and ranking.
//!
//! `docrank` keeps an in-memory inverted index over whitespace-tokenized
//! documents and answers ranked top-K queries with classic TF-IDF scoring.
//! Queries support plus-terms (must appear, contribute to relevance) and
//! minus-terms (`-word`, exclude the document outright). Batches of
//! independent queries are evaluated in parallel with rayon.
//!
//! ```
//! use docrank::{DocumentStatus, SearchIndex};
//!
//! let mut index = SearchIndex::from_stop_words_text("and the")?;
//! index.add_document(0, "white cat and fluffy tail", DocumentStatus::Actual, &[1, 2, 3])?;
//! index.add_document(1, "black dog", DocumentStatus::Actual, &[4])?;
//!
//! let results = index.find_top_documents("fluffy cat -dog")?;
//! assert_eq!(results[0].id, 0);
//! # Ok::<(), docrank::SearchError>(())
//! ```

pub mod concurrent_map;
pub mod error;
pub mod index;
pub mod process;
mod query;
pub mod remove_duplicates;
pub mod request_queue;
pub mod tokenizer;

/// Document identifier. Valid ids are non-negative; `add_document` rejects
/// the rest.
pub type DocumentId = i32;

pub use concurrent_map::StripedMap;
pub use error::SearchError;
pub use index::{DocumentStatus, ScoredDocument, SearchIndex, MAX_RESULT_DOCUMENT_COUNT};
pub use process::{process_queries, process_queries_joined};
pub use remove_duplicates::remove_duplicates;
pub use request_queue::RequestQueue;
