use std::collections::BTreeSet;

use crate::error::SearchError;
use crate::tokenizer;

/// A parsed query: plus-terms contribute to relevance, minus-terms exclude
/// documents outright. Both sets are lexicographically ordered and
/// deduplicated. The same word may appear in both; exclusion runs after
/// accumulation, so minus wins.
#[derive(Debug, Default, Clone)]
pub(crate) struct Query {
    pub(crate) plus_words: BTreeSet<String>,
    pub(crate) minus_words: BTreeSet<String>,
}

struct QueryWord<'a> {
    text: &'a str,
    is_minus: bool,
}

impl<'a> QueryWord<'a> {
    fn parse(token: &'a str) -> Result<Self, SearchError> {
        let (text, is_minus) = match token.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (token, false),
        };
        if text.is_empty() || text.starts_with('-') || !tokenizer::is_valid_word(text) {
            return Err(SearchError::InvalidQuery(token.to_owned()));
        }
        Ok(Self { text, is_minus })
    }
}

impl Query {
    /// Every token is validated before the stop-word check, so a malformed
    /// token fails even when its plain form is a stop word.
    pub(crate) fn parse(raw: &str, stop_words: &BTreeSet<String>) -> Result<Self, SearchError> {
        let mut query = Query::default();
        for token in tokenizer::split_into_words(raw) {
            let word = QueryWord::parse(token)?;
            if stop_words.contains(word.text) {
                continue;
            }
            if word.is_minus {
                query.minus_words.insert(word.text.to_owned());
            } else {
                query.plus_words.insert(word.text.to_owned());
            }
        }
        Ok(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop_words(words: &[&str]) -> BTreeSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn splits_plus_and_minus_terms() {
        let query = Query::parse("fluffy cat -dog", &BTreeSet::new()).unwrap();
        assert_eq!(query.plus_words.len(), 2);
        assert!(query.plus_words.contains("fluffy"));
        assert!(query.plus_words.contains("cat"));
        assert_eq!(query.minus_words.len(), 1);
        assert!(query.minus_words.contains("dog"));
    }

    #[test]
    fn drops_stop_words_with_or_without_minus() {
        let query = Query::parse("black -and white", &stop_words(&["and", "black"])).unwrap();
        assert!(query.plus_words.contains("white"));
        assert_eq!(query.plus_words.len(), 1);
        assert!(query.minus_words.is_empty());
    }

    #[test]
    fn rejects_malformed_tokens() {
        for raw in ["-", "cat -", "--dog", "cat -\u{3}dog"] {
            assert!(matches!(
                Query::parse(raw, &BTreeSet::new()),
                Err(SearchError::InvalidQuery(_))
            ));
        }
    }

    #[test]
    fn word_may_land_in_both_sets() {
        let query = Query::parse("cat -cat", &BTreeSet::new()).unwrap();
        assert!(query.plus_words.contains("cat"));
        assert!(query.minus_words.contains("cat"));
    }
}
