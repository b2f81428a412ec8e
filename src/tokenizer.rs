/// Split raw text into whitespace-delimited word tokens.
pub fn split_into_words(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
}

/// A word is valid when it contains no control characters (codepoints below
/// U+0020). Validation applies uniformly to document text, stop words, and
/// query tokens.
pub fn is_valid_word(word: &str) -> bool {
    !word.chars().any(|c| (c as u32) < 0x20)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_any_whitespace() {
        let words: Vec<&str> = split_into_words("white  cat\tand\nfluffy tail").collect();
        assert_eq!(words, vec!["white", "cat", "and", "fluffy", "tail"]);
    }

    #[test]
    fn empty_text_yields_no_words() {
        assert_eq!(split_into_words("   ").count(), 0);
        assert_eq!(split_into_words("").count(), 0);
    }

    #[test]
    fn rejects_control_characters() {
        assert!(is_valid_word("cat"));
        assert!(is_valid_word("well-groomed"));
        assert!(!is_valid_word("ca\u{1}t"));
        assert!(!is_valid_word("\u{1f}dog"));
    }
}
