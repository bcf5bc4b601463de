use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;

lazy_static! {
    static ref WORD_SEPARATORS: Regex = Regex::new(r"[\s\-]+").expect("valid regex");
}

/// Tokenize text into lowercase whitespace-delimited words.
/// Tokens are literal: no stemming, no punctuation stripping.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// Distinct query terms. An empty set means the query matches nothing.
pub fn query_terms(query: &str) -> BTreeSet<String> {
    tokenize(query).into_iter().collect()
}

/// Split on whitespace or hyphens, e.g. `"1-1/2"` or `"bone-in chicken thighs"`.
pub fn split_words(text: &str) -> impl Iterator<Item = &str> {
    WORD_SEPARATORS.split(text).filter(|w| !w.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_tokenize() {
        assert_eq!(tokenize("  Curry   PORK pie "), vec!["curry", "pork", "pie"]);
    }

    #[test]
    fn punctuation_is_kept() {
        assert_eq!(tokenize("Mom's Chili!"), vec!["mom's", "chili!"]);
    }

    #[test]
    fn hyphens_split_words() {
        let words: Vec<&str> = split_words("bone-in chicken  thighs").collect();
        assert_eq!(words, vec!["bone", "in", "chicken", "thighs"]);
    }
}
