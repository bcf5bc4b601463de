use crate::tokenizer::tokenize;
use crate::RecipeId;
use std::collections::{BTreeSet, HashMap};

/// Token -> ids of the recipes whose name or ingredient names contain it.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    postings: HashMap<String, BTreeSet<RecipeId>>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Adds `id` to the posting set of every token in `text`.
    /// Returns the tokens that were indexed so callers can inspect them.
    pub fn index(&mut self, text: &str, id: RecipeId) -> Vec<String> {
        let tokens = tokenize(text);
        for token in &tokens {
            self.postings.entry(token.clone()).or_default().insert(id);
        }
        tokens
    }

    pub fn postings_for(&self, token: &str) -> Option<&BTreeSet<RecipeId>> {
        self.postings.get(token)
    }

    pub fn num_terms(&self) -> usize { self.postings.len() }
}
