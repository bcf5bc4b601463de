use crate::index::InvertedIndex;
use crate::recipe::Recipe;
use crate::store::RecordStore;
use crate::tokenizer::query_terms;
use crate::RecipeId;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

/// Conjunctive search over a store and its index.
pub struct Searcher<'a> {
    store: &'a RecordStore,
    index: &'a InvertedIndex,
}

impl<'a> Searcher<'a> {
    pub fn new(store: &'a RecordStore, index: &'a InvertedIndex) -> Self {
        Self { store, index }
    }

    /// Recipes matching every distinct term of `query`, sorted by name.
    /// `None` in means "nothing to do" and yields `None`; a blank query yields an empty list.
    pub fn search(&self, query: Option<&str>) -> Option<Vec<Arc<Recipe>>> {
        let query = query?;
        Some(self.materialize(self.matching_ids(query)))
    }

    /// Union of the matches of each alternative query, sorted by name.
    pub fn search_any<S: AsRef<str>>(&self, queries: &[S]) -> Vec<Arc<Recipe>> {
        let ids: BTreeSet<RecipeId> = queries.iter().flat_map(|q| self.matching_ids(q.as_ref())).collect();
        self.materialize(ids)
    }

    /// Ids whose hit count equals the number of distinct terms.
    pub fn matching_ids(&self, query: &str) -> BTreeSet<RecipeId> {
        let terms = query_terms(query);
        if terms.is_empty() {
            return BTreeSet::new();
        }
        let mut hits: HashMap<RecipeId, usize> = HashMap::new();
        for term in &terms {
            if let Some(postings) = self.index.postings_for(term) {
                for id in postings {
                    *hits.entry(*id).or_insert(0) += 1;
                }
            }
        }
        let required = terms.len();
        hits.into_iter().filter(|(_, count)| *count == required).map(|(id, _)| id).collect()
    }

    /// Groups by name in lexicographic order; equal names keep id (insertion) order.
    pub fn materialize<I: IntoIterator<Item = RecipeId>>(&self, ids: I) -> Vec<Arc<Recipe>> {
        sort_by_name(ids.into_iter().filter_map(|id| self.store.find_by_id(id).cloned()))
    }
}

pub fn sort_by_name<I: IntoIterator<Item = Arc<Recipe>>>(recipes: I) -> Vec<Arc<Recipe>> {
    let mut groups: BTreeMap<String, Vec<Arc<Recipe>>> = BTreeMap::new();
    for recipe in recipes {
        groups.entry(recipe.name.clone()).or_default().push(recipe);
    }
    groups
        .into_values()
        .flat_map(|mut group| {
            group.sort_by_key(|r| r.id);
            group
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::{Ingredient, NewRecipe};

    fn fixture() -> (RecordStore, InvertedIndex) {
        let mut store = RecordStore::new();
        let mut index = InvertedIndex::new();
        for (name, ingredient) in [("Curry Pie", "potato"), ("Curry Pork 2", "pork"), ("Apple Pie", "apple")] {
            let recipe = store.add(NewRecipe::new(name, vec![Ingredient::new("1", "", ingredient, "")])).unwrap();
            index.index(&recipe.name, recipe.id);
            index.index(ingredient, recipe.id);
        }
        (store, index)
    }

    fn names(recipes: &[Arc<Recipe>]) -> Vec<&str> {
        recipes.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn every_term_must_match() {
        let (store, index) = fixture();
        let searcher = Searcher::new(&store, &index);
        assert!(searcher.search(Some("pork pie")).unwrap().is_empty());
        assert_eq!(names(&searcher.search(Some("curry pie")).unwrap()), vec!["Curry Pie"]);
    }

    #[test]
    fn duplicate_terms_count_once() {
        let (store, index) = fixture();
        let searcher = Searcher::new(&store, &index);
        assert_eq!(names(&searcher.search(Some("pie PIE pie")).unwrap()), vec!["Apple Pie", "Curry Pie"]);
    }

    #[test]
    fn absent_and_blank_queries() {
        let (store, index) = fixture();
        let searcher = Searcher::new(&store, &index);
        assert!(searcher.search(None).is_none());
        assert_eq!(searcher.search(Some("   ")).map(|r| r.len()), Some(0));
    }

    #[test]
    fn alternatives_are_unioned() {
        let (store, index) = fixture();
        let searcher = Searcher::new(&store, &index);
        let found = searcher.search_any(&["apple", "pork", "apple pie", "nothing"]);
        assert_eq!(names(&found), vec!["Apple Pie", "Curry Pork 2"]);
    }
}
