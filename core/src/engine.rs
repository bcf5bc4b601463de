//! The recipe engine: record store, inverted index, selections and the
//! lookup tables behind one coarse lock.
//!
//! [`EngineState`] holds everything that changes during a session and carries
//! all operations. [`RecipeEngine`] owns it behind a single
//! `parking_lot::Mutex`; read-modify-write spans (toggle a favorite, then
//! serialize the favorites) run inside one [`RecipeEngine::transact`] call so
//! racing callers cannot lose updates.

use crate::aggregate::{Aggregator, ShoppingSummary};
use crate::error::{EngineError, Result};
use crate::index::InvertedIndex;
use crate::recipe::{NewRecipe, Recipe};
use crate::search::Searcher;
use crate::selection::{Favorites, ShoppingList};
use crate::store::RecordStore;
use crate::tables::{LookupTables, TableConfig};
use crate::tokenizer::split_words;
use crate::RecipeId;
use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DEFAULT_MAX_QUANTITY: u32 = 8;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub max_quantity: u32,
    pub tables: TableConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { max_quantity: DEFAULT_MAX_QUANTITY, tables: TableConfig::default() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    All,
    Chicken,
    Pork,
    Beef,
    Seafood,
    Vegetarian,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::All => "All Recipes",
            Category::Chicken => "Chicken",
            Category::Pork => "Pork",
            Category::Beef => "Beef",
            Category::Seafood => "Seafood",
            Category::Vegetarian => "Vegetarian",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" | "all recipes" | "all-recipes" => Ok(Category::All),
            "chicken" => Ok(Category::Chicken),
            "pork" => Ok(Category::Pork),
            "beef" => Ok(Category::Beef),
            "seafood" => Ok(Category::Seafood),
            "vegetarian" => Ok(Category::Vegetarian),
            _ => Err(EngineError::UnknownCategory(s.to_string())),
        }
    }
}

/// Which recipe list a host wants to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    All,
    Search(String),
    Category(Category),
    Favorites,
    ShoppingList,
}

/// Mutations of the per-user selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOp {
    AddFavorite(RecipeId),
    RemoveFavorite(RecipeId),
    ToggleFavorite(RecipeId),
    SetQuantity { id: RecipeId, quantity: i64 },
}

/// Result of a [`SelectionOp`], including the re-serialized store to persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OpOutcome {
    Favorite { id: RecipeId, is_favorite: bool, serialized: String },
    Quantity { id: RecipeId, previous: u32, current: u32, serialized: String },
}

impl OpOutcome {
    pub fn serialized(&self) -> &str {
        match self {
            OpOutcome::Favorite { serialized, .. } | OpOutcome::Quantity { serialized, .. } => serialized,
        }
    }
}

/// Serialized selections as read from the host's preference files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedSelections {
    pub favorites: Option<String>,
    pub shopping_list: Option<String>,
}

pub struct EngineState {
    store: RecordStore,
    index: InvertedIndex,
    vegetarian: BTreeSet<RecipeId>,
    favorites: Favorites,
    shopping_list: ShoppingList,
    tables: Arc<LookupTables>,
}

impl EngineState {
    fn new(tables: Arc<LookupTables>, max_quantity: u32) -> Self {
        Self {
            store: RecordStore::new(),
            index: InvertedIndex::new(),
            vegetarian: BTreeSet::new(),
            favorites: Favorites::new(),
            shopping_list: ShoppingList::new(max_quantity),
            tables,
        }
    }

    /// Assigns the next id, stores and indexes the recipe.
    pub fn add_recipe(&mut self, recipe: NewRecipe) -> Result<Arc<Recipe>> {
        let recipe = self.store.add(recipe)?;
        self.index_recipe(&recipe);
        Ok(recipe)
    }

    /// Stores a recipe whose id was assigned by the bulk loader.
    pub fn insert_loaded(&mut self, recipe: Recipe) -> Result<Arc<Recipe>> {
        let recipe = self.store.insert(recipe)?;
        self.index_recipe(&recipe);
        Ok(recipe)
    }

    // Indexes name and ingredient names; a recipe stays vegetarian until one
    // of its tokens is a meat word.
    fn index_recipe(&mut self, recipe: &Recipe) {
        let mut tokens = self.index.index(&recipe.name, recipe.id);
        for ingredient in &recipe.ingredients {
            tokens.extend(self.index.index(&ingredient.name, recipe.id));
        }
        // hyphenated tokens such as "ground-beef" are checked word by word
        let vegetarian = !tokens.iter().flat_map(|t| split_words(t)).any(|w| self.tables.is_meat(w));
        if vegetarian {
            self.vegetarian.insert(recipe.id);
        }
        debug!(id = recipe.id, name = %recipe.name, tokens = tokens.len(), vegetarian, "indexed recipe");
    }

    pub fn find_by_id(&self, id: RecipeId) -> Option<Arc<Recipe>> {
        self.store.find_by_id(id).cloned()
    }

    pub fn find_by_raw_id(&self, raw: i64) -> Option<Arc<Recipe>> {
        self.store.find_by_raw_id(raw).cloned()
    }

    pub fn all_ids(&self) -> Vec<RecipeId> {
        self.store.all_ids().collect()
    }

    pub fn len(&self) -> usize { self.store.len() }

    pub fn is_empty(&self) -> bool { self.store.is_empty() }

    pub fn tables(&self) -> &LookupTables { &self.tables }

    fn searcher(&self) -> Searcher<'_> {
        Searcher::new(&self.store, &self.index)
    }

    pub fn search(&self, query: Option<&str>) -> Option<Vec<Arc<Recipe>>> {
        self.searcher().search(query)
    }

    pub fn search_any<S: AsRef<str>>(&self, queries: &[S]) -> Vec<Arc<Recipe>> {
        self.searcher().search_any(queries)
    }

    pub fn all_recipes(&self) -> Vec<Arc<Recipe>> {
        self.searcher().materialize(self.store.all_ids())
    }

    pub fn is_vegetarian(&self, id: RecipeId) -> bool {
        self.vegetarian.contains(&id)
    }

    pub fn vegetarian_recipes(&self) -> Vec<Arc<Recipe>> {
        self.searcher().materialize(self.vegetarian.iter().copied())
    }

    pub fn favorite_recipes(&self) -> Vec<Arc<Recipe>> {
        self.searcher().materialize(self.favorites.ids())
    }

    pub fn shopping_list_recipes(&self) -> Vec<Arc<Recipe>> {
        self.searcher().materialize(self.shopping_list.iter().map(|(id, _)| id))
    }

    pub fn browse(&self, category: Category) -> Vec<Arc<Recipe>> {
        match category {
            Category::All => self.all_recipes(),
            Category::Chicken => self.search(Some("chicken")).unwrap_or_default(),
            Category::Pork => self.search_any(&["bacon", "ham", "pork"]),
            Category::Beef => self.search_any(&["beef", "steak"]),
            Category::Seafood => self.search_any(self.tables.seafood_words()),
            Category::Vegetarian => self.vegetarian_recipes(),
        }
    }

    pub fn list(&self, listing: &Listing) -> Vec<Arc<Recipe>> {
        match listing {
            Listing::All => self.all_recipes(),
            Listing::Search(query) => self.search(Some(query.as_str())).unwrap_or_default(),
            Listing::Category(category) => self.browse(*category),
            Listing::Favorites => self.favorite_recipes(),
            Listing::ShoppingList => self.shopping_list_recipes(),
        }
    }

    pub fn favorites(&self) -> &Favorites { &self.favorites }

    pub fn shopping_list(&self) -> &ShoppingList { &self.shopping_list }

    pub fn is_favorite(&self, id: RecipeId) -> bool { self.favorites.is_favorite(id) }

    pub fn get_quantity(&self, id: RecipeId) -> u32 { self.shopping_list.get_quantity(id) }

    pub fn load_favorites(&mut self, serialized: Option<&str>) -> Result<usize> {
        let store = &self.store;
        Ok(self.favorites.load_from_serialized(serialized, |id| store.contains(id))?)
    }

    pub fn load_shopping_list(&mut self, serialized: Option<&str>) -> Result<usize> {
        let store = &self.store;
        Ok(self.shopping_list.load_from_serialized(serialized, |id| store.contains(id))?)
    }

    /// Loads both saved selections independently. A string that is rejected
    /// is logged and leaves its store empty.
    pub fn restore_selections(&mut self, saved: &SavedSelections) -> (usize, usize) {
        let favorites = match self.load_favorites(saved.favorites.as_deref()) {
            Ok(count) => count,
            Err(err) => {
                warn!(%err, "discarding saved favorites");
                self.favorites = Favorites::new();
                0
            }
        };
        let shopping_list = match self.load_shopping_list(saved.shopping_list.as_deref()) {
            Ok(count) => count,
            Err(err) => {
                warn!(%err, "discarding saved shopping list");
                self.shopping_list = ShoppingList::new(self.shopping_list.max_quantity());
                0
            }
        };
        (favorites, shopping_list)
    }

    fn require(&self, id: RecipeId) -> Result<()> {
        if self.store.contains(id) {
            Ok(())
        } else {
            Err(EngineError::UnknownRecipe(id))
        }
    }

    pub fn apply(&mut self, op: SelectionOp) -> Result<OpOutcome> {
        match op {
            SelectionOp::AddFavorite(id) => {
                self.require(id)?;
                self.favorites.add(id);
                Ok(self.favorite_outcome(id))
            }
            SelectionOp::RemoveFavorite(id) => {
                self.require(id)?;
                self.favorites.remove(id);
                Ok(self.favorite_outcome(id))
            }
            SelectionOp::ToggleFavorite(id) => {
                self.require(id)?;
                if !self.favorites.remove(id) {
                    self.favorites.add(id);
                }
                Ok(self.favorite_outcome(id))
            }
            SelectionOp::SetQuantity { id, quantity } => {
                self.require(id)?;
                let previous = self.shopping_list.set_quantity(id, quantity)?;
                Ok(OpOutcome::Quantity {
                    id,
                    previous,
                    current: self.shopping_list.get_quantity(id),
                    serialized: self.shopping_list.serialize(),
                })
            }
        }
    }

    fn favorite_outcome(&self, id: RecipeId) -> OpOutcome {
        OpOutcome::Favorite { id, is_favorite: self.favorites.is_favorite(id), serialized: self.favorites.serialize() }
    }

    pub fn shopping_summary(&self) -> ShoppingSummary {
        Aggregator::new(&self.store, &self.tables).aggregate(&self.shopping_list)
    }
}

/// An explicit, constructible engine instance owned by the host application.
pub struct RecipeEngine {
    tables: Arc<LookupTables>,
    max_quantity: u32,
    state: Mutex<EngineState>,
}

impl RecipeEngine {
    pub fn new(config: &EngineConfig) -> Self {
        let tables = Arc::new(LookupTables::from_config(&config.tables));
        let state = Mutex::new(EngineState::new(tables.clone(), config.max_quantity));
        Self { tables, max_quantity: config.max_quantity, state }
    }

    fn fresh_state(&self) -> EngineState {
        EngineState::new(self.tables.clone(), self.max_quantity)
    }

    /// Holds the engine lock until the guard is dropped.
    pub fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock()
    }

    /// Runs `f` with the lock held for the whole span.
    pub fn transact<T>(&self, f: impl FnOnce(&mut EngineState) -> T) -> T {
        let mut state = self.state.lock();
        f(&mut state)
    }

    /// Clears the store, index and both selections as one unit.
    pub fn reset(&self) {
        *self.state.lock() = self.fresh_state();
        info!("engine reset");
    }

    /// Inserts bulk-loaded recipes. Ids must continue the current sequence.
    pub fn bulk_load(&self, recipes: Vec<Recipe>) -> Result<usize> {
        let mut state = self.state.lock();
        let count = recipes.len();
        for recipe in recipes {
            state.insert_loaded(recipe)?;
        }
        info!(count, total = state.len(), "bulk loaded recipes");
        Ok(count)
    }

    /// Builds a new state from a catalog and swaps it in with the selections
    /// returned by `read_saved`, which runs with the lock held. A catalog
    /// error leaves the current state untouched.
    pub fn rebuild(&self, recipes: Vec<Recipe>, read_saved: impl FnOnce() -> SavedSelections) -> Result<usize> {
        let mut next = self.fresh_state();
        for recipe in recipes {
            next.insert_loaded(recipe)?;
        }
        let mut state = self.state.lock();
        let (favorites, shopping_list) = next.restore_selections(&read_saved());
        let count = next.len();
        *state = next;
        info!(count, favorites, shopping_list, "engine rebuilt");
        Ok(count)
    }

    pub fn add_recipe(&self, recipe: NewRecipe) -> Result<Arc<Recipe>> {
        self.state.lock().add_recipe(recipe)
    }

    pub fn find_by_id(&self, id: RecipeId) -> Option<Arc<Recipe>> {
        self.state.lock().find_by_id(id)
    }

    pub fn search(&self, query: Option<&str>) -> Option<Vec<Arc<Recipe>>> {
        self.state.lock().search(query)
    }

    pub fn search_any<S: AsRef<str>>(&self, queries: &[S]) -> Vec<Arc<Recipe>> {
        self.state.lock().search_any(queries)
    }

    pub fn list(&self, listing: &Listing) -> Vec<Arc<Recipe>> {
        self.state.lock().list(listing)
    }

    pub fn apply(&self, op: SelectionOp) -> Result<OpOutcome> {
        self.state.lock().apply(op)
    }

    pub fn shopping_summary(&self) -> ShoppingSummary {
        self.state.lock().shopping_summary()
    }
}

impl Default for RecipeEngine {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}
