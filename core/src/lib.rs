pub mod aggregate;
pub mod amount;
pub mod engine;
pub mod error;
pub mod index;
pub mod persist;
pub mod recipe;
pub mod search;
pub mod selection;
pub mod store;
pub mod tables;
pub mod tokenizer;

pub use aggregate::{Aggregator, ShoppingSummary};
pub use engine::{Category, EngineConfig, EngineState, Listing, OpOutcome, RecipeEngine, SavedSelections, SelectionOp};
pub use error::{AmountError, EngineError, Result, SelectionError};
pub use index::InvertedIndex;
pub use recipe::{Ingredient, NewRecipe, Recipe, RecipeTime};
pub use selection::{Favorites, ShoppingList};
pub use store::RecordStore;
pub use search::Searcher;
pub use tables::{FoodType, LookupTables, TableConfig};

pub type RecipeId = u32;
