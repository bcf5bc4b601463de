use crate::error::{EngineError, Result};
use crate::recipe::{NewRecipe, Recipe};
use crate::RecipeId;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Insert-only recipe storage keyed by a monotonically assigned id.
#[derive(Debug, Default)]
pub struct RecordStore {
    recipes: BTreeMap<RecipeId, Arc<Recipe>>,
    next_id: RecipeId,
}

impl RecordStore {
    pub fn new() -> Self { Self::default() }

    /// Assigns the next id and stores the recipe.
    pub fn add(&mut self, recipe: NewRecipe) -> Result<Arc<Recipe>> {
        let id = self.next_id;
        self.insert(recipe.with_id(id))
    }

    /// Stores a recipe that already carries an id. The id must be the next one
    /// the store would have assigned, which keeps the counter reconciled.
    pub fn insert(&mut self, recipe: Recipe) -> Result<Arc<Recipe>> {
        if recipe.id != self.next_id {
            return Err(EngineError::NonSequentialId { expected: self.next_id, found: recipe.id });
        }
        validate(&recipe)?;
        let recipe = Arc::new(recipe);
        self.recipes.insert(recipe.id, recipe.clone());
        self.next_id += 1;
        Ok(recipe)
    }

    pub fn find_by_id(&self, id: RecipeId) -> Option<&Arc<Recipe>> {
        self.recipes.get(&id)
    }

    /// Lookup for ids that arrive as signed integers; negative ids never match.
    pub fn find_by_raw_id(&self, raw: i64) -> Option<&Arc<Recipe>> {
        RecipeId::try_from(raw).ok().and_then(|id| self.find_by_id(id))
    }

    pub fn contains(&self, id: RecipeId) -> bool {
        self.recipes.contains_key(&id)
    }

    pub fn all_ids(&self) -> impl Iterator<Item = RecipeId> + '_ {
        self.recipes.keys().copied()
    }

    pub fn len(&self) -> usize { self.recipes.len() }

    pub fn is_empty(&self) -> bool { self.recipes.is_empty() }
}

fn validate(recipe: &Recipe) -> Result<()> {
    if recipe.name.trim().is_empty() {
        return Err(EngineError::EmptyName);
    }
    if let Some(position) = recipe.ingredients.iter().position(|i| i.name.trim().is_empty()) {
        return Err(EngineError::MalformedIngredient { recipe: recipe.name.clone(), position });
    }
    Ok(())
}
