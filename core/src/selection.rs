//! Per-user selections: favorites and the quantity-bearing shopping list.
//!
//! Both stores persist as flat space-delimited integer strings:
//! favorites as `"<id> <id> ..."`, the shopping list as
//! `"<id> <qty> <id> <qty> ..."`. No trailing separator; empty store is `""`.

use crate::error::SelectionError;
use crate::RecipeId;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

fn parse_integers(text: &str) -> Result<Vec<i64>, SelectionError> {
    text.split_whitespace()
        .map(|token| token.parse::<i64>().map_err(|_| SelectionError::InvalidNumber(token.to_string())))
        .collect()
}

/// Converts a serialized id, treating negative and out-of-range values as stale.
fn live_id(raw: i64, is_present: &impl Fn(RecipeId) -> bool) -> Option<RecipeId> {
    let id = RecipeId::try_from(raw).ok().filter(|id| is_present(*id));
    if id.is_none() {
        debug!(id = raw, "dropping stale selection id");
    }
    id
}

fn join<I: IntoIterator<Item = String>>(parts: I) -> String {
    parts.into_iter().collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Favorites {
    ids: BTreeSet<RecipeId>,
}

impl Favorites {
    pub fn new() -> Self { Self::default() }

    /// Returns true if the id was not already a favorite.
    pub fn add(&mut self, id: RecipeId) -> bool { self.ids.insert(id) }

    /// Returns true if the id was a favorite.
    pub fn remove(&mut self, id: RecipeId) -> bool { self.ids.remove(&id) }

    pub fn is_favorite(&self, id: RecipeId) -> bool { self.ids.contains(&id) }

    pub fn ids(&self) -> impl Iterator<Item = RecipeId> + '_ { self.ids.iter().copied() }

    pub fn len(&self) -> usize { self.ids.len() }

    pub fn is_empty(&self) -> bool { self.ids.is_empty() }

    /// Replaces the contents with the ids in `text`, dropping ids for which
    /// `is_present` is false. `None` loads nothing and leaves the store as is.
    pub fn load_from_serialized(
        &mut self,
        text: Option<&str>,
        is_present: impl Fn(RecipeId) -> bool,
    ) -> Result<usize, SelectionError> {
        let Some(text) = text else { return Ok(self.len()) };
        let ids = parse_integers(text)?;
        self.ids = ids.into_iter().filter_map(|raw| live_id(raw, &is_present)).collect();
        Ok(self.len())
    }

    pub fn serialize(&self) -> String {
        join(self.ids.iter().map(|id| id.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingList {
    quantities: BTreeMap<RecipeId, u32>,
    max_quantity: u32,
}

impl ShoppingList {
    pub fn new(max_quantity: u32) -> Self {
        Self { quantities: BTreeMap::new(), max_quantity }
    }

    pub fn max_quantity(&self) -> u32 { self.max_quantity }

    fn check_quantity(&self, quantity: i64) -> Result<u32, SelectionError> {
        if quantity < 0 {
            return Err(SelectionError::NegativeQuantity(quantity));
        }
        match u32::try_from(quantity) {
            Ok(q) if q <= self.max_quantity => Ok(q),
            _ => Err(SelectionError::QuantityTooLarge { quantity, max: self.max_quantity }),
        }
    }

    /// Zero removes the entry; a positive quantity creates or overwrites it.
    /// Returns the previous quantity (0 when absent).
    pub fn set_quantity(&mut self, id: RecipeId, quantity: i64) -> Result<u32, SelectionError> {
        let quantity = self.check_quantity(quantity)?;
        let previous = if quantity == 0 {
            self.quantities.remove(&id)
        } else {
            self.quantities.insert(id, quantity)
        };
        Ok(previous.unwrap_or(0))
    }

    pub fn get_quantity(&self, id: RecipeId) -> u32 {
        self.quantities.get(&id).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (RecipeId, u32)> + '_ {
        self.quantities.iter().map(|(id, q)| (*id, *q))
    }

    pub fn len(&self) -> usize { self.quantities.len() }

    pub fn is_empty(&self) -> bool { self.quantities.is_empty() }

    /// Replaces the contents with the id/quantity pairs in `text`. The whole
    /// string is validated before anything is replaced.
    pub fn load_from_serialized(
        &mut self,
        text: Option<&str>,
        is_present: impl Fn(RecipeId) -> bool,
    ) -> Result<usize, SelectionError> {
        let Some(text) = text else { return Ok(self.len()) };
        let values = parse_integers(text)?;
        if values.len() % 2 != 0 {
            return Err(SelectionError::OddPairCount(values.len()));
        }
        let mut quantities = BTreeMap::new();
        for pair in values.chunks_exact(2) {
            let Some(id) = live_id(pair[0], &is_present) else { continue };
            let quantity = self.check_quantity(pair[1])?;
            if quantity > 0 {
                quantities.insert(id, quantity);
            }
        }
        self.quantities = quantities;
        Ok(self.len())
    }

    pub fn serialize(&self) -> String {
        join(self.quantities.iter().map(|(id, q)| format!("{id} {q}")))
    }
}
