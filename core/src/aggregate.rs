//! Shopping-list aggregation.
//!
//! Every ingredient line of every recipe on the shopping list is scaled by the
//! recipe's quantity. Lines whose unit resolves to a canonical unit are summed
//! per (ingredient name, canonical unit); each distinct pair becomes its own
//! line, so "2 pounds beef" and "8 ounces beef" are never added together.
//! Lines with an unregistered unit, or an amount outside the amount grammar,
//! are listed by name only.

use crate::amount::{format_amount, parse_amount};
use crate::selection::ShoppingList;
use crate::store::RecordStore;
use crate::tables::{FoodType, LookupTables};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// Four disjoint buckets, each sorted by display string.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ShoppingSummary {
    pub meat: Vec<String>,
    pub seafood: Vec<String>,
    pub produce: Vec<String>,
    pub other: Vec<String>,
}

impl ShoppingSummary {
    pub fn bucket(&self, food_type: FoodType) -> &[String] {
        match food_type {
            FoodType::Meat => &self.meat,
            FoodType::Seafood => &self.seafood,
            FoodType::Produce => &self.produce,
            FoodType::Other => &self.other,
        }
    }

    /// Non-empty buckets in display order.
    pub fn sections(&self) -> impl Iterator<Item = (FoodType, &[String])> + '_ {
        [FoodType::Meat, FoodType::Seafood, FoodType::Produce, FoodType::Other]
            .into_iter()
            .map(move |t| (t, self.bucket(t)))
            .filter(|(_, items)| !items.is_empty())
    }

    pub fn len(&self) -> usize {
        self.meat.len() + self.seafood.len() + self.produce.len() + self.other.len()
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

/// `"<amount> <unit> <name>"`; a zero amount and a blank unit are left out.
fn display_line(amount: f64, unit: &str, name: &str) -> String {
    let mut parts = Vec::with_capacity(3);
    let amount = format_amount(amount);
    if amount != "0" {
        parts.push(amount);
    }
    if !unit.is_empty() {
        parts.push(unit.to_string());
    }
    parts.push(name.to_string());
    parts.join(" ")
}

pub struct Aggregator<'a> {
    store: &'a RecordStore,
    tables: &'a LookupTables,
}

impl<'a> Aggregator<'a> {
    pub fn new(store: &'a RecordStore, tables: &'a LookupTables) -> Self {
        Self { store, tables }
    }

    pub fn aggregate(&self, list: &ShoppingList) -> ShoppingSummary {
        let mut amounts: BTreeMap<(String, String), f64> = BTreeMap::new();
        let mut by_name: BTreeSet<String> = BTreeSet::new();

        for (id, quantity) in list.iter() {
            let Some(recipe) = self.store.find_by_id(id) else { continue };
            for ingredient in &recipe.ingredients {
                let name = ingredient.name.trim();
                let Some(unit) = self.tables.canonical_unit(&ingredient.unit) else {
                    by_name.insert(name.to_string());
                    continue;
                };
                match parse_amount(&ingredient.amount) {
                    Ok(amount) => {
                        *amounts.entry((name.to_string(), unit.to_string())).or_insert(0.0) += amount * quantity as f64;
                    }
                    Err(err) => {
                        warn!(recipe = %recipe.name, ingredient = name, %err, "listing ingredient without amount");
                        by_name.insert(name.to_string());
                    }
                }
            }
        }

        let mut buckets: BTreeMap<FoodType, BTreeSet<String>> = BTreeMap::new();
        for ((name, unit), amount) in &amounts {
            buckets.entry(self.tables.classify(name)).or_default().insert(display_line(*amount, unit, name));
        }
        for name in &by_name {
            buckets.entry(self.tables.classify(name)).or_default().insert(name.clone());
        }

        let mut take = |t: FoodType| -> Vec<String> {
            buckets.remove(&t).map(|set| set.into_iter().collect()).unwrap_or_default()
        };
        ShoppingSummary {
            meat: take(FoodType::Meat),
            seafood: take(FoodType::Seafood),
            produce: take(FoodType::Produce),
            other: take(FoodType::Other),
        }
    }
}
