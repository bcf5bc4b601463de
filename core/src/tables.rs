//! Static lookup tables: measurement-unit aliases and food-type words.
//!
//! Both tables are configuration data. They are deserialized from JSON (or
//! taken from the built-in defaults) and frozen into a [`LookupTables`] before
//! the engine is built; nothing mutates them afterwards.

use crate::tokenizer::split_words;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodType {
    Meat,
    Seafood,
    Produce,
    Other,
}

impl fmt::Display for FoodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FoodType::Meat => "Meat",
            FoodType::Seafood => "Seafood",
            FoodType::Produce => "Produce",
            FoodType::Other => "Other",
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodTypeWords {
    #[serde(default)]
    pub meat: Vec<String>,
    #[serde(default)]
    pub seafood: Vec<String>,
    #[serde(default)]
    pub produce: Vec<String>,
}

/// On-disk shape of the tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    /// Canonical unit -> aliases. The canonical name is always an alias of itself.
    pub units: BTreeMap<String, Vec<String>>,
    pub food_types: FoodTypeWords,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

impl Default for TableConfig {
    fn default() -> Self {
        let mut units = BTreeMap::new();
        units.insert("pounds".to_string(), words(&["lb", "lbs", "pound", "pounds"]));
        units.insert("ounces".to_string(), words(&["oz", "ounce", "ounces"]));
        units.insert("grams".to_string(), words(&["g", "gram", "grams"]));
        units.insert("kilograms".to_string(), words(&["kg", "kilogram", "kilograms"]));
        units.insert(String::new(), Vec::new());
        Self {
            units,
            food_types: FoodTypeWords {
                meat: words(&[
                    "bacon", "beef", "chicken", "chorizo", "duck", "ham", "lamb", "pancetta", "pepperoni", "pork",
                    "prosciutto", "salami", "sausage", "sausages", "steak", "turkey", "veal", "venison",
                ]),
                seafood: words(&[
                    "anchovies", "catfish", "clams", "cod", "crab", "fish", "halibut", "lobster", "mussels", "oysters",
                    "prawns", "salmon", "scallops", "shrimp", "snapper", "tilapia", "trout", "tuna",
                ]),
                produce: words(&[
                    "apple", "apples", "avocado", "basil", "broccoli", "cabbage", "carrot", "carrots", "celery",
                    "cilantro", "cucumber", "garlic", "ginger", "lemon", "lemons", "lettuce", "lime", "limes",
                    "mushrooms", "onion", "onions", "parsley", "potato", "potatoes", "scallions", "shallots",
                    "spinach", "tomato", "tomatoes", "zucchini",
                ]),
            },
        }
    }
}

/// Lowercase, trim, and drop one trailing period: `"Lbs."` -> `"lbs"`.
pub fn clean_unit(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    match lowered.strip_suffix('.') {
        Some(stripped) => stripped.to_string(),
        None => lowered,
    }
}

/// Frozen lookup tables used by aggregation and vegetarian classification.
#[derive(Debug, Clone)]
pub struct LookupTables {
    unit_aliases: HashMap<String, String>,
    food_words: HashMap<String, FoodType>,
    meat: HashSet<String>,
    seafood: Vec<String>,
}

impl Default for LookupTables {
    fn default() -> Self {
        Self::from_config(&TableConfig::default())
    }
}

impl LookupTables {
    pub fn from_config(config: &TableConfig) -> Self {
        let mut unit_aliases = HashMap::new();
        // a blank unit is always amount-bearing
        unit_aliases.insert(String::new(), String::new());
        for (canonical, aliases) in &config.units {
            unit_aliases.insert(clean_unit(canonical), canonical.clone());
            for alias in aliases {
                unit_aliases.insert(clean_unit(alias), canonical.clone());
            }
        }

        let lower = |list: &[String]| list.iter().map(|w| w.trim().to_lowercase()).collect::<Vec<_>>();
        let meat = lower(&config.food_types.meat);
        let seafood = lower(&config.food_types.seafood);
        let produce = lower(&config.food_types.produce);

        // earlier tables win when a word is listed twice
        let mut food_words = HashMap::new();
        for (food_type, list) in [(FoodType::Meat, &meat), (FoodType::Seafood, &seafood), (FoodType::Produce, &produce)] {
            for word in list {
                food_words.entry(word.clone()).or_insert(food_type);
            }
        }

        Self { unit_aliases, food_words, meat: meat.into_iter().collect(), seafood }
    }

    /// Canonical unit for a raw unit string, or `None` if the unit is not registered.
    pub fn canonical_unit(&self, raw: &str) -> Option<&str> {
        self.unit_aliases.get(&clean_unit(raw)).map(String::as_str)
    }

    /// First word of `name` (split on whitespace or hyphens) found in a food-type table.
    pub fn classify(&self, name: &str) -> FoodType {
        split_words(name)
            .find_map(|word| self.food_words.get(&word.to_lowercase()).copied())
            .unwrap_or(FoodType::Other)
    }

    pub fn is_meat(&self, token: &str) -> bool {
        self.meat.contains(token)
    }

    pub fn seafood_words(&self) -> &[String] {
        &self.seafood
    }
}
