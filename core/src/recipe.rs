use crate::RecipeId;
use serde::{Deserialize, Serialize};

/// One itemized ingredient line, e.g. `1-1/4 | cup | sugar | sifted`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub unit: String,
    pub name: String,
    #[serde(default)]
    pub notes: String,
}

impl Ingredient {
    pub fn new(amount: &str, unit: &str, name: &str, notes: &str) -> Self {
        Self { amount: amount.into(), unit: unit.into(), name: name.into(), notes: notes.into() }
    }

    /// Line as shown on a recipe page: `"<amount> <unit> <name> (<notes>)"`, empty parts skipped.
    pub fn display(&self) -> String {
        let mut line = [self.amount.as_str(), self.unit.as_str(), self.name.as_str()]
            .iter()
            .filter(|part| !part.trim().is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");
        if self.notes.chars().count() > 1 {
            line.push_str(&format!(" ({})", self.notes));
        }
        line
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeTime {
    #[serde(default)]
    pub prep_minutes: u16,
    #[serde(default)]
    pub inactive_prep_minutes: u16,
    #[serde(default)]
    pub cook_minutes: u16,
}

impl RecipeTime {
    pub fn total_minutes(&self) -> u32 {
        self.prep_minutes as u32 + self.inactive_prep_minutes as u32 + self.cook_minutes as u32
    }

    /// `"1 hour 5 min"`, `"2 hours 0 min"`, `"45 min"`, or `" --- "` when no time is known.
    pub fn display(&self) -> String {
        let total = self.total_minutes();
        if total == 0 {
            return " --- ".to_string();
        }
        let hours = total / 60;
        let prefix = match hours {
            0 => String::new(),
            1 => "1 hour ".to_string(),
            h => format!("{h} hours "),
        };
        format!("{prefix}{} min", total % 60)
    }
}

/// A recipe as handed to the engine before it has an identifier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewRecipe {
    pub name: String,
    #[serde(default)]
    pub author: String,
    /// `null` and a missing field both mean "no ingredients".
    #[serde(default)]
    pub ingredients: Option<Vec<Ingredient>>,
    #[serde(default)]
    pub directions: Vec<String>,
    #[serde(default)]
    pub time: RecipeTime,
    #[serde(default)]
    pub servings: Option<u8>,
    #[serde(default)]
    pub difficulty: Option<u8>,
    #[serde(default)]
    pub boxes: Vec<u16>,
}

impl NewRecipe {
    pub fn new(name: &str, ingredients: Vec<Ingredient>) -> Self {
        Self { name: name.into(), ingredients: Some(ingredients), ..Default::default() }
    }

    pub fn with_id(self, id: RecipeId) -> Recipe {
        Recipe {
            id,
            name: self.name,
            author: self.author,
            ingredients: self.ingredients.unwrap_or_default(),
            directions: self.directions,
            time: self.time,
            servings: self.servings,
            difficulty: self.difficulty,
            boxes: self.boxes,
        }
    }
}

/// A stored recipe. Never mutated once the store has assigned its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub directions: Vec<String>,
    #[serde(default)]
    pub time: RecipeTime,
    #[serde(default)]
    pub servings: Option<u8>,
    #[serde(default)]
    pub difficulty: Option<u8>,
    #[serde(default)]
    pub boxes: Vec<u16>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_display_matches_hours_and_minutes() {
        let t = |p, i, c| RecipeTime { prep_minutes: p, inactive_prep_minutes: i, cook_minutes: c };
        assert_eq!(t(0, 0, 0).display(), " --- ");
        assert_eq!(t(15, 0, 30).display(), "45 min");
        assert_eq!(t(20, 15, 30).display(), "1 hour 5 min");
        assert_eq!(t(60, 0, 60).display(), "2 hours 0 min");
    }

    #[test]
    fn ingredient_display_skips_empty_parts_and_short_notes() {
        assert_eq!(Ingredient::new("2", "lbs", "pork", "").display(), "2 lbs pork");
        assert_eq!(Ingredient::new("", "", "salt", "to taste").display(), "salt (to taste)");
        assert_eq!(Ingredient::new("1", "", "egg", "x").display(), "1 egg");
    }

    #[test]
    fn null_ingredients_deserialize_as_empty() {
        let r: NewRecipe = serde_json::from_str(r#"{"name":"Toast","ingredients":null}"#).unwrap();
        assert!(r.with_id(0).ingredients.is_empty());
    }
}
