use crate::RecipeId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("recipe {0} does not exist")]
    UnknownRecipe(RecipeId),

    #[error("recipe name must not be empty")]
    EmptyName,

    #[error("recipe {recipe:?} has an ingredient without a name at position {position}")]
    MalformedIngredient { recipe: String, position: usize },

    #[error("bulk-loaded recipe has id {found}, expected {expected}")]
    NonSequentialId { expected: RecipeId, found: RecipeId },

    #[error("unknown recipe category {0:?}")]
    UnknownCategory(String),

    #[error(transparent)]
    Selection(#[from] SelectionError),
}

/// Caller-contract violations on the favorites and shopping-list stores.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("quantity must not be negative, got {0}")]
    NegativeQuantity(i64),

    #[error("quantity {quantity} exceeds the maximum of {max}")]
    QuantityTooLarge { quantity: i64, max: u32 },

    #[error("serialized shopping list has an odd number of elements ({0})")]
    OddPairCount(usize),

    #[error("serialized selection contains a non-integer token {0:?}")]
    InvalidNumber(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("unparseable amount term {0:?}")]
    Malformed(String),

    #[error("fraction {0:?} has a zero denominator")]
    ZeroDenominator(String),
}
