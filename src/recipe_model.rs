//! # Recipe and Menu Data Model
//!
//! There is a single `Recipe` type whether or not a recipe belongs to a menu;
//! `menu_id` records the attachment. Derived cost fields are only written by
//! the cost engine.
//!
//! ## Usage
//!
//! ```rust
//! use menu_costing::recipe_model::NewRecipe;
//!
//! let draft = NewRecipe::new("Pancakes", "Whisk flour and milk, then fry.", 4, "breakfast")
//!     .with_scaling_factor(1.5);
//! assert_eq!(draft.scaling_factor, 1.5);
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::ItemKey;
use crate::errors::{KitchenError, KitchenResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MenuId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecipeId(pub u64);

impl fmt::Display for MenuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M{}", self.0)
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}

/// A recipe's reference to a catalog item plus the amount it needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientLine {
    /// Key into the catalog, never a copy of the item
    pub item: ItemKey,
    /// Amount in the item's own unit
    pub amount: f64,
}

/// Descriptive fields for a recipe that is about to be created
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecipe {
    pub name: String,
    pub instructions: String,
    pub serving_quantity: u32,
    pub dish_type: String,
    pub scaling_factor: f64,
}

impl NewRecipe {
    pub fn new(name: &str, instructions: &str, serving_quantity: u32, dish_type: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            instructions: instructions.to_string(),
            serving_quantity,
            dish_type: dish_type.trim().to_string(),
            scaling_factor: 1.0,
        }
    }

    pub fn with_scaling_factor(mut self, scaling_factor: f64) -> Self {
        self.scaling_factor = scaling_factor;
        self
    }

    pub(crate) fn validate(&self) -> KitchenResult<()> {
        if self.name.is_empty() {
            return Err(KitchenError::InvalidInput(
                "recipe name must not be empty".to_string(),
            ));
        }
        if self.serving_quantity == 0 {
            return Err(KitchenError::InvalidInput(
                "serving quantity must be greater than zero".to_string(),
            ));
        }
        validate_scaling_factor(self.scaling_factor)
    }
}

pub(crate) fn validate_scaling_factor(scaling_factor: f64) -> KitchenResult<()> {
    if !scaling_factor.is_finite() || scaling_factor <= 0.0 {
        return Err(KitchenError::InvalidInput(format!(
            "scaling factor must be positive, got {scaling_factor}"
        )));
    }
    Ok(())
}

pub(crate) fn validate_amount(amount: f64) -> KitchenResult<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(KitchenError::InvalidInput(format!(
            "ingredient amount must be a non-negative number, got {amount}"
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recipe {
    pub id: RecipeId,
    /// Owning menu, `None` for a standalone recipe
    pub menu_id: Option<MenuId>,
    pub name: String,
    pub instructions: String,
    pub serving_quantity: u32,
    pub dish_type: String,
    pub(crate) scaling_factor: f64,
    pub(crate) lines: Vec<IngredientLine>,
    pub(crate) derived_price: f64,
}

impl Recipe {
    pub(crate) fn from_draft(id: RecipeId, menu_id: Option<MenuId>, draft: NewRecipe) -> Self {
        Self {
            id,
            menu_id,
            name: draft.name,
            instructions: draft.instructions,
            serving_quantity: draft.serving_quantity,
            dish_type: draft.dish_type,
            scaling_factor: draft.scaling_factor,
            lines: Vec::new(),
            derived_price: 0.0,
        }
    }

    pub fn scaling_factor(&self) -> f64 {
        self.scaling_factor
    }

    /// Ingredient lines in insertion order
    pub fn lines(&self) -> &[IngredientLine] {
        &self.lines
    }

    pub fn line(&self, item: &ItemKey) -> Option<&IngredientLine> {
        self.lines.iter().find(|line| &line.item == item)
    }

    pub fn derived_price(&self) -> f64 {
        self.derived_price
    }

    pub fn price_per_serving(&self) -> f64 {
        self.derived_price / self.serving_quantity as f64
    }

    /// Overwrite the amount for an existing item or append a new line
    pub(crate) fn upsert_line(&mut self, item: ItemKey, amount: f64) {
        match self.lines.iter_mut().find(|line| line.item == item) {
            Some(line) => line.amount = amount,
            None => self.lines.push(IngredientLine { item, amount }),
        }
    }

    /// Replace the descriptive fields, keeping id, lines and scaling factor
    pub(crate) fn apply_details(&mut self, draft: NewRecipe) {
        self.name = draft.name;
        self.instructions = draft.instructions;
        self.serving_quantity = draft.serving_quantity;
        self.dish_type = draft.dish_type;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Menu {
    pub id: MenuId,
    pub name: String,
    pub date: NaiveDate,
    pub(crate) recipes: Vec<Recipe>,
    pub(crate) derived_cost: f64,
}

impl Menu {
    pub(crate) fn new(id: MenuId, name: &str, date: NaiveDate) -> Self {
        Self {
            id,
            name: name.trim().to_string(),
            date,
            recipes: Vec::new(),
            derived_cost: 0.0,
        }
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn recipe(&self, id: RecipeId) -> Option<&Recipe> {
        self.recipes.iter().find(|recipe| recipe.id == id)
    }

    pub fn derived_cost(&self) -> f64 {
        self.derived_cost
    }
}
