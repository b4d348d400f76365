//! # State Snapshots
//!
//! Plain serializable copies of catalog and menu state, handed to whatever
//! renders them for humans. Line costs are computed on the way out so a
//! renderer never needs catalog access.

use chrono::NaiveDate;
use serde::Serialize;

use crate::catalog::{Catalog, Item};
use crate::cost_engine::line_cost;
use crate::recipe_model::{Menu, MenuId, Recipe, RecipeId};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogSnapshot {
    pub items: Vec<Item>,
    pub unconfirmed_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSnapshot {
    pub item: String,
    pub amount: f64,
    pub unit: String,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeSnapshot {
    pub id: RecipeId,
    pub name: String,
    pub dish_type: String,
    pub serving_quantity: u32,
    pub scaling_factor: f64,
    pub derived_price: f64,
    pub price_per_serving: f64,
    pub lines: Vec<LineSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuSnapshot {
    pub id: MenuId,
    pub name: String,
    pub date: NaiveDate,
    pub derived_cost: f64,
    pub recipes: Vec<RecipeSnapshot>,
}

impl CatalogSnapshot {
    pub fn capture(catalog: &Catalog) -> Self {
        Self {
            items: catalog.items().cloned().collect(),
            unconfirmed_count: catalog.unconfirmed().len(),
        }
    }
}

impl RecipeSnapshot {
    pub fn capture(recipe: &Recipe, catalog: &Catalog) -> Self {
        let lines = recipe
            .lines()
            .iter()
            .map(|line| {
                let item = catalog.get(&line.item);
                LineSnapshot {
                    item: item
                        .map(|item| item.name.clone())
                        .unwrap_or_else(|| line.item.to_string()),
                    amount: line.amount,
                    unit: item
                        .map(|item| item.unit.to_string())
                        .unwrap_or_default(),
                    cost: line_cost(line, recipe.scaling_factor(), catalog),
                }
            })
            .collect();

        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            dish_type: recipe.dish_type.clone(),
            serving_quantity: recipe.serving_quantity,
            scaling_factor: recipe.scaling_factor(),
            derived_price: recipe.derived_price(),
            price_per_serving: recipe.price_per_serving(),
            lines,
        }
    }
}

impl MenuSnapshot {
    pub fn capture(menu: &Menu, catalog: &Catalog) -> Self {
        Self {
            id: menu.id,
            name: menu.name.clone(),
            date: menu.date,
            derived_cost: menu.derived_cost(),
            recipes: menu
                .recipes()
                .iter()
                .map(|recipe| RecipeSnapshot::capture(recipe, catalog))
                .collect(),
        }
    }
}
