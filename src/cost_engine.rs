//! # Cost Engine
//!
//! Pure recomputation of derived costs. A recipe's price is
//! `Σ (unit_price / pack_quantity) * amount * scaling_factor` over its lines and
//! a menu's cost is the sum of its recipes' prices. Nothing here fails: pack
//! quantities are guaranteed positive by the catalog.

use log::{debug, warn};

use crate::catalog::Catalog;
use crate::recipe_model::{IngredientLine, Menu, Recipe};
use crate::store::MenuStore;

/// Cost of one ingredient line at the given scaling factor
pub fn line_cost(line: &IngredientLine, scaling_factor: f64, catalog: &Catalog) -> f64 {
    match catalog.get(&line.item) {
        Some(item) => item.cost_per_unit() * line.amount * scaling_factor,
        None => {
            // Items are never removed, so this only happens with a foreign catalog
            warn!("Ingredient line references missing item '{}'", line.item);
            0.0
        }
    }
}

pub fn recost_recipe(recipe: &mut Recipe, catalog: &Catalog) {
    let scaling_factor = recipe.scaling_factor;
    recipe.derived_price = recipe
        .lines
        .iter()
        .map(|line| line_cost(line, scaling_factor, catalog))
        .sum();
    debug!(
        "Recipe {} '{}' costs {:.4}",
        recipe.id, recipe.name, recipe.derived_price
    );
}

pub fn recost_menu(menu: &mut Menu) {
    menu.derived_cost = menu.recipes.iter().map(|recipe| recipe.derived_price).sum();
    debug!("Menu {} '{}' costs {:.4}", menu.id, menu.name, menu.derived_cost);
}

/// Recompute every recipe (menu-owned and standalone) and every menu
pub fn recost_all(store: &mut MenuStore, catalog: &Catalog) {
    for menu in store.menus_mut() {
        for recipe in menu.recipes.iter_mut() {
            recost_recipe(recipe, catalog);
        }
        recost_menu(menu);
    }
    for recipe in store.standalone_recipes_mut() {
        recost_recipe(recipe, catalog);
    }
    debug!("Recost pass complete");
}
