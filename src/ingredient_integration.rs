//! # Ingredient Integration
//!
//! Resolves the ingredient names of an accepted extraction against the catalog
//! and writes the resolved ones into a stored recipe. Unresolved names are
//! warnings, not failures: the recipe keeps every ingredient that did resolve
//! and the report lists the rest so the caller can ask for manual entry.

use log::{info, warn};
use serde::Serialize;
use std::fmt;

use crate::catalog::Catalog;
use crate::errors::{KitchenError, KitchenResult};
use crate::extraction_validator::ExtractionCandidate;
use crate::recipe_model::{validate_amount, MenuId, RecipeId};
use crate::store::MenuStore;

/// An extracted ingredient with no catalog match
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnresolvedIngredient {
    pub name: String,
    pub amount: f64,
}

/// Outcome of integrating one candidate into one recipe
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntegrationReport {
    pub recipe_id: RecipeId,
    /// Catalog names of the items that were attached, one per recipe line, in
    /// first-seen order
    pub resolved: Vec<String>,
    pub unresolved: Vec<UnresolvedIngredient>,
}

impl IntegrationReport {
    fn new(recipe_id: RecipeId) -> Self {
        Self {
            recipe_id,
            resolved: Vec::new(),
            unresolved: Vec::new(),
        }
    }

    pub fn resolved_count(&self) -> usize {
        self.resolved.len()
    }

    pub fn unresolved_count(&self) -> usize {
        self.unresolved.len()
    }

    pub fn unresolved_names(&self) -> Vec<&str> {
        self.unresolved.iter().map(|u| u.name.as_str()).collect()
    }

    /// Share of candidate ingredients that resolved (1.0 for an empty candidate)
    pub fn resolution_rate(&self) -> f64 {
        let total = self.resolved_count() + self.unresolved_count();
        if total == 0 {
            return 1.0;
        }
        self.resolved_count() as f64 / total as f64
    }

    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

impl fmt::Display for IntegrationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Recipe {}: {} ingredients resolved, {} unresolved ({:.0}% resolved)",
            self.recipe_id,
            self.resolved_count(),
            self.unresolved_count(),
            self.resolution_rate() * 100.0
        )?;
        if !self.unresolved.is_empty() {
            writeln!(f, "Needs manual entry:")?;
            for missing in &self.unresolved {
                writeln!(f, "  ? {} ({})", missing.name, missing.amount)?;
            }
        }
        Ok(())
    }
}

/// Attach a candidate's ingredients to a recipe owned by `menu_id`
///
/// Creates no catalog items. Fails when the menu or recipe is missing, or with
/// `InvalidInput` when any amount is negative or not finite; in every failure
/// case the recipe is left untouched.
pub fn integrate(
    catalog: &Catalog,
    store: &mut MenuStore,
    menu_id: MenuId,
    recipe_id: RecipeId,
    candidate: &ExtractionCandidate,
) -> KitchenResult<IntegrationReport> {
    let menu = store
        .menu(menu_id)
        .ok_or_else(|| KitchenError::menu_not_found(menu_id))?;
    if menu.recipe(recipe_id).is_none() {
        return Err(KitchenError::recipe_not_found(recipe_id));
    }
    integrate_into_recipe(catalog, store, recipe_id, candidate)
}

/// Attach a candidate's ingredients to any recipe, standalone or menu-owned
pub fn integrate_into_recipe(
    catalog: &Catalog,
    store: &mut MenuStore,
    recipe_id: RecipeId,
    candidate: &ExtractionCandidate,
) -> KitchenResult<IntegrationReport> {
    if store.recipe(recipe_id).is_none() {
        return Err(KitchenError::recipe_not_found(recipe_id));
    }
    for ingredient in &candidate.ingredients {
        validate_amount(ingredient.amount).map_err(|_| {
            KitchenError::InvalidInput(format!(
                "amount for '{}' must be a non-negative number, got {}",
                ingredient.name, ingredient.amount
            ))
        })?;
    }

    let mut report = IntegrationReport::new(recipe_id);
    for ingredient in &candidate.ingredients {
        match catalog.lookup(&ingredient.name) {
            Some(item) => {
                let item_name = item.name.clone();
                store.set_recipe_ingredient(catalog, recipe_id, &item_name, ingredient.amount)?;
                // a repeated item overwrites its line, so it is listed once
                if !report.resolved.contains(&item_name) {
                    report.resolved.push(item_name);
                }
            }
            None => {
                warn!(
                    "Unresolved ingredient '{}' for recipe {}",
                    ingredient.name, recipe_id
                );
                report.unresolved.push(UnresolvedIngredient {
                    name: ingredient.name.clone(),
                    amount: ingredient.amount,
                });
            }
        }
    }

    info!(
        "Integrated '{}' into recipe {}: {} resolved, {} unresolved",
        candidate.name,
        recipe_id,
        report.resolved_count(),
        report.unresolved_count()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction_validator::ExtractedIngredient;
    use crate::recipe_model::NewRecipe;
    use chrono::NaiveDate;

    fn candidate(names: &[(&str, f64)]) -> ExtractionCandidate {
        ExtractionCandidate {
            name: "Crepes".to_string(),
            instructions: "Whisk everything.".to_string(),
            serving_quantity: 4,
            dish_type: "dessert".to_string(),
            ingredients: names
                .iter()
                .map(|(name, amount)| ExtractedIngredient {
                    name: name.to_string(),
                    amount: *amount,
                })
                .collect(),
            match_ratio: 1.0,
        }
    }

    fn setup() -> (Catalog, MenuStore, MenuId, RecipeId) {
        let mut catalog = Catalog::new();
        catalog.enter("Flour", 3.00, 5.0, "lbs", "Market").unwrap();
        catalog.enter("Milk", 2.00, 4.0, "cups", "Market").unwrap();

        let mut store = MenuStore::new();
        let menu_id = store
            .create_menu("Brunch", NaiveDate::from_ymd_opt(2026, 10, 19).unwrap())
            .id;
        let recipe_id = store
            .create_recipe(menu_id, NewRecipe::new("Crepes", "Whisk.", 4, "dessert"))
            .unwrap()
            .id;
        (catalog, store, menu_id, recipe_id)
    }

    #[test]
    fn test_partial_resolution_keeps_going() {
        let (catalog, mut store, menu_id, recipe_id) = setup();
        let candidate = candidate(&[("flour", 2.0), ("dragon fruit", 1.0), ("MILK", 2.0)]);

        let report = integrate(&catalog, &mut store, menu_id, recipe_id, &candidate).unwrap();

        assert_eq!(report.resolved, vec!["Flour".to_string(), "Milk".to_string()]);
        assert_eq!(report.unresolved_names(), vec!["dragon fruit"]);
        assert!(!report.is_complete());
        assert!((report.resolution_rate() - 2.0 / 3.0).abs() < 1e-9);

        let recipe = store.recipe(recipe_id).unwrap();
        assert_eq!(recipe.lines().len(), 2);
        assert!((recipe.derived_price() - 2.2).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_amount_leaves_recipe_untouched() {
        let (catalog, mut store, menu_id, recipe_id) = setup();
        store
            .set_ingredient(&catalog, menu_id, recipe_id, "milk", 1.0)
            .unwrap();
        let candidate = candidate(&[("flour", 2.0), ("milk", f64::NAN), ("saffron", 1.0)]);

        let result = integrate(&catalog, &mut store, menu_id, recipe_id, &candidate);

        match result {
            Err(KitchenError::InvalidInput(message)) => assert!(message.contains("milk")),
            other => panic!("expected invalid input, got {other:?}"),
        }
        let recipe = store.recipe(recipe_id).unwrap();
        assert_eq!(recipe.lines().len(), 1);
        assert_eq!(recipe.lines()[0].amount, 1.0);
        assert!((recipe.derived_price() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_repeated_item_is_one_resolved_line() {
        let (catalog, mut store, menu_id, recipe_id) = setup();
        let candidate = candidate(&[("flour", 1.0), ("milk", 1.0), ("FLOUR", 3.0)]);

        let report = integrate(&catalog, &mut store, menu_id, recipe_id, &candidate).unwrap();

        assert_eq!(report.resolved, vec!["Flour".to_string(), "Milk".to_string()]);
        let recipe = store.recipe(recipe_id).unwrap();
        assert_eq!(recipe.lines().len(), 2);
        assert_eq!(recipe.lines()[0].amount, 3.0);
    }

    #[test]
    fn test_missing_targets_fail() {
        let (catalog, mut store, menu_id, recipe_id) = setup();
        let candidate = candidate(&[("flour", 1.0)]);

        assert!(matches!(
            integrate(&catalog, &mut store, MenuId(99), recipe_id, &candidate),
            Err(KitchenError::NotFound { .. })
        ));
        assert!(matches!(
            integrate(&catalog, &mut store, menu_id, RecipeId(99), &candidate),
            Err(KitchenError::NotFound { .. })
        ));
    }

    #[test]
    fn test_report_display_lists_unresolved() {
        let (catalog, mut store, menu_id, recipe_id) = setup();
        let candidate = candidate(&[("flour", 1.0), ("saffron", 0.1)]);

        let report = integrate(&catalog, &mut store, menu_id, recipe_id, &candidate).unwrap();
        let display = report.to_string();

        assert!(display.contains("1 ingredients resolved, 1 unresolved"));
        assert!(display.contains("? saffron"));
    }
}
