//! # Menu Costing Walkthrough
//!
//! Builds a small catalog and menu, shows how prices follow catalog updates,
//! then imports a recipe through the extraction pipeline using a canned
//! generator instead of a live model.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use menu_costing::catalog::{Catalog, ItemUpdate};
use menu_costing::extraction_config::ValidatorConfig;
use menu_costing::generator::TextGenerator;
use menu_costing::pipeline::ExtractionPipeline;
use menu_costing::recipe_model::NewRecipe;
use menu_costing::snapshot::MenuSnapshot;
use menu_costing::store::MenuStore;

/// Answers every prompt with the same recipe
struct Offline;

#[async_trait]
impl TextGenerator for Offline {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Ok(r#"Here you go:
{"name": "Buttermilk Pancakes",
 "instructions": "Whisk flour, sugar and baking powder. Beat in eggs, buttermilk and melted butter. Fry.",
 "servingQuantity": 4,
 "dishType": "breakfast",
 "ingredients": [
   {"name": "flour", "amount": "1 1/2"},
   {"name": "sugar", "amount": 0.125},
   {"name": "baking powder", "amount": 0.1},
   {"name": "eggs", "amount": 2},
   {"name": "buttermilk", "amount": 1.25},
   {"name": "butter", "amount": "1/8"}
 ]}"#
        .to_string())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("🧑‍🍳 Menu Costing Walkthrough\n");

    // Example 1: Catalog entry
    println!("📝 Example 1: Catalog");
    let mut catalog = Catalog::new();
    catalog.enter("Flour", 3.00, 5.0, "lbs", "Corner Market")?;
    catalog.enter("Sugar", 2.50, 4.0, "lbs", "Corner Market")?;
    catalog.enter("Eggs", 4.20, 12.0, "each", "Farm Stand")?;
    catalog.enter("Butter", 5.00, 1.0, "lbs", "Corner Market")?;
    catalog.enter("Buttermilk", 2.40, 4.0, "cups", "Farm Stand")?;
    catalog.confirm("flour")?;
    for item in catalog.items() {
        println!("  • {} (${:.3} per {})", item, item.cost_per_unit(), item.unit);
    }
    println!();

    // Example 2: A menu with one hand-built recipe
    println!("📝 Example 2: Recipe costing");
    let mut store = MenuStore::new();
    let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap_or_default();
    let menu_id = store.create_menu("Sunday brunch", date).id;
    let draft = NewRecipe::new("Sponge cake", "Cream butter and sugar, add eggs and flour.", 8, "dessert");
    let cake = store.create_recipe(menu_id, draft)?.id;
    for (item, amount) in [("flour", 1.5), ("sugar", 1.0), ("eggs", 4.0), ("butter", 0.5)] {
        let recipe = store.set_ingredient(&catalog, menu_id, cake, item, amount)?;
        println!("  + {} {} → recipe ${:.2}", amount, item, recipe.derived_price());
    }
    let cake_recipe = store.recipe(cake).map(|r| (r.derived_price(), r.price_per_serving()));
    if let Some((price, per_serving)) = cake_recipe {
        println!("  Sponge cake: ${:.2} (${:.2} per serving)", price, per_serving);
    }
    println!();

    // Example 3: A price change flows into every recipe
    println!("📝 Example 3: Catalog update");
    catalog.update("butter", ItemUpdate::default().with_price(6.50), &mut store)?;
    if let Some(menu) = store.menu(menu_id) {
        println!("  Butter now $6.50 → menu cost ${:.2}", menu.derived_cost());
    }
    println!();

    // Example 4: Importing a recipe from model output
    println!("📝 Example 4: Extraction pipeline");
    let pipeline = ExtractionPipeline::new(Offline, ValidatorConfig::default());
    let outcome = pipeline
        .run(&catalog, &mut store, menu_id, None, "https://example.com/pancakes")
        .await?;
    println!("  Match ratio: {:.0}%", outcome.match_ratio * 100.0);
    print!("  {}", outcome.report);
    println!();

    // Example 5: Snapshot for display
    println!("📝 Example 5: Menu snapshot");
    if let Some(menu) = store.menu(menu_id) {
        let snapshot = MenuSnapshot::capture(menu, &catalog);
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }

    Ok(())
}
