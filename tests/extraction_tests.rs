//! # Extraction Tests
//!
//! End-to-end checks of validation and integration over realistic model output.

use anyhow::Result;
use chrono::NaiveDate;
use menu_costing::catalog::Catalog;
use menu_costing::errors::{KitchenError, Rejection};
use menu_costing::extraction_config::ValidatorConfig;
use menu_costing::extraction_validator::{ExtractionValidator, Verdict};
use menu_costing::ingredient_integration::integrate;
use menu_costing::recipe_model::NewRecipe;
use menu_costing::store::MenuStore;
use serde_json::json;

fn recipe_json(instructions: &str, ingredients: &[&str]) -> String {
    let ingredients: Vec<_> = ingredients
        .iter()
        .map(|name| json!({"name": name, "amount": 1}))
        .collect();
    json!({
        "name": "Test dish",
        "instructions": instructions,
        "servingQuantity": 2,
        "dishType": "main",
        "ingredients": ingredients,
    })
    .to_string()
}

#[test]
fn test_text_without_braces_is_rejected() {
    let validator = ExtractionValidator::default();
    let raw = "I could not find a recipe at that address. Please try another link.";

    assert_eq!(
        validator.validate(raw),
        Verdict::Rejected(Rejection::NoStructuredData)
    );
}

#[test]
fn test_unrelated_ingredient_is_semantic_mismatch() {
    let validator = ExtractionValidator::default();
    let raw = recipe_json("Boil the pasta and toss with olive oil.", &["tire rubber"]);

    match validator.validate(&raw) {
        Verdict::Rejected(Rejection::SemanticMismatch {
            match_ratio,
            unmatched,
            ..
        }) => {
            assert_eq!(match_ratio, 0.0);
            assert_eq!(unmatched, vec!["tire rubber".to_string()]);
        }
        other => panic!("expected a semantic mismatch, got {other:?}"),
    }
}

#[test]
fn test_threshold_splits_accept_and_reject() {
    let validator = ExtractionValidator::default();
    let instructions = "Combine the rice, beans, onion, garlic, cumin and stock. \
                        Season with paprika and add a bay leaf.";
    let mentioned = [
        "rice", "black beans", "onion", "garlic", "cumin", "chicken stock", "paprika", "bay leaf",
    ];
    let unrelated = ["motor oil", "tire rubber", "sawdust", "gravel", "wood glue"];

    // 8/8, 7/8 and 6/8 pass; 5/8 and 4/8 do not
    for swapped in 0..=4 {
        let names: Vec<&str> = mentioned[..8 - swapped]
            .iter()
            .chain(unrelated[..swapped].iter())
            .copied()
            .collect();
        let ratio = (8 - swapped) as f64 / 8.0;

        let verdict = validator.validate(&recipe_json(instructions, &names));

        if ratio >= 0.75 {
            assert!(verdict.is_accepted(), "ratio {ratio} should be accepted");
        } else {
            assert!(
                matches!(verdict, Verdict::Rejected(Rejection::SemanticMismatch { .. })),
                "ratio {ratio} should be rejected"
            );
        }
    }
}

#[test]
fn test_threshold_is_configurable() {
    let raw = recipe_json("Toast the bread.", &["bread", "motor oil"]);

    assert!(!ExtractionValidator::default().validate(&raw).is_accepted());
    let lenient = ExtractionValidator::new(ValidatorConfig::with_threshold(0.5));
    assert!(lenient.validate(&raw).is_accepted());
}

#[test]
fn test_code_fenced_output_is_accepted() {
    let raw = r#"Here is the recipe:

```json
{
  "name": "Tomato Soup",
  "instructions": "Roast the tomatoes with garlic, then blend with stock and cream.",
  "servingQuantity": 4,
  "dishType": "starter",
  "ingredients": [
    {"name": "roma tomatoes", "amount": 6},
    {"name": "garlic", "amount": "3"},
    {"name": "vegetable stock", "amount": 2},
    {"name": "heavy cream", "amount": "1/2"}
  ]
}
```"#;

    let candidate = ExtractionValidator::default().validate(raw).into_result().unwrap();
    assert_eq!(candidate.name, "Tomato Soup");
    assert_eq!(candidate.serving_quantity, 4);
    assert_eq!(candidate.ingredients.len(), 4);
    assert_eq!(candidate.ingredients[3].amount, 0.5);
}

#[test]
fn test_partial_resolution_of_ten_ingredients() -> Result<()> {
    let mut catalog = Catalog::new();
    let known = [
        ("flour", 3.00, 5.0),
        ("sugar", 2.50, 4.0),
        ("butter", 5.00, 1.0),
        ("eggs", 4.20, 12.0),
        ("milk", 2.00, 4.0),
        ("salt", 1.00, 2.0),
    ];
    for (name, price, pack) in known {
        catalog.enter(name, price, pack, "lbs", "Market")?;
    }

    let names = [
        "flour", "sugar", "butter", "eggs", "milk", "salt",
        "vanilla", "nutmeg", "cardamom", "saffron",
    ];
    let instructions =
        "Cream butter and sugar with vanilla, beat in eggs and milk, fold in flour, salt, nutmeg, cardamom and saffron.";
    let raw = recipe_json(instructions, &names);

    let candidate = ExtractionValidator::default().validate(&raw).into_result().unwrap();

    let mut store = MenuStore::new();
    let menu_id = store
        .create_menu("Tea", NaiveDate::from_ymd_opt(2026, 10, 19).unwrap())
        .id;
    let recipe_id = store
        .create_recipe(menu_id, NewRecipe::new(&candidate.name, &candidate.instructions, 2, "main"))?
        .id;

    let report = integrate(&catalog, &mut store, menu_id, recipe_id, &candidate)?;

    assert_eq!(report.resolved_count(), 6);
    assert_eq!(report.unresolved.len(), 4);
    assert_eq!(
        report.unresolved_names(),
        vec!["vanilla", "nutmeg", "cardamom", "saffron"]
    );

    let recipe = store.recipe(recipe_id).unwrap();
    assert_eq!(recipe.lines().len(), 6);
    let expected: f64 = known.iter().map(|(_, price, pack)| price / pack).sum();
    assert!((recipe.derived_price() - expected).abs() < 1e-9);
    assert!((store.menu(menu_id).unwrap().derived_cost() - expected).abs() < 1e-9);
    Ok(())
}

#[test]
fn test_rejection_converts_to_kitchen_error() {
    let rejection = ExtractionValidator::default()
        .validate("{\"name\": \"Soup\"}")
        .into_result()
        .unwrap_err();
    let err = KitchenError::from(rejection);

    assert_eq!(
        err.to_string(),
        "extraction rejected: missing or invalid field: instructions"
    );
}
