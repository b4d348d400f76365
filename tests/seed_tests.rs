//! # Catalog Seed Tests
//!
//! Loading a catalog from a JSON seed file on disk.

use std::io::Write;

use anyhow::Result;
use menu_costing::catalog::Catalog;
use menu_costing::units::Unit;
use tempfile::NamedTempFile;

fn seed_file(content: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(content.as_bytes())?;
    Ok(file)
}

#[test]
fn test_load_seed_enters_every_item() -> Result<()> {
    let file = seed_file(
        r#"[
            {"name": "Flour", "unit_price": 3.00, "pack_quantity": 5, "unit": "lbs", "store": "Corner Market", "confirmed": true},
            {"name": "Eggs", "unit_price": 4.20, "pack_quantity": 12, "unit": "each"},
            {"name": "Saffron", "unit_price": 9.99, "pack_quantity": 1, "unit": "pinch", "store": "Spice Co"}
        ]"#,
    )?;

    let catalog = Catalog::load_seed(file.path())?;

    assert_eq!(catalog.len(), 3);
    let flour = catalog.lookup("flour").unwrap();
    assert!(flour.confirmed);
    assert_eq!(flour.unit, Unit::Pounds);
    assert!((flour.cost_per_unit() - 0.60).abs() < 1e-9);

    let eggs = catalog.lookup("EGGS").unwrap();
    assert!(!eggs.confirmed);
    assert_eq!(eggs.store, "");

    assert_eq!(
        catalog.lookup("saffron").unwrap().unit,
        Unit::Unknown("pinch".to_string())
    );
    let unconfirmed: Vec<&str> = catalog
        .unconfirmed()
        .iter()
        .map(|item| item.name.as_str())
        .collect();
    assert_eq!(unconfirmed, vec!["Eggs", "Saffron"]);
    Ok(())
}

#[test]
fn test_load_seed_rejects_malformed_json() -> Result<()> {
    let file = seed_file(r#"[{"name": "Flour", "unit_price": }]"#)?;

    let err = Catalog::load_seed(file.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse catalog seed"));
    Ok(())
}

#[test]
fn test_load_seed_rejects_duplicate_names() -> Result<()> {
    let file = seed_file(
        r#"[
            {"name": "Sugar", "unit_price": 2.50, "pack_quantity": 4, "unit": "lbs"},
            {"name": "  sugar ", "unit_price": 1.00, "pack_quantity": 1, "unit": "lbs"}
        ]"#,
    )?;

    let err = Catalog::load_seed(file.path()).unwrap_err();
    assert!(format!("{err:#}").contains("item already exists"));
    Ok(())
}

#[test]
fn test_load_seed_rejects_invalid_values() -> Result<()> {
    let file = seed_file(
        r#"[{"name": "Milk", "unit_price": 2.00, "pack_quantity": 0, "unit": "gallon"}]"#,
    )?;

    let err = Catalog::load_seed(file.path()).unwrap_err();
    assert!(err.to_string().contains("Invalid catalog entry 'Milk'"));
    Ok(())
}

#[test]
fn test_load_seed_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.json");

    let err = Catalog::load_seed(&missing).unwrap_err();
    assert!(err.to_string().contains("Failed to read catalog seed"));
}
