//! # Item Catalog
//!
//! The authoritative set of purchasable items. Items are keyed by their
//! normalized name, so `"Flour"` and `" flour "` are the same item. Recipes never
//! copy an item: ingredient lines hold an [`ItemKey`] and the cost engine reads
//! the current price through the catalog, which is what lets a price edit reach
//! every recipe that uses the item.

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::cost_engine::recost_all;
use crate::errors::{KitchenError, KitchenResult};
use crate::store::MenuStore;
use crate::units::Unit;

/// Normalized, case-insensitive item identity
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemKey(String);

impl ItemKey {
    /// Lowercase the name and collapse internal whitespace
    pub fn normalize(name: &str) -> Self {
        ItemKey(
            name.split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
                .to_lowercase(),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A purchasable item with its pack price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Display name as entered (e.g., "All-Purpose Flour")
    pub name: String,
    /// Price of one pack
    pub unit_price: f64,
    /// How many units one pack contains (always > 0)
    pub pack_quantity: f64,
    /// Unit the pack quantity is expressed in
    pub unit: Unit,
    /// Where the item is bought
    pub store: String,
    /// Whether a human has confirmed the price data
    pub confirmed: bool,
}

impl Item {
    pub fn key(&self) -> ItemKey {
        ItemKey::normalize(&self.name)
    }

    /// Cost of a single unit of this item
    pub fn cost_per_unit(&self) -> f64 {
        self.unit_price / self.pack_quantity
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - ${:.2} for {} {} at {}",
            self.name, self.unit_price, self.pack_quantity, self.unit, self.store
        )?;
        if !self.confirmed {
            write!(f, " (unconfirmed)")?;
        }
        Ok(())
    }
}

/// One catalog entry as it appears in a seed file
#[derive(Debug, Clone, Deserialize)]
pub struct ItemEntry {
    pub name: String,
    pub unit_price: f64,
    pub pack_quantity: f64,
    pub unit: String,
    #[serde(default)]
    pub store: String,
    #[serde(default)]
    pub confirmed: bool,
}

/// Partial update for an existing item; `name` and `confirmed` cannot change here
#[derive(Debug, Clone, Default)]
pub struct ItemUpdate {
    pub unit_price: Option<f64>,
    pub pack_quantity: Option<f64>,
    pub unit: Option<String>,
    pub store: Option<String>,
}

impl ItemUpdate {
    pub fn with_price(mut self, unit_price: f64) -> Self {
        self.unit_price = Some(unit_price);
        self
    }

    pub fn with_pack_quantity(mut self, pack_quantity: f64) -> Self {
        self.pack_quantity = Some(pack_quantity);
        self
    }

    pub fn with_unit(mut self, unit: &str) -> Self {
        self.unit = Some(unit.to_string());
        self
    }

    pub fn with_store(mut self, store: &str) -> Self {
        self.store = Some(store.to_string());
        self
    }
}

fn validate_price(unit_price: f64) -> KitchenResult<()> {
    if !unit_price.is_finite() || unit_price < 0.0 {
        return Err(KitchenError::InvalidInput(format!(
            "unit price must be a non-negative number, got {unit_price}"
        )));
    }
    Ok(())
}

fn validate_pack_quantity(pack_quantity: f64) -> KitchenResult<()> {
    if !pack_quantity.is_finite() || pack_quantity <= 0.0 {
        return Err(KitchenError::InvalidInput(format!(
            "pack quantity must be positive, got {pack_quantity}"
        )));
    }
    Ok(())
}

/// Owned table of items keyed by normalized name
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: BTreeMap<ItemKey, Item>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a new, unconfirmed item
    ///
    /// # Errors
    ///
    /// `DuplicateItem` if an item with the same normalized name exists,
    /// `InvalidInput` for an empty name, a negative price or a non-positive
    /// pack quantity.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use menu_costing::catalog::Catalog;
    ///
    /// let mut catalog = Catalog::new();
    /// catalog.enter("Flour", 3.00, 5.0, "lbs", "Corner Market")?;
    /// assert!(catalog.enter("FLOUR", 2.50, 5.0, "lbs", "Elsewhere").is_err());
    /// # Ok::<(), menu_costing::errors::KitchenError>(())
    /// ```
    pub fn enter(
        &mut self,
        name: &str,
        unit_price: f64,
        pack_quantity: f64,
        unit: &str,
        store: &str,
    ) -> KitchenResult<&Item> {
        let display_name = name.trim();
        if display_name.is_empty() {
            return Err(KitchenError::InvalidInput(
                "item name must not be empty".to_string(),
            ));
        }
        validate_price(unit_price)?;
        validate_pack_quantity(pack_quantity)?;

        let key = ItemKey::normalize(display_name);
        if self.items.contains_key(&key) {
            return Err(KitchenError::DuplicateItem(display_name.to_string()));
        }

        info!(
            "Entering item '{}': {} for {} {} at {}",
            display_name, unit_price, pack_quantity, unit, store
        );

        let item = Item {
            name: display_name.to_string(),
            unit_price,
            pack_quantity,
            unit: Unit::parse(unit),
            store: store.trim().to_string(),
            confirmed: false,
        };
        Ok(&*self.items.entry(key).or_insert(item))
    }

    /// Enter an item from a seed entry, confirming it when the entry says so
    pub fn enter_entry(&mut self, entry: &ItemEntry) -> KitchenResult<&Item> {
        let key = self
            .enter(
                &entry.name,
                entry.unit_price,
                entry.pack_quantity,
                &entry.unit,
                &entry.store,
            )?
            .key();
        if entry.confirmed {
            return self.confirm(key.as_str());
        }
        self.get(&key).ok_or_else(|| KitchenError::item_not_found(&entry.name))
    }

    /// Mark an item's price data as confirmed; allowed exactly once
    pub fn confirm(&mut self, name: &str) -> KitchenResult<&Item> {
        let item = self
            .items
            .get_mut(&ItemKey::normalize(name))
            .ok_or_else(|| KitchenError::item_not_found(name))?;

        if item.confirmed {
            return Err(KitchenError::AlreadyConfirmed(item.name.clone()));
        }
        item.confirmed = true;
        info!("Confirmed item '{}'", item.name);
        Ok(&*item)
    }

    /// Update price, pack quantity, unit or store of an item and recost every menu
    ///
    /// The recost runs over the whole store because any number of recipes may
    /// reference the item.
    pub fn update(
        &mut self,
        name: &str,
        changes: ItemUpdate,
        store: &mut MenuStore,
    ) -> KitchenResult<&Item> {
        let key = ItemKey::normalize(name);
        if !self.items.contains_key(&key) {
            return Err(KitchenError::item_not_found(name));
        }
        if let Some(unit_price) = changes.unit_price {
            validate_price(unit_price)?;
        }
        if let Some(pack_quantity) = changes.pack_quantity {
            validate_pack_quantity(pack_quantity)?;
        }

        if let Some(item) = self.items.get_mut(&key) {
            if let Some(unit_price) = changes.unit_price {
                item.unit_price = unit_price;
            }
            if let Some(pack_quantity) = changes.pack_quantity {
                item.pack_quantity = pack_quantity;
            }
            if let Some(unit) = changes.unit.as_deref() {
                item.unit = Unit::parse(unit);
            }
            if let Some(store_name) = changes.store.as_deref() {
                item.store = store_name.trim().to_string();
            }
            info!(
                "Updated item '{}': {} for {} {}",
                item.name, item.unit_price, item.pack_quantity, item.unit
            );
        }

        recost_all(store, self);

        self.items
            .get(&key)
            .ok_or_else(|| KitchenError::item_not_found(name))
    }

    /// Case-insensitive exact lookup; no fuzzy matching
    pub fn lookup(&self, name: &str) -> Option<&Item> {
        let item = self.items.get(&ItemKey::normalize(name));
        if item.is_none() {
            debug!("No catalog item matches '{}'", name);
        }
        item
    }

    pub fn get(&self, key: &ItemKey) -> Option<&Item> {
        self.items.get(key)
    }

    /// All items sorted by normalized name
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// Items still waiting for a confirmation
    pub fn unconfirmed(&self) -> Vec<&Item> {
        self.items.values().filter(|item| !item.confirmed).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Build a catalog from a JSON array of [`ItemEntry`] values
    pub fn load_seed(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog seed {}", path.display()))?;
        let entries: Vec<ItemEntry> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse catalog seed {}", path.display()))?;

        let mut catalog = Catalog::new();
        for entry in &entries {
            catalog
                .enter_entry(entry)
                .with_context(|| format!("Invalid catalog entry '{}'", entry.name))?;
        }

        info!(
            "Loaded {} catalog items from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }
}
