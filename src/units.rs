//! # Purchase Units
//!
//! Units that catalog items are sold in. Costing never converts between units:
//! an ingredient amount is always expressed in the unit of the item it points at.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Spellings seen on shelf labels and invoices
static UNIT_MAPPINGS: LazyLock<HashMap<&'static str, Unit>> = LazyLock::new(|| {
    [
        ("fl oz", Unit::FluidOunces),
        ("fluid ounces", Unit::FluidOunces),
        ("cup", Unit::Cups),
        ("cups", Unit::Cups),
        ("pint", Unit::Pints),
        ("pints", Unit::Pints),
        ("quart", Unit::Quarts),
        ("quarts", Unit::Quarts),
        ("gal", Unit::Gallons),
        ("gallon", Unit::Gallons),
        ("gallons", Unit::Gallons),
        ("ml", Unit::Milliliters),
        ("l", Unit::Liters),
        ("liter", Unit::Liters),
        ("litre", Unit::Liters),
        ("oz", Unit::Ounces),
        ("ounces", Unit::Ounces),
        ("lb", Unit::Pounds),
        ("lbs", Unit::Pounds),
        ("pounds", Unit::Pounds),
        ("g", Unit::Grams),
        ("grams", Unit::Grams),
        ("kg", Unit::Kilograms),
        ("each", Unit::Pieces),
        ("ea", Unit::Pieces),
        ("ct", Unit::Pieces),
        ("pieces", Unit::Pieces),
        ("dozen", Unit::Dozen),
        ("doz", Unit::Dozen),
        ("pkg", Unit::Packages),
        ("package", Unit::Packages),
        ("can", Unit::Cans),
        ("cans", Unit::Cans),
        ("bottle", Unit::Bottles),
        ("bottles", Unit::Bottles),
        ("bunch", Unit::Bunches),
        ("bunches", Unit::Bunches),
    ]
    .into_iter()
    .collect()
});

/// Measurement units an item can be bought in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    FluidOunces,
    Cups,
    Pints,
    Quarts,
    Gallons,
    Milliliters,
    Liters,
    Ounces,
    Pounds,
    Grams,
    Kilograms,
    Pieces,
    Dozen,
    Packages,
    Cans,
    Bottles,
    Bunches,

    /// Unit text we do not recognise, kept verbatim
    Unknown(String),
}

impl Unit {
    /// Parse free-form unit text, falling back to `Unit::Unknown`
    ///
    /// ```rust
    /// use menu_costing::units::Unit;
    ///
    /// assert_eq!(Unit::parse("LBS"), Unit::Pounds);
    /// assert_eq!(Unit::parse(" Fl Oz "), Unit::FluidOunces);
    /// assert_eq!(Unit::parse("sack"), Unit::Unknown("sack".to_string()));
    /// ```
    pub fn parse(text: &str) -> Self {
        let normalized = text
            .trim()
            .trim_end_matches('.')
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        UNIT_MAPPINGS
            .get(normalized.as_str())
            .cloned()
            .unwrap_or(Unit::Unknown(normalized))
    }

    /// Get a human-readable string representation of the unit
    pub fn display_name(&self) -> &str {
        match self {
            Unit::FluidOunces => "fl oz",
            Unit::Cups => "cups",
            Unit::Pints => "pints",
            Unit::Quarts => "quarts",
            Unit::Gallons => "gallons",
            Unit::Milliliters => "ml",
            Unit::Liters => "L",
            Unit::Ounces => "oz",
            Unit::Pounds => "lbs",
            Unit::Grams => "g",
            Unit::Kilograms => "kg",
            Unit::Pieces => "pieces",
            Unit::Dozen => "dozen",
            Unit::Packages => "packages",
            Unit::Cans => "cans",
            Unit::Bottles => "bottles",
            Unit::Bunches => "bunches",
            Unit::Unknown(text) => text.as_str(),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
