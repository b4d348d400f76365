//! # Menu Costing
//!
//! A catalog of purchasable items, menus built from costed recipes, and an
//! extraction pipeline that turns model-generated recipe text into validated,
//! costed recipe records.

pub mod amount_parser;
pub mod catalog;
pub mod cost_engine;
pub mod errors;
pub mod extraction_config;
pub mod extraction_validator;
pub mod generator;
pub mod ingredient_integration;
pub mod pipeline;
pub mod recipe_model;
pub mod snapshot;
pub mod store;
pub mod units;
