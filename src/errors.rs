//! # Error Types Module
//!
//! This module defines the error types shared by the catalog, the menu store
//! and the extraction pipeline. Structural failures abort the operation and
//! carry enough detail for a human to decide the next manual step.

use std::fmt;
use thiserror::Error;

use crate::recipe_model::{MenuId, RecipeId};

/// Kind of entity a lookup failed to find
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Item,
    Menu,
    Recipe,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Item => write!(f, "item"),
            EntityKind::Menu => write!(f, "menu"),
            EntityKind::Recipe => write!(f, "recipe"),
        }
    }
}

/// Reason a piece of model output was rejected by the extraction validator
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    /// No balanced `{...}` span in the raw text
    NoStructuredData,
    /// The span was found but is not valid JSON
    MalformedData(String),
    /// A required field is absent or has the wrong shape
    MissingField(String),
    /// Too few ingredients are mentioned in the instructions
    SemanticMismatch {
        match_ratio: f64,
        threshold: f64,
        unmatched: Vec<String>,
    },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::NoStructuredData => write!(f, "no structured data found in model output"),
            Rejection::MalformedData(detail) => write!(f, "malformed data: {detail}"),
            Rejection::MissingField(field) => write!(f, "missing or invalid field: {field}"),
            Rejection::SemanticMismatch {
                match_ratio,
                threshold,
                unmatched,
            } => write!(
                f,
                "semantic mismatch: {:.0}% of ingredients appear in the instructions (need {:.0}%), unmatched: {}",
                match_ratio * 100.0,
                threshold * 100.0,
                unmatched.join(", ")
            ),
        }
    }
}

impl std::error::Error for Rejection {}

/// Errors raised by catalog, store and pipeline operations
#[derive(Debug, Error)]
pub enum KitchenError {
    #[error("item already exists: {0}")]
    DuplicateItem(String),

    #[error("{kind} not found: {key}")]
    NotFound { kind: EntityKind, key: String },

    #[error("item already confirmed: {0}")]
    AlreadyConfirmed(String),

    #[error("unknown item: {0}")]
    UnknownItem(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("extraction rejected: {0}")]
    Rejected(Rejection),

    #[error("text generation failed: {0}")]
    Generation(String),
}

impl KitchenError {
    pub fn item_not_found(name: &str) -> Self {
        KitchenError::NotFound {
            kind: EntityKind::Item,
            key: name.to_string(),
        }
    }

    pub fn menu_not_found(id: MenuId) -> Self {
        KitchenError::NotFound {
            kind: EntityKind::Menu,
            key: id.to_string(),
        }
    }

    pub fn recipe_not_found(id: RecipeId) -> Self {
        KitchenError::NotFound {
            kind: EntityKind::Recipe,
            key: id.to_string(),
        }
    }
}

impl From<Rejection> for KitchenError {
    fn from(rejection: Rejection) -> Self {
        KitchenError::Rejected(rejection)
    }
}

pub type KitchenResult<T> = Result<T, KitchenError>;
