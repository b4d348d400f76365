//! # Extraction Pipeline
//!
//! Wires the pieces together: source text → text generator → validator →
//! recipe creation → ingredient integration → recost. The generator call is the
//! only await point; everything after it runs synchronously to completion.
//! Nothing is retried: a generator failure or a rejection goes back to the
//! caller and nothing is created.

use log::info;
use serde::Serialize;

use crate::catalog::Catalog;
use crate::errors::{KitchenError, KitchenResult};
use crate::extraction_config::ValidatorConfig;
use crate::extraction_validator::ExtractionValidator;
use crate::generator::{build_extraction_prompt, SourceLocator, TextGenerator};
use crate::ingredient_integration::{integrate, IntegrationReport};
use crate::recipe_model::{MenuId, NewRecipe, RecipeId};
use crate::store::MenuStore;

/// Result of a successful extraction run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionOutcome {
    pub recipe_id: RecipeId,
    /// `true` when a new recipe was created, `false` when a target was updated
    pub created: bool,
    pub match_ratio: f64,
    pub report: IntegrationReport,
}

pub struct ExtractionPipeline<G: TextGenerator> {
    generator: G,
    validator: ExtractionValidator,
}

impl<G: TextGenerator> ExtractionPipeline<G> {
    pub fn new(generator: G, config: ValidatorConfig) -> Self {
        Self {
            generator,
            validator: ExtractionValidator::new(config),
        }
    }

    pub fn validator(&self) -> &ExtractionValidator {
        &self.validator
    }

    /// Extract a recipe from `source` (a URL or raw text) into `menu_id`
    ///
    /// With `target` set, that recipe's descriptive fields are replaced and the
    /// extracted ingredients merged into its lines; otherwise a new recipe is
    /// created in the menu.
    pub async fn run(
        &self,
        catalog: &Catalog,
        store: &mut MenuStore,
        menu_id: MenuId,
        target: Option<RecipeId>,
        source: &str,
    ) -> KitchenResult<ExtractionOutcome> {
        check_target(store, menu_id, target)?;

        let locator = SourceLocator::parse(source);
        let prompt = build_extraction_prompt(&locator);
        let raw = self
            .generator
            .generate(&prompt)
            .await
            .map_err(|e| KitchenError::Generation(format!("{e:#}")))?;

        self.apply(catalog, store, menu_id, target, &raw)
    }

    /// Validate already generated text and fold it into the store
    pub fn apply(
        &self,
        catalog: &Catalog,
        store: &mut MenuStore,
        menu_id: MenuId,
        target: Option<RecipeId>,
        raw: &str,
    ) -> KitchenResult<ExtractionOutcome> {
        check_target(store, menu_id, target)?;
        let candidate = self.validator.validate(raw).into_result()?;

        let draft = NewRecipe::new(
            &candidate.name,
            &candidate.instructions,
            candidate.serving_quantity,
            &candidate.dish_type,
        );
        let (recipe_id, created) = match target {
            Some(recipe_id) => (store.update_recipe_details(recipe_id, draft)?.id, false),
            None => (store.create_recipe(menu_id, draft)?.id, true),
        };

        let report = integrate(catalog, store, menu_id, recipe_id, &candidate)?;
        info!(
            "Extraction into menu {} finished: recipe {} ({}), {} of {} ingredients resolved",
            menu_id,
            recipe_id,
            if created { "created" } else { "updated" },
            report.resolved_count(),
            candidate.ingredients.len()
        );

        Ok(ExtractionOutcome {
            recipe_id,
            created,
            match_ratio: candidate.match_ratio,
            report,
        })
    }
}

fn check_target(store: &MenuStore, menu_id: MenuId, target: Option<RecipeId>) -> KitchenResult<()> {
    let menu = store
        .menu(menu_id)
        .ok_or_else(|| KitchenError::menu_not_found(menu_id))?;
    if let Some(recipe_id) = target {
        if menu.recipe(recipe_id).is_none() {
            return Err(KitchenError::recipe_not_found(recipe_id));
        }
    }
    Ok(())
}
