use anyhow::{Context, Result};
use chrono::Local;
use log::{info, warn};
use std::env;

use menu_costing::catalog::Catalog;
use menu_costing::extraction_config::PipelineConfig;
use menu_costing::generator::HttpTextGenerator;
use menu_costing::pipeline::ExtractionPipeline;
use menu_costing::snapshot::MenuSnapshot;
use menu_costing::store::MenuStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let source = env::args()
        .nth(1)
        .context("usage: menu_costing <recipe URL or text>")?;

    let config = PipelineConfig::from_env();
    info!(
        "Starting extraction with match threshold {:.2}",
        config.validator.match_threshold
    );

    let catalog = match &config.catalog_seed_path {
        Some(path) => Catalog::load_seed(path)?,
        None => {
            warn!("CATALOG_SEED_PATH not set, every ingredient will be unresolved");
            Catalog::new()
        }
    };

    let mut store = MenuStore::new();
    let menu_id = store.create_menu("Imported", Local::now().date_naive()).id;

    let generator = HttpTextGenerator::new(config.generator.clone())?;
    let pipeline = ExtractionPipeline::new(generator, config.validator.clone());

    let outcome = pipeline
        .run(&catalog, &mut store, menu_id, None, &source)
        .await?;

    print!("{}", outcome.report);
    if let Some(menu) = store.menu(menu_id) {
        let snapshot = MenuSnapshot::capture(menu, &catalog);
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }

    Ok(())
}
