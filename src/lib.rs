pub mod algorithms;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::*;

use anyhow::Result;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Arc<services::catalog::CatalogService>,
    pub pipeline: Arc<services::pipeline::FeaturePipeline>,
    pub cooldown: Arc<services::cooldown::CooldownCache>,
    pub recommendation_service: Arc<services::recommendation::RecommendationService>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let config = Arc::new(config);

        let catalog = Arc::new(services::catalog::CatalogService::load(
            &config.model.catalog_path,
        )?);

        let pipeline = Arc::new(services::pipeline::FeaturePipeline::load(&config.model)?);

        let cooldown = Arc::new(services::cooldown::CooldownCache::from_config(
            &config.cooldown,
        ));

        let recommendation_service = Arc::new(services::recommendation::RecommendationService::new(
            catalog.clone(),
            pipeline.clone(),
            cooldown.clone(),
            config.clone(),
        ));

        Ok(Self {
            config,
            catalog,
            pipeline,
            cooldown,
            recommendation_service,
        })
    }
}

pub async fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}
