use crate::algorithms::sampler;
use crate::config::Config;
use crate::error::AppError;
use crate::models::{Candidate, CatalogEntry, Recommendation, RecommendRequest};
use crate::services::catalog::CatalogService;
use crate::services::cooldown::CooldownCache;
use crate::services::pipeline::FeaturePipeline;
use crate::utils::{argsort_descending, cosine_similarity, mean_rows, user_cache_key};
use anyhow::{anyhow, Result};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Drives one recommendation request end to end: resolve the user key,
/// sweep the cooldown cache, match owned games, build the taste profile,
/// search candidates, sample the final set and record it.
pub struct RecommendationService {
    catalog: Arc<CatalogService>,
    pipeline: Arc<FeaturePipeline>,
    cooldown: Arc<CooldownCache>,
    config: Arc<Config>,
}

impl RecommendationService {
    pub fn new(
        catalog: Arc<CatalogService>,
        pipeline: Arc<FeaturePipeline>,
        cooldown: Arc<CooldownCache>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            catalog,
            pipeline,
            cooldown,
            config,
        }
    }

    pub async fn recommend(&self, request: &RecommendRequest) -> Result<Vec<Recommendation>, AppError> {
        let now = Utc::now();
        let user_key = user_cache_key(request.user_id.as_deref(), &request.game_names);

        self.cooldown.sweep_expired(now);
        let recent = self.cooldown.recent_items_for(&user_key, now);

        let owned: HashSet<&str> = request.game_names.iter().map(String::as_str).collect();
        let matched = self.catalog.match_names(&owned);
        if matched.is_empty() {
            return Err(AppError::NotFound(
                "No matching games found in catalog".to_string(),
            ));
        }
        debug!(
            "Matched {} of {} owned games for {}",
            matched.len(),
            owned.len(),
            user_key
        );

        let profile = self.build_taste_profile(&matched)?;
        let candidates = self.find_candidates(&profile, &owned, &recent)?;
        let selected = sampler::select_recommendations(
            candidates,
            self.config.recommendation.num_recommendations,
            &mut rand::thread_rng(),
        )?;

        let appids: Vec<u32> = selected.iter().map(|candidate| candidate.appid).collect();
        self.cooldown.record(&user_key, &appids, now);

        Ok(selected.into_iter().map(Candidate::into_recommendation).collect())
    }

    /// Element-wise mean of the classifier's genre distributions over the
    /// user's catalog-matched games.
    fn build_taste_profile(&self, matched: &[&CatalogEntry]) -> Result<Vec<f32>> {
        let texts: Vec<&str> = matched
            .iter()
            .map(|entry| entry.combined_features.as_str())
            .collect();
        let probabilities = self.pipeline.genre_probabilities(&texts)?;

        let profile = mean_rows(&probabilities);
        if profile.is_empty() {
            return Err(anyhow!("taste profile came out empty"));
        }

        Ok(profile)
    }

    /// Scans the catalog in fixed-size batches and collects up to
    /// `candidate_pool_size` eligible games, scored by cosine similarity to
    /// the taste profile. Stops as soon as the pool is full; bounded latency
    /// is preferred over globally best candidates.
    fn find_candidates(
        &self,
        profile: &[f32],
        owned: &HashSet<&str>,
        recent: &HashSet<u32>,
    ) -> Result<Vec<Candidate>> {
        let pool_size = self.config.recommendation.candidate_pool_size;
        let batch_size = self.config.recommendation.batch_size;
        let mut candidates: Vec<Candidate> = Vec::with_capacity(pool_size);

        for batch in self.catalog.entries().chunks(batch_size) {
            // Entirely-owned batches have nothing to offer; skip them before
            // paying for the pipeline.
            if batch.iter().all(|entry| owned.contains(entry.name.as_str())) {
                continue;
            }

            let texts: Vec<&str> = batch
                .iter()
                .map(|entry| entry.combined_features.as_str())
                .collect();
            let probabilities = self.pipeline.genre_probabilities(&texts)?;
            let similarities: Vec<f32> = probabilities
                .iter()
                .map(|row| cosine_similarity(profile, row))
                .collect();

            for index in argsort_descending(&similarities) {
                let entry = &batch[index];
                if owned.contains(entry.name.as_str()) || recent.contains(&entry.appid) {
                    continue;
                }

                candidates.push(Candidate::from_entry(entry, similarities[index]));
                if candidates.len() >= pool_size {
                    break;
                }
            }

            if candidates.len() >= pool_size {
                break;
            }
        }

        Ok(candidates)
    }
}
