use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub recommendation: RecommendationConfig,
    pub cooldown: CooldownConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

/// Paths to the artifacts exported by the offline training pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub catalog_path: String,
    pub vectorizer_path: String,
    pub classifier_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationConfig {
    /// How many scored candidates to collect before sampling.
    pub candidate_pool_size: usize,
    /// Catalog rows classified per pipeline pass.
    pub batch_size: usize,
    /// Final recommendation count per response.
    pub num_recommendations: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CooldownConfig {
    /// How long a recommended game stays suppressed, in seconds.
    pub window_seconds: i64,
    /// Per-user cap on tracked recommendations; oldest evicted first.
    pub max_recent_items: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                workers: num_cpus::get(),
            },
            model: ModelConfig {
                catalog_path: "model/catalog.json".to_string(),
                vectorizer_path: "model/vectorizer.json".to_string(),
                classifier_path: "model/classifier.json".to_string(),
            },
            recommendation: RecommendationConfig {
                candidate_pool_size: 50,
                batch_size: 1000,
                num_recommendations: 5,
            },
            cooldown: CooldownConfig {
                window_seconds: 3 * 24 * 60 * 60,
                max_recent_items: 20,
            },
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("GAMEREC"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_design_values() {
        let config = Config::default();
        assert_eq!(config.recommendation.candidate_pool_size, 50);
        assert_eq!(config.recommendation.batch_size, 1000);
        assert_eq!(config.recommendation.num_recommendations, 5);
        assert_eq!(config.cooldown.window_seconds, 259_200);
        assert_eq!(config.cooldown.max_recent_items, 20);
    }
}
