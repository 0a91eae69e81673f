use serde::{Deserialize, Serialize};

/// One recommendable game from the catalog artifact. Loaded once at startup
/// and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub appid: u32,
    pub name: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub header_image: String,
    /// Precomputed feature text (description, tags and genres concatenated
    /// by the offline training pipeline).
    pub combined_features: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendRequest {
    pub game_names: Vec<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub recommendations: Vec<Recommendation>,
}

/// Outgoing recommendation. Deliberately carries no scoring fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub name: String,
    pub short_description: String,
    pub header_image: String,
    pub appid: u32,
}

/// Request-scoped candidate collected during catalog search, scored by
/// cosine similarity against the taste profile.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub appid: u32,
    pub name: String,
    pub short_description: String,
    pub header_image: String,
    pub similarity: f32,
}

impl Candidate {
    pub fn from_entry(entry: &CatalogEntry, similarity: f32) -> Self {
        Self {
            appid: entry.appid,
            name: entry.name.clone(),
            short_description: entry.short_description.clone(),
            header_image: entry.header_image.clone(),
            similarity,
        }
    }

    /// Strips the internal similarity score off before the value crosses the
    /// response boundary.
    pub fn into_recommendation(self) -> Recommendation {
        Recommendation {
            name: self.name,
            short_description: self.short_description,
            header_image: self.header_image,
            appid: self.appid,
        }
    }
}
