use crate::algorithms::{Classifier, SoftmaxClassifier, TfidfVectorizer};
use crate::config::ModelConfig;
use anyhow::{anyhow, Result};
use std::sync::Arc;
use tracing::info;

/// Pretrained vectorizer/classifier pair. Loaded once at startup, read-only
/// afterwards, shared across concurrent requests.
pub struct FeaturePipeline {
    vectorizer: TfidfVectorizer,
    classifier: Arc<dyn Classifier>,
}

impl FeaturePipeline {
    pub fn load(config: &ModelConfig) -> Result<Self> {
        let vectorizer = TfidfVectorizer::load(&config.vectorizer_path)?;
        let classifier = SoftmaxClassifier::load(&config.classifier_path)?;

        if classifier.dimension() != vectorizer.dimension() {
            return Err(anyhow!(
                "classifier expects {} features but vectorizer produces {}",
                classifier.dimension(),
                vectorizer.dimension()
            ));
        }

        info!(
            "Loaded feature pipeline: {} features, {} genre labels",
            vectorizer.dimension(),
            classifier.labels().len()
        );

        Ok(Self::new(vectorizer, Arc::new(classifier)))
    }

    pub fn new(vectorizer: TfidfVectorizer, classifier: Arc<dyn Classifier>) -> Self {
        Self { vectorizer, classifier }
    }

    pub fn num_labels(&self) -> usize {
        self.classifier.labels().len()
    }

    /// Vectorizes and classifies a batch of feature texts, one genre
    /// distribution per input. Malformed classifier output is an error here
    /// rather than a silent bad score downstream.
    pub fn genre_probabilities(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let vectors = self.vectorizer.transform(texts);
        let probabilities = self.classifier.predict_proba(&vectors)?;

        if probabilities.len() != texts.len() {
            return Err(anyhow!(
                "classifier returned {} rows for {} inputs",
                probabilities.len(),
                texts.len()
            ));
        }
        for row in &probabilities {
            if row.len() != self.num_labels() {
                return Err(anyhow!(
                    "classifier row has {} entries for {} labels",
                    row.len(),
                    self.num_labels()
                ));
            }
            if row.iter().any(|p| !p.is_finite()) {
                return Err(anyhow!("classifier returned non-finite probabilities"));
            }
        }

        Ok(probabilities)
    }
}
