use crate::utils::normalize_vector;
use anyhow::{anyhow, Context, Result};
use rayon::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;

/// Serialized form of a fitted TF-IDF model, exported by the offline
/// training pipeline.
#[derive(Debug, Deserialize)]
struct VectorizerArtifact {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
}

/// Pretrained TF-IDF vectorizer mapping feature text to a fixed-length,
/// L2-normalized vector. Read-only after load and shared across requests.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
}

impl TfidfVectorizer {
    pub fn new(vocabulary: HashMap<String, usize>, idf: Vec<f32>) -> Result<Self> {
        for (term, &column) in &vocabulary {
            if column >= idf.len() {
                return Err(anyhow!(
                    "vocabulary term {:?} maps to column {} outside the idf table of length {}",
                    term,
                    column,
                    idf.len()
                ));
            }
        }
        if idf.iter().any(|weight| !weight.is_finite()) {
            return Err(anyhow!("idf table contains non-finite weights"));
        }

        Ok(Self { vocabulary, idf })
    }

    pub fn load(path: &str) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read vectorizer artifact {}", path))?;
        let artifact: VectorizerArtifact = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse vectorizer artifact {}", path))?;

        Self::new(artifact.vocabulary, artifact.idf)
    }

    pub fn dimension(&self) -> usize {
        self.idf.len()
    }

    /// Transforms a batch of texts, one output row per input.
    pub fn transform(&self, texts: &[&str]) -> Vec<Vec<f32>> {
        texts.par_iter().map(|text| self.transform_one(text)).collect()
    }

    fn transform_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.idf.len()];

        for token in tokenize(text) {
            if let Some(&column) = self.vocabulary.get(token.as_str()) {
                vector[column] += 1.0;
            }
        }

        for (value, idf) in vector.iter_mut().zip(self.idf.iter()) {
            *value *= idf;
        }
        normalize_vector(&mut vector);

        vector
    }
}

/// Lowercased word tokens of at least two alphanumeric characters, matching
/// how the vectorizer was fitted.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() >= 2)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_vectorizer() -> TfidfVectorizer {
        let vocabulary = HashMap::from([
            ("action".to_string(), 0),
            ("puzzle".to_string(), 1),
            ("roguelike".to_string(), 2),
        ]);
        TfidfVectorizer::new(vocabulary, vec![1.0, 2.0, 1.0]).unwrap()
    }

    #[test]
    fn test_transform_counts_and_normalizes() {
        let vectorizer = small_vectorizer();
        let rows = vectorizer.transform(&["Action action puzzle!"]);

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        // tf 2 * idf 1 for "action", tf 1 * idf 2 for "puzzle", then L2 norm.
        let norm: f32 = row.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-6);
        assert!((row[0] - row[1]).abs() < 1e-6);
        assert_eq!(row[2], 0.0);
    }

    #[test]
    fn test_unknown_tokens_and_short_tokens_ignored() {
        let vectorizer = small_vectorizer();
        let rows = vectorizer.transform(&["a x unknown words only"]);
        assert!(rows[0].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_rejects_column_out_of_range() {
        let vocabulary = HashMap::from([("action".to_string(), 5)]);
        assert!(TfidfVectorizer::new(vocabulary, vec![1.0, 1.0]).is_err());
    }
}
