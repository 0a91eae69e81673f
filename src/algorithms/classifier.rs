use crate::utils::softmax;
use anyhow::{anyhow, Context, Result};
use nalgebra::{DMatrix, DVector};
use serde::Deserialize;

/// Pretrained genre classifier: a feature vector in, one probability
/// distribution over the genre labels out.
pub trait Classifier: Send + Sync {
    fn labels(&self) -> &[String];

    /// One probability row per input row, each summing to 1.
    fn predict_proba(&self, rows: &[Vec<f32>]) -> Result<Vec<Vec<f32>>>;
}

#[derive(Debug, Deserialize)]
struct ClassifierArtifact {
    labels: Vec<String>,
    weights: Vec<Vec<f32>>,
    bias: Vec<f32>,
}

/// Linear classifier with a softmax output layer, loaded from the artifact
/// exported by the offline training pipeline.
#[derive(Debug, Clone)]
pub struct SoftmaxClassifier {
    labels: Vec<String>,
    weights: DMatrix<f32>,
    bias: DVector<f32>,
}

impl SoftmaxClassifier {
    pub fn new(labels: Vec<String>, weights: Vec<Vec<f32>>, bias: Vec<f32>) -> Result<Self> {
        if labels.is_empty() {
            return Err(anyhow!("classifier has no labels"));
        }
        if weights.len() != labels.len() || bias.len() != labels.len() {
            return Err(anyhow!(
                "classifier shape mismatch: {} labels, {} weight rows, {} bias terms",
                labels.len(),
                weights.len(),
                bias.len()
            ));
        }

        let dimension = weights[0].len();
        if dimension == 0 {
            return Err(anyhow!("classifier weight rows are empty"));
        }
        for row in &weights {
            if row.len() != dimension {
                return Err(anyhow!("classifier weight rows have inconsistent lengths"));
            }
            if row.iter().any(|w| !w.is_finite()) {
                return Err(anyhow!("classifier weights contain non-finite values"));
            }
        }
        if bias.iter().any(|b| !b.is_finite()) {
            return Err(anyhow!("classifier bias contains non-finite values"));
        }

        let weights = DMatrix::from_row_iterator(
            labels.len(),
            dimension,
            weights.into_iter().flatten(),
        );

        Ok(Self {
            labels,
            weights,
            bias: DVector::from_vec(bias),
        })
    }

    pub fn load(path: &str) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read classifier artifact {}", path))?;
        let artifact: ClassifierArtifact = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse classifier artifact {}", path))?;

        Self::new(artifact.labels, artifact.weights, artifact.bias)
    }

    /// Expected input feature dimension.
    pub fn dimension(&self) -> usize {
        self.weights.ncols()
    }
}

impl Classifier for SoftmaxClassifier {
    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn predict_proba(&self, rows: &[Vec<f32>]) -> Result<Vec<Vec<f32>>> {
        rows.iter()
            .map(|row| {
                if row.len() != self.weights.ncols() {
                    return Err(anyhow!(
                        "feature vector of length {} does not match classifier input {}",
                        row.len(),
                        self.weights.ncols()
                    ));
                }

                let features = DVector::from_column_slice(row);
                let logits = &self.weights * features + &self.bias;
                Ok(softmax(logits.as_slice()))
            })
            .collect()
    }
}
