use crate::models::Candidate;
use anyhow::{Context, Result};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

/// Offset added after shifting negative weights so every candidate keeps a
/// strictly positive draw probability.
const NEGATIVE_WEIGHT_SHIFT: f32 = 0.01;

/// Weighted random sampling without replacement over the candidate pool.
///
/// Pools at or below the target size come back unchanged, in discovery
/// order. Larger pools are sampled with similarity as the weight: remaining
/// weights are renormalized before every draw, so the same pool yields
/// varied output across calls while still favoring higher similarity.
pub fn select_recommendations<R: Rng + ?Sized>(
    candidates: Vec<Candidate>,
    count: usize,
    rng: &mut R,
) -> Result<Vec<Candidate>> {
    if candidates.len() <= count {
        return Ok(candidates);
    }

    let mut weights: Vec<f32> = candidates.iter().map(|c| c.similarity).collect();
    let min_weight = weights.iter().fold(f32::INFINITY, |a, &b| a.min(b));
    if min_weight < 0.0 {
        for weight in weights.iter_mut() {
            *weight = *weight - min_weight + NEGATIVE_WEIGHT_SHIFT;
        }
    }

    let mut remaining: Vec<usize> = (0..candidates.len()).collect();
    let mut drawn = Vec::with_capacity(count);

    while drawn.len() < count && !remaining.is_empty() {
        let remaining_weights: Vec<f32> = remaining.iter().map(|&i| weights[i]).collect();
        let distribution = WeightedIndex::new(&remaining_weights)
            .context("candidate weights do not form a sampling distribution")?;
        let pick = distribution.sample(rng);
        drawn.push(remaining.remove(pick));
    }

    let mut slots: Vec<Option<Candidate>> = candidates.into_iter().map(Some).collect();
    let mut selected = Vec::with_capacity(drawn.len());
    for index in drawn {
        if let Some(candidate) = slots[index].take() {
            selected.push(candidate);
        }
    }

    Ok(selected)
}
