pub mod validation;

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}

pub fn normalize_vector(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}

pub fn softmax(scores: &[f32]) -> Vec<f32> {
    let max_score = scores.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b));
    let exp_scores: Vec<f32> = scores.iter().map(|&x| (x - max_score).exp()).collect();
    let sum_exp: f32 = exp_scores.iter().sum();

    if sum_exp > 0.0 {
        exp_scores.iter().map(|&x| x / sum_exp).collect()
    } else {
        vec![1.0 / scores.len() as f32; scores.len()]
    }
}

/// Row indices sorted by descending score.
pub fn argsort_descending(scores: &[f32]) -> Vec<usize> {
    let mut indexed_scores: Vec<(usize, f32)> = scores
        .iter()
        .enumerate()
        .map(|(i, &score)| (i, score))
        .collect();

    indexed_scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    indexed_scores.into_iter().map(|(i, _)| i).collect()
}

/// Element-wise mean across equally sized rows. Empty input yields an empty vector.
pub fn mean_rows(rows: &[Vec<f32>]) -> Vec<f32> {
    let Some(first) = rows.first() else {
        return Vec::new();
    };

    let mut result = vec![0.0; first.len()];
    for row in rows {
        for (acc, value) in result.iter_mut().zip(row.iter()) {
            *acc += value;
        }
    }
    for acc in result.iter_mut() {
        *acc /= rows.len() as f32;
    }

    result
}

/// Cache key identifying a requesting user.
///
/// An explicit id gets the `user_` namespace. Without one, the key is derived
/// from the sorted, comma-joined owned names, so the same library in any order
/// maps to the same key. The two namespaces never collide with each other;
/// hash collisions between different anonymous libraries are accepted.
pub fn user_cache_key(user_id: Option<&str>, game_names: &[String]) -> String {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    match user_id {
        Some(id) if !id.is_empty() => format!("user_{}", id),
        _ => {
            let mut names: Vec<&str> = game_names.iter().map(String::as_str).collect();
            names.sort_unstable();

            let mut hasher = DefaultHasher::new();
            names.join(",").hash(&mut hasher);
            format!("games_{}", hasher.finish())
        }
    }
}
