//! Greedy single-pass clustering.
//!
//! Items are visited in order. Each one joins the first existing cluster
//! whose first member is at least `threshold` similar to it, or starts a new
//! cluster. Members are only ever compared with a cluster's first member, so
//! for a fixed input order and threshold the partition is deterministic.

/// Cosine similarity of two vectors.
///
/// Returns 0.0 when lengths differ, either vector is empty, or either has
/// zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    similarity(a, b) as f32
}

fn similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Partition `embeddings` into clusters of indices, in creation order.
/// The first index of each cluster is its representative.
pub fn assign_clusters<E: AsRef<[f32]>>(embeddings: &[E], threshold: f32) -> Vec<Vec<usize>> {
    let threshold = f64::from(threshold);
    let mut clusters: Vec<Vec<usize>> = Vec::new();

    for (index, embedding) in embeddings.iter().enumerate() {
        let matching = clusters.iter_mut().find(|members| {
            let representative = embeddings[members[0]].as_ref();
            similarity(embedding.as_ref(), representative) >= threshold
        });

        match matching {
            Some(members) => members.push(index),
            None => clusters.push(vec![index]),
        }
    }

    clusters
}

/// `Cluster: <first five words>...`, words split on single spaces.
pub fn cluster_name(representative: &str) -> String {
    let words: Vec<&str> = representative.split(' ').take(5).collect();
    format!("Cluster: {}...", words.join(" "))
}

/// First 200 characters of the representative.
pub fn cluster_description(representative: &str) -> String {
    representative.chars().take(200).collect()
}
