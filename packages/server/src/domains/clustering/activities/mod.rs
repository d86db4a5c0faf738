pub mod cluster_feedback;
pub mod greedy;

pub use cluster_feedback::{build_clusters, cluster_feedback, ClusteringOutcome};
pub use greedy::{assign_clusters, cosine_similarity};
