//! Clustering domain - groups analysed feedback by embedding similarity.

pub mod activities;
pub mod models;

pub use models::*;

/// Minimum cosine similarity to a cluster's first member for an entry to join it.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.75;
