pub mod cluster;

pub use cluster::{EmbeddedFeedback, FeedbackCluster, NewCluster};
