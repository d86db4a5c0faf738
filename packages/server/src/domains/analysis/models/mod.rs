pub mod analysis;
pub mod classification;

pub use analysis::{ClassificationCounts, FeedbackAnalysis};
pub use classification::{Classification, Impact, Sentiment, Urgency};
