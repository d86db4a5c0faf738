pub mod feedback;

pub use feedback::{AnalysisSummary, Feedback, FeedbackEntry, FeedbackSource, NewFeedback};
