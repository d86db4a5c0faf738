pub mod analyze;

pub use analyze::{analyze_each, analyze_feedback, analyze_pending, BatchAnalysis};
