pub mod listing;
pub mod submit;
pub mod upload;

pub use listing::{feedback_analytics, list_feedback, sort_entries, FeedbackAnalytics, FeedbackSort};
pub use submit::{submit_feedback, SubmittedFeedback};
pub use upload::{parse_feedback_csv, upload_feedback_csv, CsvUploadResult};
