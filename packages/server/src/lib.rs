// Feedback Triage - API Core
//
// Intake, AI classification, similarity clustering, weekly digests and a
// chat assistant over customer feedback. Business operations live in
// domains/*/activities; infrastructure (LLM vendor, scheduling) in kernel/.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
