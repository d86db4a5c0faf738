//! Digest domain - weekly AI summaries of pressing feedback.

pub mod activities;
pub mod models;

pub use models::*;
