//! Chat domain - per-user conversations with an assistant that sees all feedback.

pub mod activities;
pub mod models;

pub use models::*;
