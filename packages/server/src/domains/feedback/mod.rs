//! Feedback domain - intake (manual and CSV), listing and dashboard totals.

pub mod activities;
pub mod models;

pub use models::*;
