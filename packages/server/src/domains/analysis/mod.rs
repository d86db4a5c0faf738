//! Analysis domain - AI classification (sentiment, urgency, impact) and
//! embeddings for each feedback entry.

pub mod activities;
pub mod models;

pub use models::*;
