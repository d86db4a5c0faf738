pub mod digest;

pub use digest::{CriticalFeedback, Digest};
