pub mod generate;

pub use generate::{generate_digest, GeneratedDigest};
