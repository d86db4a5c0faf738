//! Kernel module - server infrastructure and dependencies.

pub mod ai;
pub mod deps;
pub mod scheduled_tasks;
pub mod test_dependencies;
pub mod traits;

pub use ai::{LlmCompletionService, LlmEmbeddingService};
pub use deps::ServerDeps;
pub use test_dependencies::{MockAI, MockEmbeddingService, TestDependencies};
pub use traits::*;

/// Re-exported so domains build prompts without naming the client crate.
pub use llm_client::{Message, Role};
