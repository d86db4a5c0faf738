pub mod conversation;
pub mod message;

pub use conversation::{ChatConversation, Exchange};
pub use message::ChatMessage;
