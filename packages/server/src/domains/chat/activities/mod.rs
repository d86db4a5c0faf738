pub mod chat_with_feedback;

pub use chat_with_feedback::{
    chat_with_feedback, conversation_messages, conversation_title, list_conversations, ChatReply,
};
