//! Typed ID aliases for every persisted entity.

pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// A submitted piece of feedback.
pub struct Feedback;

/// An AI classification of one feedback row.
pub struct FeedbackAnalysis;

/// A similarity group of analysed feedback.
pub struct FeedbackCluster;

/// A chat thread between a user and the assistant.
pub struct ChatConversation;

/// One turn inside a chat thread.
pub struct ChatMessage;

/// A generated weekly digest.
pub struct Digest;

/// An account of the hosted auth provider.
pub struct User;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

pub type FeedbackId = Id<Feedback>;
pub type AnalysisId = Id<FeedbackAnalysis>;
pub type ClusterId = Id<FeedbackCluster>;
pub type ConversationId = Id<ChatConversation>;
pub type ChatMessageId = Id<ChatMessage>;
pub type DigestId = Id<Digest>;
pub type UserId = Id<User>;
