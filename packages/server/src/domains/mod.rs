// Business domains
pub mod analysis;
pub mod chat;
pub mod clustering;
pub mod digest;
pub mod feedback;
