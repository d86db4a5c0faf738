// HTTP routes
pub mod analysis;
pub mod chat;
pub mod clusters;
pub mod digest;
pub mod feedback;
pub mod health;

pub use analysis::*;
pub use chat::*;
pub use clusters::*;
pub use digest::*;
pub use feedback::*;
pub use health::*;
