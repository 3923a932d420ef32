//! Domain entities - Core business objects with no external dependencies

pub mod identity;
pub mod message;

pub use identity::BotIdentity;
pub use message::{ChatEvent, OutboundMessage};
