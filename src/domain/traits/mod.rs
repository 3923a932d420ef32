//! Domain traits - Abstractions for infrastructure implementations

pub mod channel;

pub use channel::{ChannelEvent, ChatChannel};
