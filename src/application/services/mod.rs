//! Application services - Session orchestration

pub mod session;

pub use session::{BotSession, SessionState};
