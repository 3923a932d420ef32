//! Chat platform adapters

pub mod twitch;

pub use twitch::TwitchChatChannel;
