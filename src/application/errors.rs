//! Application layer errors

use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Bot is already running")]
    AlreadyRunning,

    #[error("Bot is not running")]
    NotRunning,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),
}

/// Chat transport errors
#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("Connect failed: {0}")]
    Connect(String),

    #[error("Send failed: {0}")]
    Send(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Not connected")]
    NotConnected,
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field(s): {0}")]
    MissingFields(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(String),
}
