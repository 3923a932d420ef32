use async_trait::async_trait;

use crate::application::errors::ChannelError;
use crate::domain::entities::{BotIdentity, ChatEvent};

/// Notifications emitted by a chat channel, in the order they occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// The underlying connection is established.
    Connected,
    /// The bot joined the target channel and may start chatting.
    Joined(String),
    /// The channel could not be joined (bad credentials, unknown channel).
    JoinFailed(String),
    /// A chat message arrived from another participant.
    Message(ChatEvent),
    /// An asynchronous transport fault; the connection may still be alive.
    Error(String),
    /// The connection is gone. Terminal for this channel instance.
    Disconnected,
}

/// ChatChannel trait - abstraction for chat platform transports
///
/// Implementations deliver events through `next_event` as a single ordered
/// stream; exactly one consumer is expected to poll it.
#[async_trait]
pub trait ChatChannel: Send {
    /// Open the connection and request to join the given channel.
    /// Join outcome is reported asynchronously via `next_event`.
    async fn connect(&mut self, identity: &BotIdentity, channel: &str) -> Result<(), ChannelError>;

    /// Send a chat message to a channel.
    async fn send_message(&mut self, channel: &str, text: &str) -> Result<(), ChannelError>;

    /// Close the connection.
    async fn disconnect(&mut self) -> Result<(), ChannelError>;

    /// Whether the transport currently holds a live connection.
    fn is_connected(&self) -> bool;

    /// Next channel notification, or `None` once the stream is exhausted.
    async fn next_event(&mut self) -> Option<ChannelEvent>;
}
