/// A chat message received from the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEvent {
    pub sender: String,
    pub text: String,
}

impl ChatEvent {
    pub fn new(sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            text: text.into(),
        }
    }
}

/// A fully rendered message ready to be dispatched to a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub text: String,
    pub channel: String,
}

impl OutboundMessage {
    pub fn new(text: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            channel: channel.into(),
        }
    }
}
