//! Twitch chat adapter - IRC over WebSocket
//!
//! Speaks the minimal subset of Twitch's IRC gateway the bot needs: PASS/NICK
//! login, JOIN, PRIVMSG in both directions and PING/PONG keepalive. Parsed
//! events are buffered in arrival order and drained by the session loop.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    connect_async, tungstenite::Message as WsMessage, MaybeTlsStream, WebSocketStream,
};
use tracing::debug;

use crate::application::errors::ChannelError;
use crate::domain::entities::{BotIdentity, ChatEvent};
use crate::domain::traits::{ChannelEvent, ChatChannel};

const TWITCH_CHAT_URL: &str = "wss://irc-ws.chat.twitch.tv:443";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// `ChatChannel` implementation against the Twitch IRC gateway.
pub struct TwitchChatChannel {
    url: String,
    ws: Option<WsStream>,
    nick: String,
    pending: VecDeque<ChannelEvent>,
}

impl TwitchChatChannel {
    pub fn new() -> Self {
        Self::with_url(TWITCH_CHAT_URL)
    }

    /// Point the adapter at a different gateway, e.g. a local test server.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ws: None,
            nick: String::new(),
            pending: VecDeque::new(),
        }
    }
}

impl Default for TwitchChatChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatChannel for TwitchChatChannel {
    async fn connect(&mut self, identity: &BotIdentity, channel: &str) -> Result<(), ChannelError> {
        let (mut ws, _response) = tokio::time::timeout(CONNECT_TIMEOUT, connect_async(self.url.as_str()))
            .await
            .map_err(|_| ChannelError::Connect(format!("Timed out connecting to {}", self.url)))?
            .map_err(|e| ChannelError::Connect(e.to_string()))?;

        let nick = identity.username.to_lowercase();
        let channel = normalize_channel(channel);
        debug!(%nick, %channel, "Logging into twitch chat");

        for line in [
            format!("PASS {}", oauth_pass(&identity.oauth_token)),
            format!("NICK {}", nick),
            format!("JOIN #{}", channel),
        ] {
            ws.send(WsMessage::Text(line.into()))
                .await
                .map_err(|e| ChannelError::Connect(e.to_string()))?;
        }

        self.ws = Some(ws);
        self.nick = nick;
        self.pending.push_back(ChannelEvent::Connected);
        Ok(())
    }

    async fn send_message(&mut self, channel: &str, text: &str) -> Result<(), ChannelError> {
        let ws = self.ws.as_mut().ok_or(ChannelError::NotConnected)?;
        let line = format!("PRIVMSG #{} :{}", normalize_channel(channel), text);

        ws.send(WsMessage::Text(line.into()))
            .await
            .map_err(|e| ChannelError::Send(e.to_string()))
    }

    async fn disconnect(&mut self) -> Result<(), ChannelError> {
        match self.ws.take() {
            Some(mut ws) => ws
                .close(None)
                .await
                .map_err(|e| ChannelError::Transport(e.to_string())),
            None => Ok(()),
        }
    }

    fn is_connected(&self) -> bool {
        self.ws.is_some()
    }

    async fn next_event(&mut self) -> Option<ChannelEvent> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }

            let ws = self.ws.as_mut()?;

            match ws.next().await {
                None => {
                    self.ws = None;
                    return Some(ChannelEvent::Disconnected);
                }
                Some(Err(e)) => {
                    self.ws = None;
                    return Some(ChannelEvent::Error(e.to_string()));
                }
                Some(Ok(WsMessage::Close(_))) => {
                    self.ws = None;
                    return Some(ChannelEvent::Disconnected);
                }
                Some(Ok(WsMessage::Text(payload))) => {
                    // One frame may carry several IRC lines.
                    for line in payload.as_str().lines() {
                        match parse_line(line) {
                            IrcLine::Ping(server) => {
                                debug!("PING received, answering");
                                let pong = format!("PONG :{}", server);
                                if let Err(e) = ws.send(WsMessage::Text(pong.into())).await {
                                    self.pending.push_back(ChannelEvent::Error(e.to_string()));
                                }
                            }
                            IrcLine::Privmsg { sender, text, .. } => {
                                self.pending
                                    .push_back(ChannelEvent::Message(ChatEvent::new(sender, text)));
                            }
                            IrcLine::Join { nick, channel } => {
                                if nick == self.nick {
                                    self.pending.push_back(ChannelEvent::Joined(channel));
                                }
                            }
                            IrcLine::Notice(text) => {
                                if is_auth_failure(&text) {
                                    self.pending.push_back(ChannelEvent::JoinFailed(text));
                                }
                            }
                            IrcLine::Other => {}
                        }
                    }
                }
                Some(Ok(_)) => {}
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum IrcLine {
    Ping(String),
    Privmsg {
        sender: String,
        channel: String,
        text: String,
    },
    Join {
        nick: String,
        channel: String,
    },
    Notice(String),
    Other,
}

/// Minimal IRC line reader: optional tags, optional prefix, command, params.
/// Example: `:carkhy!carkhy@carkhy.tmi.twitch.tv PRIVMSG #captaincallback :hi`
fn parse_line(line: &str) -> IrcLine {
    let mut rest = line.trim_end_matches('\r');
    if rest.is_empty() {
        return IrcLine::Other;
    }

    // @badge-info=;badges=;... tags are not needed, skip them.
    if let Some(stripped) = rest.strip_prefix('@') {
        match stripped.split_once(' ') {
            Some((_, after)) => rest = after,
            None => return IrcLine::Other,
        }
    }

    let mut prefix = None;
    if let Some(stripped) = rest.strip_prefix(':') {
        match stripped.split_once(' ') {
            Some((p, after)) => {
                prefix = Some(p);
                rest = after;
            }
            None => return IrcLine::Other,
        }
    }

    let (command, params) = rest.split_once(' ').unwrap_or((rest, ""));

    match command {
        "PING" => IrcLine::Ping(params.trim_start_matches(':').to_string()),
        "PRIVMSG" => {
            let Some(sender) = prefix.and_then(nick_of) else {
                return IrcLine::Other;
            };
            let (channel, trailing) = params.split_once(" :").unwrap_or((params, ""));

            IrcLine::Privmsg {
                sender: sender.to_string(),
                channel: channel.trim_start_matches('#').to_string(),
                text: trailing.to_string(),
            }
        }
        "JOIN" => {
            let Some(nick) = prefix.and_then(nick_of) else {
                return IrcLine::Other;
            };

            IrcLine::Join {
                nick: nick.to_string(),
                channel: params
                    .trim_start_matches(':')
                    .trim_start_matches('#')
                    .to_string(),
            }
        }
        "NOTICE" => {
            let text = params.split_once(" :").map(|(_, t)| t).unwrap_or(params);
            IrcLine::Notice(text.to_string())
        }
        _ => IrcLine::Other,
    }
}

/// `nick!user@host` → `nick`
fn nick_of(prefix: &str) -> Option<&str> {
    prefix.split(['!', '@']).next().filter(|nick| !nick.is_empty())
}

/// Twitch requires the `oauth:` scheme on the PASS credential.
fn oauth_pass(token: &str) -> String {
    if token.starts_with("oauth:") {
        token.to_string()
    } else {
        format!("oauth:{}", token)
    }
}

fn normalize_channel(channel: &str) -> String {
    channel.trim_start_matches('#').to_lowercase()
}

fn is_auth_failure(notice: &str) -> bool {
    let lower = notice.to_lowercase();
    lower.contains("authentication failed") || lower.contains("improperly formatted auth")
}
