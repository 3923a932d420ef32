//! Bot session - connection lifecycle and event loop
//!
//! The session owns the chat channel and the router, and is the single
//! consumer of the channel's event stream; router state is never touched from
//! anywhere else.

use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::application::errors::BotError;
use crate::application::messaging::{render, MessageRouter, RenderContext};
use crate::domain::entities::{BotIdentity, OutboundMessage};
use crate::domain::traits::{ChannelEvent, ChatChannel};

/// Lifecycle of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Connecting,
    Joined,
    Disconnected,
}

/// Drives one bot session against a chat channel.
pub struct BotSession<C> {
    channel: C,
    router: MessageRouter,
    identity: BotIdentity,
    channel_name: String,
    greeting: String,
    goodbye: String,
    test_mode: bool,
    running: bool,
    state: SessionState,
}

impl<C: ChatChannel> BotSession<C> {
    pub fn new(
        channel: C,
        identity: BotIdentity,
        channel_name: impl Into<String>,
        router: MessageRouter,
    ) -> Self {
        Self {
            channel,
            router,
            identity,
            channel_name: channel_name.into(),
            greeting: String::new(),
            goodbye: String::new(),
            test_mode: false,
            running: false,
            state: SessionState::Idle,
        }
    }

    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = greeting.into();
        self
    }

    pub fn with_goodbye(mut self, goodbye: impl Into<String>) -> Self {
        self.goodbye = goodbye.into();
        self
    }

    pub fn with_test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Connect, join and process chat events until the channel closes or the
    /// shutdown signal fires. Fails when the session is already running or the
    /// connection cannot be established.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> Result<(), BotError> {
        if self.running {
            return Err(BotError::AlreadyRunning);
        }

        self.state = SessionState::Connecting;
        if let Err(e) = self.channel.connect(&self.identity, &self.channel_name).await {
            error!("Bot could not be started: {}", e);
            self.state = SessionState::Idle;
            return Err(e.into());
        }

        self.running = true;
        if self.test_mode {
            info!("Bot started in test mode");
        } else {
            info!("Bot started");
        }

        loop {
            tokio::select! {
                biased;

                _ = shutdown.changed() => {
                    info!("Shutdown requested");
                    break;
                }
                event = self.channel.next_event() => {
                    match event {
                        Some(event) => {
                            if !self.handle_event(event).await {
                                break;
                            }
                        }
                        None => {
                            self.running = false;
                            self.state = SessionState::Disconnected;
                            break;
                        }
                    }
                }
            }
        }

        if self.running {
            self.stop().await?;
        }

        Ok(())
    }

    /// Send the goodbye message while still connected, then disconnect.
    /// Fails when the session is not running; a run ends with one stop.
    pub async fn stop(&mut self) -> Result<(), BotError> {
        if !self.running {
            return Err(BotError::NotRunning);
        }

        if self.channel.is_connected() {
            let goodbye = self.render_announcement(&self.goodbye);
            self.dispatch(OutboundMessage::new(goodbye, self.channel_name.clone()))
                .await;

            if let Err(e) = self.channel.disconnect().await {
                error!("Disconnect failed: {}", e);
            }
        }

        self.running = false;
        self.state = SessionState::Disconnected;
        info!("Bot stopped");
        Ok(())
    }

    /// Returns false when the event ends the run.
    async fn handle_event(&mut self, event: ChannelEvent) -> bool {
        match event {
            ChannelEvent::Connected => {
                info!("Connected to chat server");
                true
            }
            ChannelEvent::Joined(channel) => {
                info!(%channel, "Joined channel");
                self.state = SessionState::Joined;

                let greeting = self.render_announcement(&self.greeting);
                self.dispatch(OutboundMessage::new(greeting, self.channel_name.clone()))
                    .await;
                true
            }
            ChannelEvent::JoinFailed(reason) => {
                error!("Could not join channel: {}", reason);
                self.running = false;
                self.state = SessionState::Disconnected;
                false
            }
            ChannelEvent::Message(event) => {
                info!(sender = %event.sender, text = %event.text, "Message received");

                if let Some(outbound) = self.router.route(&event) {
                    self.dispatch(outbound).await;
                }
                true
            }
            ChannelEvent::Error(error) => {
                error!("Client error: {}", error);
                true
            }
            ChannelEvent::Disconnected => {
                warn!("Disconnected from chat server");
                self.running = false;
                self.state = SessionState::Disconnected;
                false
            }
        }
    }

    /// In test mode the network send is skipped; routing, rendering and
    /// logging behave identically.
    async fn dispatch(&mut self, message: OutboundMessage) {
        if !self.test_mode {
            if let Err(e) = self.channel.send_message(&message.channel, &message.text).await {
                error!("Message could not be sent: {}", e);
                return;
            }
        }

        info!("Message sent: {}", message.text);
    }

    /// Greeting and goodbye run through the same renderer as pool messages;
    /// only the bot's own name and trigger are in scope for them.
    fn render_announcement(&self, template: &str) -> String {
        let ctx = RenderContext::new()
            .with_bot_name(&self.identity.username)
            .with_command(self.router.command());

        render(template, &ctx)
    }
}
