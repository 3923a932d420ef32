//! Message routing - classifies inbound chat and decides the reply
//!
//! Exactly one branch fires per event: own messages are dropped, the primary
//! trigger produces a pool response, and competing-bot traffic drives the
//! single-slot interaction state.

use tracing::debug;

use crate::application::messaging::selector::ResponseSelector;
use crate::application::messaging::template::{render, RenderContext};
use crate::domain::entities::{ChatEvent, OutboundMessage};

const FALLBACK_MESSAGE: &str = "I have nothing to say.";
const FALLBACK_REACTION: &str = "Don't listen to {COMPETING_BOT_NAME}, {USER}!";

/// A rival bot observed in the same channel.
#[derive(Debug, Clone)]
pub struct CompetingBot {
    username: String,
    command_norm: String,
    reaction_messages: Vec<String>,
}

impl CompetingBot {
    pub fn new(
        username: impl Into<String>,
        command: impl Into<String>,
        reaction_messages: Vec<String>,
    ) -> Self {
        Self {
            username: username.into(),
            command_norm: command.into().to_lowercase(),
            reaction_messages,
        }
    }
}

/// Routes each inbound chat event to at most one outbound message.
///
/// Holds the interaction slot: the last user who invoked the rival's command
/// and has not yet been answered by the rival. Last write wins; the slot is
/// cleared when a rival reply consumes it.
pub struct MessageRouter {
    bot_username: String,
    command: String,
    command_norm: String,
    messages: Vec<String>,
    channel: String,
    competing: Option<CompetingBot>,
    selector: ResponseSelector,
    last_user_responded_to: Option<String>,
}

impl MessageRouter {
    pub fn new(
        bot_username: impl Into<String>,
        command: impl Into<String>,
        messages: Vec<String>,
        channel: impl Into<String>,
        competing: Option<CompetingBot>,
    ) -> Self {
        let command = command.into();
        Self {
            bot_username: bot_username.into(),
            command_norm: command.to_lowercase(),
            command,
            messages,
            channel: channel.into(),
            competing,
            selector: ResponseSelector::new(),
            last_user_responded_to: None,
        }
    }

    /// Replace the random source, e.g. with a seeded one.
    pub fn with_selector(mut self, selector: ResponseSelector) -> Self {
        self.selector = selector;
        self
    }

    /// The configured trigger, original casing.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Decide whether and what to send in reaction to `event`.
    pub fn route(&mut self, event: &ChatEvent) -> Option<OutboundMessage> {
        if event.sender.eq_ignore_ascii_case(&self.bot_username) {
            return None;
        }

        let normalized = event.text.trim().to_lowercase();

        if normalized.starts_with(&self.command_norm) {
            debug!(sender = %event.sender, "trigger command matched");

            let template = self.selector.select(&self.messages, FALLBACK_MESSAGE);
            let ctx = RenderContext::new()
                .with_user(&event.sender)
                .with_bot_name(&self.bot_username)
                .with_command(&self.command);

            return Some(OutboundMessage::new(render(template, &ctx), self.channel.clone()));
        }

        let rival = self.competing.as_ref()?;

        if normalized.starts_with(&rival.command_norm) {
            debug!(sender = %event.sender, "rival trigger matched, remembering user");
            self.last_user_responded_to = Some(event.sender.clone());
            return None;
        }

        let pending = self
            .last_user_responded_to
            .as_deref()
            .is_some_and(|user| !user.trim().is_empty());

        if pending && event.sender.eq_ignore_ascii_case(&rival.username) {
            debug!(rival = %rival.username, "rival replied, posting reaction");

            let user = self.last_user_responded_to.take().unwrap_or_default();
            let template = self
                .selector
                .select(&rival.reaction_messages, FALLBACK_REACTION);
            let ctx = RenderContext::new()
                .with_user(&user)
                .with_competing_bot_name(&rival.username);

            return Some(OutboundMessage::new(render(template, &ctx), self.channel.clone()));
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn router(messages: &[&str], competing: Option<CompetingBot>) -> MessageRouter {
        MessageRouter::new("Bobota", "!hi", pool(messages), "somechannel", competing)
            .with_selector(ResponseSelector::seeded(7))
    }

    fn rival() -> CompetingBot {
        CompetingBot::new(
            "RivalBot",
            "!boo",
            pool(&["Don't listen to {COMPETING_BOT_NAME}, {USER}!"]),
        )
    }

    #[test]
    fn trigger_match_renders_pool_message() {
        let mut router = router(&["Hello, {USER}!"], None);

        let out = router.route(&ChatEvent::new("alice", "!HI there"));

        let out = out.expect("trigger should produce a reply");
        assert_eq!(out.text, "Hello, alice!");
        assert_eq!(out.channel, "somechannel");
    }

    #[test]
    fn trigger_match_is_case_insensitive_both_ways() {
        let mut router = MessageRouter::new("Bobota", "!HI", pool(&["yo {USER}"]), "c", None)
            .with_selector(ResponseSelector::seeded(1));

        assert!(router.route(&ChatEvent::new("alice", "  !hi  ")).is_some());
        assert!(router.route(&ChatEvent::new("alice", "!Hi everyone")).is_some());
        assert!(router.route(&ChatEvent::new("alice", "say !hi")).is_none());
    }

    #[test]
    fn own_messages_are_never_routed() {
        let mut router = router(&["Hello, {USER}!"], Some(rival()));

        assert!(router.route(&ChatEvent::new("bobota", "!hi")).is_none());
        assert!(router.route(&ChatEvent::new("BOBOTA", "!boo")).is_none());
    }

    #[test]
    fn empty_text_is_not_a_fault() {
        let mut router = router(&["Hello, {USER}!"], Some(rival()));

        assert!(router.route(&ChatEvent::new("alice", "")).is_none());
        assert!(router.route(&ChatEvent::new("alice", "   ")).is_none());
    }

    #[test]
    fn empty_pool_falls_back() {
        let mut router = router(&[], None);

        let out = router.route(&ChatEvent::new("alice", "!hi")).unwrap();
        assert_eq!(out.text, "I have nothing to say.");
    }

    #[test]
    fn rival_trigger_is_recorded_then_consumed_once() {
        let mut router = router(&["Hello, {USER}!"], Some(rival()));

        // bob pokes the rival: nothing to say yet.
        assert!(router.route(&ChatEvent::new("bob", "!boo")).is_none());

        // The rival answers: exactly one reaction, addressed to bob.
        let out = router.route(&ChatEvent::new("RivalBot", "behold")).unwrap();
        assert_eq!(out.text, "Don't listen to RivalBot, bob!");

        // Slot is empty again; a second rival message stays unanswered.
        assert!(router.route(&ChatEvent::new("RivalBot", "more")).is_none());
    }

    #[test]
    fn rival_sender_match_is_case_insensitive() {
        let mut router = router(&["Hello, {USER}!"], Some(rival()));

        router.route(&ChatEvent::new("bob", "!BOO"));
        assert!(router.route(&ChatEvent::new("rivalbot", "heh")).is_some());
    }

    #[test]
    fn interaction_slot_is_last_write_wins() {
        let mut router = router(&["Hello, {USER}!"], Some(rival()));

        router.route(&ChatEvent::new("alice", "!boo"));
        router.route(&ChatEvent::new("bob", "!boo"));

        let out = router.route(&ChatEvent::new("RivalBot", "gotcha")).unwrap();
        assert_eq!(out.text, "Don't listen to RivalBot, bob!");
    }

    #[test]
    fn rival_reply_without_pending_user_is_ignored() {
        let mut router = router(&["Hello, {USER}!"], Some(rival()));

        assert!(router.route(&ChatEvent::new("RivalBot", "unprompted")).is_none());
    }

    #[test]
    fn empty_reaction_pool_falls_back_with_resolved_placeholders() {
        let competing = CompetingBot::new("RivalBot", "!boo", Vec::new());
        let mut router = router(&["Hello, {USER}!"], Some(competing));

        router.route(&ChatEvent::new("bob", "!boo"));
        let out = router.route(&ChatEvent::new("RivalBot", "ha")).unwrap();

        assert_eq!(out.text, "Don't listen to RivalBot, bob!");
    }

    #[test]
    fn without_competing_bot_rival_traffic_is_ignored() {
        let mut router = router(&["Hello, {USER}!"], None);

        assert!(router.route(&ChatEvent::new("bob", "!boo")).is_none());
        assert!(router.route(&ChatEvent::new("RivalBot", "ha")).is_none());
    }
}
