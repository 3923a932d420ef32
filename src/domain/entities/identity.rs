use std::fmt;

/// Credentials the bot authenticates with. Immutable for the session's lifetime.
#[derive(Clone)]
pub struct BotIdentity {
    pub username: String,
    pub oauth_token: String,
}

impl BotIdentity {
    pub fn new(username: impl Into<String>, oauth_token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            oauth_token: oauth_token.into(),
        }
    }
}

// Manual Debug so the token never lands in logs.
impl fmt::Debug for BotIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotIdentity")
            .field("username", &self.username)
            .field("oauth_token", &"***")
            .finish()
    }
}
