//! Template rendering - literal placeholder substitution
//!
//! Messages may carry `{USER}`, `{BOT_NAME}`, `{COMMAND}` and
//! `{COMPETING_BOT_NAME}` tokens. Rendering walks the template once, left to
//! right; substituted values are never re-scanned, so a value containing
//! placeholder-shaped text passes through literally.

/// Values available for substitution. Unset placeholders render as empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderContext<'a> {
    pub user: Option<&'a str>,
    pub bot_name: Option<&'a str>,
    pub command: Option<&'a str>,
    pub competing_bot_name: Option<&'a str>,
}

impl<'a> RenderContext<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user: &'a str) -> Self {
        self.user = Some(user);
        self
    }

    pub fn with_bot_name(mut self, bot_name: &'a str) -> Self {
        self.bot_name = Some(bot_name);
        self
    }

    pub fn with_command(mut self, command: &'a str) -> Self {
        self.command = Some(command);
        self
    }

    pub fn with_competing_bot_name(mut self, name: &'a str) -> Self {
        self.competing_bot_name = Some(name);
        self
    }

    fn lookup(&self, input: &str) -> Option<(usize, &'a str)> {
        let tokens = [
            ("{USER}", self.user),
            ("{BOT_NAME}", self.bot_name),
            ("{COMMAND}", self.command),
            ("{COMPETING_BOT_NAME}", self.competing_bot_name),
        ];

        tokens.into_iter().find_map(|(token, value)| {
            input
                .starts_with(token)
                .then(|| (token.len(), value.unwrap_or("")))
        })
    }
}

/// Substitute all known placeholders in `template`. Single pass; no recursion,
/// no escaping.
pub fn render(template: &str, ctx: &RenderContext<'_>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(idx) = rest.find('{') {
        out.push_str(&rest[..idx]);
        rest = &rest[idx..];

        match ctx.lookup(rest) {
            Some((token_len, value)) => {
                out.push_str(value);
                rest = &rest[token_len..];
            }
            None => {
                out.push('{');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_all_placeholders() {
        let ctx = RenderContext::new()
            .with_user("alice")
            .with_bot_name("Bobota")
            .with_command("!hi")
            .with_competing_bot_name("RivalBot");

        let rendered = render(
            "{USER}: {BOT_NAME} answers {COMMAND}, not {COMPETING_BOT_NAME}",
            &ctx,
        );

        assert_eq!(rendered, "alice: Bobota answers !hi, not RivalBot");
    }

    #[test]
    fn unset_placeholders_render_empty() {
        let ctx = RenderContext::new().with_user("alice");
        assert_eq!(render("Hey {USER}{BOT_NAME}!", &ctx), "Hey alice!");
        assert_eq!(render("{COMMAND}", &RenderContext::new()), "");
    }

    #[test]
    fn unknown_braces_pass_through() {
        let ctx = RenderContext::new().with_user("alice");
        assert_eq!(render("{USERNAME} {USER} {", &ctx), "{USERNAME} alice {");
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let ctx = RenderContext::new().with_user("{BOT_NAME}").with_bot_name("Bobota");
        assert_eq!(render("hi {USER}", &ctx), "hi {BOT_NAME}");
    }

    #[test]
    fn rendering_without_placeholders_is_identity() {
        let ctx = RenderContext::new().with_user("alice");
        let once = render("Hello, {USER}!", &ctx);
        assert_eq!(render(&once, &RenderContext::new()), once);
    }

    #[test]
    fn empty_template_is_fine() {
        assert_eq!(render("", &RenderContext::new()), "");
    }
}
