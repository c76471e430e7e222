use crate::client::events::GameEvent;
use crate::scripting::{EventFilter, Script, ScriptContext};
use tracing::info;

/// Which credential command a server prompt is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPrompt {
    Register,
    Login,
}

/// Classify a chat line as an auth-plugin prompt.
///
/// Registration is checked first: registration prompts routinely contain
/// "login" too ("register before you can login"), and answering them with
/// /login would fail on a fresh account. The bare "registr"/"log" stems catch
/// localized prompts ("registrieren", "Einloggen").
pub fn classify_prompt(message: &str) -> Option<AuthPrompt> {
    let lower = message.to_lowercase();
    if lower.contains("/register") || lower.contains("registr") {
        Some(AuthPrompt::Register)
    } else if lower.contains("/login") || lower.contains("log") {
        Some(AuthPrompt::Login)
    } else {
        None
    }
}

/// Answers login/registration prompts with the configured password.
///
/// Every matching line gets a response; auth plugins re-prompt until the
/// command succeeds, so one-shot handling would strand the bot after a
/// mistyped-password kick or a slow plugin.
pub struct AutoAuthScript {
    password: String,
}

impl AutoAuthScript {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
        }
    }
}

impl Script for AutoAuthScript {
    fn id(&self) -> &'static str {
        "auto_auth"
    }

    fn name(&self) -> &'static str {
        "Auto Auth"
    }

    fn description(&self) -> &'static str {
        "Answers /login and /register prompts with the configured password"
    }

    fn subscribed_events(&self) -> &[EventFilter] {
        &[EventFilter::ChatMessageReceived]
    }

    fn on_event(&mut self, event: &GameEvent, ctx: &mut ScriptContext) {
        let GameEvent::ChatMessageReceived { message, .. } = event else {
            return;
        };
        match classify_prompt(message) {
            Some(AuthPrompt::Register) => {
                info!(target: "scripts", "Registration prompt detected, sending /register");
                ctx.send_chat(format!("/register {} {}", self.password, self.password));
            }
            Some(AuthPrompt::Login) => {
                info!(target: "scripts", "Login prompt detected, sending /login");
                ctx.send_chat(format!("/login {}", self.password));
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::events::ClientAction;
    use std::time::Instant;
    use tokio::sync::mpsc;

    #[test]
    fn register_takes_precedence_over_login() {
        assert_eq!(
            classify_prompt("Please /register <password> before you can /login"),
            Some(AuthPrompt::Register)
        );
    }

    #[test]
    fn login_prompt_variants() {
        assert_eq!(classify_prompt("Please /login <password>"), Some(AuthPrompt::Login));
        assert_eq!(classify_prompt("PLEASE LOG IN NOW"), Some(AuthPrompt::Login));
    }

    #[test]
    fn register_stem_is_case_insensitive() {
        assert_eq!(
            classify_prompt("Bitte REGISTRIEREN Sie sich"),
            Some(AuthPrompt::Register)
        );
    }

    #[test]
    fn ordinary_chat_does_not_match() {
        assert_eq!(classify_prompt("Welcome to the server!"), None);
        assert_eq!(classify_prompt("Diamonds at spawn"), None);
    }

    #[test]
    fn sends_register_with_doubled_password() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut ctx = ScriptContext::new(tx, Instant::now());
        let mut script = AutoAuthScript::new("hunter2");

        script.on_event(
            &GameEvent::ChatMessageReceived {
                message: "Use /register <pass> <pass>".into(),
                position: 0,
            },
            &mut ctx,
        );

        assert_eq!(
            rx.try_recv().unwrap(),
            ClientAction::SendChat {
                message: "/register hunter2 hunter2".into()
            }
        );
    }

    #[test]
    fn responds_to_repeated_prompts() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut ctx = ScriptContext::new(tx, Instant::now());
        let mut script = AutoAuthScript::new("hunter2");

        for _ in 0..2 {
            script.on_event(
                &GameEvent::ChatMessageReceived {
                    message: "Please /login <password>".into(),
                    position: 0,
                },
                &mut ctx,
            );
        }

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_ok());
    }
}
