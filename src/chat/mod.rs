// Chat: the relay to the scripted persona, the completion client behind it,
// and the in-memory conversation threads.
//
// The relay is stateless from the server's perspective: every call carries
// the full (already truncated) history, and nothing is persisted here.

pub mod client;
pub mod persona;
pub mod thread;

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::chat::client::CompletionBackend;
use crate::chat::persona::{format_history, ApiMessage, ChatTurn, PERSONA_SYSTEM_PROMPT};

#[derive(Debug, Error)]
pub enum RelayError {
    /// The requested counterpart is not the scripted persona.
    #[error("chat with this user is not available")]
    DisallowedTarget,
    /// The upstream completion call failed.
    #[error("upstream completion failed")]
    Upstream(#[source] anyhow::Error),
}

/// The chat relay: gates on the single allowed persona id, prepends the
/// persona system prompt to the trailing slice of the conversation, and
/// forwards it to the completion backend.
pub struct ChatRelay {
    backend: Arc<dyn CompletionBackend>,
    persona_user_id: String,
    history_window: usize,
}

impl ChatRelay {
    pub fn new(
        backend: Arc<dyn CompletionBackend>,
        persona_user_id: String,
        history_window: usize,
    ) -> Self {
        Self {
            backend,
            persona_user_id,
            history_window,
        }
    }

    pub fn persona_user_id(&self) -> &str {
        &self.persona_user_id
    }

    /// Relay one conversation to the persona and return the reply text
    /// verbatim. Rejects any target other than the persona id before
    /// touching the backend.
    pub async fn relay(
        &self,
        messages: &[ChatTurn],
        current_user_id: &str,
        target_user_id: &str,
    ) -> Result<String, RelayError> {
        if target_user_id != self.persona_user_id {
            return Err(RelayError::DisallowedTarget);
        }

        let mut api_messages = vec![ApiMessage::system(PERSONA_SYSTEM_PROMPT)];
        api_messages.extend(format_history(messages, current_user_id, self.history_window));

        info!(
            turns = api_messages.len() - 1,
            "relaying conversation to persona"
        );
        self.backend
            .complete(&api_messages)
            .await
            .map_err(RelayError::Upstream)
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::persona::Role;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Scripted backend: records what it was asked and returns a canned
    /// result.
    struct Scripted {
        reply: anyhow::Result<String>,
        seen: Mutex<Vec<Vec<ApiMessage>>>,
    }

    impl Scripted {
        fn ok(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(anyhow::anyhow!("upstream exploded")),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionBackend for Scripted {
        async fn complete(&self, messages: &[ApiMessage]) -> anyhow::Result<String> {
            self.seen.lock().unwrap().push(messages.to_vec());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(anyhow::anyhow!("{e}")),
            }
        }
    }

    fn turn(sender: &str, content: &str) -> ChatTurn {
        ChatTurn {
            sender_id: sender.to_string(),
            content: content.to_string(),
        }
    }

    fn relay_with(backend: Arc<dyn CompletionBackend>) -> ChatRelay {
        ChatRelay::new(backend, "2".into(), 10)
    }

    #[tokio::test]
    async fn rejects_any_target_other_than_the_persona() {
        let backend = Arc::new(Scripted::ok("hi"));
        let relay = relay_with(backend.clone());

        let err = relay
            .relay(&[turn("1", "hello")], "1", "3")
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::DisallowedTarget));

        // The backend was never called.
        assert!(backend.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn success_returns_the_reply_verbatim() {
        let backend = Arc::new(Scripted::ok("Oh nice, how did the exam go? \u{1f604}"));
        let relay = relay_with(backend);

        let reply = relay
            .relay(&[turn("1", "exams are over!")], "1", "2")
            .await
            .unwrap();
        assert_eq!(reply, "Oh nice, how did the exam go? \u{1f604}");
    }

    #[tokio::test]
    async fn upstream_failure_maps_to_the_upstream_variant() {
        let relay = relay_with(Arc::new(Scripted::failing()));
        let err = relay
            .relay(&[turn("1", "hello")], "1", "2")
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::Upstream(_)));
    }

    #[tokio::test]
    async fn persona_prompt_is_prepended_and_history_truncated() {
        let backend = Arc::new(Scripted::ok("ok"));
        let relay = relay_with(backend.clone());

        let turns: Vec<ChatTurn> = (0..15)
            .map(|i| {
                let sender = if i % 2 == 0 { "1" } else { "2" };
                turn(sender, &format!("msg {i}"))
            })
            .collect();

        relay.relay(&turns, "1", "2").await.unwrap();

        let seen = backend.seen.lock().unwrap();
        let sent = &seen[0];
        // System prompt plus the 10 most recent turns.
        assert_eq!(sent.len(), 11);
        assert_eq!(sent[0].role, Role::System);
        assert!(sent[0].content.contains("Hanako Sato"));
        assert_eq!(sent[1].content, "msg 5");
        assert_eq!(sent[10].content, "msg 14");
        // Role mapping survived the trip.
        assert_eq!(sent[1].role, Role::Assistant); // msg 5 sent by "2"
        assert_eq!(sent[2].role, Role::User); // msg 6 sent by "1"
    }

    #[tokio::test]
    async fn empty_history_still_carries_the_system_prompt() {
        let backend = Arc::new(Scripted::ok("ok"));
        let relay = relay_with(backend.clone());

        relay.relay(&[], "1", "2").await.unwrap();

        let seen = backend.seen.lock().unwrap();
        assert_eq!(seen[0].len(), 1);
        assert_eq!(seen[0][0].role, Role::System);
    }
}
