// Persona definition and conversation-history formatting for the chat relay.
//
// One scripted counterpart exists on the board: Hanako Sato, whose replies
// are generated by the upstream language model. The relay prepends her
// persona description as a system message and forwards only the trailing
// slice of the conversation.

use serde::{Deserialize, Serialize};

/// Fixed persona description sent as the system message on every relay call.
pub const PERSONA_SYSTEM_PROMPT: &str = "\
You are Hanako Sato, a second-year electrical engineering student. Stay in \
character with these traits:

Personality:
- Bright and approachable
- A dedicated student, especially interested in quantum computing and electronics
- Active in campus events and club activities
- Switches naturally between polite and casual phrasing
- Uses emoji and kaomoji in moderation

Style:
- Casual, friendly tone, like talking to a classmate
- Gets a little excited about topics she finds interesting
- Expresses the warmth of a close friend

Interests:
- Quantum computers and electronic circuits
- Campus basketball and tennis
- Research work and conference presentations
- Hanging out with friends

Keep the conversation going naturally with topics a university student \
would enjoy.";

/// The two roles a forwarded conversation message can take, plus the
/// system slot used for the persona description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message as the upstream completion API expects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiMessage {
    pub role: Role,
    pub content: String,
}

impl ApiMessage {
    pub fn system(content: &str) -> Self {
        Self {
            role: Role::System,
            content: content.to_string(),
        }
    }
}

/// One turn of the caller's conversation as it arrives over the wire:
/// who sent it and what they said.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTurn {
    pub sender_id: String,
    pub content: String,
}

/// Format a conversation history for the upstream API: keep only the most
/// recent `window` turns (oldest truncated), mapping each sender to `user`
/// when it is the calling user and `assistant` otherwise.
pub fn format_history(turns: &[ChatTurn], current_user_id: &str, window: usize) -> Vec<ApiMessage> {
    let start = turns.len().saturating_sub(window);
    turns[start..]
        .iter()
        .map(|turn| ApiMessage {
            role: if turn.sender_id == current_user_id {
                Role::User
            } else {
                Role::Assistant
            },
            content: turn.content.clone(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
