// Conversation threads: the in-memory message lists behind the messages
// screen.
//
// Message order is append order only; there is no persistence. The unread
// counter on a conversation counts messages the viewing user has not read
// yet.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{Conversation, Message, User};
use crate::sections::matches_keyword;
use crate::store::{fresh_id, Store};

#[derive(Debug, Error, PartialEq)]
pub enum ThreadError {
    #[error("conversation not found")]
    ConversationNotFound,
    #[error("sender is not a participant of this conversation")]
    NotAParticipant,
}

/// Messages of one conversation in append order.
pub fn conversation_messages<'a>(store: &'a Store, conversation_id: &str) -> Vec<&'a Message> {
    store
        .messages
        .iter()
        .filter(|m| m.conversation_id == conversation_id)
        .collect()
}

/// The participant who is not `user_id`, resolved against the user list.
pub fn other_participant<'a>(
    store: &'a Store,
    conversation: &Conversation,
    user_id: &str,
) -> Option<&'a User> {
    let other_id = conversation.participants.iter().find(|id| *id != user_id)?;
    store.user(other_id)
}

/// Conversations involving `user_id` whose counterpart name or last message
/// matches the search term. An empty term matches all.
pub fn search_conversations<'a>(
    store: &'a Store,
    user_id: &str,
    term: &str,
) -> Vec<&'a Conversation> {
    store
        .conversations
        .iter()
        .filter(|c| c.participants.iter().any(|id| id == user_id))
        .filter(|c| {
            if term.is_empty() {
                return true;
            }
            let name_hit = other_participant(store, c, user_id)
                .is_some_and(|u| matches_keyword(&u.name, term));
            name_hit || matches_keyword(&c.last_message.content, term)
        })
        .collect()
}

/// Total unread messages across all of a user's conversations.
pub fn total_unread(store: &Store, user_id: &str) -> u32 {
    store
        .conversations
        .iter()
        .filter(|c| c.participants.iter().any(|id| id == user_id))
        .map(|c| c.unread_count)
        .sum()
}

/// Append a message to a conversation, updating its last-message snapshot.
/// The unread counter goes up when the sender is not the viewing user.
/// Returns the new message id.
pub fn append_message(
    store: &mut Store,
    conversation_id: &str,
    sender_id: &str,
    viewer_id: &str,
    content: &str,
    now: DateTime<Utc>,
) -> Result<String, ThreadError> {
    let conversation = store
        .conversations
        .iter_mut()
        .find(|c| c.id == conversation_id)
        .ok_or(ThreadError::ConversationNotFound)?;

    if !conversation.participants.iter().any(|id| id == sender_id) {
        return Err(ThreadError::NotAParticipant);
    }

    let message = Message {
        id: fresh_id(),
        conversation_id: conversation_id.to_string(),
        sender_id: sender_id.to_string(),
        content: content.to_string(),
        created_at: now,
        read: sender_id == viewer_id,
    };
    let id = message.id.clone();

    conversation.last_message = message.clone();
    if sender_id != viewer_id {
        conversation.unread_count += 1;
    }
    store.messages.push(message);
    Ok(id)
}

/// Mark a conversation read from the viewer's side: zeroes the unread
/// counter and flags every message read.
pub fn mark_conversation_read(store: &mut Store, conversation_id: &str) -> Result<(), ThreadError> {
    let conversation = store
        .conversations
        .iter_mut()
        .find(|c| c.id == conversation_id)
        .ok_or(ThreadError::ConversationNotFound)?;

    conversation.unread_count = 0;
    conversation.last_message.read = true;
    for message in store
        .messages
        .iter_mut()
        .filter(|m| m.conversation_id == conversation_id)
    {
        message.read = true;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
