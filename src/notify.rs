// Per-user notification list.
//
// Notifications are kept newest first (array prepend order) and mirrored to
// the per-user blob store after every mutation. The first load for a user
// seeds the list from the fixture notifications; later loads restore from
// the blob, falling back to the fixtures when the blob is unreadable.

use anyhow::Result;
use chrono::Utc;

use crate::db::{Database, KEY_NOTIFICATIONS};
use crate::model::{Notification, NotificationKind};
use crate::store::{fresh_id, Store};

/// An unsaved notification: everything but the identity fields the center
/// fills in on push.
#[derive(Debug, Clone)]
pub struct NotificationDraft {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub action_url: Option<String>,
}

/// Notification list for one user, newest first.
pub struct NotificationCenter {
    user_id: String,
    items: Vec<Notification>,
}

impl NotificationCenter {
    /// Restore the list for `user_id` from the blob store, seeding from the
    /// fixture notifications (and persisting the seed) when no blob exists.
    pub fn restore(db: &Database, store: &Store, user_id: &str) -> Result<Self> {
        let items = match db.load_as::<Vec<Notification>>(user_id, KEY_NOTIFICATIONS)? {
            Some(items) => items,
            None => {
                let seeded: Vec<Notification> = store
                    .notifications
                    .iter()
                    .filter(|n| n.user_id == user_id)
                    .cloned()
                    .collect();
                db.save_as(user_id, KEY_NOTIFICATIONS, &seeded)?;
                seeded
            }
        };

        Ok(Self {
            user_id: user_id.to_string(),
            items,
        })
    }

    /// Notifications, newest first.
    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.read).count()
    }

    /// Prepend a new unread notification and persist the list. Returns the
    /// id assigned to it.
    pub fn push(&mut self, db: &Database, draft: NotificationDraft) -> Result<String> {
        let notification = Notification {
            id: fresh_id(),
            user_id: self.user_id.clone(),
            kind: draft.kind,
            title: draft.title,
            message: draft.message,
            read: false,
            created_at: Utc::now(),
            action_url: draft.action_url,
        };
        let id = notification.id.clone();

        self.items.insert(0, notification);
        self.persist(db)?;
        Ok(id)
    }

    /// Mark one notification read. Returns false when the id is unknown.
    pub fn mark_read(&mut self, db: &Database, id: &str) -> Result<bool> {
        let Some(item) = self.items.iter_mut().find(|n| n.id == id) else {
            return Ok(false);
        };
        item.read = true;
        self.persist(db)?;
        Ok(true)
    }

    pub fn mark_all_read(&mut self, db: &Database) -> Result<()> {
        for item in &mut self.items {
            item.read = true;
        }
        self.persist(db)
    }

    /// Remove one notification. Returns false when the id is unknown.
    pub fn remove(&mut self, db: &Database, id: &str) -> Result<bool> {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        if self.items.len() == before {
            return Ok(false);
        }
        self.persist(db)?;
        Ok(true)
    }

    /// Drop every notification and delete the persisted blob.
    pub fn clear_all(&mut self, db: &Database) -> Result<()> {
        self.items.clear();
        db.delete(&self.user_id, KEY_NOTIFICATIONS)
    }

    fn persist(&self, db: &Database) -> Result<()> {
        db.save_as(&self.user_id, KEY_NOTIFICATIONS, &self.items)
    }
}

// ---------------------------------------------------------------------------
// Canned notification builders
// ---------------------------------------------------------------------------

/// Drafts for the notifications the board sends on its own.
pub mod drafts {
    use super::NotificationDraft;
    use crate::model::NotificationKind;

    pub fn event_participation(event_title: &str, event_id: &str) -> NotificationDraft {
        NotificationDraft {
            kind: NotificationKind::Success,
            title: "Event participation".into(),
            message: format!("Your spot in {event_title} is confirmed"),
            action_url: Some(format!("/sports/{event_id}")),
        }
    }

    pub fn event_reminder(event_title: &str, event_id: &str) -> NotificationDraft {
        NotificationDraft {
            kind: NotificationKind::Info,
            title: "Event reminder".into(),
            message: format!("{event_title} starts in one hour"),
            action_url: Some(format!("/sports/{event_id}")),
        }
    }

    pub fn new_message(sender_name: &str, conversation_id: &str) -> NotificationDraft {
        NotificationDraft {
            kind: NotificationKind::Info,
            title: "New message".into(),
            message: format!("{sender_name} sent you a message"),
            action_url: Some(format!("/messages/{conversation_id}")),
        }
    }

    pub fn item_sold(item_title: &str, item_id: &str) -> NotificationDraft {
        NotificationDraft {
            kind: NotificationKind::Success,
            title: "Item sold".into(),
            message: format!("A buyer appeared for {item_title}"),
            action_url: Some(format!("/marketplace/{item_id}")),
        }
    }

    pub fn answer_accepted(question_title: &str, question_id: &str) -> NotificationDraft {
        NotificationDraft {
            kind: NotificationKind::Success,
            title: "Best answer".into(),
            message: format!("Your answer to \"{question_title}\" was accepted"),
            action_url: Some(format!("/research/qa/{question_id}")),
        }
    }

    pub fn application_deadline(company_name: &str, days_left: i64) -> NotificationDraft {
        NotificationDraft {
            kind: NotificationKind::Warning,
            title: "Application deadline".into(),
            message: format!("{days_left} days left to apply to {company_name}"),
            action_url: Some("/career".into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
