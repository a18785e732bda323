// Sports section: event listing, search, joining, and creation.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{
    EventStatus, Participation, ParticipationStatus, SkillLevel, SportsEvent,
};
use crate::sections::matches_keyword;
use crate::store::{fresh_id, Store};

#[derive(Debug, Error, PartialEq)]
pub enum JoinError {
    #[error("event not found")]
    EventNotFound,
    #[error("event is full")]
    EventFull,
    #[error("already joined this event")]
    AlreadyJoined,
}

/// Optional filters, combined with AND. Unset fields match everything.
#[derive(Debug, Default, Clone)]
pub struct EventFilter {
    pub sport: Option<String>,
    pub skill_level: Option<SkillLevel>,
    pub status: Option<EventStatus>,
}

/// Linear filter over the event list.
pub fn filter_events<'a>(events: &'a [SportsEvent], filter: &EventFilter) -> Vec<&'a SportsEvent> {
    events
        .iter()
        .filter(|e| filter.sport.as_deref().is_none_or(|s| e.sport == s))
        .filter(|e| filter.skill_level.is_none_or(|l| e.skill_level == l))
        .filter(|e| filter.status.is_none_or(|s| e.status == s))
        .collect()
}

/// Keyword search over title and description. An empty keyword matches all.
pub fn search_events<'a>(events: &'a [SportsEvent], keyword: &str) -> Vec<&'a SportsEvent> {
    events
        .iter()
        .filter(|e| {
            keyword.is_empty()
                || matches_keyword(&e.title, keyword)
                || matches_keyword(&e.description, keyword)
        })
        .collect()
}

/// Join an event: appends the user to the participant list and records a
/// participation. Rejects a full event and a repeated join.
pub fn join_event(
    store: &mut Store,
    event_id: &str,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<(), JoinError> {
    let event = store
        .sports_events
        .iter_mut()
        .find(|e| e.id == event_id)
        .ok_or(JoinError::EventNotFound)?;

    if event.participant_ids.iter().any(|id| id == user_id) {
        return Err(JoinError::AlreadyJoined);
    }
    if event.participant_ids.len() >= event.max_participants {
        return Err(JoinError::EventFull);
    }

    event.participant_ids.push(user_id.to_string());
    store.participations.push(Participation {
        id: fresh_id(),
        user_id: user_id.to_string(),
        event_id: event_id.to_string(),
        status: ParticipationStatus::Registered,
        registered_at: now,
    });
    Ok(())
}

/// Fields for a newly created event.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub sport: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub max_participants: usize,
    pub description: String,
    pub skill_level: SkillLevel,
}

/// Create an event. The creator is its first participant. Returns the new id.
pub fn create_event(store: &mut Store, creator_id: &str, new: NewEvent, now: DateTime<Utc>) -> String {
    let id = fresh_id();
    store.sports_events.push(SportsEvent {
        id: id.clone(),
        title: new.title,
        sport: new.sport,
        date: new.date,
        location: new.location,
        max_participants: new.max_participants,
        participant_ids: vec![creator_id.to_string()],
        description: new.description,
        skill_level: new.skill_level,
        status: EventStatus::Upcoming,
    });
    store.participations.push(Participation {
        id: fresh_id(),
        user_id: creator_id.to_string(),
        event_id: id.clone(),
        status: ParticipationStatus::Registered,
        registered_at: now,
    });
    id
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
