// Career section: job postings, deadlines, career events, and internships.

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::model::{CareerEvent, EventStatus, Internship, JobPosting, PostingStatus};
use crate::store::Store;

#[derive(Debug, Error, PartialEq)]
pub enum CareerError {
    #[error("career event not found")]
    EventNotFound,
    #[error("career event is full")]
    EventFull,
}

/// Postings still open and accepting applications as of `now`.
pub fn open_postings<'a>(jobs: &'a [JobPosting], now: DateTime<Utc>) -> Vec<&'a JobPosting> {
    jobs.iter()
        .filter(|j| j.status == PostingStatus::Open && j.deadline >= now)
        .collect()
}

/// Open postings whose deadline falls within the next `days` days, paired
/// with the number of whole days left. Feeds the deadline-warning
/// notification.
pub fn postings_closing_within(
    jobs: &[JobPosting],
    now: DateTime<Utc>,
    days: i64,
) -> Vec<(&JobPosting, i64)> {
    let cutoff = now + Duration::days(days);
    jobs.iter()
        .filter(|j| j.status == PostingStatus::Open && j.deadline >= now && j.deadline <= cutoff)
        .map(|j| (j, (j.deadline - now).num_days()))
        .collect()
}

/// Upcoming career events, soonest first.
pub fn upcoming_events<'a>(events: &'a [CareerEvent], now: DateTime<Utc>) -> Vec<&'a CareerEvent> {
    let mut found: Vec<&CareerEvent> = events
        .iter()
        .filter(|e| e.status == EventStatus::Upcoming && e.date >= now)
        .collect();
    found.sort_by(|a, b| a.date.cmp(&b.date));
    found
}

/// Take one seat at a career event.
pub fn register_for_event(store: &mut Store, event_id: &str) -> Result<(), CareerError> {
    let event = store
        .career_events
        .iter_mut()
        .find(|e| e.id == event_id)
        .ok_or(CareerError::EventNotFound)?;

    if event.current_attendees >= event.max_attendees {
        return Err(CareerError::EventFull);
    }
    event.current_attendees += 1;
    Ok(())
}

/// Internships still accepting applications as of `now`.
pub fn open_internships<'a>(
    internships: &'a [Internship],
    now: DateTime<Utc>,
) -> Vec<&'a Internship> {
    internships
        .iter()
        .filter(|i| i.status == PostingStatus::Open && i.application_deadline >= now)
        .collect()
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn open_postings_excludes_expired_deadlines() {
        let store = Store::seed();
        // Seeded posting closes 2025-07-31.
        assert_eq!(open_postings(&store.job_postings, at(2025, 7, 1)).len(), 1);
        assert!(open_postings(&store.job_postings, at(2025, 8, 1)).is_empty());
    }

    #[test]
    fn closing_within_reports_days_left() {
        let store = Store::seed();

        let soon = postings_closing_within(&store.job_postings, at(2025, 7, 29), 7);
        assert_eq!(soon.len(), 1);
        assert_eq!(soon[0].1, 2);

        // Too far out.
        assert!(postings_closing_within(&store.job_postings, at(2025, 6, 1), 7).is_empty());
    }

    #[test]
    fn upcoming_events_sorts_soonest_first() {
        let mut store = Store::seed();
        store.career_events.push(CareerEvent {
            id: "2".into(),
            title: "Resume workshop".into(),
            event_type: crate::model::CareerEventType::Workshop,
            company_id: None,
            date: at(2025, 6, 14),
            location: "Career center".into(),
            description: String::new(),
            max_attendees: 30,
            current_attendees: 0,
            registration_required: false,
            status: EventStatus::Upcoming,
        });

        let upcoming = upcoming_events(&store.career_events, at(2025, 6, 12));
        assert_eq!(upcoming.len(), 2);
        assert_eq!(upcoming[0].id, "2");
        assert_eq!(upcoming[1].id, "1");
    }

    #[test]
    fn past_events_are_excluded() {
        let store = Store::seed();
        assert!(upcoming_events(&store.career_events, at(2025, 7, 1)).is_empty());
    }

    #[test]
    fn register_takes_one_seat_until_full() {
        let mut store = Store::seed();
        store.career_events[0].current_attendees = 99;

        register_for_event(&mut store, "1").unwrap();
        assert_eq!(store.career_events[0].current_attendees, 100);

        assert_eq!(
            register_for_event(&mut store, "1"),
            Err(CareerError::EventFull)
        );
        assert_eq!(
            register_for_event(&mut store, "999"),
            Err(CareerError::EventNotFound)
        );
    }

    #[test]
    fn open_internships_respects_the_application_deadline() {
        let store = Store::seed();
        assert_eq!(open_internships(&store.internships, at(2025, 6, 20)).len(), 1);
        assert!(open_internships(&store.internships, at(2025, 7, 1)).is_empty());
    }
}
