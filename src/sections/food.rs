// Food section: menus, reviews, and meal invitations.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{InvitationStatus, MealInvitation, MenuItem, Review};
use crate::store::{fresh_id, Store};

#[derive(Debug, Error, PartialEq)]
pub enum ReviewError {
    #[error("menu item not found")]
    MenuItemNotFound,
    #[error("rating must be between 1 and 5")]
    InvalidRating,
}

#[derive(Debug, Error, PartialEq)]
pub enum InvitationError {
    #[error("invitation not found")]
    InvitationNotFound,
    #[error("invitation is not open")]
    NotOpen,
    #[error("already joined this invitation")]
    AlreadyJoined,
}

/// Menu items served by one restaurant.
pub fn menu_for_restaurant<'a>(items: &'a [MenuItem], restaurant: &str) -> Vec<&'a MenuItem> {
    items.iter().filter(|m| m.restaurant == restaurant).collect()
}

/// Menu items in one category.
pub fn menu_by_category<'a>(items: &'a [MenuItem], category: &str) -> Vec<&'a MenuItem> {
    items.iter().filter(|m| m.category == category).collect()
}

/// Reviews for one menu item, newest first.
pub fn reviews_for_item<'a>(reviews: &'a [Review], menu_item_id: &str) -> Vec<&'a Review> {
    let mut found: Vec<&Review> = reviews
        .iter()
        .filter(|r| r.menu_item_id == menu_item_id)
        .collect();
    found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    found
}

/// Fields for a new review.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub menu_item_id: String,
    pub rating: u8,
    pub comment: String,
    pub photos: Vec<String>,
    pub tags: Vec<String>,
}

/// Post a review and recompute the menu item's displayed rating as the mean
/// of all its reviews. Returns the new review id.
pub fn post_review(
    store: &mut Store,
    author_id: &str,
    new: NewReview,
    now: DateTime<Utc>,
) -> Result<String, ReviewError> {
    if !(1..=5).contains(&new.rating) {
        return Err(ReviewError::InvalidRating);
    }
    if store.menu_item(&new.menu_item_id).is_none() {
        return Err(ReviewError::MenuItemNotFound);
    }

    let id = fresh_id();
    store.reviews.push(Review {
        id: id.clone(),
        author_id: author_id.to_string(),
        menu_item_id: new.menu_item_id.clone(),
        rating: new.rating,
        comment: new.comment,
        photos: new.photos,
        tags: new.tags,
        created_at: now,
        helpful: 0,
    });

    let mean = mean_rating(&store.reviews, &new.menu_item_id);
    if let Some(item) = store
        .menu_items
        .iter_mut()
        .find(|m| m.id == new.menu_item_id)
    {
        if let Some(mean) = mean {
            item.rating = mean;
        }
    }

    Ok(id)
}

/// Mean review rating for one menu item, `None` when it has no reviews.
pub fn mean_rating(reviews: &[Review], menu_item_id: &str) -> Option<f64> {
    let ratings: Vec<f64> = reviews
        .iter()
        .filter(|r| r.menu_item_id == menu_item_id)
        .map(|r| f64::from(r.rating))
        .collect();
    if ratings.is_empty() {
        return None;
    }
    Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
}

/// Meal invitations still accepting people.
pub fn open_invitations(invitations: &[MealInvitation]) -> Vec<&MealInvitation> {
    invitations
        .iter()
        .filter(|i| i.status == InvitationStatus::Open)
        .collect()
}

/// Join a meal invitation. Fills a seat; the invitation flips to `full`
/// when the last seat is taken.
pub fn join_invitation(
    store: &mut Store,
    invitation_id: &str,
    user_id: &str,
) -> Result<(), InvitationError> {
    let invitation = store
        .meal_invitations
        .iter_mut()
        .find(|i| i.id == invitation_id)
        .ok_or(InvitationError::InvitationNotFound)?;

    if invitation.status != InvitationStatus::Open {
        return Err(InvitationError::NotOpen);
    }
    if invitation.participant_ids.iter().any(|id| id == user_id) {
        return Err(InvitationError::AlreadyJoined);
    }

    invitation.participant_ids.push(user_id.to_string());
    invitation.current_people += 1;
    if invitation.current_people >= invitation.max_people {
        invitation.status = InvitationStatus::Full;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_filters_by_restaurant_and_category() {
        let store = Store::seed();

        let cafeteria_a = menu_for_restaurant(&store.menu_items, "Cafeteria A");
        assert_eq!(cafeteria_a.len(), 1);
        assert_eq!(cafeteria_a[0].name, "Fried chicken set");

        let japanese = menu_by_category(&store.menu_items, "japanese");
        assert_eq!(japanese.len(), 2);
    }

    #[test]
    fn reviews_for_item_sorts_newest_first() {
        let mut store = Store::seed();
        post_review(
            &mut store,
            "3",
            NewReview {
                menu_item_id: "1".into(),
                rating: 5,
                comment: "Even better than last time".into(),
                photos: vec![],
                tags: vec![],
            },
            Utc::now(),
        )
        .unwrap();

        let reviews = reviews_for_item(&store.reviews, "1");
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].comment, "Even better than last time");
    }

    #[test]
    fn post_review_recomputes_the_mean_rating() {
        let mut store = Store::seed();
        // Item "1" has one seeded review at rating 4.
        post_review(
            &mut store,
            "3",
            NewReview {
                menu_item_id: "1".into(),
                rating: 5,
                comment: "great".into(),
                photos: vec![],
                tags: vec![],
            },
            Utc::now(),
        )
        .unwrap();

        let item = store.menu_item("1").unwrap();
        assert!((item.rating - 4.5).abs() < f64::EPSILON);
    }

    #[test]
    fn post_review_rejects_out_of_range_ratings() {
        let mut store = Store::seed();
        for bad in [0u8, 6] {
            let err = post_review(
                &mut store,
                "1",
                NewReview {
                    menu_item_id: "1".into(),
                    rating: bad,
                    comment: String::new(),
                    photos: vec![],
                    tags: vec![],
                },
                Utc::now(),
            )
            .unwrap_err();
            assert_eq!(err, ReviewError::InvalidRating);
        }
    }

    #[test]
    fn post_review_rejects_unknown_menu_item() {
        let mut store = Store::seed();
        let err = post_review(
            &mut store,
            "1",
            NewReview {
                menu_item_id: "999".into(),
                rating: 4,
                comment: String::new(),
                photos: vec![],
                tags: vec![],
            },
            Utc::now(),
        )
        .unwrap_err();
        assert_eq!(err, ReviewError::MenuItemNotFound);
    }

    #[test]
    fn mean_rating_is_none_without_reviews() {
        let store = Store::seed();
        assert_eq!(mean_rating(&store.reviews, "3"), None);
    }

    #[test]
    fn join_invitation_fills_seats_and_flips_to_full() {
        let mut store = Store::seed();
        // Seeded invitation: 2 of 4 seats taken, open.
        join_invitation(&mut store, "1", "3").unwrap();
        assert_eq!(store.meal_invitations[0].status, InvitationStatus::Open);

        join_invitation(&mut store, "1", "4").unwrap();
        let invitation = &store.meal_invitations[0];
        assert_eq!(invitation.current_people, 4);
        assert_eq!(invitation.status, InvitationStatus::Full);

        // A fifth joiner is rejected.
        assert_eq!(
            join_invitation(&mut store, "1", "5"),
            Err(InvitationError::NotOpen)
        );
    }

    #[test]
    fn join_invitation_rejects_repeat_joins() {
        let mut store = Store::seed();
        assert_eq!(
            join_invitation(&mut store, "1", "1"),
            Err(InvitationError::AlreadyJoined)
        );
    }

    #[test]
    fn open_invitations_excludes_full_ones() {
        let mut store = Store::seed();
        assert_eq!(open_invitations(&store.meal_invitations).len(), 1);

        join_invitation(&mut store, "1", "3").unwrap();
        join_invitation(&mut store, "1", "4").unwrap();
        assert!(open_invitations(&store.meal_invitations).is_empty());
    }
}
