// Marketplace section: listings, search, views, favorites, and sales.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{ItemCondition, ItemStatus, MarketItem};
use crate::sections::matches_keyword;
use crate::store::{fresh_id, Store};

#[derive(Debug, Error, PartialEq)]
pub enum MarketError {
    #[error("item not found")]
    ItemNotFound,
    #[error("item is no longer available")]
    NotAvailable,
}

/// Optional filters, combined with AND. Unset fields match everything.
#[derive(Debug, Default, Clone)]
pub struct ItemFilter {
    pub category: Option<String>,
    pub condition: Option<ItemCondition>,
    pub max_price: Option<u32>,
    pub status: Option<ItemStatus>,
}

/// Linear filter over the listings.
pub fn filter_items<'a>(items: &'a [MarketItem], filter: &ItemFilter) -> Vec<&'a MarketItem> {
    items
        .iter()
        .filter(|i| filter.category.as_deref().is_none_or(|c| i.category == c))
        .filter(|i| filter.condition.is_none_or(|c| i.condition == c))
        .filter(|i| filter.max_price.is_none_or(|p| i.price <= p))
        .filter(|i| filter.status.is_none_or(|s| i.status == s))
        .collect()
}

/// Keyword search over title and description. An empty keyword matches all.
pub fn search_items<'a>(items: &'a [MarketItem], keyword: &str) -> Vec<&'a MarketItem> {
    items
        .iter()
        .filter(|i| {
            keyword.is_empty()
                || matches_keyword(&i.title, keyword)
                || matches_keyword(&i.description, keyword)
        })
        .collect()
}

/// Listings newest first (the recent-listings strip).
pub fn recent_listings(items: &[MarketItem]) -> Vec<&MarketItem> {
    let mut listed: Vec<&MarketItem> = items.iter().collect();
    listed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    listed
}

/// Fields for a new listing.
#[derive(Debug, Clone)]
pub struct NewListing {
    pub title: String,
    pub category: String,
    pub condition: ItemCondition,
    pub price: u32,
    pub description: String,
    pub photos: Vec<String>,
    pub location: String,
    pub delivery_methods: Vec<String>,
}

/// Create a listing. Returns the new item id.
pub fn create_listing(
    store: &mut Store,
    seller_id: &str,
    new: NewListing,
    now: DateTime<Utc>,
) -> String {
    let id = fresh_id();
    store.market_items.push(MarketItem {
        id: id.clone(),
        title: new.title,
        seller_id: seller_id.to_string(),
        category: new.category,
        condition: new.condition,
        price: new.price,
        description: new.description,
        photos: new.photos,
        location: new.location,
        delivery_methods: new.delivery_methods,
        status: ItemStatus::Available,
        created_at: now,
        views: 0,
        favorites: 0,
    });
    id
}

/// Count one view of an item's detail page. Returns the new view count.
pub fn record_view(store: &mut Store, item_id: &str) -> Result<u32, MarketError> {
    let item = store
        .market_items
        .iter_mut()
        .find(|i| i.id == item_id)
        .ok_or(MarketError::ItemNotFound)?;
    item.views += 1;
    Ok(item.views)
}

/// Add one favorite. Returns the new favorite count.
pub fn add_favorite(store: &mut Store, item_id: &str) -> Result<u32, MarketError> {
    let item = store
        .market_items
        .iter_mut()
        .find(|i| i.id == item_id)
        .ok_or(MarketError::ItemNotFound)?;
    item.favorites += 1;
    Ok(item.favorites)
}

/// Remove one favorite, never dropping below zero.
pub fn remove_favorite(store: &mut Store, item_id: &str) -> Result<u32, MarketError> {
    let item = store
        .market_items
        .iter_mut()
        .find(|i| i.id == item_id)
        .ok_or(MarketError::ItemNotFound)?;
    item.favorites = item.favorites.saturating_sub(1);
    Ok(item.favorites)
}

/// Mark an available item as sold.
pub fn mark_sold(store: &mut Store, item_id: &str) -> Result<(), MarketError> {
    let item = store
        .market_items
        .iter_mut()
        .find(|i| i.id == item_id)
        .ok_or(MarketError::ItemNotFound)?;
    if item.status != ItemStatus::Available {
        return Err(MarketError::NotAvailable);
    }
    item.status = ItemStatus::Sold;
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_combines_predicates() {
        let store = Store::seed();

        let electronics = filter_items(
            &store.market_items,
            &ItemFilter {
                category: Some("electronics".into()),
                ..Default::default()
            },
        );
        assert_eq!(electronics.len(), 1);
        assert_eq!(electronics[0].title, "Laptop (ThinkPad)");

        let cheap_available = filter_items(
            &store.market_items,
            &ItemFilter {
                max_price: Some(3000),
                status: Some(ItemStatus::Available),
                ..Default::default()
            },
        );
        assert_eq!(cheap_available.len(), 1);
        assert_eq!(cheap_available[0].category, "textbooks");
    }

    #[test]
    fn search_matches_title_and_description() {
        let store = Store::seed();
        assert_eq!(search_items(&store.market_items, "thinkpad").len(), 1);
        assert_eq!(search_items(&store.market_items, "java").len(), 1);
        assert!(search_items(&store.market_items, "bicycle").is_empty());
    }

    #[test]
    fn recent_listings_sorts_newest_first() {
        let store = Store::seed();
        let recent = recent_listings(&store.market_items);
        assert_eq!(recent[0].id, "2");
        assert_eq!(recent[1].id, "1");
    }

    #[test]
    fn create_listing_starts_available_with_zero_counters() {
        let mut store = Store::seed();
        let id = create_listing(
            &mut store,
            "4",
            NewListing {
                title: "Desk lamp".into(),
                category: "furniture".into(),
                condition: ItemCondition::Good,
                price: 800,
                description: "Warm LED, barely used.".into(),
                photos: vec![],
                location: "Dorm B".into(),
                delivery_methods: vec!["hand over".into()],
            },
            Utc::now(),
        );

        let item = store.market_item(&id).unwrap();
        assert_eq!(item.status, ItemStatus::Available);
        assert_eq!(item.views, 0);
        assert_eq!(item.favorites, 0);
        assert_eq!(item.seller_id, "4");
    }

    #[test]
    fn views_and_favorites_count_up_and_down() {
        let mut store = Store::seed();
        let start_views = store.market_item("1").unwrap().views;

        assert_eq!(record_view(&mut store, "1").unwrap(), start_views + 1);

        let start_favs = store.market_item("1").unwrap().favorites;
        assert_eq!(add_favorite(&mut store, "1").unwrap(), start_favs + 1);
        assert_eq!(remove_favorite(&mut store, "1").unwrap(), start_favs);
    }

    #[test]
    fn remove_favorite_saturates_at_zero() {
        let mut store = Store::seed();
        let id = create_listing(
            &mut store,
            "4",
            NewListing {
                title: "Poster".into(),
                category: "other".into(),
                condition: ItemCondition::Fair,
                price: 100,
                description: String::new(),
                photos: vec![],
                location: String::new(),
                delivery_methods: vec![],
            },
            Utc::now(),
        );
        assert_eq!(remove_favorite(&mut store, &id).unwrap(), 0);
    }

    #[test]
    fn mark_sold_rejects_double_sale() {
        let mut store = Store::seed();
        mark_sold(&mut store, "1").unwrap();
        assert_eq!(store.market_item("1").unwrap().status, ItemStatus::Sold);
        assert_eq!(mark_sold(&mut store, "1"), Err(MarketError::NotAvailable));
    }

    #[test]
    fn unknown_item_reports_not_found() {
        let mut store = Store::seed();
        assert_eq!(record_view(&mut store, "999"), Err(MarketError::ItemNotFound));
        assert_eq!(mark_sold(&mut store, "999"), Err(MarketError::ItemNotFound));
    }
}
