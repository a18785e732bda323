// Per-user token ledger.
//
// Tokens are an in-app point currency awarded for simulated actions. The
// live balance lives on the `User` record; this ledger holds the transaction
// history behind it (newest first) and mirrors it to the per-user blob store
// after every mutation, the way the original mirrored the history into local
// storage.

use anyhow::Result;
use chrono::{NaiveDate, Utc};

use crate::db::{Database, KEY_LAST_DAILY_REWARD, KEY_TOKEN_TRANSACTIONS};
use crate::model::{TokenTransaction, TransactionKind, User};
use crate::store::fresh_id;

/// Transaction history for one user, newest first.
pub struct TokenLedger {
    user_id: String,
    transactions: Vec<TokenTransaction>,
}

impl TokenLedger {
    /// Restore the ledger for `user_id` from the blob store. A missing or
    /// unreadable blob resets to an empty history.
    pub fn restore(db: &Database, user_id: &str) -> Result<Self> {
        let transactions = db
            .load_as::<Vec<TokenTransaction>>(user_id, KEY_TOKEN_TRANSACTIONS)?
            .unwrap_or_default();
        Ok(Self {
            user_id: user_id.to_string(),
            transactions,
        })
    }

    /// Transactions, newest first.
    pub fn history(&self) -> &[TokenTransaction] {
        &self.transactions
    }

    /// Record an `earn` transaction and add `amount` to the user's balance.
    /// A zero amount is rejected and records nothing.
    pub fn earn(
        &mut self,
        db: &Database,
        user: &mut User,
        amount: u32,
        reason: &str,
        related_id: Option<String>,
    ) -> Result<bool> {
        if amount == 0 {
            return Ok(false);
        }

        self.record(db, TransactionKind::Earn, amount, reason, related_id)?;
        user.tokens += i64::from(amount);
        Ok(true)
    }

    /// Record a `spend` transaction and subtract `amount` from the user's
    /// balance. Returns false (recording nothing) when the amount is zero or
    /// exceeds the current balance.
    pub fn spend(
        &mut self,
        db: &Database,
        user: &mut User,
        amount: u32,
        reason: &str,
        related_id: Option<String>,
    ) -> Result<bool> {
        if amount == 0 || user.tokens < i64::from(amount) {
            return Ok(false);
        }

        self.record(db, TransactionKind::Spend, amount, reason, related_id)?;
        user.tokens -= i64::from(amount);
        Ok(true)
    }

    /// Award the daily login bonus at most once per calendar day. Returns
    /// true when the bonus was granted.
    pub fn grant_daily_bonus(
        &mut self,
        db: &Database,
        user: &mut User,
        amount: u32,
        today: NaiveDate,
    ) -> Result<bool> {
        let last: Option<String> = db.load_as(&self.user_id, KEY_LAST_DAILY_REWARD)?;
        let today_str = today.to_string();
        if last.as_deref() == Some(today_str.as_str()) {
            return Ok(false);
        }

        let granted = self.earn(db, user, amount, "Daily login bonus", None)?;
        if granted {
            db.save_as(&self.user_id, KEY_LAST_DAILY_REWARD, &today_str)?;
        }
        Ok(granted)
    }

    fn record(
        &mut self,
        db: &Database,
        kind: TransactionKind,
        amount: u32,
        reason: &str,
        related_id: Option<String>,
    ) -> Result<()> {
        let transaction = TokenTransaction {
            id: fresh_id(),
            user_id: self.user_id.clone(),
            amount: i64::from(amount),
            kind,
            reason: reason.to_string(),
            created_at: Utc::now(),
            related_id,
        };

        // Newest first, matching the original's prepend order.
        self.transactions.insert(0, transaction);
        db.save_as(&self.user_id, KEY_TOKEN_TRANSACTIONS, &self.transactions)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;

    fn setup() -> (Database, User, TokenLedger) {
        let db = Database::open(":memory:").unwrap();
        let store = Store::seed();
        let user = store.user("1").unwrap().clone();
        let ledger = TokenLedger::restore(&db, &user.id).unwrap();
        (db, user, ledger)
    }

    #[test]
    fn earn_adds_to_balance_and_prepends_transaction() {
        let (db, mut user, mut ledger) = setup();
        let start = user.tokens;

        assert!(ledger.earn(&db, &mut user, 5, "Created a post", None).unwrap());
        assert!(ledger.earn(&db, &mut user, 8, "Posted a review", None).unwrap());

        assert_eq!(user.tokens, start + 13);
        assert_eq!(ledger.history().len(), 2);
        // Newest first.
        assert_eq!(ledger.history()[0].reason, "Posted a review");
        assert_eq!(ledger.history()[1].reason, "Created a post");
        assert_eq!(ledger.history()[0].kind, TransactionKind::Earn);
    }

    #[test]
    fn earn_rejects_zero_amount() {
        let (db, mut user, mut ledger) = setup();
        let start = user.tokens;

        assert!(!ledger.earn(&db, &mut user, 0, "nothing", None).unwrap());
        assert_eq!(user.tokens, start);
        assert!(ledger.history().is_empty());
    }

    #[test]
    fn spend_subtracts_within_balance() {
        let (db, mut user, mut ledger) = setup();
        user.tokens = 100;

        assert!(ledger.spend(&db, &mut user, 40, "Bought a sticker", None).unwrap());
        assert_eq!(user.tokens, 60);
        assert_eq!(ledger.history()[0].kind, TransactionKind::Spend);
    }

    #[test]
    fn spend_rejects_overdraft_and_zero() {
        let (db, mut user, mut ledger) = setup();
        user.tokens = 10;

        assert!(!ledger.spend(&db, &mut user, 11, "too much", None).unwrap());
        assert!(!ledger.spend(&db, &mut user, 0, "nothing", None).unwrap());
        assert_eq!(user.tokens, 10);
        assert!(ledger.history().is_empty());
    }

    #[test]
    fn history_survives_a_restore() {
        let db = Database::open(":memory:").unwrap();
        let store = Store::seed();
        let mut user = store.user("1").unwrap().clone();

        let mut ledger = TokenLedger::restore(&db, &user.id).unwrap();
        ledger.earn(&db, &mut user, 15, "Joined an event", Some("1".into())).unwrap();

        let restored = TokenLedger::restore(&db, &user.id).unwrap();
        assert_eq!(restored.history().len(), 1);
        assert_eq!(restored.history()[0].reason, "Joined an event");
        assert_eq!(restored.history()[0].related_id.as_deref(), Some("1"));
    }

    #[test]
    fn unreadable_history_blob_resets_to_empty() {
        let db = Database::open(":memory:").unwrap();
        db.save("1", KEY_TOKEN_TRANSACTIONS, &serde_json::json!({ "not": "a list" }))
            .unwrap();

        let ledger = TokenLedger::restore(&db, "1").unwrap();
        assert!(ledger.history().is_empty());
    }

    #[test]
    fn daily_bonus_granted_once_per_day() {
        let (db, mut user, mut ledger) = setup();
        let start = user.tokens;
        let today = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();

        assert!(ledger.grant_daily_bonus(&db, &mut user, 10, today).unwrap());
        assert!(!ledger.grant_daily_bonus(&db, &mut user, 10, today).unwrap());

        assert_eq!(user.tokens, start + 10);
        assert_eq!(ledger.history().len(), 1);
        assert_eq!(ledger.history()[0].reason, "Daily login bonus");
    }

    #[test]
    fn daily_bonus_granted_again_next_day() {
        let (db, mut user, mut ledger) = setup();
        let day1 = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let day2 = NaiveDate::from_ymd_opt(2025, 6, 11).unwrap();

        assert!(ledger.grant_daily_bonus(&db, &mut user, 10, day1).unwrap());
        assert!(ledger.grant_daily_bonus(&db, &mut user, 10, day2).unwrap());
        assert_eq!(ledger.history().len(), 2);
    }
}
