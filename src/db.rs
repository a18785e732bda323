// SQLite persistence for per-user state blobs.
//
// The browser original mirrored notifications and token transactions into
// local storage as JSON blobs keyed by user id. This layer is the same
// contract over SQLite: a single key-value table of JSON strings scoped by
// user id. Blobs are not versioned and not validated beyond JSON parsing;
// callers fall back to seeded defaults when a blob is missing or unreadable.

use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Blob key for the session user record.
pub const KEY_AUTH_USER: &str = "auth_user";
/// Blob key for the token transaction history.
pub const KEY_TOKEN_TRANSACTIONS: &str = "token_transactions";
/// Blob key for the notification list.
pub const KEY_NOTIFICATIONS: &str = "notifications";
/// Blob key for the date of the last daily login reward.
pub const KEY_LAST_DAILY_REWARD: &str = "last_daily_reward";

/// SQLite-backed key-value store of per-user JSON blobs.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a SQLite database at `path` and ensure the schema
    /// exists. Pass `":memory:"` for an ephemeral in-memory database (useful
    /// for tests).
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS user_state (
                user_id TEXT NOT NULL,
                key     TEXT NOT NULL,
                value   TEXT NOT NULL,
                PRIMARY KEY (user_id, key)
            );
            ",
        )
        .context("failed to create database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the database connection.
    ///
    /// Panics if the mutex is poisoned (another thread panicked while
    /// holding the lock). This should never happen in normal operation.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }

    /// Persist a JSON value under `(user_id, key)`. Uses INSERT OR REPLACE
    /// so repeated saves overwrite the previous blob.
    pub fn save(&self, user_id: &str, key: &str, value: &serde_json::Value) -> Result<()> {
        let conn = self.conn();
        let json_str = serde_json::to_string(value).context("failed to serialize state value")?;
        conn.execute(
            "INSERT OR REPLACE INTO user_state (user_id, key, value) VALUES (?1, ?2, ?3)",
            params![user_id, key, json_str],
        )
        .context("failed to save user state")?;
        Ok(())
    }

    /// Load a previously saved JSON value. Returns `None` when the key does
    /// not exist for this user, or when the stored blob is not valid JSON
    /// (unreadable blobs are treated as absent, matching the original's
    /// catch-and-fall-back behavior on parse errors).
    pub fn load(&self, user_id: &str, key: &str) -> Result<Option<serde_json::Value>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT value FROM user_state WHERE user_id = ?1 AND key = ?2")
            .context("failed to prepare load query")?;

        let mut rows = stmt
            .query_map(params![user_id, key], |row| {
                let json_str: String = row.get(0)?;
                Ok(json_str)
            })
            .context("failed to query user state")?;

        match rows.next() {
            Some(row_result) => {
                let json_str = row_result.context("failed to read state row")?;
                Ok(serde_json::from_str(&json_str).ok())
            }
            None => Ok(None),
        }
    }

    /// Serialize `value` and persist it under `(user_id, key)`.
    pub fn save_as<T: Serialize>(&self, user_id: &str, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_value(value).context("failed to serialize typed value")?;
        self.save(user_id, key, &json)
    }

    /// Load and deserialize a blob into `T`. A missing blob or one that does
    /// not match the expected shape yields `None`.
    pub fn load_as<T: DeserializeOwned>(&self, user_id: &str, key: &str) -> Result<Option<T>> {
        Ok(self
            .load(user_id, key)?
            .and_then(|v| serde_json::from_value(v).ok()))
    }

    /// Remove one blob for a user. Removing an absent key is a no-op.
    pub fn delete(&self, user_id: &str, key: &str) -> Result<()> {
        let conn = self.conn();
        conn.execute(
            "DELETE FROM user_state WHERE user_id = ?1 AND key = ?2",
            params![user_id, key],
        )
        .context("failed to delete user state")?;
        Ok(())
    }

    /// Remove every blob stored for a user.
    pub fn clear_user(&self, user_id: &str) -> Result<()> {
        let conn = self.conn();
        conn.execute(
            "DELETE FROM user_state WHERE user_id = ?1",
            params![user_id],
        )
        .context("failed to clear user state")?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
