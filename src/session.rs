// Demo session layer.
//
// There is no real authentication. The session restores the stored user
// blob when present and otherwise signs in the seeded default user; login
// succeeds for any email and merely stamps it onto the default profile.

use anyhow::{anyhow, Context, Result};

use crate::db::{Database, KEY_AUTH_USER};
use crate::model::User;
use crate::store::Store;

/// Partial profile update; unset fields keep their current values.
#[derive(Debug, Default, Clone)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub major: Option<String>,
    pub year: Option<u8>,
    pub avatar: Option<String>,
    pub tokens: Option<i64>,
}

/// The current session user, if any. `None` only after an explicit logout.
pub struct Session {
    user: Option<User>,
}

impl Session {
    /// Restore the session from the stored blob, falling back to the seeded
    /// default user (and persisting it) when the blob is missing or
    /// unreadable.
    pub fn restore(db: &Database, store: &Store) -> Result<Self> {
        let default = || -> Result<User> {
            store
                .default_user()
                .cloned()
                .ok_or_else(|| anyhow!("no seeded users to sign in"))
        };

        let user = match db.load_as::<User>("session", KEY_AUTH_USER)? {
            Some(user) => user,
            None => {
                let user = default()?;
                db.save_as("session", KEY_AUTH_USER, &user)
                    .context("failed to persist default session user")?;
                user
            }
        };

        Ok(Self { user: Some(user) })
    }

    pub fn current(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut User> {
        self.user.as_mut()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Sign in. Any email succeeds: the seeded default user is signed in
    /// with the provided email stamped on. The password is ignored.
    pub fn login(&mut self, db: &Database, store: &Store, email: &str, _password: &str) -> Result<bool> {
        let Some(mut user) = store.default_user().cloned() else {
            return Ok(false);
        };
        user.email = email.to_string();

        db.save_as("session", KEY_AUTH_USER, &user)
            .context("failed to persist session user")?;
        self.user = Some(user);
        Ok(true)
    }

    /// Sign out and drop the stored session blob.
    pub fn logout(&mut self, db: &Database) -> Result<()> {
        self.user = None;
        db.delete("session", KEY_AUTH_USER)
    }

    /// Merge a partial profile update into the session user and re-persist.
    /// A logged-out session ignores the update.
    pub fn update_profile(&mut self, db: &Database, update: ProfileUpdate) -> Result<()> {
        let Some(user) = self.user.as_mut() else {
            return Ok(());
        };

        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(major) = update.major {
            user.major = major;
        }
        if let Some(year) = update.year {
            user.year = year;
        }
        if let Some(avatar) = update.avatar {
            user.avatar = avatar;
        }
        if let Some(tokens) = update.tokens {
            user.tokens = tokens;
        }

        db.save_as("session", KEY_AUTH_USER, user)
            .context("failed to persist updated session user")
    }

    /// Re-persist the current user as-is (used after balance changes made
    /// through the token ledger).
    pub fn persist(&self, db: &Database) -> Result<()> {
        match &self.user {
            Some(user) => db.save_as("session", KEY_AUTH_USER, user),
            None => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
