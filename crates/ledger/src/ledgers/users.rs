//! User directory ledger.

use std::sync::Arc;

use breadbox_core::UserId;
use chrono::Utc;
use tracing::{info, instrument};

use crate::error::{LedgerError, Result};
use crate::events::ChangeEvent;
use crate::models::{LoginEvent, UserProfile};
use crate::store::{StoreContext, keys};

/// Owns the user directory.
///
/// Profiles are created and refreshed by the external identity provider
/// reporting successful logins; the directory itself never authenticates.
#[derive(Clone)]
pub struct UserDirectory {
    ctx: Arc<StoreContext>,
}

impl UserDirectory {
    pub(crate) fn new(ctx: Arc<StoreContext>) -> Self {
        Self { ctx }
    }

    /// Record a successful login reported by the identity provider.
    ///
    /// First login creates the profile (`login_count` 1, active); later
    /// logins refresh `last_login` and bump `login_count`. Returns the
    /// profile as stored.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if persisting fails.
    #[instrument(skip(self, login), fields(user_id = %login.user_id))]
    pub fn record_login(&self, login: LoginEvent) -> Result<UserProfile> {
        let now = Utc::now();

        let _guard = self.ctx.lock(keys::USERS);
        let mut users: Vec<UserProfile> = self.ctx.load(keys::USERS)?;

        let stored = if let Some(profile) = users.iter_mut().find(|u| u.id == login.user_id) {
            profile.last_login = now;
            profile.login_count += 1;
            profile.clone()
        } else {
            let display_name = login
                .display_name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| login.email.local_part().to_owned());
            let profile = UserProfile {
                id: login.user_id,
                email: login.email,
                display_name,
                created_at: now,
                last_login: now,
                login_count: 1,
                is_active: true,
            };
            users.push(profile.clone());
            info!("user profile created");
            profile
        };
        self.ctx.save(keys::USERS, &users)?;
        drop(_guard);

        self.ctx.events().emit(&ChangeEvent::UsersChanged);
        Ok(stored)
    }

    /// Toggle a user's active flag (admin action).
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NotFound` for an unknown user id.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub fn set_active(&self, user_id: &UserId, active: bool) -> Result<UserProfile> {
        let _guard = self.ctx.lock(keys::USERS);
        let mut users: Vec<UserProfile> = self.ctx.load(keys::USERS)?;
        let Some(profile) = users.iter_mut().find(|u| u.id == *user_id) else {
            return Err(LedgerError::NotFound(format!("user {user_id}")));
        };
        profile.is_active = active;
        let updated = profile.clone();
        self.ctx.save(keys::USERS, &users)?;
        drop(_guard);

        self.ctx.events().emit(&ChangeEvent::UsersChanged);
        Ok(updated)
    }

    /// Look up one profile.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if the read fails.
    pub fn get(&self, user_id: &UserId) -> Result<Option<UserProfile>> {
        let users: Vec<UserProfile> = self.ctx.load(keys::USERS)?;
        Ok(users.into_iter().find(|u| u.id == *user_id))
    }

    /// Every profile in the directory.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if the read fails.
    pub fn list(&self) -> Result<Vec<UserProfile>> {
        Ok(self.ctx.load(keys::USERS)?)
    }
}
