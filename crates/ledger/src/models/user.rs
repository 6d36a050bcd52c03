//! User directory records.
//!
//! The ledger never authenticates anyone. The external identity provider
//! reports successful logins (see
//! [`crate::ledgers::UserDirectory::record_login`]) and the directory keeps
//! the resulting profile records.

use breadbox_core::{Email, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A directory entry for one authenticated user.
///
/// The id persists under the provider's legacy field name `uid`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Stable user id issued by the identity provider.
    #[serde(rename = "uid")]
    pub id: UserId,
    /// Account email.
    pub email: Email,
    /// Display name; defaults to the email local part on first login.
    #[serde(default)]
    pub display_name: String,
    /// First login time.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    /// Most recent login time.
    #[serde(default = "Utc::now")]
    pub last_login: DateTime<Utc>,
    /// Number of successful logins.
    #[serde(default = "default_login_count")]
    pub login_count: u32,
    /// Admin-controlled account flag.
    #[serde(default = "default_is_active")]
    pub is_active: bool,
}

const fn default_login_count() -> u32 {
    1
}

const fn default_is_active() -> bool {
    true
}

/// A successful authentication reported by the identity provider.
#[derive(Debug, Clone)]
pub struct LoginEvent {
    /// Stable user id.
    pub user_id: UserId,
    /// Account email.
    pub email: Email,
    /// Provider-supplied display name, if any.
    pub display_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_uid_spelling_and_defaults() {
        let raw = r#"{"uid":"u-1","email":"shopper@example.com"}"#;
        let profile: UserProfile = serde_json::from_str(raw).expect("decode");
        assert_eq!(profile.id, UserId::new("u-1"));
        assert_eq!(profile.login_count, 1);
        assert!(profile.is_active);
    }
}
