use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Persisted account record. Holds the credential hash, so it is never
/// serialized directly; callers outside the store convert it with
/// [`Account::into_view`].
#[derive(Clone)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub credential_hash: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn into_view(self) -> AccountView {
        AccountView {
            id: self.id,
            email: self.email,
            display_name: self.display_name,
            created_at: self.created_at,
        }
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("credential_hash", &"<redacted>")
            .field("display_name", &self.display_name)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Fields the store needs to create an account; `id` and `created_at` are
/// assigned on insert.
#[derive(Clone)]
pub struct NewAccount {
    pub email: String,
    pub credential_hash: String,
    pub display_name: String,
}

impl fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAccount")
            .field("email", &self.email)
            .field("credential_hash", &"<redacted>")
            .field("display_name", &self.display_name)
            .finish()
    }
}

/// Outward representation of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

/// Lower-cases and trims an email address.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Local part of an address (everything before the first `@`).
pub fn default_display_name(email: &str) -> String {
    email.split('@').next().unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Account {
        Account {
            id: Uuid::new_v4(),
            email: "a@test.com".into(),
            credential_hash: "$argon2id$v=19$m=1024,t=1,p=1$c2FsdA$aGFzaA".into(),
            display_name: "a".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(normalize_email("  A@Test.COM "), "a@test.com");
    }

    #[test]
    fn display_name_defaults_to_local_part() {
        assert_eq!(default_display_name("jane.doe@example.com"), "jane.doe");
        assert_eq!(default_display_name("no-at-sign"), "no-at-sign");
    }

    #[test]
    fn view_serialization_has_no_hash() {
        let account = sample();
        let json = serde_json::to_value(account.into_view()).unwrap();
        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("displayName"));
        assert!(obj.contains_key("createdAt"));
        assert!(!obj.keys().any(|k| k.to_lowercase().contains("hash")));
        assert!(!json.to_string().contains("argon2"));
    }

    #[test]
    fn debug_output_redacts_hash() {
        let account = sample();
        let dbg = format!("{:?}", account);
        assert!(dbg.contains("<redacted>"));
        assert!(!dbg.contains("argon2"));
    }
}
