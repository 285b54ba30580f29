use std::fmt;

use chrono::NaiveDateTime;

/// Platform user address (stable identity across sessions).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Address(pub String);

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identity attached to every inbound session event.
#[derive(Clone, Debug)]
pub struct UserProfile {
    pub address: Address,
    pub username: Option<String>,
    pub name: Option<String>,
    /// Other bots; their events are dropped before dispatch.
    pub is_app: bool,
}

impl UserProfile {
    /// Label prepended to relayed messages: `Name (@username)` or `@username`.
    pub fn display_label(&self) -> String {
        let username = self.username.as_deref().unwrap_or("unknown");
        match &self.name {
            Some(name) => format!("{name} (@{username})"),
            None => format!("@{username}"),
        }
    }
}

/// A row of `registered_users`.
///
/// Timestamps are stored without time zone and interpreted as UTC.
#[derive(Clone, Debug)]
pub struct RegisteredUser {
    pub address: Address,
    pub messages_sent: i64,
    pub first_joined: NaiveDateTime,
    pub last_seen: NaiveDateTime,
    pub registered: bool,
    pub ban_release_date: Option<NaiveDateTime>,
}

impl RegisteredUser {
    pub fn banned_at(&self, now: NaiveDateTime) -> bool {
        self.ban_release_date.map(|until| until > now).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: Option<&str>, username: Option<&str>) -> UserProfile {
        UserProfile {
            address: Address("0xabc".to_string()),
            username: username.map(|s| s.to_string()),
            name: name.map(|s| s.to_string()),
            is_app: false,
        }
    }

    #[test]
    fn display_label_prefers_name_with_handle() {
        assert_eq!(profile(Some("Ada"), Some("ada")).display_label(), "Ada (@ada)");
        assert_eq!(profile(None, Some("ada")).display_label(), "@ada");
        assert_eq!(profile(None, None).display_label(), "@unknown");
    }

    #[test]
    fn ban_expiry_is_exclusive() {
        let now = chrono::Utc::now().naive_utc();
        let mut user = RegisteredUser {
            address: Address("0xabc".to_string()),
            messages_sent: 0,
            first_joined: now,
            last_seen: now,
            registered: true,
            ban_release_date: None,
        };
        assert!(!user.banned_at(now));

        user.ban_release_date = Some(now + chrono::Duration::hours(1));
        assert!(user.banned_at(now));

        user.ban_release_date = Some(now - chrono::Duration::hours(1));
        assert!(!user.banned_at(now));
    }
}
