//! Persisted user profile models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Email given to profiles created implicitly
pub const GUEST_EMAIL: &str = "guest@example.com";

/// Display name given to profiles created by a first watchlist add
pub const GUEST_NAME: &str = "Guest User";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultView {
    #[default]
    Grid,
    List,
}

/// Display preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub theme: Theme,
    pub notifications: bool,
    pub default_view: DefaultView,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            notifications: true,
            default_view: DefaultView::Grid,
        }
    }
}

/// Partial preferences; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesUpdate {
    pub theme: Option<Theme>,
    pub notifications: Option<bool>,
    pub default_view: Option<DefaultView>,
}

impl PreferencesUpdate {
    pub fn apply_to(&self, current: &Preferences) -> Preferences {
        Preferences {
            theme: self.theme.unwrap_or(current.theme),
            notifications: self.notifications.unwrap_or(current.notifications),
            default_view: self.default_view.unwrap_or(current.default_view),
        }
    }
}

/// The single local user, stored as JSON under `rise_user`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Data URL or base64 image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default)]
    pub watchlist: Vec<String>,
    #[serde(default)]
    pub preferences: Preferences,
    pub created_at: DateTime<Utc>,
    pub last_login: DateTime<Utc>,
}

impl UserProfile {
    pub fn is_watching(&self, symbol: &str) -> bool {
        self.watchlist.iter().any(|s| s == symbol)
    }

    /// Merge `update` onto `existing` (or onto a fresh guest profile)
    ///
    /// Fields absent from the update keep their stored value. `last_login`
    /// always becomes `now`.
    pub fn merge(existing: Option<UserProfile>, update: ProfileUpdate, now: DateTime<Utc>) -> Self {
        let (id, email, name, photo, watchlist, preferences, created_at) = match existing {
            Some(p) => (
                p.id,
                Some(p.email),
                p.name,
                p.photo,
                p.watchlist,
                p.preferences,
                p.created_at,
            ),
            None => (
                new_user_id(),
                None,
                None,
                None,
                Vec::new(),
                Preferences::default(),
                now,
            ),
        };

        UserProfile {
            id,
            email: update
                .email
                .or(email)
                .unwrap_or_else(|| GUEST_EMAIL.to_string()),
            name: update.name.or(name),
            photo: update.photo.or(photo),
            watchlist: dedup_symbols(update.watchlist.unwrap_or(watchlist)),
            preferences: update.preferences.unwrap_or(preferences),
            created_at,
            last_login: now,
        }
    }
}

/// Partial profile accepted by `save_user`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub name: Option<String>,
    pub photo: Option<String>,
    pub watchlist: Option<Vec<String>>,
    pub preferences: Option<Preferences>,
}

/// Published whenever a watchlist change takes effect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchlistEvent {
    pub symbol: String,
    pub added: bool,
}

fn new_user_id() -> String {
    format!("user_{}", uuid::Uuid::new_v4().simple())
}

/// Drop repeated symbols, keeping first occurrences in order
fn dedup_symbols(symbols: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        if !out.contains(&symbol) {
            out.push(symbol);
        }
    }
    out
}
