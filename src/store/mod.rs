//! User profile and watchlist store
//!
//! Read-modify-write over the `rise_user` key of a [`LocalStorage`]. Every
//! mutation runs under one lock, so watchlist changes issued from different
//! callers never interleave.
//!
//! Storage failures never reach callers: the first failed read or write
//! switches the store to an in-memory mirror for the rest of the session. The
//! mirror follows every profile read or written while the primary is healthy,
//! so degrading never replaces a known profile with a guest one.

pub mod models;

use crate::db::{LocalStorage, MemoryStorage};
use chrono::Utc;
use models::*;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

/// Key holding the serialized profile
pub const USER_KEY: &str = "rise_user";

/// Reserved key, cleared on logout
pub const WATCHLIST_KEY: &str = "rise_watchlist";

/// Reserved key, cleared on logout
pub const PREFERENCES_KEY: &str = "rise_preferences";

const EVENT_CAPACITY: usize = 64;

pub struct UserStore {
    primary: Arc<dyn LocalStorage>,
    fallback: MemoryStorage,
    degraded: AtomicBool,
    write_lock: Mutex<()>,
    events: broadcast::Sender<WatchlistEvent>,
}

impl UserStore {
    pub fn new(primary: Arc<dyn LocalStorage>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            primary,
            fallback: MemoryStorage::new(),
            degraded: AtomicBool::new(false),
            write_lock: Mutex::new(()),
            events,
        }
    }

    /// Whether writes are currently going to session memory only
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::SeqCst)
    }

    /// Receive a [`WatchlistEvent`] for every effective watchlist change
    pub fn subscribe(&self) -> broadcast::Receiver<WatchlistEvent> {
        self.events.subscribe()
    }

    /// Stored profile, `None` if none exists or it cannot be read
    pub fn get_current_user(&self) -> Option<UserProfile> {
        self.load_profile()
    }

    /// Merge `update` onto the stored profile and persist the result
    pub fn save_user(&self, update: ProfileUpdate) -> UserProfile {
        let _guard = self.write_lock.lock();
        let existing = self.load_profile();
        self.save_locked(existing, update)
    }

    /// Add a symbol, creating a guest profile if needed
    ///
    /// Returns `false` when the symbol was already watched.
    pub fn add_to_watchlist(&self, symbol: &str) -> bool {
        let added = {
            let _guard = self.write_lock.lock();
            match self.load_profile() {
                None => {
                    let profile = self.save_locked(
                        None,
                        ProfileUpdate {
                            email: Some(GUEST_EMAIL.to_string()),
                            name: Some(GUEST_NAME.to_string()),
                            watchlist: Some(vec![symbol.to_string()]),
                            preferences: Some(Preferences::default()),
                            ..Default::default()
                        },
                    );
                    info!("Created guest profile {}", profile.id);
                    profile.is_watching(symbol)
                }
                Some(profile) if profile.is_watching(symbol) => false,
                Some(profile) => {
                    let mut watchlist = profile.watchlist.clone();
                    watchlist.push(symbol.to_string());
                    self.save_locked(
                        Some(profile),
                        ProfileUpdate {
                            watchlist: Some(watchlist),
                            ..Default::default()
                        },
                    )
                    .is_watching(symbol)
                }
            }
        };

        if added {
            self.publish(symbol, true);
        }
        added
    }

    /// Remove a symbol; `false` when there was nothing to remove
    pub fn remove_from_watchlist(&self, symbol: &str) -> bool {
        let removed = {
            let _guard = self.write_lock.lock();
            match self.load_profile() {
                Some(profile) if profile.is_watching(symbol) => {
                    let watchlist = profile
                        .watchlist
                        .iter()
                        .filter(|s| s.as_str() != symbol)
                        .cloned()
                        .collect();
                    !self
                        .save_locked(
                            Some(profile),
                            ProfileUpdate {
                                watchlist: Some(watchlist),
                                ..Default::default()
                            },
                        )
                        .is_watching(symbol)
                }
                _ => false,
            }
        };

        if removed {
            self.publish(symbol, false);
        }
        removed
    }

    pub fn is_in_watchlist(&self, symbol: &str) -> bool {
        self.load_profile()
            .map(|p| p.is_watching(symbol))
            .unwrap_or(false)
    }

    /// Watched symbols in insertion order
    pub fn get_watchlist(&self) -> Vec<String> {
        self.load_profile().map(|p| p.watchlist).unwrap_or_default()
    }

    /// Merge into the preferences sub-object only
    pub fn update_preferences(&self, update: PreferencesUpdate) -> UserProfile {
        let _guard = self.write_lock.lock();
        let existing = self.load_profile();
        let current = existing
            .as_ref()
            .map(|p| p.preferences.clone())
            .unwrap_or_default();

        self.save_locked(
            existing,
            ProfileUpdate {
                preferences: Some(update.apply_to(&current)),
                ..Default::default()
            },
        )
    }

    /// Delete the profile and every related key
    ///
    /// The durable backend is always attempted, even after the store has
    /// degraded, so a profile written before the failure does not survive.
    pub fn clear_user_data(&self) {
        let _guard = self.write_lock.lock();
        let keys = [USER_KEY, WATCHLIST_KEY, PREFERENCES_KEY];

        if let Err(e) = self.primary.remove_items(&keys) {
            warn!("Failed to clear {} storage: {}", self.primary.backend(), e);
            self.degrade(&e);
        }

        if let Err(e) = self.fallback.remove_items(&keys) {
            error!("Failed to clear session storage: {}", e);
        }

        info!("User data cleared");
    }

    fn save_locked(&self, existing: Option<UserProfile>, update: ProfileUpdate) -> UserProfile {
        let profile = UserProfile::merge(existing, update, Utc::now());
        self.persist(&profile);
        profile
    }

    /// Current profile, read from the primary while it is healthy
    ///
    /// A failed primary read degrades the store and answers from the session
    /// mirror, which holds the last profile seen this session.
    fn load_profile(&self) -> Option<UserProfile> {
        if !self.is_degraded() {
            match self.primary.get_item(USER_KEY) {
                Ok(value) => {
                    self.mirror(value.as_deref());
                    return Self::parse_profile(value);
                }
                Err(e) => {
                    warn!("Failed to read profile from {}: {}", self.primary.backend(), e);
                    self.degrade(&e);
                }
            }
        }

        match self.fallback.get_item(USER_KEY) {
            Ok(value) => Self::parse_profile(value),
            Err(e) => {
                error!("Failed to read profile from session storage: {}", e);
                None
            }
        }
    }

    fn parse_profile(value: Option<String>) -> Option<UserProfile> {
        let json = value?;
        match serde_json::from_str::<UserProfile>(&json) {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!("Ignoring malformed stored profile: {}", e);
                None
            }
        }
    }

    /// Keep the session copy in step with the primary
    fn mirror(&self, value: Option<&str>) {
        let result = match value {
            Some(json) => self.fallback.set_item(USER_KEY, json),
            None => self.fallback.remove_items(&[USER_KEY]),
        };
        if let Err(e) = result {
            error!("Failed to update session storage: {}", e);
        }
    }

    fn persist(&self, profile: &UserProfile) {
        let json = match serde_json::to_string(profile) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize profile {}: {}", profile.id, e);
                return;
            }
        };

        if !self.is_degraded() {
            match self.primary.set_item(USER_KEY, &json) {
                Ok(()) => debug!("Saved profile {}", profile.id),
                Err(e) => self.degrade(&e),
            }
        }

        self.mirror(Some(&json));
    }

    fn degrade(&self, cause: &crate::error::AppError) {
        if !self.degraded.swap(true, Ordering::SeqCst) {
            warn!(
                "{} storage unavailable ({}); keeping user data in memory for this session",
                self.primary.backend(),
                cause
            );
        }
    }

    fn publish(&self, symbol: &str, added: bool) {
        let event = WatchlistEvent {
            symbol: symbol.to_string(),
            added,
        };
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SqliteDb;
    use crate::error::{AppError, Result};
    use std::sync::atomic::AtomicUsize;

    /// Storage whose writes always fail, as with a full or locked disk
    struct FailingStorage;

    impl LocalStorage for FailingStorage {
        fn backend(&self) -> &'static str {
            "failing"
        }

        fn get_item(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<()> {
            Err(AppError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "quota exceeded",
            )))
        }

        fn remove_items(&self, _keys: &[&str]) -> Result<()> {
            Err(AppError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "quota exceeded",
            )))
        }
    }

    /// SQLite storage with switchable read and write failures
    struct FlakyStorage {
        inner: SqliteDb,
        failing_reads: AtomicUsize,
        failing_writes: AtomicBool,
    }

    impl FlakyStorage {
        fn new() -> Self {
            Self {
                inner: SqliteDb::open_in_memory().unwrap(),
                failing_reads: AtomicUsize::new(0),
                failing_writes: AtomicBool::new(false),
            }
        }

        fn stored_profile(&self) -> Option<UserProfile> {
            self.inner
                .get_item(USER_KEY)
                .unwrap()
                .map(|json| serde_json::from_str(&json).unwrap())
        }
    }

    fn io_error(message: &str) -> AppError {
        AppError::Io(std::io::Error::new(std::io::ErrorKind::Other, message.to_string()))
    }

    impl LocalStorage for FlakyStorage {
        fn backend(&self) -> &'static str {
            "flaky"
        }

        fn get_item(&self, key: &str) -> Result<Option<String>> {
            let pending = self.failing_reads.load(Ordering::SeqCst);
            if pending > 0 {
                self.failing_reads.store(pending - 1, Ordering::SeqCst);
                return Err(io_error("disk I/O error"));
            }
            self.inner.get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> Result<()> {
            if self.failing_writes.load(Ordering::SeqCst) {
                return Err(io_error("database is locked"));
            }
            self.inner.set_item(key, value)
        }

        fn remove_items(&self, keys: &[&str]) -> Result<()> {
            self.inner.remove_items(keys)
        }
    }

    fn create_test_store() -> (UserStore, Arc<SqliteDb>) {
        let db = Arc::new(SqliteDb::open_in_memory().unwrap());
        (UserStore::new(db.clone()), db)
    }

    #[test]
    fn test_no_profile_initially() {
        let (store, _) = create_test_store();
        assert!(store.get_current_user().is_none());
        assert!(!store.is_in_watchlist("QQQ"));
        assert!(store.get_watchlist().is_empty());
    }

    #[test]
    fn test_first_add_creates_guest_profile() {
        let (store, _) = create_test_store();

        assert!(store.add_to_watchlist("QQQ"));
        assert!(store.is_in_watchlist("QQQ"));

        let profile = store.get_current_user().unwrap();
        assert_eq!(profile.watchlist, vec!["QQQ".to_string()]);
        assert_eq!(profile.email, GUEST_EMAIL);
        assert_eq!(profile.name.as_deref(), Some(GUEST_NAME));
    }

    #[test]
    fn test_duplicate_add_reports_no_change() {
        let (store, _) = create_test_store();

        assert!(store.add_to_watchlist("QQQ"));
        assert!(!store.add_to_watchlist("QQQ"));
        assert_eq!(store.get_watchlist(), vec!["QQQ".to_string()]);
    }

    #[test]
    fn test_remove_absent_symbol() {
        let (store, _) = create_test_store();

        assert!(!store.remove_from_watchlist("ZZZ"));
        store.add_to_watchlist("QQQ");
        assert!(!store.remove_from_watchlist("ZZZ"));
        assert_eq!(store.get_watchlist(), vec!["QQQ".to_string()]);
    }

    #[test]
    fn test_watchlist_round_trip_keeps_order() {
        let (store, _) = create_test_store();

        for symbol in ["VOO", "QQQ", "SPY"] {
            assert!(store.add_to_watchlist(symbol));
        }
        assert!(store.remove_from_watchlist("QQQ"));
        assert!(!store.is_in_watchlist("QQQ"));
        assert_eq!(store.get_watchlist(), vec!["VOO".to_string(), "SPY".to_string()]);
    }

    #[test]
    fn test_save_user_preserves_other_fields() {
        let (store, _) = create_test_store();
        store.add_to_watchlist("QQQ");
        store.update_preferences(PreferencesUpdate {
            theme: Some(Theme::Light),
            ..Default::default()
        });
        let before = store.get_current_user().unwrap();

        let after = store.save_user(ProfileUpdate {
            name: Some("X".to_string()),
            ..Default::default()
        });

        assert_eq!(after.name.as_deref(), Some("X"));
        assert_eq!(after.watchlist, before.watchlist);
        assert_eq!(after.preferences, before.preferences);
        assert_eq!(after.id, before.id);
        assert_eq!(after.created_at, before.created_at);
        assert!(after.last_login >= before.last_login);
        assert_eq!(store.get_current_user().unwrap(), after);
    }

    #[test]
    fn test_update_preferences_without_profile() {
        let (store, _) = create_test_store();

        let profile = store.update_preferences(PreferencesUpdate {
            default_view: Some(DefaultView::List),
            ..Default::default()
        });

        assert_eq!(profile.preferences.default_view, DefaultView::List);
        assert_eq!(profile.preferences.theme, Theme::Dark);
        assert!(profile.watchlist.is_empty());
    }

    #[test]
    fn test_clear_removes_all_keys() {
        let (store, db) = create_test_store();
        store.add_to_watchlist("QQQ");
        db.set_item(WATCHLIST_KEY, "[]").unwrap();
        db.set_item(PREFERENCES_KEY, "{}").unwrap();

        store.clear_user_data();

        assert!(store.get_current_user().is_none());
        assert!(db.keys().unwrap().is_empty());

        // A later add starts over with a new guest
        assert!(store.add_to_watchlist("SPY"));
        assert_eq!(store.get_watchlist(), vec!["SPY".to_string()]);
    }

    #[test]
    fn test_malformed_profile_reads_as_absent() {
        let (store, db) = create_test_store();
        db.set_item(USER_KEY, "{not json").unwrap();

        assert!(store.get_current_user().is_none());
        assert!(!store.is_in_watchlist("QQQ"));

        assert!(store.add_to_watchlist("QQQ"));
        assert_eq!(store.get_current_user().unwrap().watchlist, vec!["QQQ".to_string()]);
    }

    #[test]
    fn test_failing_storage_degrades_to_memory() {
        let store = UserStore::new(Arc::new(FailingStorage));

        assert!(store.add_to_watchlist("QQQ"));
        assert!(store.is_degraded());
        assert!(store.is_in_watchlist("QQQ"));

        assert!(store.add_to_watchlist("VOO"));
        assert_eq!(store.get_watchlist().len(), 2);

        store.clear_user_data();
        assert!(store.get_current_user().is_none());
    }

    #[tokio::test]
    async fn test_watchlist_events() {
        let (store, _) = create_test_store();
        let mut events = store.subscribe();

        store.add_to_watchlist("QQQ");
        store.add_to_watchlist("QQQ");
        store.remove_from_watchlist("QQQ");

        assert_eq!(
            events.recv().await.unwrap(),
            WatchlistEvent { symbol: "QQQ".to_string(), added: true }
        );
        assert_eq!(
            events.recv().await.unwrap(),
            WatchlistEvent { symbol: "QQQ".to_string(), added: false }
        );
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_failed_read_keeps_known_profile() {
        let storage = Arc::new(FlakyStorage::new());
        let store = UserStore::new(storage.clone());
        store.save_user(ProfileUpdate {
            email: Some("ada@example.com".to_string()),
            ..Default::default()
        });
        store.add_to_watchlist("QQQ");
        store.add_to_watchlist("VOO");
        let before = store.get_current_user().unwrap();

        storage.failing_reads.store(1, Ordering::SeqCst);
        assert!(store.add_to_watchlist("SPY"));
        assert!(store.is_degraded());

        let after = store.get_current_user().unwrap();
        assert_eq!(after.id, before.id);
        assert_eq!(after.email, "ada@example.com");
        assert_eq!(
            after.watchlist,
            vec!["QQQ".to_string(), "VOO".to_string(), "SPY".to_string()]
        );

        // The durable copy is left as it was
        let durable = storage.stored_profile().unwrap();
        assert_eq!(durable.email, "ada@example.com");
        assert_eq!(durable.watchlist, vec!["QQQ".to_string(), "VOO".to_string()]);
    }

    #[test]
    fn test_failed_first_read_never_overwrites_durable_profile() {
        let storage = Arc::new(FlakyStorage::new());
        UserStore::new(storage.clone()).save_user(ProfileUpdate {
            email: Some("ada@example.com".to_string()),
            watchlist: Some(vec!["QQQ".to_string()]),
            ..Default::default()
        });

        let store = UserStore::new(storage.clone());
        storage.failing_reads.store(1, Ordering::SeqCst);
        assert!(store.add_to_watchlist("SPY"));

        let durable = storage.stored_profile().unwrap();
        assert_eq!(durable.email, "ada@example.com");
        assert_eq!(durable.watchlist, vec!["QQQ".to_string()]);
    }

    #[test]
    fn test_clear_after_degrading_removes_durable_profile() {
        let storage = Arc::new(FlakyStorage::new());
        let store = UserStore::new(storage.clone());
        store.add_to_watchlist("QQQ");
        assert!(storage.stored_profile().is_some());

        storage.failing_writes.store(true, Ordering::SeqCst);
        store.add_to_watchlist("VOO");
        assert!(store.is_degraded());

        store.clear_user_data();

        assert!(store.get_current_user().is_none());
        assert!(storage.stored_profile().is_none());
        assert!(storage.inner.keys().unwrap().is_empty());
    }
}
