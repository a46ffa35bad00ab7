//! Profile and preference commands

use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::store::models::{PreferencesUpdate, ProfileUpdate, UserProfile};

pub fn get_profile(state: &AppState) -> Result<Option<UserProfile>> {
    Ok(state.user_store.get_current_user())
}

/// Merge a partial profile onto the stored one
pub fn save_profile(state: &AppState, update: ProfileUpdate) -> Result<UserProfile> {
    if let Some(email) = &update.email {
        if !email.contains('@') {
            return Err(AppError::Validation(format!("Invalid email: {}", email)));
        }
    }
    tracing::info!("Saving profile");
    Ok(state.user_store.save_user(update))
}

pub fn update_preferences(state: &AppState, update: PreferencesUpdate) -> Result<UserProfile> {
    Ok(state.user_store.update_preferences(update))
}

/// Forget the local user
pub fn logout(state: &AppState) -> Result<()> {
    tracing::info!("Logging out, clearing local user data");
    state.user_store.clear_user_data();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::Theme;
    use crate::store::{PREFERENCES_KEY, USER_KEY, WATCHLIST_KEY};

    #[test]
    fn test_save_then_update_preferences() {
        let state = AppState::in_memory().unwrap();
        let saved = save_profile(
            &state,
            ProfileUpdate {
                email: Some("ada@example.com".to_string()),
                name: Some("Ada".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(saved.email, "ada@example.com");

        let updated = update_preferences(
            &state,
            PreferencesUpdate {
                theme: Some(Theme::Light),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(updated.id, saved.id);
        assert_eq!(updated.name.as_deref(), Some("Ada"));
        assert_eq!(updated.preferences.theme, Theme::Light);
        assert!(updated.preferences.notifications);
    }

    #[test]
    fn test_invalid_email_rejected() {
        let state = AppState::in_memory().unwrap();
        let result = save_profile(
            &state,
            ProfileUpdate {
                email: Some("nobody".to_string()),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(get_profile(&state).unwrap().is_none());
    }

    #[test]
    fn test_logout_clears_storage() {
        let state = AppState::in_memory().unwrap();
        state.user_store.add_to_watchlist("QQQ");

        logout(&state).unwrap();

        assert!(get_profile(&state).unwrap().is_none());
        let keys = state.sqlite.keys().unwrap();
        for key in [USER_KEY, WATCHLIST_KEY, PREFERENCES_KEY] {
            assert!(!keys.iter().any(|k| k == key));
        }
    }
}
