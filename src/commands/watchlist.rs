//! Watchlist commands

use crate::error::Result;
use crate::market::types::InvestmentRecord;
use crate::state::AppState;

use super::normalize_symbol;

/// Returns `false` when the symbol was already watched
pub fn add_to_watchlist(state: &AppState, symbol: String) -> Result<bool> {
    let symbol = normalize_symbol(&symbol)?;
    Ok(state.user_store.add_to_watchlist(&symbol))
}

/// Returns `false` when the symbol was not watched
pub fn remove_from_watchlist(state: &AppState, symbol: String) -> Result<bool> {
    let symbol = normalize_symbol(&symbol)?;
    Ok(state.user_store.remove_from_watchlist(&symbol))
}

pub fn is_in_watchlist(state: &AppState, symbol: String) -> Result<bool> {
    let symbol = normalize_symbol(&symbol)?;
    Ok(state.user_store.is_in_watchlist(&symbol))
}

pub fn get_watchlist(state: &AppState) -> Result<Vec<String>> {
    Ok(state.user_store.get_watchlist())
}

/// Watched records from the current snapshot, in watchlist order
pub fn get_watchlist_items(state: &AppState) -> Result<Vec<InvestmentRecord>> {
    Ok(state
        .user_store
        .get_watchlist()
        .iter()
        .filter_map(|symbol| state.get_record(symbol))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::GUEST_EMAIL;

    #[test]
    fn test_first_add_creates_guest_profile() {
        let state = AppState::in_memory().unwrap();
        assert!(state.user_store.get_current_user().is_none());

        assert!(add_to_watchlist(&state, "QQQ".to_string()).unwrap());
        assert!(is_in_watchlist(&state, "QQQ".to_string()).unwrap());

        let profile = state.user_store.get_current_user().unwrap();
        assert_eq!(profile.email, GUEST_EMAIL);
        assert_eq!(profile.watchlist, vec!["QQQ".to_string()]);
    }

    #[test]
    fn test_remove_absent_symbol_is_noop() {
        let state = AppState::in_memory().unwrap();
        add_to_watchlist(&state, "QQQ".to_string()).unwrap();

        assert!(!remove_from_watchlist(&state, "ZZZ".to_string()).unwrap());
        assert_eq!(get_watchlist(&state).unwrap(), vec!["QQQ".to_string()]);
    }

    #[test]
    fn test_items_resolve_against_snapshot() {
        let state = AppState::in_memory().unwrap();
        state.load_records().unwrap();
        add_to_watchlist(&state, "voo".to_string()).unwrap();
        add_to_watchlist(&state, "NOPE".to_string()).unwrap();
        add_to_watchlist(&state, "QQQ".to_string()).unwrap();

        let items = get_watchlist_items(&state).unwrap();
        let symbols: Vec<&str> = items.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["VOO", "QQQ"]);
    }

    #[test]
    fn test_blank_symbol_rejected() {
        let state = AppState::in_memory().unwrap();
        assert!(add_to_watchlist(&state, " ".to_string()).is_err());
        assert!(get_watchlist(&state).unwrap().is_empty());
    }
}
