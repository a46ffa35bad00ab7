//! Comparison set commands

use crate::error::{AppError, Result};
use crate::market::types::InvestmentRecord;
use crate::services::{AddOutcome, ComparisonSet, ComparisonTable, MAX_COMPARISON};
use crate::state::AppState;
use serde::Serialize;

use super::normalize_symbol;

/// Comparison panel state as seen by the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonView {
    pub symbols: Vec<String>,
    pub items: Vec<InvestmentRecord>,
    pub visible: bool,
    pub capacity: usize,
}

impl ComparisonView {
    fn build(state: &AppState, set: &ComparisonSet) -> Self {
        let records = state.records.read();
        Self {
            symbols: set.symbols().to_vec(),
            items: set.resolve(&records).into_iter().cloned().collect(),
            visible: set.is_visible(),
            capacity: MAX_COMPARISON,
        }
    }
}

/// Add a record to the comparison set
///
/// Re-adding a selected symbol is a no-op. A full set is reported as a
/// capacity error and left unchanged.
pub fn add_to_comparison(state: &AppState, symbol: String) -> Result<ComparisonView> {
    let symbol = normalize_symbol(&symbol)?;
    let record = state
        .get_record(&symbol)
        .ok_or_else(|| AppError::NotFound(format!("Investment not found: {}", symbol)))?;

    let mut set = state.comparison.write();
    if set.add(&record) == AddOutcome::Full {
        return Err(AppError::Capacity(format!(
            "You can compare up to {} investments at once",
            MAX_COMPARISON
        )));
    }
    Ok(ComparisonView::build(state, &set))
}

pub fn remove_from_comparison(state: &AppState, symbol: String) -> Result<ComparisonView> {
    let symbol = normalize_symbol(&symbol)?;
    let mut set = state.comparison.write();
    set.remove(&symbol);
    Ok(ComparisonView::build(state, &set))
}

pub fn clear_comparison(state: &AppState) -> Result<ComparisonView> {
    let mut set = state.comparison.write();
    set.clear();
    Ok(ComparisonView::build(state, &set))
}

/// Show or hide the comparison panel
pub fn toggle_comparison_panel(state: &AppState) -> Result<ComparisonView> {
    let mut set = state.comparison.write();
    set.toggle_visibility();
    Ok(ComparisonView::build(state, &set))
}

pub fn get_comparison(state: &AppState) -> Result<ComparisonView> {
    let set = state.comparison.read();
    Ok(ComparisonView::build(state, &set))
}

pub fn get_comparison_table(state: &AppState) -> Result<ComparisonTable> {
    let set = state.comparison.read();
    let records = state.records.read();
    Ok(set.table(&records))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded_state() -> AppState {
        let state = AppState::in_memory().unwrap();
        state.load_records().unwrap();
        state
    }

    #[test]
    fn test_duplicate_add_keeps_order() {
        let state = loaded_state();
        add_to_comparison(&state, "QQQ".to_string()).unwrap();
        add_to_comparison(&state, "SPY".to_string()).unwrap();
        let view = add_to_comparison(&state, "QQQ".to_string()).unwrap();

        assert_eq!(view.symbols, vec!["QQQ".to_string(), "SPY".to_string()]);
        assert_eq!(view.items.len(), 2);
        assert!(view.visible);
    }

    #[test]
    fn test_fifth_add_is_capacity_error() {
        let state = loaded_state();
        for symbol in ["QQQ", "TECL", "FTEC", "XLK"] {
            add_to_comparison(&state, symbol.to_string()).unwrap();
        }

        let err = add_to_comparison(&state, "VOO".to_string()).unwrap_err();
        assert_eq!(err.code(), "CAPACITY_EXCEEDED");

        let view = get_comparison(&state).unwrap();
        assert_eq!(view.symbols.len(), MAX_COMPARISON);
        assert!(!view.symbols.contains(&"VOO".to_string()));
    }

    #[test]
    fn test_unknown_symbol_not_found() {
        let state = loaded_state();
        let err = add_to_comparison(&state, "ZZZ".to_string()).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(get_comparison(&state).unwrap().symbols.is_empty());
    }

    #[test]
    fn test_remove_clear_and_toggle() {
        let state = loaded_state();
        add_to_comparison(&state, "VOO".to_string()).unwrap();

        let hidden = toggle_comparison_panel(&state).unwrap();
        assert!(!hidden.visible);
        let shown = toggle_comparison_panel(&state).unwrap();
        assert!(shown.visible);

        let view = remove_from_comparison(&state, "voo".to_string()).unwrap();
        assert!(view.symbols.is_empty());
        assert!(!view.visible);

        add_to_comparison(&state, "DIA".to_string()).unwrap();
        let cleared = clear_comparison(&state).unwrap();
        assert!(cleared.symbols.is_empty());
        assert!(!cleared.visible);
    }

    #[test]
    fn test_table_follows_selection() {
        let state = loaded_state();
        add_to_comparison(&state, "SPY".to_string()).unwrap();
        add_to_comparison(&state, "QQQ".to_string()).unwrap();

        let table = get_comparison_table(&state).unwrap();
        assert_eq!(table.symbols, vec!["SPY".to_string(), "QQQ".to_string()]);
        assert_eq!(table.rows[0].metric, "Name");
    }
}
