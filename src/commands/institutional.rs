//! Institutional ownership commands

use crate::error::{AppError, Result};
use crate::market::institutional::{InstitutionalData, InstitutionalHolder};
use crate::services::{InstitutionalService, DEFAULT_TOP_HOLDERS};
use crate::state::AppState;
use serde::Deserialize;

use super::normalize_symbol;

pub fn get_institutional_data(state: &AppState, symbol: String) -> Result<InstitutionalData> {
    let symbol = normalize_symbol(&symbol)?;
    state.holdings.fetch(&symbol)?.ok_or_else(|| {
        AppError::NotFound(format!("No institutional data for {}", symbol))
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopHoldersRequest {
    /// Defaults to every symbol in the current snapshot
    pub symbols: Option<Vec<String>>,
    pub limit: Option<usize>,
}

/// Largest institutional holders across a set of symbols
pub async fn get_top_institutional_holders(
    state: &AppState,
    request: TopHoldersRequest,
) -> Result<Vec<InstitutionalHolder>> {
    let limit = request.limit.unwrap_or(DEFAULT_TOP_HOLDERS);
    if limit == 0 {
        return Err(AppError::Validation("Limit must be positive".to_string()));
    }

    let symbols = match request.symbols {
        Some(symbols) => symbols
            .iter()
            .map(|s| normalize_symbol(s))
            .collect::<Result<Vec<_>>>()?,
        None => {
            if !state.has_records() {
                state.load_records()?;
            }
            state.records.read().iter().map(|r| r.symbol.clone()).collect()
        }
    };

    Ok(InstitutionalService::top_holders(
        state.holdings.as_ref(),
        &symbols,
        limit,
        state.holdings_delay,
    )
    .await)
}
