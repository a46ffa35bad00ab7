//! Command surface
//!
//! Every operation the presentation layer can invoke. Commands take the
//! shared [`AppState`](crate::state::AppState) plus a deserializable request
//! and return `Result<T>`, whose error serializes as an `ErrorResponse`.

pub mod market;
pub mod comparison;
pub mod watchlist;
pub mod user;
pub mod tools;
pub mod institutional;

use crate::error::{AppError, Result};

/// Trim and uppercase a ticker, rejecting blanks
pub(crate) fn normalize_symbol(symbol: &str) -> Result<String> {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        return Err(AppError::Validation("Symbol is required".to_string()));
    }
    Ok(symbol.to_ascii_uppercase())
}
