//! Record snapshot, analysis and filtering commands

use crate::error::{AppError, Result};
use crate::market::analysis::analyze_investments;
use crate::market::mock::synthetic_history;
use crate::market::types::{HistoricalDataPoint, HistoryPeriod, InvestmentAnalysis, InvestmentRecord};
use crate::services::{FilterCriteria, FilterService, QuotesService, SortSpec};
use crate::state::AppState;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::normalize_symbol;

/// Generate a fresh snapshot and return it
pub fn load_investments(state: &AppState) -> Result<Vec<InvestmentRecord>> {
    tracing::info!("Loading investments from {}", state.source.name());
    state.load_records()?;
    Ok(state.snapshot())
}

/// Reload after the configured delay, overlaying live quotes when enabled
pub async fn refresh_investments(state: &AppState) -> Result<Vec<InvestmentRecord>> {
    if !state.config.refresh_delay.is_zero() {
        tokio::time::sleep(state.config.refresh_delay).await;
    }

    let mut records = state.source.load()?;

    if let Some(provider) = &state.provider {
        QuotesService::enhance_records(provider.as_ref(), &mut records, state.rate_limit).await;
    }

    state.replace_records(records);
    Ok(state.snapshot())
}

/// Current snapshot, loading one first if none exists
pub fn get_investments(state: &AppState) -> Result<Vec<InvestmentRecord>> {
    ensure_loaded(state)?;
    Ok(state.snapshot())
}

pub fn get_investment(state: &AppState, symbol: String) -> Result<InvestmentRecord> {
    let symbol = normalize_symbol(&symbol)?;
    ensure_loaded(state)?;
    state
        .get_record(&symbol)
        .ok_or_else(|| AppError::NotFound(format!("Investment not found: {}", symbol)))
}

pub fn get_analysis(state: &AppState) -> Result<InvestmentAnalysis> {
    ensure_loaded(state)?;
    let records = state.records.read();
    Ok(analyze_investments(&records))
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRequest {
    #[serde(flatten)]
    pub criteria: FilterCriteria,
    pub sort_key: Option<String>,
    pub sort_order: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterResponse {
    pub records: Vec<InvestmentRecord>,
    pub total_count: usize,
    pub active_filter_count: usize,
    pub sort: SortSpec,
}

/// Filter and sort the current snapshot
pub fn filter_and_sort(state: &AppState, request: FilterRequest) -> Result<FilterResponse> {
    let defaults = SortSpec::default();
    let sort = SortSpec::new(
        match request.sort_key.as_deref() {
            Some(key) => key.parse()?,
            None => defaults.sort_key,
        },
        match request.sort_order.as_deref() {
            Some(order) => order.parse()?,
            None => defaults.sort_order,
        },
    );

    ensure_loaded(state)?;
    let records = state.records.read();
    let filtered = FilterService::filter_and_sort(&records, &request.criteria, sort);

    Ok(FilterResponse {
        records: filtered,
        total_count: records.len(),
        active_filter_count: request.criteria.active_filter_count(),
        sort,
    })
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryRequest {
    pub symbol: String,
    #[serde(default)]
    pub period: HistoryPeriod,
}

/// Price history from the live provider
///
/// Without a provider the record's bundled series is used, trimmed to the
/// period. Records with no bundled series get a generated daily series that
/// ends today at the current price.
pub async fn get_history(state: &AppState, request: HistoryRequest) -> Result<Vec<HistoricalDataPoint>> {
    let symbol = normalize_symbol(&request.symbol)?;

    if let Some(provider) = &state.provider {
        return Ok(QuotesService::fetch_history(provider.as_ref(), &symbol, request.period).await);
    }

    let record = get_investment(state, symbol)?;
    let max = request.period.max_points();
    match record.historical_data.as_deref() {
        Some(points) if !points.is_empty() => {
            Ok(points[points.len().saturating_sub(max)..].to_vec())
        }
        _ => Ok(synthetic_history(&record, request.period, Utc::now().date_naive())),
    }
}

fn ensure_loaded(state: &AppState) -> Result<()> {
    if !state.has_records() {
        state.load_records()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::types::Exchange;
    use crate::market::RecordSource;

    fn state() -> AppState {
        AppState::in_memory().unwrap()
    }

    #[test]
    fn test_get_investment_loads_lazily() {
        let state = state();
        let record = get_investment(&state, "spy".to_string()).unwrap();
        assert_eq!(record.symbol, "SPY");

        let missing = get_investment(&state, "ZZZ".to_string());
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_filter_and_sort_defaults_to_score_desc() {
        let state = state();
        let response = filter_and_sort(&state, FilterRequest::default()).unwrap();

        assert_eq!(response.records.len(), response.total_count);
        assert_eq!(response.active_filter_count, 0);
        assert!(response
            .records
            .windows(2)
            .all(|w| w[0].recommendation_score >= w[1].recommendation_score));
    }

    #[test]
    fn test_filter_request_from_json() {
        let state = state();
        let request: FilterRequest = serde_json::from_value(serde_json::json!({
            "searchTerm": "",
            "exchange": ["NASDAQ"],
            "sortKey": "currentPrice",
            "sortOrder": "asc"
        }))
        .unwrap();

        let response = filter_and_sort(&state, request).unwrap();
        assert_eq!(response.records.len(), 4);
        assert!(response.records.iter().all(|r| r.exchange == Exchange::Nasdaq));
        assert!(response
            .records
            .windows(2)
            .all(|w| w[0].current_price <= w[1].current_price));
        assert_eq!(response.active_filter_count, 1);
    }

    #[test]
    fn test_unknown_sort_key_rejected() {
        let state = state();
        let request = FilterRequest {
            sort_key: Some("marketCap".to_string()),
            ..Default::default()
        };
        assert!(matches!(filter_and_sort(&state, request), Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_refresh_replaces_snapshot() {
        let state = state();
        load_investments(&state).unwrap();
        let before = state.get_record("QQQ").unwrap();

        let records = refresh_investments(&state).await.unwrap();
        assert_eq!(records.len(), 12);
        // Jitter moves the price but keeps it within 1% of the catalog value
        let after = state.get_record("QQQ").unwrap();
        assert!((after.current_price - before.current_price).abs() < before.current_price * 0.03);
    }

    #[test]
    fn test_analysis_over_snapshot() {
        let state = state();
        let analysis = get_analysis(&state).unwrap();
        assert_eq!(analysis.total_count, 12);
        assert_eq!(analysis.top_recommendations.len(), 10);
    }

    #[tokio::test]
    async fn test_history_without_provider_is_generated() {
        let state = state();
        let record = get_investment(&state, "VOO".to_string()).unwrap();

        for period in [HistoryPeriod::OneMonth, HistoryPeriod::OneYear, HistoryPeriod::FiveYears] {
            let points = get_history(
                &state,
                HistoryRequest {
                    symbol: "voo".to_string(),
                    period,
                },
            )
            .await
            .unwrap();

            assert_eq!(points.len(), period.max_points());
            assert_eq!(points.last().unwrap().price, record.current_price);
        }
    }

    #[tokio::test]
    async fn test_history_prefers_bundled_series() {
        let state = state();
        let mut records = state.source.load().unwrap();
        records[0].historical_data = Some(
            (1..=40)
                .map(|day| HistoricalDataPoint {
                    date: format!("2024-01-{:02}", day.min(31)),
                    price: day as f64,
                    volume: None,
                })
                .collect(),
        );
        let symbol = records[0].symbol.clone();
        state.replace_records(records);

        let points = get_history(
            &state,
            HistoryRequest {
                symbol,
                period: HistoryPeriod::OneMonth,
            },
        )
        .await
        .unwrap();
        assert_eq!(points.len(), 30);
        assert_eq!(points[0].price, 11.0);
        assert_eq!(points.last().unwrap().price, 40.0);
    }
}
