//! Alpha Vantage quote adapter

use super::types::{HistoricalDataPoint, HistoryPeriod, QuoteUpdate};
use super::QuoteProvider;
use crate::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

const BASE_URL: &str = "https://www.alphavantage.co/query";

/// Placeholder key that never enables live data
pub const DEMO_KEY: &str = "demo";

/// Alpha Vantage implementation of [`QuoteProvider`]
pub struct AlphaVantageProvider {
    client: Client,
    api_key: String,
}

impl AlphaVantageProvider {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
        })
    }

    async fn query(&self, params: &[(&str, &str)]) -> Result<Value> {
        let mut query: Vec<(&str, &str)> = params.to_vec();
        query.push(("apikey", self.api_key.as_str()));

        let body = self
            .client
            .get(BASE_URL)
            .query(&query)
            .send()
            .await?
            .json::<Value>()
            .await?;

        Ok(body)
    }
}

/// Whether the payload is an error or a rate-limit notice
fn is_rejected(body: &Value) -> bool {
    body.get("Error Message").is_some() || body.get("Note").is_some()
}

/// Parse a `GLOBAL_QUOTE` response
pub fn parse_global_quote(body: &Value) -> Option<QuoteUpdate> {
    if is_rejected(body) {
        return None;
    }

    let quote = body.get("Global Quote")?;
    let current_price = quote
        .get("05. price")
        .and_then(Value::as_str)
        .and_then(|p| p.trim().parse::<f64>().ok())?;

    let change_percent = quote
        .get("10. change percent")
        .and_then(Value::as_str)
        .and_then(|p| p.trim().trim_end_matches('%').parse::<f64>().ok());

    let volume = quote
        .get("06. volume")
        .and_then(Value::as_str)
        .and_then(|v| v.trim().parse::<u64>().ok());

    Some(QuoteUpdate {
        current_price: Some(current_price),
        change_percent,
        volume,
    })
}

/// Parse a `TIME_SERIES_DAILY` response, keeping the most recent points
pub fn parse_daily_series(body: &Value, period: HistoryPeriod) -> Vec<HistoricalDataPoint> {
    if is_rejected(body) {
        return Vec::new();
    }

    let Some(series) = body.get("Time Series (Daily)").and_then(Value::as_object) else {
        return Vec::new();
    };

    let mut points: Vec<HistoricalDataPoint> = series
        .iter()
        .filter_map(|(date, values)| {
            let price = values
                .get("4. close")
                .and_then(Value::as_str)
                .and_then(|p| p.parse::<f64>().ok())?;
            let volume = values
                .get("5. volume")
                .and_then(Value::as_str)
                .and_then(|v| v.parse::<u64>().ok());

            Some(HistoricalDataPoint {
                date: date.clone(),
                price,
                volume,
            })
        })
        .collect();

    // ISO dates order lexicographically
    points.sort_by(|a, b| b.date.cmp(&a.date));
    points.truncate(period.max_points());
    points.reverse();
    points
}

#[async_trait]
impl QuoteProvider for AlphaVantageProvider {
    fn id(&self) -> &'static str {
        "alpha_vantage"
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Option<QuoteUpdate>> {
        let body = self
            .query(&[("function", "GLOBAL_QUOTE"), ("symbol", symbol)])
            .await?;

        let quote = parse_global_quote(&body);
        if quote.is_none() {
            tracing::warn!("No usable quote for {} (API limit or error)", symbol);
        }
        Ok(quote)
    }

    async fn fetch_history(
        &self,
        symbol: &str,
        period: HistoryPeriod,
    ) -> Result<Vec<HistoricalDataPoint>> {
        let body = self
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", symbol),
                ("outputsize", period.output_size()),
            ])
            .await?;

        Ok(parse_daily_series(&body, period))
    }
}
