//! Quotes Service
//!
//! Overlays live quotes from a [`QuoteProvider`] onto a record snapshot and
//! fetches price history. Every call here is best-effort: provider failures
//! are logged and the affected record keeps its generated values.

use crate::market::types::{HistoricalDataPoint, HistoryPeriod, InvestmentRecord, QuoteUpdate};
use crate::market::QuoteProvider;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Pacing for providers with per-minute quotas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    /// Calls made between batch pauses
    pub batch_size: usize,
    pub batch_pause: Duration,
    /// Delay after every call
    pub call_delay: Duration,
}

impl RateLimit {
    /// No waiting at all
    pub const fn none() -> Self {
        Self {
            batch_size: usize::MAX,
            batch_pause: Duration::ZERO,
            call_delay: Duration::ZERO,
        }
    }
}

impl Default for RateLimit {
    /// Alpha Vantage free tier: 5 calls per minute
    fn default() -> Self {
        Self {
            batch_size: 5,
            batch_pause: Duration::from_secs(12),
            call_delay: Duration::from_millis(200),
        }
    }
}

/// Outcome counts for one enhancement pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnhanceSummary {
    pub updated: usize,
    pub unchanged: usize,
    pub failed: usize,
}

/// Quotes service for business logic
pub struct QuotesService;

impl QuotesService {
    /// Apply live quotes to `records` in place
    pub async fn enhance_records(
        provider: &dyn QuoteProvider,
        records: &mut [InvestmentRecord],
        limit: RateLimit,
    ) -> EnhanceSummary {
        info!(
            "QuotesService::enhance_records - {} records via {}",
            records.len(),
            provider.id()
        );

        let mut summary = EnhanceSummary::default();
        for (i, record) in records.iter_mut().enumerate() {
            if i > 0 && limit.batch_size > 0 && i % limit.batch_size == 0 {
                Self::pause(limit.batch_pause).await;
            }

            match provider.fetch_quote(&record.symbol).await {
                Ok(Some(quote)) => {
                    if Self::apply_quote(record, &quote) {
                        summary.updated += 1;
                    } else {
                        summary.unchanged += 1;
                    }
                }
                Ok(None) => {
                    debug!("No quote for {}", record.symbol);
                    summary.unchanged += 1;
                }
                Err(e) => {
                    warn!("Quote fetch failed for {}: {}", record.symbol, e);
                    summary.failed += 1;
                }
            }

            Self::pause(limit.call_delay).await;
        }

        info!(
            "QuotesService::enhance_records - updated={} unchanged={} failed={}",
            summary.updated, summary.unchanged, summary.failed
        );
        summary
    }

    /// Price history for one symbol; provider errors yield an empty series
    pub async fn fetch_history(
        provider: &dyn QuoteProvider,
        symbol: &str,
        period: HistoryPeriod,
    ) -> Vec<HistoricalDataPoint> {
        match provider.fetch_history(symbol, period).await {
            Ok(points) => points,
            Err(e) => {
                warn!("History fetch failed for {}: {}", symbol, e);
                Vec::new()
            }
        }
    }

    /// Zero prices and volumes are treated as missing data
    fn apply_quote(record: &mut InvestmentRecord, quote: &QuoteUpdate) -> bool {
        let mut changed = false;

        if let Some(price) = quote.current_price.filter(|p| *p != 0.0) {
            record.current_price = price;
            changed = true;
        }
        if let Some(change) = quote.change_percent {
            record.change_percent = change;
            changed = true;
        }
        if let Some(volume) = quote.volume.filter(|v| *v != 0) {
            record.volume = volume;
            changed = true;
        }
        changed
    }

    async fn pause(duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}
