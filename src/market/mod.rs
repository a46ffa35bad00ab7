//! Market data sources
//!
//! Records come from a synchronous [`RecordSource`] (the mock catalog by
//! default). Live quotes are an optional enhancement behind [`QuoteProvider`]
//! and never gate whether a snapshot can be produced.

pub mod types;
pub mod mock;
pub mod analysis;
pub mod alpha_vantage;
pub mod institutional;

use crate::error::Result;
use async_trait::async_trait;
use institutional::InstitutionalData;
use types::*;

/// Produces a fresh snapshot of investment records
pub trait RecordSource: Send + Sync {
    /// Source name used in logs
    fn name(&self) -> &'static str;

    /// Generate or load the full record list
    fn load(&self) -> Result<Vec<InvestmentRecord>>;
}

/// Live market data adapter
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Provider ID (e.g., "alpha_vantage")
    fn id(&self) -> &'static str;

    /// Latest quote for a symbol, `None` when the provider has nothing usable
    async fn fetch_quote(&self, symbol: &str) -> Result<Option<QuoteUpdate>>;

    /// Daily closes for a symbol, oldest first
    async fn fetch_history(
        &self,
        symbol: &str,
        period: HistoryPeriod,
    ) -> Result<Vec<HistoricalDataPoint>>;
}

/// Institutional ownership per symbol
pub trait HoldingsSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Holder breakdown, `None` when the symbol is not covered
    fn fetch(&self, symbol: &str) -> Result<Option<InstitutionalData>>;
}
