//! Institutional Service
//!
//! Paced batch fetches over a [`HoldingsSource`] and the cross-symbol ranking
//! of the largest holders.

use crate::market::institutional::{by_value_desc, InstitutionalData, InstitutionalHolder};
use crate::market::HoldingsSource;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Holders returned by a ranking when the caller gives no limit
pub const DEFAULT_TOP_HOLDERS: usize = 20;

/// Pause between symbols in a batch
pub const BATCH_DELAY: Duration = Duration::from_millis(100);

/// Institutional service for business logic
pub struct InstitutionalService;

impl InstitutionalService {
    /// Fetch every symbol in order, skipping ones that fail or are uncovered
    pub async fn batch_fetch(
        source: &dyn HoldingsSource,
        symbols: &[String],
        delay: Duration,
    ) -> Vec<InstitutionalData> {
        info!(
            "InstitutionalService::batch_fetch - {} symbols via {}",
            symbols.len(),
            source.name()
        );

        let mut results = Vec::with_capacity(symbols.len());
        for (i, symbol) in symbols.iter().enumerate() {
            if i > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            match source.fetch(symbol) {
                Ok(Some(data)) => results.push(data),
                Ok(None) => debug!("No institutional data for {}", symbol),
                Err(e) => warn!("Institutional fetch failed for {}: {}", symbol, e),
            }
        }
        results
    }

    /// Merge holders across symbols by name and rank them by total value
    ///
    /// Values and shares are summed; the remaining fields come from the
    /// first occurrence. Ties keep first-seen order.
    pub fn aggregate_top_holders(
        data: &[InstitutionalData],
        limit: usize,
    ) -> Vec<InstitutionalHolder> {
        let mut merged: Vec<InstitutionalHolder> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for holder in data.iter().flat_map(|d| &d.top_holders) {
            match index.get(&holder.name) {
                Some(&i) => {
                    merged[i].total_value += holder.total_value;
                    merged[i].shares += holder.shares;
                }
                None => {
                    index.insert(holder.name.clone(), merged.len());
                    merged.push(holder.clone());
                }
            }
        }

        merged.sort_by(by_value_desc);
        merged.truncate(limit);
        merged
    }

    /// Largest holders across `symbols`
    pub async fn top_holders(
        source: &dyn HoldingsSource,
        symbols: &[String],
        limit: usize,
        delay: Duration,
    ) -> Vec<InstitutionalHolder> {
        let data = Self::batch_fetch(source, symbols, delay).await;
        let holders = Self::aggregate_top_holders(&data, limit);

        info!(
            "InstitutionalService::top_holders - {} holders from {} symbols",
            holders.len(),
            data.len()
        );
        holders
    }
}
