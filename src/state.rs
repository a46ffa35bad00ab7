//! Application state management

use crate::config::AppConfig;
use crate::db::sqlite::SqliteDb;
use crate::error::Result;
use crate::market::alpha_vantage::AlphaVantageProvider;
use crate::market::institutional::MockHoldingsSource;
use crate::market::mock::MockRecordSource;
use crate::market::types::InvestmentRecord;
use crate::market::{HoldingsSource, QuoteProvider, RecordSource};
use crate::services::{ComparisonSet, RateLimit, BATCH_DELAY};
use crate::store::UserStore;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;

/// Application state shared across all commands
pub struct AppState {
    pub config: AppConfig,

    /// SQLite database holding the local key-value storage
    pub sqlite: Arc<SqliteDb>,

    /// Profile, watchlist and preferences
    pub user_store: UserStore,

    /// Generates record snapshots
    pub source: Box<dyn RecordSource>,

    /// Live quotes, present only when the real API is enabled
    pub provider: Option<Arc<dyn QuoteProvider>>,

    pub rate_limit: RateLimit,

    /// Institutional ownership breakdowns
    pub holdings: Box<dyn HoldingsSource>,

    /// Pause between symbols in a holdings batch
    pub holdings_delay: Duration,

    /// Current snapshot in catalog order
    pub records: RwLock<Vec<InvestmentRecord>>,

    /// Symbol index over `records`
    pub record_index: DashMap<String, InvestmentRecord>,

    pub comparison: RwLock<ComparisonSet>,
}

impl AppState {
    /// Create new application state
    pub fn new(config: AppConfig) -> Result<Self> {
        // Create data directory if it doesn't exist
        std::fs::create_dir_all(&config.data_dir)?;

        tracing::info!("Data directory: {:?}", config.data_dir);

        let sqlite = Arc::new(SqliteDb::new(&config.database_path())?);

        let provider: Option<Arc<dyn QuoteProvider>> = if config.real_api_enabled() {
            tracing::info!("Live quotes enabled");
            Some(Arc::new(AlphaVantageProvider::new(config.api_key.clone())?))
        } else {
            None
        };

        Ok(Self::with_parts(
            config,
            sqlite,
            Box::new(MockRecordSource::new()),
            provider,
        ))
    }

    /// State over an in-memory database with no refresh or batch delays
    pub fn in_memory() -> Result<Self> {
        let config = AppConfig {
            refresh_delay: Duration::ZERO,
            ..AppConfig::default()
        };
        let mut state = Self::with_parts(
            config,
            Arc::new(SqliteDb::open_in_memory()?),
            Box::new(MockRecordSource::new()),
            None,
        );
        state.holdings_delay = Duration::ZERO;
        Ok(state)
    }

    pub fn with_parts(
        config: AppConfig,
        sqlite: Arc<SqliteDb>,
        source: Box<dyn RecordSource>,
        provider: Option<Arc<dyn QuoteProvider>>,
    ) -> Self {
        let user_store = UserStore::new(sqlite.clone());

        Self {
            config,
            sqlite,
            user_store,
            source,
            provider,
            rate_limit: RateLimit::default(),
            holdings: Box::new(MockHoldingsSource::new()),
            holdings_delay: BATCH_DELAY,
            records: RwLock::new(Vec::new()),
            record_index: DashMap::new(),
            comparison: RwLock::new(ComparisonSet::new()),
        }
    }

    /// Generate a fresh snapshot from the record source and install it
    pub fn load_records(&self) -> Result<usize> {
        let records = self.source.load()?;
        tracing::debug!("Loaded {} records from {}", records.len(), self.source.name());
        Ok(self.replace_records(records))
    }

    /// Install `records` as the current snapshot and rebuild the index
    pub fn replace_records(&self, records: Vec<InvestmentRecord>) -> usize {
        let mut current = self.records.write();

        self.record_index.clear();
        for record in &records {
            self.record_index.insert(record.symbol.clone(), record.clone());
        }
        *current = records;

        tracing::info!("Loaded {} records into snapshot", current.len());
        current.len()
    }

    pub fn snapshot(&self) -> Vec<InvestmentRecord> {
        self.records.read().clone()
    }

    pub fn has_records(&self) -> bool {
        !self.records.read().is_empty()
    }

    /// Get a record by symbol
    pub fn get_record(&self, symbol: &str) -> Option<InvestmentRecord> {
        self.record_index.get(symbol).map(|r| r.clone())
    }
}
