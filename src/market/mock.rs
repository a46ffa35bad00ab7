//! Mock record generator
//!
//! Holds the fixed dashboard catalog and jitters price and daily change on
//! every load so each refresh looks like a new market snapshot.

use super::types::*;
use super::RecordSource;
use crate::error::Result;
use chrono::{Duration, NaiveDate};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Relative price band applied around the catalog price
const PRICE_VOLATILITY: f64 = 0.02;

/// Absolute spread (in percentage points) applied around the base change
const CHANGE_SPREAD: f64 = 10.0;

/// Synthetic series start this far below the current price
const HISTORY_DRIFT: f64 = 0.1;

/// Synthetic prices never fall below this share of the current price
const HISTORY_FLOOR: f64 = 0.7;

struct CatalogEntry {
    symbol: &'static str,
    name: &'static str,
    asset_type: AssetType,
    exchange: Exchange,
    base_price: f64,
    base_change: f64,
    volume: u64,
    market_cap: f64,
    pe_ratio: f64,
    dividend_yield: f64,
    ytd_return: f64,
    one_year_return: f64,
    five_year_return: f64,
    risk_level: RiskLevel,
    recommendation: Recommendation,
    recommendation_score: u8,
    description: &'static str,
    sector: &'static str,
}

const CATALOG: &[CatalogEntry] = &[
    // NASDAQ technology
    CatalogEntry {
        symbol: "QQQ",
        name: "Invesco QQQ Trust",
        asset_type: AssetType::Etf,
        exchange: Exchange::Nasdaq,
        base_price: 380.0,
        base_change: 0.5,
        volume: 45_000_000,
        market_cap: 200_000_000_000.0,
        pe_ratio: 28.5,
        dividend_yield: 0.65,
        ytd_return: 42.3,
        one_year_return: 38.7,
        five_year_return: 18.2,
        risk_level: RiskLevel::Medium,
        recommendation: Recommendation::StrongBuy,
        recommendation_score: 92,
        description: "Tracks the NASDAQ-100 Index, providing exposure to 100 of the largest non-financial companies listed on NASDAQ.",
        sector: "Technology",
    },
    CatalogEntry {
        symbol: "TECL",
        name: "Direxion Daily Technology Bull 3X Shares",
        asset_type: AssetType::Etf,
        exchange: Exchange::Nasdaq,
        base_price: 45.0,
        base_change: 1.2,
        volume: 2_500_000,
        market_cap: 1_200_000_000.0,
        pe_ratio: 32.1,
        dividend_yield: 0.0,
        ytd_return: 85.4,
        one_year_return: 72.3,
        five_year_return: 25.8,
        risk_level: RiskLevel::High,
        recommendation: Recommendation::Buy,
        recommendation_score: 78,
        description: "3x leveraged ETF tracking technology stocks. High risk, high reward.",
        sector: "Technology",
    },
    CatalogEntry {
        symbol: "FTEC",
        name: "Fidelity MSCI Information Technology Index ETF",
        asset_type: AssetType::Etf,
        exchange: Exchange::Nasdaq,
        base_price: 125.0,
        base_change: 0.3,
        volume: 1_200_000,
        market_cap: 8_500_000_000.0,
        pe_ratio: 29.8,
        dividend_yield: 0.72,
        ytd_return: 48.2,
        one_year_return: 41.5,
        five_year_return: 19.3,
        risk_level: RiskLevel::Medium,
        recommendation: Recommendation::StrongBuy,
        recommendation_score: 88,
        description: "Low-cost ETF tracking MSCI Information Technology Index.",
        sector: "Technology",
    },
    CatalogEntry {
        symbol: "XLK",
        name: "Technology Select Sector SPDR Fund",
        asset_type: AssetType::Etf,
        exchange: Exchange::Nasdaq,
        base_price: 195.0,
        base_change: 0.4,
        volume: 15_000_000,
        market_cap: 55_000_000_000.0,
        pe_ratio: 30.2,
        dividend_yield: 0.68,
        ytd_return: 45.7,
        one_year_return: 39.2,
        five_year_return: 18.5,
        risk_level: RiskLevel::Medium,
        recommendation: Recommendation::Buy,
        recommendation_score: 85,
        description: "Tracks technology sector of S&P 500.",
        sector: "Technology",
    },
    // NYSE broad market
    CatalogEntry {
        symbol: "SPY",
        name: "SPDR S&P 500 ETF Trust",
        asset_type: AssetType::Etf,
        exchange: Exchange::Nyse,
        base_price: 450.0,
        base_change: 0.2,
        volume: 75_000_000,
        market_cap: 450_000_000_000.0,
        pe_ratio: 24.8,
        dividend_yield: 1.42,
        ytd_return: 24.5,
        one_year_return: 22.3,
        five_year_return: 14.8,
        risk_level: RiskLevel::Low,
        recommendation: Recommendation::StrongBuy,
        recommendation_score: 95,
        description: "The most popular S&P 500 ETF, providing broad market exposure with low fees.",
        sector: "Diversified",
    },
    CatalogEntry {
        symbol: "VTI",
        name: "Vanguard Total Stock Market ETF",
        asset_type: AssetType::Etf,
        exchange: Exchange::Nyse,
        base_price: 245.0,
        base_change: 0.15,
        volume: 3_500_000,
        market_cap: 320_000_000_000.0,
        pe_ratio: 23.5,
        dividend_yield: 1.52,
        ytd_return: 23.8,
        one_year_return: 21.5,
        five_year_return: 14.2,
        risk_level: RiskLevel::Low,
        recommendation: Recommendation::StrongBuy,
        recommendation_score: 94,
        description: "Total stock market exposure with ultra-low expense ratio.",
        sector: "Diversified",
    },
    CatalogEntry {
        symbol: "DIA",
        name: "SPDR Dow Jones Industrial Average ETF",
        asset_type: AssetType::Etf,
        exchange: Exchange::Nyse,
        base_price: 350.0,
        base_change: 0.18,
        volume: 4_500_000,
        market_cap: 32_000_000_000.0,
        pe_ratio: 22.3,
        dividend_yield: 1.85,
        ytd_return: 18.7,
        one_year_return: 16.2,
        five_year_return: 12.5,
        risk_level: RiskLevel::Low,
        recommendation: Recommendation::Buy,
        recommendation_score: 82,
        description: "Tracks the Dow Jones Industrial Average, 30 blue-chip stocks.",
        sector: "Diversified",
    },
    CatalogEntry {
        symbol: "IVV",
        name: "iShares Core S&P 500 ETF",
        asset_type: AssetType::Etf,
        exchange: Exchange::Nyse,
        base_price: 455.0,
        base_change: 0.2,
        volume: 5_500_000,
        market_cap: 380_000_000_000.0,
        pe_ratio: 24.8,
        dividend_yield: 1.40,
        ytd_return: 24.3,
        one_year_return: 22.1,
        five_year_return: 14.7,
        risk_level: RiskLevel::Low,
        recommendation: Recommendation::StrongBuy,
        recommendation_score: 93,
        description: "Low-cost S&P 500 ETF with strong liquidity.",
        sector: "Diversified",
    },
    // S&P 500 funds
    CatalogEntry {
        symbol: "VOO",
        name: "Vanguard S&P 500 ETF",
        asset_type: AssetType::Etf,
        exchange: Exchange::Sp500,
        base_price: 420.0,
        base_change: 0.2,
        volume: 4_500_000,
        market_cap: 380_000_000_000.0,
        pe_ratio: 24.6,
        dividend_yield: 1.45,
        ytd_return: 24.8,
        one_year_return: 22.5,
        five_year_return: 14.9,
        risk_level: RiskLevel::Low,
        recommendation: Recommendation::StrongBuy,
        recommendation_score: 96,
        description: "Ultra-low cost S&P 500 ETF, perfect for long-term investors.",
        sector: "Diversified",
    },
    CatalogEntry {
        symbol: "SWPPX",
        name: "Schwab S&P 500 Index Fund",
        asset_type: AssetType::IndexFund,
        exchange: Exchange::Sp500,
        base_price: 85.0,
        base_change: 0.2,
        volume: 0,
        market_cap: 85_000_000_000.0,
        pe_ratio: 24.7,
        dividend_yield: 1.43,
        ytd_return: 24.6,
        one_year_return: 22.4,
        five_year_return: 14.8,
        risk_level: RiskLevel::Low,
        recommendation: Recommendation::StrongBuy,
        recommendation_score: 95,
        description: "No minimum investment S&P 500 index fund with zero commission.",
        sector: "Diversified",
    },
    CatalogEntry {
        symbol: "FXAIX",
        name: "Fidelity 500 Index Fund",
        asset_type: AssetType::IndexFund,
        exchange: Exchange::Sp500,
        base_price: 165.0,
        base_change: 0.2,
        volume: 0,
        market_cap: 450_000_000_000.0,
        pe_ratio: 24.8,
        dividend_yield: 1.41,
        ytd_return: 24.5,
        one_year_return: 22.3,
        five_year_return: 14.7,
        risk_level: RiskLevel::Low,
        recommendation: Recommendation::StrongBuy,
        recommendation_score: 94,
        description: "Fidelity's flagship S&P 500 index fund with industry-leading low fees.",
        sector: "Diversified",
    },
    CatalogEntry {
        symbol: "SPLG",
        name: "SPDR Portfolio S&P 500 ETF",
        asset_type: AssetType::Etf,
        exchange: Exchange::Sp500,
        base_price: 58.0,
        base_change: 0.2,
        volume: 8_500_000,
        market_cap: 28_000_000_000.0,
        pe_ratio: 24.7,
        dividend_yield: 1.44,
        ytd_return: 24.4,
        one_year_return: 22.2,
        five_year_return: 14.6,
        risk_level: RiskLevel::Low,
        recommendation: Recommendation::Buy,
        recommendation_score: 90,
        description: "Low-cost S&P 500 ETF alternative with fractional share trading.",
        sector: "Diversified",
    },
];

/// Mock record source backed by the built-in catalog
pub struct MockRecordSource {
    rng: Mutex<StdRng>,
}

impl MockRecordSource {
    /// Create a source seeded from OS entropy
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Create a deterministic source
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Number of records produced per load
    pub fn catalog_len() -> usize {
        CATALOG.len()
    }

    fn jitter_price(rng: &mut StdRng, base: f64) -> f64 {
        base * (1.0 + (rng.gen::<f64>() - 0.5) * PRICE_VOLATILITY)
    }

    fn jitter_change(rng: &mut StdRng, base: f64) -> f64 {
        base + (rng.gen::<f64>() - 0.5) * CHANGE_SPREAD
    }

    fn build(entry: &CatalogEntry, rng: &mut StdRng) -> InvestmentRecord {
        InvestmentRecord {
            symbol: entry.symbol.to_string(),
            name: entry.name.to_string(),
            asset_type: entry.asset_type,
            exchange: entry.exchange,
            current_price: Self::jitter_price(rng, entry.base_price),
            change_percent: Self::jitter_change(rng, entry.base_change),
            volume: entry.volume,
            market_cap: Some(entry.market_cap),
            pe_ratio: Some(entry.pe_ratio),
            dividend_yield: Some(entry.dividend_yield),
            ytd_return: Some(entry.ytd_return),
            one_year_return: Some(entry.one_year_return),
            five_year_return: Some(entry.five_year_return),
            risk_level: entry.risk_level,
            recommendation: entry.recommendation,
            recommendation_score: entry.recommendation_score,
            description: entry.description.to_string(),
            sector: Some(entry.sector.to_string()),
            historical_data: None,
        }
    }
}

impl Default for MockRecordSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordSource for MockRecordSource {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn load(&self) -> Result<Vec<InvestmentRecord>> {
        let mut rng = self.rng.lock();
        let records: Vec<InvestmentRecord> = CATALOG
            .iter()
            .map(|entry| Self::build(entry, &mut rng))
            .collect();

        tracing::debug!("Generated {} mock records", records.len());
        Ok(records)
    }
}

/// Daily series for `record` ending on `end` at its current price
///
/// The walk is seeded from the symbol, so the same record and period always
/// give the same shape. Length is `period.max_points()`.
pub fn synthetic_history(
    record: &InvestmentRecord,
    period: HistoryPeriod,
    end: NaiveDate,
) -> Vec<HistoricalDataPoint> {
    let mut rng = StdRng::seed_from_u64(symbol_seed(&record.symbol));
    let base = record.current_price;
    let n = period.max_points();

    (0..n)
        .map(|k| {
            let price = if k + 1 == n {
                base
            } else {
                let progress = (k + 1) as f64 / n as f64;
                let noise = (rng.gen::<f64>() - 0.5) * PRICE_VOLATILITY * 2.0;
                let drift = 1.0 - HISTORY_DRIFT + HISTORY_DRIFT * progress;
                (base * (drift + noise)).max(base * HISTORY_FLOOR)
            };

            HistoricalDataPoint {
                date: (end - Duration::days((n - 1 - k) as i64))
                    .format("%Y-%m-%d")
                    .to_string(),
                price,
                volume: Some((record.volume as f64 * (0.8 + rng.gen::<f64>() * 0.4)) as u64),
            }
        })
        .collect()
}

/// FNV-1a over the symbol bytes
fn symbol_seed(symbol: &str) -> u64 {
    symbol
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325, |hash, b| {
            (hash ^ b as u64).wrapping_mul(0x0100_0000_01b3)
        })
}
