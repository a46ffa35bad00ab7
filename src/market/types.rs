//! Common market data types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Asset class of an investment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetType {
    #[serde(rename = "ETF")]
    Etf,
    #[serde(rename = "Index Fund")]
    IndexFund,
    Stock,
    Commodity,
    #[serde(rename = "Cryptocurrency")]
    Crypto,
    Index,
    #[serde(rename = "FX")]
    Fx,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Etf => "ETF",
            AssetType::IndexFund => "Index Fund",
            AssetType::Stock => "Stock",
            AssetType::Commodity => "Commodity",
            AssetType::Crypto => "Cryptocurrency",
            AssetType::Index => "Index",
            AssetType::Fx => "FX",
        }
    }
}

/// Listing venue (or pseudo-venue for crypto, FX and commodities)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Exchange {
    Nasdaq,
    Nyse,
    #[serde(rename = "SP500")]
    Sp500,
    Lse,
    Crypto,
    Fx,
    Commodity,
}

impl Exchange {
    pub fn as_str(&self) -> &'static str {
        match self {
            Exchange::Nasdaq => "NASDAQ",
            Exchange::Nyse => "NYSE",
            Exchange::Sp500 => "SP500",
            Exchange::Lse => "LSE",
            Exchange::Crypto => "CRYPTO",
            Exchange::Fx => "FX",
            Exchange::Commodity => "COMMODITY",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Strong Buy")]
    StrongBuy,
    Buy,
    Hold,
    Sell,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::StrongBuy => "Strong Buy",
            Recommendation::Buy => "Buy",
            Recommendation::Hold => "Hold",
            Recommendation::Sell => "Sell",
        }
    }
}

macro_rules! display_via_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_via_as_str!(AssetType, Exchange, RiskLevel, Recommendation);

/// Single point of a price history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalDataPoint {
    pub date: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<u64>,
}

/// One investment entity as shown on the dashboard
///
/// Optional metrics are `None` when unknown; `None` is never read as zero
/// except where a sort or average explicitly says so.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentRecord {
    pub symbol: String,
    pub name: String,
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    pub exchange: Exchange,
    pub current_price: f64,
    pub change_percent: f64,
    pub volume: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pe_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dividend_yield: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ytd_return: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_year_return: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub five_year_return: Option<f64>,
    pub risk_level: RiskLevel,
    pub recommendation: Recommendation,
    pub recommendation_score: u8,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub historical_data: Option<Vec<HistoricalDataPoint>>,
}

/// Live quote fields that can overwrite a generated record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteUpdate {
    pub current_price: Option<f64>,
    pub change_percent: Option<f64>,
    pub volume: Option<u64>,
}

/// Average YTD return per headline exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSummary {
    pub nasdaq_avg_return: f64,
    pub nyse_avg_return: f64,
    pub sp500_avg_return: f64,
}

/// Dashboard landing view derived from a record snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentAnalysis {
    pub investments: Vec<InvestmentRecord>,
    pub total_count: usize,
    pub top_recommendations: Vec<InvestmentRecord>,
    pub market_summary: MarketSummary,
}

/// History window requested from a quote provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HistoryPeriod {
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "6M")]
    SixMonths,
    #[default]
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "5Y")]
    FiveYears,
}

impl HistoryPeriod {
    /// Maximum number of daily points kept for this window
    pub fn max_points(&self) -> usize {
        match self {
            HistoryPeriod::OneMonth => 30,
            HistoryPeriod::ThreeMonths => 90,
            HistoryPeriod::SixMonths => 180,
            HistoryPeriod::OneYear => 365,
            HistoryPeriod::FiveYears => 1825,
        }
    }

    pub fn output_size(&self) -> &'static str {
        match self {
            HistoryPeriod::FiveYears => "full",
            _ => "compact",
        }
    }
}
