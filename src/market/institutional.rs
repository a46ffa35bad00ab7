//! Institutional ownership
//!
//! Holder breakdowns per symbol. Only a generated source exists; a filings
//! backed source would implement [`HoldingsSource`](super::HoldingsSource).

use super::HoldingsSource;
use crate::error::Result;
use chrono::{Duration, NaiveDate, Utc};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Holders listed per symbol
pub const TOP_HOLDERS_PER_SYMBOL: usize = 10;

/// Unnamed institutions generated after the well-known ones
const ADDITIONAL_HOLDERS: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HolderType {
    #[serde(rename = "Mutual Fund")]
    MutualFund,
    #[serde(rename = "Hedge Fund")]
    HedgeFund,
    #[serde(rename = "Pension Fund")]
    PensionFund,
    #[serde(rename = "Insurance Company")]
    InsuranceCompany,
    Bank,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstitutionalHolder {
    pub name: String,
    /// SEC Central Index Key, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cik: Option<String>,
    #[serde(rename = "type")]
    pub holder_type: HolderType,
    pub total_value: f64,
    pub shares: u64,
    pub percentage_of_portfolio: f64,
    /// Share change since the previous filing
    pub change: i64,
    pub change_percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivity {
    pub new_positions: u32,
    pub increased_positions: u32,
    pub decreased_positions: u32,
    pub closed_positions: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstitutionalData {
    pub symbol: String,
    pub total_institutional_holdings: u64,
    pub institutional_ownership_percent: f64,
    pub number_of_institutions: usize,
    /// Largest holders by value, descending
    pub top_holders: Vec<InstitutionalHolder>,
    pub recent_activity: RecentActivity,
    /// Filing date, `YYYY-MM-DD`
    pub last_updated: String,
}

/// Well-known holder with the ranges its figures are drawn from
struct NamedHolder {
    name: &'static str,
    cik: &'static str,
    holder_type: HolderType,
    min_value: f64,
    value_span: f64,
    min_shares: u64,
    shares_span: u64,
    min_pct: f64,
    pct_span: f64,
    change_bound: i64,
    change_pct_bound: f64,
}

const NAMED_HOLDERS: [NamedHolder; 5] = [
    NamedHolder {
        name: "Vanguard Group Inc",
        cik: "0000102909",
        holder_type: HolderType::MutualFund,
        min_value: 1_000_000_000.0,
        value_span: 5_000_000_000.0,
        min_shares: 10_000_000,
        shares_span: 50_000_000,
        min_pct: 0.5,
        pct_span: 5.0,
        change_bound: 500_000,
        change_pct_bound: 5.0,
    },
    NamedHolder {
        name: "BlackRock Inc",
        cik: "0001364742",
        holder_type: HolderType::MutualFund,
        min_value: 800_000_000.0,
        value_span: 4_000_000_000.0,
        min_shares: 8_000_000,
        shares_span: 40_000_000,
        min_pct: 0.4,
        pct_span: 4.0,
        change_bound: 400_000,
        change_pct_bound: 4.0,
    },
    NamedHolder {
        name: "State Street Corp",
        cik: "0000093751",
        holder_type: HolderType::Bank,
        min_value: 500_000_000.0,
        value_span: 2_000_000_000.0,
        min_shares: 5_000_000,
        shares_span: 20_000_000,
        min_pct: 0.3,
        pct_span: 3.0,
        change_bound: 250_000,
        change_pct_bound: 3.0,
    },
    NamedHolder {
        name: "Fidelity Management & Research",
        cik: "0000031526",
        holder_type: HolderType::MutualFund,
        min_value: 300_000_000.0,
        value_span: 1_500_000_000.0,
        min_shares: 3_000_000,
        shares_span: 15_000_000,
        min_pct: 0.2,
        pct_span: 2.5,
        change_bound: 200_000,
        change_pct_bound: 2.5,
    },
    NamedHolder {
        name: "Berkshire Hathaway Inc",
        cik: "0001067983",
        holder_type: HolderType::Other,
        min_value: 200_000_000.0,
        value_span: 1_000_000_000.0,
        min_shares: 2_000_000,
        shares_span: 10_000_000,
        min_pct: 0.1,
        pct_span: 2.0,
        change_bound: 150_000,
        change_pct_bound: 2.0,
    },
];

const ADDITIONAL_TYPES: [HolderType; 4] = [
    HolderType::HedgeFund,
    HolderType::MutualFund,
    HolderType::PensionFund,
    HolderType::InsuranceCompany,
];

/// Descending by total value; incomparable values keep their order
pub(crate) fn by_value_desc(a: &InstitutionalHolder, b: &InstitutionalHolder) -> Ordering {
    b.total_value
        .partial_cmp(&a.total_value)
        .unwrap_or(Ordering::Equal)
}

/// Generated holder breakdowns
pub struct MockHoldingsSource {
    rng: Mutex<StdRng>,
}

impl MockHoldingsSource {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Breakdown for `symbol` as filed within 90 days before `today`
    pub fn generate(&self, symbol: &str, today: NaiveDate) -> InstitutionalData {
        let mut rng = self.rng.lock();

        let named: Vec<InstitutionalHolder> = NAMED_HOLDERS
            .iter()
            .map(|h| InstitutionalHolder {
                name: h.name.to_string(),
                cik: Some(h.cik.to_string()),
                holder_type: h.holder_type,
                total_value: h.min_value + rng.gen::<f64>() * h.value_span,
                shares: h.min_shares + rng.gen_range(0..h.shares_span),
                percentage_of_portfolio: h.min_pct + rng.gen::<f64>() * h.pct_span,
                change: rng.gen_range(-h.change_bound..h.change_bound),
                change_percent: (rng.gen::<f64>() - 0.5) * 2.0 * h.change_pct_bound,
            })
            .collect();

        let total_institutional_holdings = named.iter().map(|h| h.shares).sum();

        let mut holders = named;
        for i in 0..ADDITIONAL_HOLDERS {
            holders.push(InstitutionalHolder {
                name: format!("Institutional Investor {}", i + 1),
                cik: None,
                holder_type: ADDITIONAL_TYPES[rng.gen_range(0..ADDITIONAL_TYPES.len())],
                total_value: 50_000_000.0 + rng.gen::<f64>() * 500_000_000.0,
                shares: 500_000 + rng.gen_range(0..5_000_000),
                percentage_of_portfolio: 0.05 + rng.gen::<f64>() * 1.5,
                change: rng.gen_range(-100_000..100_000),
                change_percent: (rng.gen::<f64>() - 0.5) * 3.0,
            });
        }

        let number_of_institutions = holders.len();
        holders.sort_by(by_value_desc);
        holders.truncate(TOP_HOLDERS_PER_SYMBOL);

        InstitutionalData {
            symbol: symbol.to_string(),
            total_institutional_holdings,
            institutional_ownership_percent: 50.0 + rng.gen::<f64>() * 40.0,
            number_of_institutions,
            top_holders: holders,
            recent_activity: RecentActivity {
                new_positions: rng.gen_range(1..6),
                increased_positions: rng.gen_range(3..11),
                decreased_positions: rng.gen_range(2..8),
                closed_positions: rng.gen_range(1..5),
            },
            last_updated: (today - Duration::days(rng.gen_range(0..90)))
                .format("%Y-%m-%d")
                .to_string(),
        }
    }
}

impl Default for MockHoldingsSource {
    fn default() -> Self {
        Self::new()
    }
}

impl HoldingsSource for MockHoldingsSource {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn fetch(&self, symbol: &str) -> Result<Option<InstitutionalData>> {
        Ok(Some(self.generate(symbol, Utc::now().date_naive())))
    }
}
