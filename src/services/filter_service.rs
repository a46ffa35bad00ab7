//! Filter Service
//!
//! Search, filter and sort over a record snapshot. Pure: inputs are never
//! mutated and the output is a fresh vector.

use crate::error::{AppError, Result};
use crate::market::types::{AssetType, Exchange, InvestmentRecord, RiskLevel};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::hash::Hash;
use std::str::FromStr;
use tracing::debug;

/// Field a snapshot can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    RecommendationScore,
    YtdReturn,
    OneYearReturn,
    CurrentPrice,
    DividendYield,
    ChangePercent,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::RecommendationScore => "recommendationScore",
            SortKey::YtdReturn => "ytdReturn",
            SortKey::OneYearReturn => "oneYearReturn",
            SortKey::CurrentPrice => "currentPrice",
            SortKey::DividendYield => "dividendYield",
            SortKey::ChangePercent => "changePercent",
        }
    }

    /// Numeric value of this field; unknown optional metrics read as 0
    pub fn value_of(&self, record: &InvestmentRecord) -> f64 {
        match self {
            SortKey::RecommendationScore => f64::from(record.recommendation_score),
            SortKey::YtdReturn => record.ytd_return.unwrap_or(0.0),
            SortKey::OneYearReturn => record.one_year_return.unwrap_or(0.0),
            SortKey::CurrentPrice => record.current_price,
            SortKey::DividendYield => record.dividend_yield.unwrap_or(0.0),
            SortKey::ChangePercent => record.change_percent,
        }
    }
}

impl FromStr for SortKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "recommendationScore" => Ok(SortKey::RecommendationScore),
            "ytdReturn" => Ok(SortKey::YtdReturn),
            "oneYearReturn" => Ok(SortKey::OneYearReturn),
            "currentPrice" => Ok(SortKey::CurrentPrice),
            "dividendYield" => Ok(SortKey::DividendYield),
            "changePercent" => Ok(SortKey::ChangePercent),
            other => Err(AppError::Validation(format!("Unknown sort key: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Asc),
            "desc" | "descending" => Ok(SortOrder::Desc),
            other => Err(AppError::Validation(format!("Unknown sort order: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortSpec {
    pub sort_key: SortKey,
    pub sort_order: SortOrder,
}

impl SortSpec {
    pub fn new(sort_key: SortKey, sort_order: SortOrder) -> Self {
        Self { sort_key, sort_order }
    }

    /// Parse key and order strings coming from the presentation layer
    pub fn parse(sort_key: &str, sort_order: &str) -> Result<Self> {
        Ok(Self::new(sort_key.parse()?, sort_order.parse()?))
    }
}

/// Search term plus per-dimension allow sets
///
/// A dimension that is `None` or holds an empty set does not constrain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    #[serde(default)]
    pub search_term: String,
    #[serde(default)]
    pub exchange: Option<HashSet<Exchange>>,
    #[serde(default)]
    pub risk_level: Option<HashSet<RiskLevel>>,
    #[serde(default, rename = "type")]
    pub asset_type: Option<HashSet<AssetType>>,
    #[serde(default)]
    pub sector: Option<HashSet<String>>,
}

impl FilterCriteria {
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn with_exchanges(mut self, values: impl IntoIterator<Item = Exchange>) -> Self {
        self.exchange = Some(values.into_iter().collect());
        self
    }

    pub fn with_risk_levels(mut self, values: impl IntoIterator<Item = RiskLevel>) -> Self {
        self.risk_level = Some(values.into_iter().collect());
        self
    }

    pub fn with_types(mut self, values: impl IntoIterator<Item = AssetType>) -> Self {
        self.asset_type = Some(values.into_iter().collect());
        self
    }

    pub fn with_sectors<S: Into<String>>(mut self, values: impl IntoIterator<Item = S>) -> Self {
        self.sector = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn toggle_exchange(&mut self, value: Exchange) {
        toggle(&mut self.exchange, value);
    }

    pub fn toggle_risk_level(&mut self, value: RiskLevel) {
        toggle(&mut self.risk_level, value);
    }

    pub fn toggle_type(&mut self, value: AssetType) {
        toggle(&mut self.asset_type, value);
    }

    pub fn toggle_sector(&mut self, value: impl Into<String>) {
        toggle(&mut self.sector, value.into());
    }

    /// Constraining dimensions, plus one for a non-empty search term
    pub fn active_filter_count(&self) -> usize {
        let dimensions = [
            is_active(&self.exchange),
            is_active(&self.risk_level),
            is_active(&self.asset_type),
            is_active(&self.sector),
        ]
        .into_iter()
        .filter(|active| *active)
        .count();

        dimensions + usize::from(!self.search_term.is_empty())
    }

    pub fn has_active_filters(&self) -> bool {
        self.active_filter_count() > 0
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether a single record passes every dimension
    pub fn matches(&self, record: &InvestmentRecord) -> bool {
        self.matches_search(record)
            && allows(&self.exchange, &record.exchange)
            && allows(&self.risk_level, &record.risk_level)
            && allows(&self.asset_type, &record.asset_type)
            && self.matches_sector(record)
    }

    fn matches_search(&self, record: &InvestmentRecord) -> bool {
        if self.search_term.is_empty() {
            return true;
        }
        let needle = self.search_term.to_lowercase();
        record.symbol.to_lowercase().contains(&needle)
            || record.name.to_lowercase().contains(&needle)
    }

    // Records without a sector never pass an active sector filter
    fn matches_sector(&self, record: &InvestmentRecord) -> bool {
        match &self.sector {
            Some(sectors) if !sectors.is_empty() => record
                .sector
                .as_ref()
                .map(|s| sectors.contains(s))
                .unwrap_or(false),
            _ => true,
        }
    }
}

fn is_active<T>(set: &Option<HashSet<T>>) -> bool {
    set.as_ref().map(|s| !s.is_empty()).unwrap_or(false)
}

fn allows<T: Eq + Hash>(set: &Option<HashSet<T>>, value: &T) -> bool {
    match set {
        Some(allowed) if !allowed.is_empty() => allowed.contains(value),
        _ => true,
    }
}

fn toggle<T: Eq + Hash>(set: &mut Option<HashSet<T>>, value: T) {
    let values = set.get_or_insert_with(HashSet::new);
    if !values.remove(&value) {
        values.insert(value);
    }
    if values.is_empty() {
        *set = None;
    }
}

/// Filter service for business logic
pub struct FilterService;

impl FilterService {
    /// Keep the records matching `criteria`, in input order
    pub fn filter(records: &[InvestmentRecord], criteria: &FilterCriteria) -> Vec<InvestmentRecord> {
        records
            .iter()
            .filter(|r| criteria.matches(r))
            .cloned()
            .collect()
    }

    /// Stable sort by the requested field
    pub fn sort(records: &mut [InvestmentRecord], sort: SortSpec) {
        records.sort_by(|a, b| {
            let (a, b) = (sort.sort_key.value_of(a), sort.sort_key.value_of(b));
            let ordering = match sort.sort_order {
                SortOrder::Asc => a.partial_cmp(&b),
                SortOrder::Desc => b.partial_cmp(&a),
            };
            ordering.unwrap_or(Ordering::Equal)
        });
    }

    /// Filter then sort; ties keep their input order
    pub fn filter_and_sort(
        records: &[InvestmentRecord],
        criteria: &FilterCriteria,
        sort: SortSpec,
    ) -> Vec<InvestmentRecord> {
        let mut filtered = Self::filter(records, criteria);
        Self::sort(&mut filtered, sort);

        debug!(
            "FilterService::filter_and_sort - {} of {} records, by {} {:?}",
            filtered.len(),
            records.len(),
            sort.sort_key.as_str(),
            sort.sort_order
        );

        filtered
    }
}
