//! Comparison Service
//!
//! Bounded side-by-side selection and the metric table rendered for it.

use crate::market::types::InvestmentRecord;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Maximum number of records compared at once
pub const MAX_COMPARISON: usize = 4;

/// Result of offering a record to the comparison set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
    /// Set already holds [`MAX_COMPARISON`] records; nothing was evicted
    Full,
}

/// Ordered selection of distinct symbols plus panel visibility
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonSet {
    symbols: Vec<String>,
    visible: bool,
}

impl ComparisonSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.symbols.len() >= MAX_COMPARISON
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s == symbol)
    }

    pub fn add(&mut self, record: &InvestmentRecord) -> AddOutcome {
        if self.is_full() {
            warn!(
                "Comparison full ({} of {}), rejected {}",
                self.len(),
                MAX_COMPARISON,
                record.symbol
            );
            return AddOutcome::Full;
        }
        if self.contains(&record.symbol) {
            return AddOutcome::AlreadyPresent;
        }

        self.symbols.push(record.symbol.clone());
        self.visible = true;
        debug!("Added {} to comparison ({})", record.symbol, self.len());
        AddOutcome::Added
    }

    /// Returns whether the symbol was present
    pub fn remove(&mut self, symbol: &str) -> bool {
        let before = self.symbols.len();
        self.symbols.retain(|s| s != symbol);
        let removed = self.symbols.len() != before;

        if self.symbols.is_empty() {
            self.visible = false;
        }
        removed
    }

    pub fn clear(&mut self) {
        self.symbols.clear();
        self.visible = false;
    }

    /// Flip the Show/Hide state; an empty set stays hidden
    pub fn toggle_visibility(&mut self) -> bool {
        self.visible = !self.visible && !self.symbols.is_empty();
        self.visible
    }

    /// Selected records resolved against `records`, in selection order
    ///
    /// Symbols missing from the snapshot are skipped.
    pub fn resolve<'a>(&self, records: &'a [InvestmentRecord]) -> Vec<&'a InvestmentRecord> {
        self.symbols
            .iter()
            .filter_map(|symbol| records.iter().find(|r| &r.symbol == symbol))
            .collect()
    }

    pub fn table(&self, records: &[InvestmentRecord]) -> ComparisonTable {
        ComparisonService::build_table(&self.resolve(records))
    }
}

/// One metric across every compared record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub metric: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonTable {
    pub symbols: Vec<String>,
    pub rows: Vec<ComparisonRow>,
}

/// Comparison service for table formatting
pub struct ComparisonService;

impl ComparisonService {
    pub fn build_table(selected: &[&InvestmentRecord]) -> ComparisonTable {
        let rows = vec![
            Self::row("Name", selected, |r| r.name.clone()),
            Self::row("Current Price", selected, |r| format!("${:.2}", r.current_price)),
            Self::row("Change %", selected, |r| Self::signed_percent(r.change_percent)),
            Self::row("YTD Return", selected, |r| Self::optional_percent(r.ytd_return)),
            Self::row("1 Year Return", selected, |r| Self::optional_percent(r.one_year_return)),
            Self::row("Dividend Yield", selected, |r| Self::optional_percent(r.dividend_yield)),
            Self::row("Risk Level", selected, |r| r.risk_level.to_string()),
            Self::row("Recommendation", selected, |r| r.recommendation.to_string()),
            Self::row("Recommendation Score", selected, |r| {
                format!("{}/100", r.recommendation_score)
            }),
        ];

        ComparisonTable {
            symbols: selected.iter().map(|r| r.symbol.clone()).collect(),
            rows,
        }
    }

    fn row(
        metric: &str,
        selected: &[&InvestmentRecord],
        cell: impl Fn(&InvestmentRecord) -> String,
    ) -> ComparisonRow {
        ComparisonRow {
            metric: metric.to_string(),
            values: selected.iter().map(|&r| cell(r)).collect(),
        }
    }

    fn signed_percent(value: f64) -> String {
        if value >= 0.0 {
            format!("+{:.2}%", value)
        } else {
            format!("{:.2}%", value)
        }
    }

    fn optional_percent(value: Option<f64>) -> String {
        value
            .map(|v| format!("{:.2}%", v))
            .unwrap_or_else(|| "N/A".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::mock::MockRecordSource;
    use crate::market::RecordSource;

    fn catalog() -> Vec<InvestmentRecord> {
        MockRecordSource::seeded(21).load().unwrap()
    }

    #[test]
    fn test_duplicate_add_ignored() {
        let records = catalog();
        let mut set = ComparisonSet::new();

        assert_eq!(set.add(&records[0]), AddOutcome::Added);
        assert_eq!(set.add(&records[1]), AddOutcome::Added);
        assert_eq!(set.add(&records[0]), AddOutcome::AlreadyPresent);

        assert_eq!(set.symbols(), &[records[0].symbol.clone(), records[1].symbol.clone()]);
        assert!(set.is_visible());
    }

    #[test]
    fn test_capacity_never_exceeded() {
        let records = catalog();
        let mut set = ComparisonSet::new();

        for record in &records {
            set.add(record);
            assert!(set.len() <= MAX_COMPARISON);
        }
        assert_eq!(set.len(), MAX_COMPARISON);
        assert_eq!(set.add(&records[11]), AddOutcome::Full);
        // No eviction: the first four stay
        assert_eq!(set.symbols()[0], records[0].symbol);
    }

    #[test]
    fn test_remove_last_hides_panel() {
        let records = catalog();
        let mut set = ComparisonSet::new();
        set.add(&records[0]);

        assert!(!set.remove("ZZZ"));
        assert!(set.is_visible());

        assert!(set.remove(&records[0].symbol));
        assert!(set.is_empty());
        assert!(!set.is_visible());

        assert_eq!(set.add(&records[2]), AddOutcome::Added);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_clear_and_toggle() {
        let records = catalog();
        let mut set = ComparisonSet::new();
        assert!(!set.toggle_visibility());

        set.add(&records[0]);
        assert!(!set.toggle_visibility());
        assert!(set.toggle_visibility());

        set.clear();
        assert!(set.is_empty());
        assert!(!set.is_visible());
    }

    #[test]
    fn test_table_formats_cells() {
        let mut records = catalog();
        records[1].ytd_return = None;
        records[1].change_percent = -1.5;
        records[0].change_percent = 0.25;

        let mut set = ComparisonSet::new();
        set.add(&records[0]);
        set.add(&records[1]);
        let table = set.table(&records);

        assert_eq!(table.symbols, vec!["QQQ".to_string(), "TECL".to_string()]);
        assert_eq!(table.rows.len(), 9);

        let change = &table.rows[2];
        assert_eq!(change.metric, "Change %");
        assert_eq!(change.values, vec!["+0.25%".to_string(), "-1.50%".to_string()]);

        let ytd = &table.rows[3];
        assert_eq!(ytd.values[0], "42.30%");
        assert_eq!(ytd.values[1], "N/A");

        assert_eq!(table.rows[8].values[0], "92/100");
    }

    #[test]
    fn test_table_skips_symbols_missing_from_snapshot() {
        let records = catalog();
        let mut set = ComparisonSet::new();
        set.add(&records[0]);
        set.add(&records[4]);

        let snapshot: Vec<InvestmentRecord> = records[1..].to_vec();
        let table = set.table(&snapshot);
        assert_eq!(table.symbols, vec!["SPY".to_string()]);
        assert!(table.rows.iter().all(|r| r.values.len() == 1));
    }
}
