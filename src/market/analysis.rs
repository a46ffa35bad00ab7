//! Snapshot analysis for the dashboard landing view

use super::types::*;

/// How many records make the top recommendations list
pub const TOP_RECOMMENDATIONS: usize = 10;

/// Build the landing view from a snapshot
pub fn analyze_investments(records: &[InvestmentRecord]) -> InvestmentAnalysis {
    let mut top_recommendations = records.to_vec();
    top_recommendations.sort_by(|a, b| b.recommendation_score.cmp(&a.recommendation_score));
    top_recommendations.truncate(TOP_RECOMMENDATIONS);

    InvestmentAnalysis {
        investments: records.to_vec(),
        total_count: records.len(),
        top_recommendations,
        market_summary: MarketSummary {
            nasdaq_avg_return: average_ytd(records, Exchange::Nasdaq),
            nyse_avg_return: average_ytd(records, Exchange::Nyse),
            sp500_avg_return: average_ytd(records, Exchange::Sp500),
        },
    }
}

/// Mean YTD return over one exchange; unknown returns count as 0
fn average_ytd(records: &[InvestmentRecord], exchange: Exchange) -> f64 {
    let (sum, count) = records
        .iter()
        .filter(|r| r.exchange == exchange)
        .fold((0.0, 0usize), |(sum, count), r| {
            (sum + r.ytd_return.unwrap_or(0.0), count + 1)
        });

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
