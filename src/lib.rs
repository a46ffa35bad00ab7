//! Rise Advisor - Investment Dashboard Core
//!
//! Investment records with search, filters and sorting, a bounded comparison
//! set, and a locally persisted watchlist and preference store.

pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod market;
pub mod services;
pub mod state;
pub mod store;

use config::AppConfig;
use state::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rise_advisor=debug,rise_advisor_lib=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Initialize the application and log a market overview
pub async fn run() -> anyhow::Result<()> {
    init_logging();

    tracing::info!("Starting Rise Advisor...");

    let config = AppConfig::from_env()?;
    let app_state = AppState::new(config)?;

    tracing::info!("Application state initialized");

    let records = if app_state.provider.is_some() {
        commands::market::refresh_investments(&app_state).await?
    } else {
        commands::market::load_investments(&app_state)?
    };

    let analysis = commands::market::get_analysis(&app_state)?;
    let summary = &analysis.market_summary;
    tracing::info!(
        "Market summary over {} records: NASDAQ {:.2}%, NYSE {:.2}%, S&P 500 {:.2}%",
        records.len(),
        summary.nasdaq_avg_return,
        summary.nyse_avg_return,
        summary.sp500_avg_return
    );

    for record in analysis.top_recommendations.iter().take(3) {
        tracing::info!(
            "Top pick {} ({}) score {}",
            record.symbol,
            record.recommendation,
            record.recommendation_score
        );
    }

    let watchlist = commands::watchlist::get_watchlist(&app_state)?;
    tracing::info!("Watchlist has {} symbols", watchlist.len());

    Ok(())
}
