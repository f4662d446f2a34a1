//! Findash demo - headless dashboard tour
//!
//! Boots the state container, fetches live exchange rates, performs a
//! conversion, records a few expenses and lets the simulated market feed
//! run for a moment before printing the dashboard overview.
//!
//! # Usage
//! ```sh
//! FINDASH_BASE_CURRENCY=USD cargo run
//! ```
//!
//! # Environment Variables
//! - `FINDASH_RATES_URL` - Exchange-rate API base URL (default: frankfurter.app)
//! - `FINDASH_BASE_CURRENCY` - Base currency code (default: EUR)
//! - `FINDASH_SIM_INTERVAL_MS` - Simulated feed cadence (default: 2000)
//! - `FINDASH_SIM_MAX_MOVE_PCT` - Per-tick movement bound (default: 0.02)

use anyhow::Result;
use chrono::Utc;
use findash::application::overview;
use findash::application::simulator::PriceSimulator;
use findash::application::store::DashboardStore;
use findash::config::AppConfig;
use findash::domain::expenses::{ExpenseCategory, ExpenseDraft};
use findash::infrastructure::rates::FrankfurterRateProvider;
use findash::infrastructure::theme::ThemePersistence;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Level, info, warn};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Setup logging (stdout only)
    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false).pretty();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    info!("Findash {} starting...", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::from_env()?;
    info!(
        "Configuration loaded: base={}, rates_url={}, sim_interval={}ms",
        config.base_currency, config.rates_url, config.sim_interval_ms
    );

    // The single preference that survives restarts
    let theme_store = ThemePersistence::new()?;
    let theme = theme_store.load()?.unwrap_or_default();
    theme_store.save(theme)?;
    info!("Theme: {}", theme);

    // Wire the container against the live rate provider
    let provider = FrankfurterRateProvider::new(
        config.rates_url.clone(),
        Duration::from_secs(config.rates_timeout_secs),
    );
    let store = DashboardStore::new(Arc::new(provider));
    store.set_base_currency(&config.base_currency).await;

    // Rates: a failure is non-fatal, the error lives in state
    store.fetch_rates().await;
    match store.read(|s| s.currency.error.clone()).await {
        None => {
            let count = store.read(|s| s.currency.rates.len()).await;
            info!("Rate table ready ({} currencies)", count);
            match store.convert("USD", dec!(1000)).await {
                Ok(conversion) => info!(
                    "Converted {} {} -> {:.2} {} (rate {})",
                    conversion.amount, conversion.from, conversion.result, conversion.to, conversion.rate
                ),
                Err(err) => warn!("Conversion rejected: {}", err),
            }
        }
        Some(message) => warn!("Rates unavailable: {}", message),
    }

    // A couple of expenses for the overview numbers
    let today = Utc::now().date_naive();
    store
        .add_expense(ExpenseDraft {
            amount: dec!(14.20),
            category: ExpenseCategory::Food,
            description: "Lunch at cafe".to_string(),
            date: today,
            currency: config.base_currency.clone(),
        })
        .await;
    store
        .add_expense(ExpenseDraft {
            amount: dec!(42.90),
            category: ExpenseCategory::Bills,
            description: "Internet".to_string(),
            date: today,
            currency: config.base_currency.clone(),
        })
        .await;

    let summary = store.expense_summary().await;
    info!(
        "Expenses this month: {:.2} across {} transactions",
        summary.total, summary.transactions
    );

    // Let the simulated feed move the watched symbols for a few ticks
    let mut simulator = PriceSimulator::new(
        store.clone(),
        Duration::from_millis(config.sim_interval_ms),
        config.sim_max_move_pct,
    );
    simulator.sync().await;
    tokio::time::sleep(Duration::from_millis(config.sim_interval_ms * 3)).await;
    simulator.stop().await;

    for (symbol, price) in store.watched_prices().await {
        info!("{}: {}", symbol, price);
    }

    let snapshot = store.snapshot().await;
    let dashboard = overview::project(&snapshot, Utc::now());
    info!(
        "Overview: balance {:.2} {}, watchlist value {:.2}, spent today {:.2}",
        dashboard.balance_total,
        dashboard.balance_currency,
        dashboard.watchlist_value,
        dashboard.today_spending
    );

    info!("Done.");
    Ok(())
}
