use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub rates_url: String,
    pub rates_timeout_secs: u64,
    pub base_currency: String,
    pub sim_interval_ms: u64,
    pub sim_max_move_pct: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rates_url: "https://api.frankfurter.app".to_string(),
            rates_timeout_secs: 10,
            base_currency: "EUR".to_string(),
            sim_interval_ms: 2000,
            sim_max_move_pct: 0.02,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let rates_url = env::var("FINDASH_RATES_URL").unwrap_or(defaults.rates_url);

        let rates_timeout_secs = env::var("FINDASH_RATES_TIMEOUT_SECS")
            .unwrap_or_else(|_| defaults.rates_timeout_secs.to_string())
            .parse::<u64>()
            .context("Failed to parse FINDASH_RATES_TIMEOUT_SECS")?;

        let base_currency = env::var("FINDASH_BASE_CURRENCY")
            .unwrap_or(defaults.base_currency)
            .to_uppercase();

        let sim_interval_ms = env::var("FINDASH_SIM_INTERVAL_MS")
            .unwrap_or_else(|_| defaults.sim_interval_ms.to_string())
            .parse::<u64>()
            .context("Failed to parse FINDASH_SIM_INTERVAL_MS")?;

        let sim_max_move_pct = env::var("FINDASH_SIM_MAX_MOVE_PCT")
            .unwrap_or_else(|_| defaults.sim_max_move_pct.to_string())
            .parse::<f64>()
            .context("Failed to parse FINDASH_SIM_MAX_MOVE_PCT")?;

        Ok(Self {
            rates_url,
            rates_timeout_secs,
            base_currency,
            sim_interval_ms,
            sim_max_move_pct,
        })
    }
}
