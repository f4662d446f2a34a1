use crate::domain::ports::RateProvider;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::info;

pub const DEFAULT_RATES_URL: &str = "https://api.frankfurter.app";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    rates: HashMap<String, Decimal>,
}

/// Exchange rates from the free frankfurter.app API (no key required).
pub struct FrankfurterRateProvider {
    client: Client,
    base_url: String,
}

impl FrankfurterRateProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            base_url: base_url.into(),
        }
    }
}

impl Default for FrankfurterRateProvider {
    fn default() -> Self {
        Self::new(DEFAULT_RATES_URL, DEFAULT_TIMEOUT)
    }
}

#[async_trait]
impl RateProvider for FrankfurterRateProvider {
    async fn fetch_rates(&self, base: &str) -> anyhow::Result<HashMap<String, Decimal>> {
        info!("Fetching exchange rates from {} (base: {})", self.base_url, base);

        let response = self
            .client
            .get(format!("{}/latest", self.base_url))
            .query(&[("from", base)])
            .send()
            .await
            .context("Failed to send request to rate provider")?;

        if !response.status().is_success() {
            anyhow::bail!("Rate provider returned status: {}", response.status());
        }

        let body: LatestRatesResponse = response
            .json()
            .await
            .context("Failed to parse rate provider response")?;

        info!("Fetched {} rates for base {}", body.rates.len(), base);
        Ok(body.rates)
    }
}
