use crate::domain::ports::RateProvider;
use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

/// In-memory rate source for tests and the offline demo path.
pub struct StaticRateProvider {
    rates: HashMap<String, Decimal>,
}

impl StaticRateProvider {
    pub fn new(rates: HashMap<String, Decimal>) -> Self {
        Self { rates }
    }

    /// A small EUR-based table matching the dashboard's shipped currencies.
    pub fn eur_demo() -> Self {
        Self::new(HashMap::from([
            ("USD".to_string(), dec!(1.0785)),
            ("GBP".to_string(), dec!(0.8561)),
            ("JPY".to_string(), dec!(161.92)),
            ("CHF".to_string(), dec!(0.9403)),
        ]))
    }
}

#[async_trait]
impl RateProvider for StaticRateProvider {
    async fn fetch_rates(&self, _base: &str) -> anyhow::Result<HashMap<String, Decimal>> {
        Ok(self.rates.clone())
    }
}

/// Always fails with the configured message; exercises the error path.
pub struct FailingRateProvider {
    message: String,
}

impl FailingRateProvider {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl RateProvider for FailingRateProvider {
    async fn fetch_rates(&self, _base: &str) -> anyhow::Result<HashMap<String, Decimal>> {
        anyhow::bail!("{}", self.message)
    }
}
