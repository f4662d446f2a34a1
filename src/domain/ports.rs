use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// External exchange-rate source, keyed by base currency code.
/// The returned map is code -> rate relative to that base; the base
/// entry itself is synthesized by the currency state on apply.
#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_rates(&self, base: &str) -> Result<HashMap<String, Decimal>>;
}
