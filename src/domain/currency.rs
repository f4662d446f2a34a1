use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Conversion history is bounded; inserting past this evicts the oldest.
pub const MAX_CONVERSION_HISTORY: usize = 10;

/// Display metadata for the currencies the dashboard ships with.
/// Codes outside this table fall back to the raw code for both fields.
const CURRENCY_INFO: &[(&str, &str, &str)] = &[
    ("EUR", "Euro", "€"),
    ("USD", "US Dollar", "$"),
    ("GBP", "British Pound", "£"),
    ("JPY", "Japanese Yen", "¥"),
    ("CHF", "Swiss Franc", "Fr"),
    ("AUD", "Australian Dollar", "A$"),
    ("CAD", "Canadian Dollar", "C$"),
    ("PLN", "Polish Zloty", "zł"),
    ("SEK", "Swedish Krona", "kr"),
    ("NOK", "Norwegian Krone", "kr"),
];

pub fn currency_display(code: &str) -> (String, String) {
    CURRENCY_INFO
        .iter()
        .find(|(c, _, _)| *c == code)
        .map(|(_, name, symbol)| (name.to_string(), symbol.to_string()))
        .unwrap_or_else(|| (code.to_string(), code.to_string()))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyRate {
    pub code: String,
    pub name: String,
    pub symbol: String,
    /// Relative to the active base currency; the base itself carries 1.
    pub rate: Decimal,
}

/// Immutable record of one user-performed conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub from: String,
    pub to: String,
    pub amount: Decimal,
    pub result: Decimal,
    pub rate: Decimal,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyState {
    pub rates: HashMap<String, CurrencyRate>,
    pub base_currency: String,
    /// Most-recent-first, at most MAX_CONVERSION_HISTORY entries.
    pub conversions: Vec<ConversionResult>,
    pub loading: bool,
    pub error: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl Default for CurrencyState {
    fn default() -> Self {
        Self {
            rates: HashMap::new(),
            base_currency: "EUR".to_string(),
            conversions: Vec::new(),
            loading: false,
            error: None,
            last_updated: None,
        }
    }
}

impl CurrencyState {
    /// Replaces the active base identifier. Does not refetch; the caller
    /// decides when to trigger a new fetch.
    pub fn set_base_currency(&mut self, code: &str) {
        self.base_currency = code.to_string();
    }

    /// A fetch is in flight: mark loading and clear the previous error.
    pub fn begin_fetch(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Successful fetch: the table is fully replaced, never merged.
    /// A synthetic entry for the base (rate 1) is always present.
    pub fn apply_rates(&mut self, base: &str, fetched: HashMap<String, Decimal>) {
        self.loading = false;
        self.last_updated = Some(Utc::now());

        let mut rates = HashMap::with_capacity(fetched.len() + 1);
        let (name, symbol) = currency_display(base);
        rates.insert(
            base.to_string(),
            CurrencyRate {
                code: base.to_string(),
                name,
                symbol,
                rate: Decimal::ONE,
            },
        );

        for (code, rate) in fetched {
            let (name, symbol) = currency_display(&code);
            rates.insert(
                code.clone(),
                CurrencyRate {
                    code,
                    name,
                    symbol,
                    rate,
                },
            );
        }

        self.rates = rates;
    }

    /// Failed fetch: keep the previous table usable, record the message.
    pub fn fetch_failed(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
    }

    pub fn add_conversion(&mut self, result: ConversionResult) {
        self.conversions.insert(0, result);
        self.conversions.truncate(MAX_CONVERSION_HISTORY);
    }

    pub fn clear_conversions(&mut self) {
        self.conversions.clear();
    }

    pub fn rate_for(&self, code: &str) -> Option<&CurrencyRate> {
        self.rates.get(code)
    }
}
