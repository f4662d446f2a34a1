use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    pub symbol: String,
    pub name: String,
    pub price: Decimal,
    /// Delta against the session's implied previous close
    /// (previous_price - previous_change), recomputed on every update.
    pub change: Decimal,
    pub change_percent: Decimal,
    /// Running session extremes. No day-boundary reset exists:
    /// high only ever rises, low only ever falls.
    pub high_24h: Decimal,
    pub low_24h: Decimal,
    pub volume: u64,
    pub last_update: DateTime<Utc>,
}

/// A reference into the stock catalog by symbol, not an owning copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistItem {
    pub symbol: String,
    pub added_at: DateTime<Utc>,
    pub alert_price: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StocksState {
    pub stocks: HashMap<String, Stock>,
    /// Symbols are unique within the watchlist.
    pub watchlist: Vec<WatchlistItem>,
    /// Display-only connectivity flag, driven by the simulator lifecycle.
    pub connected: bool,
}

fn seed(
    symbol: &str,
    name: &str,
    price: Decimal,
    change: Decimal,
    change_percent: Decimal,
    high_24h: Decimal,
    low_24h: Decimal,
    volume: u64,
) -> (String, Stock) {
    (
        symbol.to_string(),
        Stock {
            symbol: symbol.to_string(),
            name: name.to_string(),
            price,
            change,
            change_percent,
            high_24h,
            low_24h,
            volume,
            last_update: Utc::now(),
        },
    )
}

impl Default for StocksState {
    fn default() -> Self {
        let stocks = HashMap::from([
            seed("AAPL", "Apple Inc.", dec!(178.52), dec!(2.34), dec!(1.33), dec!(180.15), dec!(175.80), 52_400_000),
            seed("GOOGL", "Alphabet Inc.", dec!(141.28), dec!(-0.87), dec!(-0.61), dec!(143.20), dec!(140.10), 21_300_000),
            seed("MSFT", "Microsoft Corp.", dec!(378.91), dec!(4.21), dec!(1.12), dec!(381.50), dec!(374.30), 18_700_000),
            seed("AMZN", "Amazon.com Inc.", dec!(178.25), dec!(1.56), dec!(0.88), dec!(179.80), dec!(176.20), 32_100_000),
            seed("TSLA", "Tesla Inc.", dec!(248.50), dec!(-5.32), dec!(-2.10), dec!(255.80), dec!(245.10), 89_500_000),
            seed("BTC", "Bitcoin", dec!(43250.00), dec!(850.00), dec!(2.01), dec!(44100.00), dec!(42100.00), 28_500_000_000),
            seed("ETH", "Ethereum", dec!(2280.50), dec!(45.30), dec!(2.03), dec!(2320.00), dec!(2210.00), 12_300_000_000),
        ]);

        let watchlist = ["AAPL", "BTC", "TSLA"]
            .into_iter()
            .map(|symbol| WatchlistItem {
                symbol: symbol.to_string(),
                added_at: Utc::now(),
                alert_price: None,
            })
            .collect();

        Self {
            stocks,
            watchlist,
            connected: false,
        }
    }
}

impl StocksState {
    /// Empty catalog and watchlist; used by tests that want full control.
    pub fn empty() -> Self {
        Self {
            stocks: HashMap::new(),
            watchlist: Vec::new(),
            connected: false,
        }
    }

    /// Applies a new trade price. Unknown symbols are a silent no-op.
    ///
    /// The session's original reference close is preserved implicitly:
    /// previous_close = previous_price - previous_change, so chained
    /// updates keep measuring change against the same close.
    pub fn update_stock_price(&mut self, symbol: &str, price: Decimal) {
        let Some(stock) = self.stocks.get_mut(symbol) else {
            return;
        };

        let previous_close = stock.price - stock.change;
        let change = price - previous_close;
        let change_percent = if previous_close.is_zero() {
            Decimal::ZERO
        } else {
            change / previous_close * Decimal::ONE_HUNDRED
        };

        stock.price = price;
        stock.change = change;
        stock.change_percent = change_percent;
        stock.high_24h = stock.high_24h.max(price);
        stock.low_24h = stock.low_24h.min(price);
        stock.last_update = Utc::now();
    }

    /// Idempotent: adding a symbol twice leaves a single entry.
    pub fn add_to_watchlist(&mut self, symbol: &str) {
        if self.watchlist.iter().any(|item| item.symbol == symbol) {
            return;
        }
        self.watchlist.push(WatchlistItem {
            symbol: symbol.to_string(),
            added_at: Utc::now(),
            alert_price: None,
        });
    }

    pub fn remove_from_watchlist(&mut self, symbol: &str) {
        self.watchlist.retain(|item| item.symbol != symbol);
    }

    /// Sets or clears the alert on an existing entry; no-op if absent.
    pub fn set_alert_price(&mut self, symbol: &str, alert_price: Option<Decimal>) {
        if let Some(item) = self.watchlist.iter_mut().find(|item| item.symbol == symbol) {
            item.alert_price = alert_price;
        }
    }

    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    pub fn is_watched(&self, symbol: &str) -> bool {
        self.watchlist.iter().any(|item| item.symbol == symbol)
    }

    /// Watched entries resolved against the catalog; entries whose symbol
    /// has no catalog row are skipped.
    pub fn watched(&self) -> impl Iterator<Item = &Stock> {
        self.watchlist
            .iter()
            .filter_map(|item| self.stocks.get(&item.symbol))
    }
}
