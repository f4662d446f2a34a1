use crate::application::store::DashboardStore;
use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::info;

/// Simulated market feed: a lifecycle-scoped controller that perturbs
/// every watched symbol's price once per interval with a bounded random
/// walk. Stands in for a real transport; the `connected` flag it drives
/// is display-only.
pub struct PriceSimulator {
    store: DashboardStore,
    interval: Duration,
    /// Per-tick price movement bound: u is drawn from [-bound, +bound]
    /// and the new price is price * (1 + u), rounded to 2 decimals.
    max_move_pct: f64,
    handle: Option<JoinHandle<()>>,
}

impl PriceSimulator {
    pub fn new(store: DashboardStore, interval: Duration, max_move_pct: f64) -> Self {
        Self {
            store,
            interval,
            max_move_pct,
            handle: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Idempotent. Flips `connected` on and spawns the tick task.
    pub async fn start(&mut self) {
        if self.is_running() {
            return;
        }

        self.store.set_connected(true).await;

        let store = self.store.clone();
        let period = self.interval;
        let max_move = self.max_move_pct;

        info!("Price simulator started (interval: {:?})", period);

        self.handle = Some(tokio::spawn(async move {
            let mut ticker = time::interval(period);
            loop {
                ticker.tick().await;

                let watched = store.watched_prices().await;
                // Draw all moves before touching the store again; the rng
                // must not be held across an await.
                let updates: Vec<(String, Decimal)> = {
                    let mut rng = rand::rng();
                    watched
                        .into_iter()
                        .filter_map(|(symbol, price)| {
                            let drift = rng.random_range(-max_move..=max_move);
                            let moved = price.to_f64().unwrap_or(0.0) * (1.0 + drift);
                            Decimal::from_f64(moved).map(|p| (symbol, p.round_dp(2)))
                        })
                        .collect()
                };

                for (symbol, price) in updates {
                    store.update_stock_price(&symbol, price).await;
                }
            }
        }));
    }

    /// Aborts the tick task and flips `connected` off. Each tick applies
    /// its updates synchronously, so there is nothing in flight to drain.
    pub async fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            info!("Price simulator stopped");
        }
        self.store.set_connected(false).await;
    }

    /// Keys the feed on watchlist emptiness: running while anything is
    /// watched, stopped otherwise.
    pub async fn sync(&mut self) {
        let watching = self.store.read(|state| !state.stocks.watchlist.is_empty()).await;
        if watching {
            self.start().await;
        } else if self.is_running() {
            self.stop().await;
        }
    }
}

impl Drop for PriceSimulator {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mock::StaticRateProvider;
    use std::sync::Arc;

    fn store() -> DashboardStore {
        DashboardStore::new(Arc::new(StaticRateProvider::eur_demo()))
    }

    #[tokio::test]
    async fn test_start_sets_connected_and_stop_clears_it() {
        let store = store();
        let mut sim = PriceSimulator::new(store.clone(), Duration::from_millis(10), 0.02);

        sim.start().await;
        assert!(sim.is_running());
        assert!(store.read(|s| s.stocks.connected).await);

        sim.stop().await;
        assert!(!sim.is_running());
        assert!(!store.read(|s| s.stocks.connected).await);
    }

    #[tokio::test]
    async fn test_start_is_idempotent() {
        let store = store();
        let mut sim = PriceSimulator::new(store, Duration::from_millis(10), 0.02);

        sim.start().await;
        sim.start().await;
        assert!(sim.is_running());
        sim.stop().await;
    }

    #[tokio::test]
    async fn test_sync_follows_watchlist_emptiness() {
        let store = store();
        let mut sim = PriceSimulator::new(store.clone(), Duration::from_millis(10), 0.02);

        // Default watchlist is non-empty
        sim.sync().await;
        assert!(sim.is_running());

        for symbol in ["AAPL", "BTC", "TSLA"] {
            store.remove_from_watchlist(symbol).await;
        }
        sim.sync().await;
        assert!(!sim.is_running());
        assert!(!store.read(|s| s.stocks.connected).await);
    }

    #[tokio::test]
    async fn test_ticks_move_watched_prices_within_bounds() {
        let store = store();
        let before = store.snapshot().await;
        let watched = store.watched_prices().await;
        assert!(!watched.is_empty());

        let mut sim = PriceSimulator::new(store.clone(), Duration::from_millis(5), 0.02);
        sim.start().await;
        tokio::time::sleep(Duration::from_millis(60)).await;
        sim.stop().await;

        let snapshot = store.snapshot().await;
        let mut moved = false;
        for (symbol, old_price) in watched {
            let old = &before.stocks.stocks[&symbol];
            let stock = &snapshot.stocks.stocks[&symbol];
            moved |= stock.price != old_price;
            // Rounded to cents
            assert_eq!(stock.price, stock.price.round_dp(2));
            // Running extremes only ever widen
            assert!(stock.high_24h >= old.high_24h);
            assert!(stock.low_24h <= old.low_24h);
            assert!(stock.high_24h >= stock.price);
            assert!(stock.low_24h <= stock.price);
            // A handful of ±2% steps cannot stray far from the start
            let ratio = (stock.price / old_price).to_f64().unwrap_or(0.0);
            assert!(ratio > 0.5 && ratio < 1.5, "{} drifted too far", symbol);
        }
        assert!(moved, "no watched price moved across several ticks");
    }

    #[tokio::test]
    async fn test_unwatched_symbols_are_untouched() {
        let store = store();
        let msft_before = store.read(|s| s.stocks.stocks["MSFT"].clone()).await;

        let mut sim = PriceSimulator::new(store.clone(), Duration::from_millis(5), 0.02);
        sim.start().await;
        tokio::time::sleep(Duration::from_millis(40)).await;
        sim.stop().await;

        let msft_after = store.read(|s| s.stocks.stocks["MSFT"].clone()).await;
        assert_eq!(msft_before, msft_after);
    }
}
