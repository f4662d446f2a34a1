use crate::domain::currency::{ConversionResult, CurrencyState};
use crate::domain::errors::ConversionError;
use crate::domain::expenses::{ExpenseDraft, ExpenseSummary, ExpensesState, FilterPatch};
use crate::domain::ports::RateProvider;
use crate::domain::stocks::StocksState;
use crate::domain::user::{BalancePatch, ProfilePatch, SettingsPatch, UserState};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

/// The whole dashboard state. Each slice is exclusively owned here;
/// consumers read snapshots or projections, never references that
/// outlive the lock.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardState {
    pub currency: CurrencyState,
    pub stocks: StocksState,
    pub expenses: ExpensesState,
    pub user: UserState,
}

/// Explicit state container owned by the composition root. Every
/// transition runs under the write lock, so updates are serialized and
/// no partial state is ever observable. Cloning shares the same state.
#[derive(Clone)]
pub struct DashboardStore {
    state: Arc<RwLock<DashboardState>>,
    rates: Arc<dyn RateProvider>,
}

impl DashboardStore {
    pub fn new(rates: Arc<dyn RateProvider>) -> Self {
        Self::with_state(DashboardState::default(), rates)
    }

    pub fn with_state(state: DashboardState, rates: Arc<dyn RateProvider>) -> Self {
        Self {
            state: Arc::new(RwLock::new(state)),
            rates,
        }
    }

    /// Read projection under the read lock.
    pub async fn read<R>(&self, f: impl FnOnce(&DashboardState) -> R) -> R {
        let state = self.state.read().await;
        f(&state)
    }

    pub async fn snapshot(&self) -> DashboardState {
        self.state.read().await.clone()
    }

    // ---- currency ----

    /// Changes the base identifier only; callers decide when to refetch.
    pub async fn set_base_currency(&self, code: &str) {
        self.state.write().await.currency.set_base_currency(code);
    }

    /// Fetches rates for the current base and applies the outcome.
    ///
    /// Overlapping fetches are not fenced: whichever response resolves
    /// last wins. Fetches are driven by discrete user actions, so the
    /// race is acceptable; a sequence guard would slot in here if that
    /// ever changes.
    pub async fn fetch_rates(&self) {
        let base = {
            let mut state = self.state.write().await;
            state.currency.begin_fetch();
            state.currency.base_currency.clone()
        };

        match self.rates.fetch_rates(&base).await {
            Ok(rates) => {
                let count = rates.len();
                let mut state = self.state.write().await;
                state.currency.apply_rates(&base, rates);
                info!("Applied {} exchange rates (base: {})", count + 1, base);
            }
            Err(err) => {
                let message = err.to_string();
                warn!("Rate fetch failed for base {}: {}", base, message);
                self.state.write().await.currency.fetch_failed(message);
            }
        }
    }

    /// Converts `amount` of the base currency into `to` using the active
    /// table and records the result in the bounded history.
    pub async fn convert(
        &self,
        to: &str,
        amount: Decimal,
    ) -> Result<ConversionResult, ConversionError> {
        if amount <= Decimal::ZERO {
            return Err(ConversionError::NonPositiveAmount { amount });
        }

        let mut state = self.state.write().await;
        let rate = state
            .currency
            .rate_for(to)
            .map(|entry| entry.rate)
            .ok_or_else(|| ConversionError::UnknownCurrency {
                code: to.to_string(),
            })?;

        let record = ConversionResult {
            from: state.currency.base_currency.clone(),
            to: to.to_string(),
            amount,
            result: amount * rate,
            rate,
            timestamp: Utc::now(),
        };
        state.currency.add_conversion(record.clone());
        Ok(record)
    }

    pub async fn add_conversion(&self, result: ConversionResult) {
        self.state.write().await.currency.add_conversion(result);
    }

    pub async fn clear_conversions(&self) {
        self.state.write().await.currency.clear_conversions();
    }

    // ---- stocks ----

    pub async fn update_stock_price(&self, symbol: &str, price: Decimal) {
        self.state.write().await.stocks.update_stock_price(symbol, price);
    }

    pub async fn add_to_watchlist(&self, symbol: &str) {
        self.state.write().await.stocks.add_to_watchlist(symbol);
    }

    pub async fn remove_from_watchlist(&self, symbol: &str) {
        self.state.write().await.stocks.remove_from_watchlist(symbol);
    }

    pub async fn set_alert_price(&self, symbol: &str, alert_price: Option<Decimal>) {
        self.state.write().await.stocks.set_alert_price(symbol, alert_price);
    }

    pub async fn set_connected(&self, connected: bool) {
        self.state.write().await.stocks.set_connected(connected);
    }

    /// Current price of every watched symbol that has a catalog row.
    pub async fn watched_prices(&self) -> Vec<(String, Decimal)> {
        self.read(|state| {
            state
                .stocks
                .watched()
                .map(|stock| (stock.symbol.clone(), stock.price))
                .collect()
        })
        .await
    }

    // ---- expenses ----

    pub async fn add_expense(&self, draft: ExpenseDraft) -> Uuid {
        self.state.write().await.expenses.add_expense(draft)
    }

    pub async fn remove_expense(&self, id: Uuid) {
        self.state.write().await.expenses.remove_expense(id);
    }

    pub async fn update_expense(&self, expense: crate::domain::expenses::Expense) {
        self.state.write().await.expenses.update_expense(expense);
    }

    pub async fn set_expense_filter(&self, patch: FilterPatch) {
        self.state.write().await.expenses.set_filter(patch);
    }

    pub async fn clear_expenses(&self) {
        self.state.write().await.expenses.clear_expenses();
    }

    pub async fn expense_summary(&self) -> ExpenseSummary {
        let now = Utc::now();
        self.read(|state| state.expenses.summary(now)).await
    }

    // ---- user ----

    pub async fn update_profile(&self, patch: ProfilePatch) {
        self.state.write().await.user.update_profile(patch);
    }

    pub async fn update_balance(&self, patch: BalancePatch) {
        self.state.write().await.user.update_balance(patch);
    }

    pub async fn update_settings(&self, patch: SettingsPatch) {
        self.state.write().await.user.update_settings(patch);
    }
}
