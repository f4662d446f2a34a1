use crate::application::store::DashboardState;
use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;

const RECENT_EXPENSES: usize = 3;
const RECENT_CONVERSIONS: usize = 2;
const RECENT_ACTIVITY_CAP: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Expense,
    Conversion,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActivityEntry {
    pub kind: ActivityKind,
    pub label: String,
    pub amount: Decimal,
    pub time: DateTime<Utc>,
}

/// Cross-domain dashboard numbers. A read-only projection: it never
/// mutates any slice.
#[derive(Debug, Clone, PartialEq)]
pub struct OverviewSnapshot {
    pub balance_total: Decimal,
    pub balance_currency: String,
    pub today_spending: Decimal,
    pub monthly_spending: Decimal,
    /// Sum of current prices of watched symbols with a catalog row.
    pub watchlist_value: Decimal,
    pub recent_activity: Vec<ActivityEntry>,
}

pub fn project(state: &DashboardState, now: DateTime<Utc>) -> OverviewSnapshot {
    let today = now.date_naive();
    let month_start = today.with_day(1).unwrap_or(today);

    let today_spending = state
        .expenses
        .expenses
        .iter()
        .filter(|expense| expense.date == today)
        .map(|expense| expense.amount)
        .sum();

    let monthly_spending = state
        .expenses
        .expenses
        .iter()
        .filter(|expense| expense.date >= month_start)
        .map(|expense| expense.amount)
        .sum();

    let watchlist_value = state.stocks.watched().map(|stock| stock.price).sum();

    let mut recent_activity: Vec<ActivityEntry> = Vec::new();
    for expense in state.expenses.expenses.iter().take(RECENT_EXPENSES) {
        recent_activity.push(ActivityEntry {
            kind: ActivityKind::Expense,
            label: expense.description.clone(),
            amount: expense.amount,
            time: expense
                .date
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc())
                .unwrap_or(now),
        });
    }
    for conversion in state.currency.conversions.iter().take(RECENT_CONVERSIONS) {
        recent_activity.push(ActivityEntry {
            kind: ActivityKind::Conversion,
            label: format!("{} → {}", conversion.from, conversion.to),
            amount: conversion.result,
            time: conversion.timestamp,
        });
    }
    recent_activity.sort_by(|a, b| b.time.cmp(&a.time));
    recent_activity.truncate(RECENT_ACTIVITY_CAP);

    OverviewSnapshot {
        balance_total: state.user.balance.total,
        balance_currency: state.user.balance.currency.clone(),
        today_spending,
        monthly_spending,
        watchlist_value,
        recent_activity,
    }
}
