use chrono::{DateTime, Duration, Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    Food,
    Transport,
    Entertainment,
    Shopping,
    Bills,
    Health,
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 7] = [
        ExpenseCategory::Food,
        ExpenseCategory::Transport,
        ExpenseCategory::Entertainment,
        ExpenseCategory::Shopping,
        ExpenseCategory::Bills,
        ExpenseCategory::Health,
        ExpenseCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Food => "food",
            ExpenseCategory::Transport => "transport",
            ExpenseCategory::Entertainment => "entertainment",
            ExpenseCategory::Shopping => "shopping",
            ExpenseCategory::Bills => "bills",
            ExpenseCategory::Health => "health",
            ExpenseCategory::Other => "other",
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpenseCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "food" => Ok(ExpenseCategory::Food),
            "transport" => Ok(ExpenseCategory::Transport),
            "entertainment" => Ok(ExpenseCategory::Entertainment),
            "shopping" => Ok(ExpenseCategory::Shopping),
            "bills" => Ok(ExpenseCategory::Bills),
            "health" => Ok(ExpenseCategory::Health),
            "other" => Ok(ExpenseCategory::Other),
            _ => anyhow::bail!("Invalid expense category: {}", s),
        }
    }
}

/// Category side of the view filter: everything, or one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryFilter {
    All,
    Only(ExpenseCategory),
}

impl CategoryFilter {
    fn matches(&self, category: ExpenseCategory) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(only) => *only == category,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    Week,
    Month,
    Year,
    All,
}

impl DateRange {
    /// Inclusive cutoff computed from `now`; None means no cutoff.
    fn cutoff(&self, now: DateTime<Utc>) -> Option<NaiveDate> {
        let today = now.date_naive();
        match self {
            DateRange::Week => Some(today - Duration::days(7)),
            DateRange::Month => Some(today.checked_sub_months(Months::new(1)).unwrap_or(NaiveDate::MIN)),
            DateRange::Year => Some(today.checked_sub_months(Months::new(12)).unwrap_or(NaiveDate::MIN)),
            DateRange::All => None,
        }
    }
}

impl FromStr for DateRange {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "week" => Ok(DateRange::Week),
            "month" => Ok(DateRange::Month),
            "year" => Ok(DateRange::Year),
            "all" => Ok(DateRange::All),
            _ => anyhow::bail!("Invalid date range: {}. Must be 'week', 'month', 'year' or 'all'", s),
        }
    }
}

/// Read-side predicate narrowing the displayed/aggregated expenses.
/// Not persisted with the expense records themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseFilter {
    pub category: CategoryFilter,
    pub date_range: DateRange,
}

impl Default for ExpenseFilter {
    fn default() -> Self {
        Self {
            category: CategoryFilter::All,
            date_range: DateRange::Month,
        }
    }
}

/// Typed patch: only the fields present are merged into the filter.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterPatch {
    pub category: Option<CategoryFilter>,
    pub date_range: Option<DateRange>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Generated at creation time, immutable thereafter.
    pub id: Uuid,
    pub amount: Decimal,
    pub category: ExpenseCategory,
    pub description: String,
    pub date: NaiveDate,
    pub currency: String,
}

/// Everything the caller supplies; the id is assigned by `add_expense`.
#[derive(Debug, Clone)]
pub struct ExpenseDraft {
    pub amount: Decimal,
    pub category: ExpenseCategory,
    pub description: String,
    pub date: NaiveDate,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseSummary {
    pub total: Decimal,
    /// Total divided by the number of distinct dates in the filtered view.
    pub daily_average: Decimal,
    pub transactions: usize,
    pub by_category: HashMap<ExpenseCategory, Decimal>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBreakdown {
    pub category: ExpenseCategory,
    pub amount: Decimal,
    pub percentage: Decimal,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpensesState {
    /// Most-recent-first.
    pub expenses: Vec<Expense>,
    pub filter: ExpenseFilter,
}

impl ExpensesState {
    /// Assigns a fresh id, prepends the record, and returns the id.
    pub fn add_expense(&mut self, draft: ExpenseDraft) -> Uuid {
        let id = Uuid::new_v4();
        self.expenses.insert(
            0,
            Expense {
                id,
                amount: draft.amount,
                category: draft.category,
                description: draft.description,
                date: draft.date,
                currency: draft.currency,
            },
        );
        id
    }

    /// No-op if no record carries the id.
    pub fn remove_expense(&mut self, id: Uuid) {
        self.expenses.retain(|expense| expense.id != id);
    }

    /// Replaces the record sharing the id; does NOT insert when absent.
    pub fn update_expense(&mut self, expense: Expense) {
        if let Some(slot) = self.expenses.iter_mut().find(|e| e.id == expense.id) {
            *slot = expense;
        }
    }

    /// Merges only the fields present in the patch.
    pub fn set_filter(&mut self, patch: FilterPatch) {
        if let Some(category) = patch.category {
            self.filter.category = category;
        }
        if let Some(date_range) = patch.date_range {
            self.filter.date_range = date_range;
        }
    }

    pub fn clear_expenses(&mut self) {
        self.expenses.clear();
    }

    /// Applies the active filter: category equality, then the date cutoff
    /// computed from `now`. Both predicates are conjunctive.
    pub fn filtered(&self, now: DateTime<Utc>) -> Vec<&Expense> {
        let cutoff = self.filter.date_range.cutoff(now);
        self.expenses
            .iter()
            .filter(|expense| self.filter.category.matches(expense.category))
            .filter(|expense| cutoff.is_none_or(|cutoff| expense.date >= cutoff))
            .collect()
    }

    pub fn summary(&self, now: DateTime<Utc>) -> ExpenseSummary {
        let filtered = self.filtered(now);

        let total: Decimal = filtered.iter().map(|e| e.amount).sum();

        let distinct_dates = filtered
            .iter()
            .map(|e| e.date)
            .collect::<std::collections::HashSet<_>>()
            .len();
        let daily_average = if filtered.is_empty() {
            Decimal::ZERO
        } else {
            total / Decimal::from(distinct_dates.max(1))
        };

        let mut by_category: HashMap<ExpenseCategory, Decimal> = HashMap::new();
        for expense in &filtered {
            *by_category.entry(expense.category).or_insert(Decimal::ZERO) += expense.amount;
        }

        ExpenseSummary {
            total,
            daily_average,
            transactions: filtered.len(),
            by_category,
        }
    }

    /// Per-category totals with their share of the filtered total,
    /// sorted by amount descending.
    pub fn category_breakdown(&self, now: DateTime<Utc>) -> Vec<CategoryBreakdown> {
        let summary = self.summary(now);
        let total = summary.total;

        let mut breakdown: Vec<CategoryBreakdown> = summary
            .by_category
            .into_iter()
            .map(|(category, amount)| CategoryBreakdown {
                category,
                amount,
                percentage: if total.is_zero() {
                    Decimal::ZERO
                } else {
                    amount / total * Decimal::ONE_HUNDRED
                },
            })
            .collect();
        breakdown.sort_by(|a, b| b.amount.cmp(&a.amount));
        breakdown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn draft(amount: Decimal, category: ExpenseCategory, date: NaiveDate) -> ExpenseDraft {
        ExpenseDraft {
            amount,
            category,
            description: "test".to_string(),
            date,
            currency: "EUR".to_string(),
        }
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    #[test]
    fn test_add_expense_assigns_distinct_ids_and_prepends() {
        let mut state = ExpensesState::default();
        let mut ids = Vec::new();
        for n in 1..=12 {
            ids.push(state.add_expense(draft(Decimal::from(n), ExpenseCategory::Food, today())));
        }

        assert_eq!(state.expenses.len(), 12);
        // Last added sits first
        assert_eq!(state.expenses[0].amount, Decimal::from(12));
        assert_eq!(state.expenses[0].id, ids[11]);

        let distinct = ids.iter().collect::<std::collections::HashSet<_>>();
        assert_eq!(distinct.len(), 12);
    }

    #[test]
    fn test_remove_expense_absent_id_is_a_no_op() {
        let mut state = ExpensesState::default();
        state.add_expense(draft(dec!(10), ExpenseCategory::Food, today()));
        state.add_expense(draft(dec!(20), ExpenseCategory::Bills, today()));
        let before = state.expenses.clone();

        state.remove_expense(Uuid::new_v4());

        assert_eq!(state.expenses, before);
    }

    #[test]
    fn test_remove_expense_by_id() {
        let mut state = ExpensesState::default();
        let keep = state.add_expense(draft(dec!(10), ExpenseCategory::Food, today()));
        let drop = state.add_expense(draft(dec!(20), ExpenseCategory::Bills, today()));

        state.remove_expense(drop);

        assert_eq!(state.expenses.len(), 1);
        assert_eq!(state.expenses[0].id, keep);
    }

    #[test]
    fn test_update_expense_replaces_matching_record() {
        let mut state = ExpensesState::default();
        let id = state.add_expense(draft(dec!(10), ExpenseCategory::Food, today()));

        let mut updated = state.expenses[0].clone();
        updated.amount = dec!(99.50);
        updated.description = "corrected".to_string();
        state.update_expense(updated);

        assert_eq!(state.expenses.len(), 1);
        assert_eq!(state.expenses[0].id, id);
        assert_eq!(state.expenses[0].amount, dec!(99.50));
        assert_eq!(state.expenses[0].description, "corrected");
    }

    #[test]
    fn test_update_expense_unknown_id_does_not_insert() {
        let mut state = ExpensesState::default();
        state.add_expense(draft(dec!(10), ExpenseCategory::Food, today()));

        state.update_expense(Expense {
            id: Uuid::new_v4(),
            amount: dec!(50),
            category: ExpenseCategory::Health,
            description: "phantom".to_string(),
            date: today(),
            currency: "EUR".to_string(),
        });

        assert_eq!(state.expenses.len(), 1);
        assert_eq!(state.expenses[0].amount, dec!(10));
    }

    #[test]
    fn test_set_filter_fields_are_independently_settable() {
        let mut state = ExpensesState::default();

        state.set_filter(FilterPatch {
            category: Some(CategoryFilter::Only(ExpenseCategory::Food)),
            ..Default::default()
        });
        state.set_filter(FilterPatch {
            date_range: Some(DateRange::Year),
            ..Default::default()
        });

        assert_eq!(
            state.filter.category,
            CategoryFilter::Only(ExpenseCategory::Food)
        );
        assert_eq!(state.filter.date_range, DateRange::Year);
    }

    #[test]
    fn test_set_filter_both_fields_at_once() {
        let mut state = ExpensesState::default();
        state.set_filter(FilterPatch {
            category: Some(CategoryFilter::Only(ExpenseCategory::Bills)),
            date_range: Some(DateRange::Week),
        });

        assert_eq!(
            state.filter.category,
            CategoryFilter::Only(ExpenseCategory::Bills)
        );
        assert_eq!(state.filter.date_range, DateRange::Week);
    }

    #[test]
    fn test_clear_expenses() {
        let mut state = ExpensesState::default();
        state.add_expense(draft(dec!(10), ExpenseCategory::Food, today()));
        state.clear_expenses();
        assert!(state.expenses.is_empty());
    }

    #[test]
    fn test_filtered_applies_category_and_date_conjunctively() {
        let now = Utc::now();
        let today = now.date_naive();
        let mut state = ExpensesState::default();
        state.add_expense(draft(dec!(10), ExpenseCategory::Food, today));
        state.add_expense(draft(dec!(20), ExpenseCategory::Food, today - Duration::days(10)));
        state.add_expense(draft(dec!(30), ExpenseCategory::Transport, today));

        state.set_filter(FilterPatch {
            category: Some(CategoryFilter::Only(ExpenseCategory::Food)),
            date_range: Some(DateRange::Week),
        });

        // Only the food expense within the last 7 days survives
        let filtered = state.filtered(now);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].amount, dec!(10));
    }

    #[test]
    fn test_filtered_date_ranges() {
        let now = Utc::now();
        let today = now.date_naive();
        let mut state = ExpensesState::default();
        state.add_expense(draft(dec!(1), ExpenseCategory::Food, today));
        state.add_expense(draft(dec!(2), ExpenseCategory::Food, today - Duration::days(10)));
        state.add_expense(draft(dec!(3), ExpenseCategory::Food, today - Duration::days(400)));

        state.set_filter(FilterPatch {
            date_range: Some(DateRange::Week),
            ..Default::default()
        });
        assert_eq!(state.filtered(now).len(), 1);

        state.set_filter(FilterPatch {
            date_range: Some(DateRange::Year),
            ..Default::default()
        });
        assert_eq!(state.filtered(now).len(), 2);

        state.set_filter(FilterPatch {
            date_range: Some(DateRange::All),
            ..Default::default()
        });
        assert_eq!(state.filtered(now).len(), 3);
    }

    #[test]
    fn test_summary_totals_and_daily_average() {
        let now = Utc::now();
        let today = now.date_naive();
        let mut state = ExpensesState::default();
        state.set_filter(FilterPatch {
            date_range: Some(DateRange::All),
            ..Default::default()
        });
        state.add_expense(draft(dec!(10.50), ExpenseCategory::Food, today));
        state.add_expense(draft(dec!(4.50), ExpenseCategory::Food, today));
        state.add_expense(draft(dec!(25.00), ExpenseCategory::Bills, today - Duration::days(1)));

        let summary = state.summary(now);
        assert_eq!(summary.total, dec!(40.00));
        assert_eq!(summary.transactions, 3);
        // 40.00 over 2 distinct dates
        assert_eq!(summary.daily_average, dec!(20.00));
        assert_eq!(summary.by_category[&ExpenseCategory::Food], dec!(15.00));
        assert_eq!(summary.by_category[&ExpenseCategory::Bills], dec!(25.00));
    }

    #[test]
    fn test_summary_empty_view() {
        let state = ExpensesState::default();
        let summary = state.summary(Utc::now());
        assert_eq!(summary.total, Decimal::ZERO);
        assert_eq!(summary.daily_average, Decimal::ZERO);
        assert_eq!(summary.transactions, 0);
        assert!(summary.by_category.is_empty());
    }

    #[test]
    fn test_category_breakdown_sorted_with_percentages() {
        let now = Utc::now();
        let today = now.date_naive();
        let mut state = ExpensesState::default();
        state.add_expense(draft(dec!(75), ExpenseCategory::Shopping, today));
        state.add_expense(draft(dec!(25), ExpenseCategory::Food, today));

        let breakdown = state.category_breakdown(now);
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].category, ExpenseCategory::Shopping);
        assert_eq!(breakdown[0].percentage, dec!(75));
        assert_eq!(breakdown[1].category, ExpenseCategory::Food);
        assert_eq!(breakdown[1].percentage, dec!(25));
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!(
            "food".parse::<ExpenseCategory>().unwrap(),
            ExpenseCategory::Food
        );
        assert_eq!(
            "Health".parse::<ExpenseCategory>().unwrap(),
            ExpenseCategory::Health
        );
        assert!("groceries".parse::<ExpenseCategory>().is_err());
    }
}
