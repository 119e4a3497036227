//! Derived views over the full transaction set.
//!
//! Everything here is a pure function of a slice of transactions. The presenter
//! calls [DashboardSummary::from_transactions] after every store mutation rather
//! than caching anything. Sums saturate at `Decimal::MAX` instead of panicking.

use crate::models::transaction::{Transaction, TransactionType};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::collections::BTreeMap;

/// Total income minus total expense. Zero for no transactions.
pub fn total_balance(transactions: &[Transaction]) -> Decimal {
    transactions
        .iter()
        .fold(Decimal::ZERO, |acc, transaction| match transaction.transaction_type {
            TransactionType::Income => acc.saturating_add(transaction.amount),
            TransactionType::Expense => acc.saturating_sub(transaction.amount),
        })
}

/// Sum of amounts per transaction type. A type whose sum is zero is left out,
/// so an empty map means there is nothing to chart.
pub fn category_split(transactions: &[Transaction]) -> BTreeMap<TransactionType, Decimal> {
    let mut totals: BTreeMap<TransactionType, Decimal> = BTreeMap::new();
    for transaction in transactions {
        let total = totals.entry(transaction.transaction_type).or_insert(Decimal::ZERO);
        *total = total.saturating_add(transaction.amount);
    }

    totals.retain(|_, total| !total.is_zero());
    totals
}

/// Percentage of the combined total held by each entry of a [category_split].
pub fn category_shares(split: &BTreeMap<TransactionType, Decimal>) -> Vec<(TransactionType, f64)> {
    let total = split.values().fold(Decimal::ZERO, |acc, amount| acc.saturating_add(*amount));
    if total.is_zero() {
        return Vec::new();
    }

    split
        .iter()
        .map(|(transaction_type, amount)| {
            let share = amount
                .checked_div(total)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .and_then(|percent| percent.to_f64())
                .unwrap_or(0.0);
            (*transaction_type, share)
        })
        .collect()
}

/// Date ordered `(date, amount)` points for each transaction type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CashFlowSeries {
    pub income: Vec<(NaiveDate, Decimal)>,
    pub expense: Vec<(NaiveDate, Decimal)>,
}

impl CashFlowSeries {
    pub fn is_empty(&self) -> bool {
        self.income.is_empty() && self.expense.is_empty()
    }

    /// Earliest and latest date across both series.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let dates = self.income.iter().chain(self.expense.iter()).map(|(date, _)| *date);
        let min = dates.clone().min()?;
        let max = dates.max()?;
        Some((min, max))
    }

    pub fn max_amount(&self) -> Decimal {
        self.income
            .iter()
            .chain(self.expense.iter())
            .map(|(_, amount)| *amount)
            .max()
            .unwrap_or(Decimal::ZERO)
    }
}

/// Splits transactions by type and sorts each side by date. Transactions on the
/// same date keep their input (ID) order.
pub fn chronological_series(transactions: &[Transaction]) -> CashFlowSeries {
    let mut series = CashFlowSeries::default();
    for transaction in transactions {
        let point = (transaction.date, transaction.amount);
        match transaction.transaction_type {
            TransactionType::Income => series.income.push(point),
            TransactionType::Expense => series.expense.push(point),
        }
    }

    // Stable sort on the parsed date, never on the DD-MM-YYYY text.
    series.income.sort_by_key(|(date, _)| *date);
    series.expense.sort_by_key(|(date, _)| *date);
    series
}

/// Formats a balance the way the dashboard label shows it, e.g. `Total Balance: $600.00`.
pub fn format_balance(balance: Decimal) -> String {
    let rounded = balance.round_dp(2);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("Total Balance: -${:.2}", rounded.abs())
    } else {
        format!("Total Balance: ${:.2}", rounded.abs())
    }
}

/// Everything the dashboard shows, recomputed from scratch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSummary {
    pub balance: Decimal,
    pub split: BTreeMap<TransactionType, Decimal>,
    pub shares: Vec<(TransactionType, f64)>,
    pub series: CashFlowSeries,
}

impl DashboardSummary {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let split = category_split(transactions);
        let shares = category_shares(&split);
        Self {
            balance: total_balance(transactions),
            split,
            shares,
            series: chronological_series(transactions),
        }
    }

    pub fn balance_label(&self) -> String {
        format_balance(self.balance)
    }
}
