//! Transaction data aggregation for the statistics endpoints.
//!
//! All sums run on [rust_decimal::Decimal]. Formatting to display strings
//! happens at the API boundary, never inside the aggregation.

use std::collections::HashMap;

use rust_decimal::Decimal;
use time::Date;

use crate::transaction::TransactionKind;

/// A minimal transaction view for aggregation.
///
/// This is separate from the main Transaction domain model because the
/// statistics only need the date, amount and kind.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct AmountEntry {
    /// When the transaction happened.
    pub date: Date,
    /// The non-negative amount of the transaction.
    pub amount: Decimal,
    /// Whether the transaction is an income or an expense.
    pub kind: TransactionKind,
}

/// Overall totals across all transactions.
#[derive(Debug, PartialEq)]
pub(super) struct Summary {
    /// Sum of all income amounts.
    pub income: Decimal,
    /// Sum of all expense amounts.
    pub expense: Decimal,
    /// Income minus expense.
    pub balance: Decimal,
}

/// Sum income and expense amounts and derive the balance.
pub(super) fn summarize(entries: &[AmountEntry]) -> Summary {
    let mut income = Decimal::ZERO;
    let mut expense = Decimal::ZERO;

    for entry in entries {
        match entry.kind {
            TransactionKind::Income => income += entry.amount,
            TransactionKind::Expense => expense += entry.amount,
        }
    }

    Summary {
        income,
        expense,
        balance: income - expense,
    }
}

/// Income and expense totals for one calendar month.
#[derive(Debug, PartialEq)]
pub(super) struct MonthTotals {
    /// The month, as a date pinned to the first day.
    pub month: Date,
    /// Sum of the month's income amounts.
    pub income: Decimal,
    /// Sum of the month's expense amounts.
    pub expense: Decimal,
}

/// The maximum number of months returned by the monthly series.
pub(super) const MONTHLY_SERIES_LENGTH: usize = 12;

/// Aggregate income and expense per calendar month.
///
/// Returns the most recent [MONTHLY_SERIES_LENGTH] months that contain at
/// least one transaction, in chronological order. Months without
/// transactions are omitted rather than zero-filled.
pub(super) fn monthly_series(entries: &[AmountEntry]) -> Vec<MonthTotals> {
    let mut totals: HashMap<Date, (Decimal, Decimal)> = HashMap::new();

    for entry in entries {
        let month = entry.date.replace_day(1).unwrap();
        let (income, expense) = totals.entry(month).or_insert((Decimal::ZERO, Decimal::ZERO));

        match entry.kind {
            TransactionKind::Income => *income += entry.amount,
            TransactionKind::Expense => *expense += entry.amount,
        }
    }

    let mut months: Vec<Date> = totals.keys().copied().collect();
    months.sort();

    let skip = months.len().saturating_sub(MONTHLY_SERIES_LENGTH);
    months
        .into_iter()
        .skip(skip)
        .map(|month| {
            let (income, expense) = totals[&month];
            MonthTotals {
                month,
                income,
                expense,
            }
        })
        .collect()
}

/// Format a month as `YYYY-MM`.
pub(super) fn format_month(month: Date) -> String {
    format!("{:04}-{:02}", month.year(), month.month() as u8)
}
