//! Core transaction domain types.

use rust_decimal::Decimal;
use serde::Serialize;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::category::{Category, CategoryId};

/// Database identifier for a transaction.
pub type TransactionId = i64;

/// Whether a transaction records money earned or money spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TransactionKind {
    /// Money was earned.
    #[serde(rename = "INCOME")]
    Income,
    /// Money was spent.
    #[serde(rename = "EXPENSE")]
    Expense,
}

impl TransactionKind {
    /// The wire and storage representation of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "INCOME",
            TransactionKind::Expense => "EXPENSE",
        }
    }

    /// Parse the wire representation of a kind.
    ///
    /// Returns `None` for anything other than "INCOME" or "EXPENSE".
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "INCOME" => Some(TransactionKind::Income),
            "EXPENSE" => Some(TransactionKind::Expense),
            _ => None,
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned,
/// with its category resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// When the transaction happened.
    pub date: Date,
    /// The amount of money spent or earned, always non-negative; the kind
    /// says which way the money moved.
    pub amount: Decimal,
    /// Whether the transaction is an income or an expense.
    pub kind: TransactionKind,
    /// Optional free text describing the transaction.
    pub note: Option<String>,
    /// The category the transaction belongs to, if any.
    pub category: Option<Category>,
}

/// The field set for inserting a transaction.
///
/// Build with [NewTransaction::new] and the chainable setters for the
/// optional fields, then insert with
/// [crate::transaction::create_transaction].
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// When the transaction happened.
    pub date: Date,
    /// The amount of money spent or earned.
    pub amount: Decimal,
    /// Whether the transaction is an income or an expense.
    pub kind: TransactionKind,
    /// Optional free text describing the transaction.
    pub note: Option<String>,
    /// The category to attach the transaction to.
    pub category_id: Option<CategoryId>,
}

impl NewTransaction {
    /// Create the field set for a new transaction with no note and no
    /// category.
    pub fn new(date: Date, amount: Decimal, kind: TransactionKind) -> Self {
        Self {
            date,
            amount,
            kind,
            note: None,
            category_id: None,
        }
    }

    /// Set the note for the transaction.
    pub fn note(mut self, note: Option<String>) -> Self {
        self.note = note;
        self
    }

    /// Set the category for the transaction.
    pub fn category_id(mut self, category_id: Option<CategoryId>) -> Self {
        self.category_id = category_id;
        self
    }
}

/// A partial field set for updating a transaction.
///
/// `None` fields are left untouched. The doubled option on `category_id`
/// distinguishes "leave the category alone" (`None`) from "uncategorize"
/// (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionChanges {
    /// Replacement date.
    pub date: Option<Date>,
    /// Replacement amount.
    pub amount: Option<Decimal>,
    /// Replacement kind.
    pub kind: Option<TransactionKind>,
    /// Replacement note.
    pub note: Option<String>,
    /// Replacement category reference, where `Some(None)` clears it.
    pub category_id: Option<Option<CategoryId>>,
}

/// The JSON shape of a transaction returned by the API.
///
/// The date is rendered as `YYYY-MM-DD` and the amount as the exact decimal
/// string that was stored.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// When the transaction happened, as `YYYY-MM-DD`.
    pub date: String,
    /// The amount as a decimal string.
    pub amount: String,
    /// "INCOME" or "EXPENSE".
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Optional free text describing the transaction.
    pub note: Option<String>,
    /// The ID of the category the transaction belongs to, if any.
    pub category_id: Option<CategoryId>,
    /// The category the transaction belongs to, if any.
    pub category: Option<Category>,
}

impl From<Transaction> for TransactionResponse {
    fn from(transaction: Transaction) -> Self {
        Self {
            id: transaction.id,
            date: transaction.date.to_string(),
            amount: transaction.amount.to_string(),
            kind: transaction.kind,
            note: transaction.note,
            category_id: transaction.category.as_ref().map(|category| category.id),
            category: transaction.category,
        }
    }
}

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parse a calendar date from `YYYY-MM-DD`.
///
/// A trailing time-of-day portion (e.g. "2024-01-15T09:30:00Z") is tolerated
/// and ignored, since date inputs coerced from datetimes appear in practice.
/// Returns `None` for anything that is not a real calendar date.
pub(crate) fn parse_date(raw: &str) -> Option<Date> {
    let date_part = match raw.split_once('T') {
        Some((date_part, _)) => date_part,
        None => raw,
    };

    Date::parse(date_part, DATE_FORMAT).ok()
}


#[cfg(test)]
mod parse_date_tests {
    use time::macros::date;

    use super::parse_date;

    #[test]
    fn parses_a_calendar_date() {
        assert_eq!(parse_date("2024-01-15"), Some(date!(2024 - 01 - 15)));
    }

    #[test]
    fn tolerates_a_trailing_time_portion() {
        assert_eq!(
            parse_date("2024-01-15T09:30:00.000Z"),
            Some(date!(2024 - 01 - 15))
        );
    }

    #[test]
    fn rejects_invalid_dates() {
        for raw in ["", "2024", "2024-13-01", "2024-02-30", "15/01/2024", "yesterday"] {
            assert_eq!(parse_date(raw), None, "expected {raw:?} to be rejected");
        }
    }
}
