//! Filter composition for the transaction list endpoint.

use serde::Deserialize;
use time::Date;

use crate::{
    Error, FieldError,
    category::CategoryId,
    transaction::{TransactionKind, domain::parse_date},
};

/// The raw query parameters of the transaction list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionListQuery {
    /// Keep only transactions of this kind ("INCOME" or "EXPENSE").
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Keep only transactions in this category.
    #[serde(rename = "categoryId")]
    pub category_id: Option<String>,
    /// Keep only transactions on or after this date.
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    /// Keep only transactions on or before this date.
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
    /// Keep only transactions whose note or category name contains this text.
    pub search: Option<String>,
}

/// The composed predicate for listing transactions.
///
/// Every present field must match for a transaction to be included.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    /// Keep only transactions of this kind.
    pub kind: Option<TransactionKind>,
    /// Keep only transactions in this category.
    pub category_id: Option<CategoryId>,
    /// Inclusive lower bound on the date.
    pub start_date: Option<Date>,
    /// Inclusive upper bound on the date.
    pub end_date: Option<Date>,
    /// Case-insensitive text matched against the note or category name.
    pub search: Option<String>,
}

impl TransactionFilter {
    /// Build a filter from raw query parameters.
    ///
    /// Unknown `type` values and non-numeric `categoryId` values are dropped
    /// rather than rejected, and empty parameters are treated as absent.
    /// Malformed dates are rejected so a bad range cannot silently match
    /// everything.
    ///
    /// # Errors
    /// Returns an [Error::Validation] naming each malformed date parameter.
    pub fn from_query(query: TransactionListQuery) -> Result<Self, Error> {
        let mut details = Vec::new();

        let kind = query
            .kind
            .as_deref()
            .filter(|raw| !raw.is_empty())
            .and_then(TransactionKind::parse);

        let category_id = query
            .category_id
            .as_deref()
            .filter(|raw| !raw.is_empty())
            .and_then(|raw| raw.parse::<CategoryId>().ok());

        let start_date = parse_date_param(query.start_date.as_deref(), "startDate", &mut details);
        let end_date = parse_date_param(query.end_date.as_deref(), "endDate", &mut details);

        let search = query.search.filter(|raw| !raw.is_empty());

        if !details.is_empty() {
            return Err(Error::Validation(details));
        }

        Ok(Self {
            kind,
            category_id,
            start_date,
            end_date,
            search,
        })
    }
}

fn parse_date_param(
    raw: Option<&str>,
    field: &'static str,
    details: &mut Vec<FieldError>,
) -> Option<Date> {
    let raw = raw.filter(|raw| !raw.is_empty())?;

    match parse_date(raw) {
        Some(date) => Some(date),
        None => {
            details.push(FieldError {
                field,
                message: format!("\"{raw}\" is not a valid date"),
            });
            None
        }
    }
}

#[cfg(test)]
mod from_query_tests {
    use time::macros::date;

    use super::{TransactionFilter, TransactionListQuery};
    use crate::{Error, transaction::TransactionKind};

    #[test]
    fn empty_query_builds_an_empty_filter() {
        let filter = TransactionFilter::from_query(TransactionListQuery::default())
            .expect("expected the query to be accepted");

        assert_eq!(filter, TransactionFilter::default());
    }

    #[test]
    fn builds_all_filters() {
        let query = TransactionListQuery {
            kind: Some("EXPENSE".to_string()),
            category_id: Some("3".to_string()),
            start_date: Some("2024-01-01".to_string()),
            end_date: Some("2024-01-31".to_string()),
            search: Some("lunch".to_string()),
        };

        let filter =
            TransactionFilter::from_query(query).expect("expected the query to be accepted");

        assert_eq!(filter.kind, Some(TransactionKind::Expense));
        assert_eq!(filter.category_id, Some(3));
        assert_eq!(filter.start_date, Some(date!(2024 - 01 - 01)));
        assert_eq!(filter.end_date, Some(date!(2024 - 01 - 31)));
        assert_eq!(filter.search.as_deref(), Some("lunch"));
    }

    #[test]
    fn unknown_type_is_ignored() {
        let query = TransactionListQuery {
            kind: Some("TRANSFER".to_string()),
            ..Default::default()
        };

        let filter =
            TransactionFilter::from_query(query).expect("expected the query to be accepted");

        assert_eq!(filter.kind, None);
    }

    #[test]
    fn non_numeric_category_id_is_ignored() {
        let query = TransactionListQuery {
            category_id: Some("abc".to_string()),
            ..Default::default()
        };

        let filter =
            TransactionFilter::from_query(query).expect("expected the query to be accepted");

        assert_eq!(filter.category_id, None);
    }

    #[test]
    fn empty_parameters_are_treated_as_absent() {
        let query = TransactionListQuery {
            kind: Some(String::new()),
            category_id: Some(String::new()),
            start_date: Some(String::new()),
            end_date: Some(String::new()),
            search: Some(String::new()),
        };

        let filter =
            TransactionFilter::from_query(query).expect("expected the query to be accepted");

        assert_eq!(filter, TransactionFilter::default());
    }

    #[test]
    fn malformed_dates_are_rejected() {
        let query = TransactionListQuery {
            start_date: Some("not-a-date".to_string()),
            end_date: Some("2024-13-40".to_string()),
            ..Default::default()
        };

        let result = TransactionFilter::from_query(query);

        match result {
            Err(Error::Validation(details)) => {
                let fields: Vec<_> = details.iter().map(|detail| detail.field).collect();
                assert_eq!(fields, vec!["startDate", "endDate"]);
            }
            other => panic!("expected a validation error, got {other:?}"),
        }
    }
}
