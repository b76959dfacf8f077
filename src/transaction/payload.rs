//! JSON body field helpers for the transaction write endpoints.
//!
//! Request bodies arrive as loose JSON and are validated field by field so
//! that every schema violation is reported as a 400 with the offending field
//! named, the same contract for create and update.

use rust_decimal::Decimal;
use serde_json::Value;
use time::Date;

use crate::{
    FieldError,
    category::{CategoryId, CategoryName},
    money::parse_amount,
    transaction::{TransactionKind, domain::parse_date},
};

/// Read an optional string field, reporting a non-string value.
///
/// An explicit null is rejected rather than treated as absent; only
/// `categoryId` is nullable on the wire.
pub(super) fn optional_string<'a>(
    payload: &'a Value,
    field: &'static str,
) -> Result<Option<&'a str>, FieldError> {
    match payload.get(field) {
        None => Ok(None),
        Some(Value::String(raw)) => Ok(Some(raw)),
        Some(_) => Err(FieldError {
            field,
            message: format!("{field} must be a string"),
        }),
    }
}

/// Parse a date field value.
pub(super) fn date_field(raw: &str, field: &'static str) -> Result<Date, FieldError> {
    parse_date(raw).ok_or_else(|| FieldError {
        field,
        message: format!("\"{raw}\" is not a valid date"),
    })
}

/// Parse an amount field value.
pub(super) fn amount_field(raw: &str) -> Result<Decimal, FieldError> {
    parse_amount(raw).ok_or_else(|| FieldError {
        field: "amount",
        message: "amount must be a non-negative decimal string with at most 2 fractional digits"
            .to_string(),
    })
}

/// Parse a transaction kind field value.
pub(super) fn kind_field(raw: &str) -> Result<TransactionKind, FieldError> {
    TransactionKind::parse(raw).ok_or_else(|| FieldError {
        field: "type",
        message: "type must be INCOME or EXPENSE".to_string(),
    })
}

/// Read the `categoryId` field, keeping absent, null and integer values
/// apart: `None` when absent, `Some(None)` for an explicit null, and
/// `Some(Some(id))` for an integer.
pub(super) fn category_id_field(
    payload: &Value,
) -> Result<Option<Option<CategoryId>>, FieldError> {
    match payload.get("categoryId") {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(None)),
        Some(Value::Number(number)) => match number.as_i64() {
            Some(id) => Ok(Some(Some(id))),
            None => Err(FieldError {
                field: "categoryId",
                message: "categoryId must be an integer or null".to_string(),
            }),
        },
        Some(_) => Err(FieldError {
            field: "categoryId",
            message: "categoryId must be an integer or null".to_string(),
        }),
    }
}

/// Parse a category name field value.
pub(super) fn category_name_field(raw: &str) -> Result<CategoryName, FieldError> {
    CategoryName::new(raw).map_err(|error| FieldError {
        field: "categoryName",
        message: error.to_string(),
    })
}
