//! Core category domain types.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{Error, FieldError};

/// The maximum length of a category name in characters.
pub const MAX_CATEGORY_NAME_CHARS: usize = 64;

/// A validated category name: non-empty after trimming and at most
/// [MAX_CATEGORY_NAME_CHARS] characters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// Leading and trailing whitespace is trimmed before validation.
    ///
    /// # Errors
    /// This function will return an [Error::EmptyCategoryName] if `name` is
    /// empty, or an [Error::CategoryNameTooLong] if it is longer than
    /// [MAX_CATEGORY_NAME_CHARS] characters.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            return Err(Error::EmptyCategoryName);
        }

        if name.chars().count() > MAX_CATEGORY_NAME_CHARS {
            return Err(Error::CategoryNameTooLong);
        }

        Ok(Self(name.to_string()))
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the length invariant is violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database identifier for a category.
pub type CategoryId = i64;

/// A category for expenses and income (e.g., 'Groceries', 'Salary').
///
/// Serializes to the `{id, name}` shape the API returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The unique name of the category.
    pub name: CategoryName,
}

/// Extract and validate the `name` field of a category request body.
pub(crate) fn parse_category_payload(payload: &serde_json::Value) -> Result<CategoryName, Error> {
    match payload.get("name") {
        Some(serde_json::Value::String(raw)) => CategoryName::new(raw).map_err(|error| {
            Error::Validation(vec![FieldError {
                field: "name",
                message: error.to_string(),
            }])
        }),
        Some(_) => Err(Error::Validation(vec![FieldError {
            field: "name",
            message: "name must be a string".to_string(),
        }])),
        None => Err(Error::Validation(vec![FieldError {
            field: "name",
            message: "name is required".to_string(),
        }])),
    }
}


#[cfg(test)]
mod parse_category_payload_tests {
    use serde_json::json;

    use super::parse_category_payload;
    use crate::{Error, category::CategoryName};

    #[test]
    fn accepts_a_valid_name() {
        let payload = json!({ "name": "Groceries" });

        let name = parse_category_payload(&payload);

        assert_eq!(name, Ok(CategoryName::new_unchecked("Groceries")));
    }

    #[test]
    fn rejects_a_missing_name() {
        let payload = json!({});

        let result = parse_category_payload(&payload);

        match result {
            Err(Error::Validation(details)) => {
                assert_eq!(details[0].field, "name");
                assert_eq!(details[0].message, "name is required");
            }
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_a_non_string_name() {
        let payload = json!({ "name": 42 });

        let result = parse_category_payload(&payload);

        match result {
            Err(Error::Validation(details)) => assert_eq!(details[0].field, "name"),
            other => panic!("expected a validation error, got {other:?}"),
        }
    }
}
