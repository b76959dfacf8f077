//! Category management for grouping transactions.
//!
//! A category is a named grouping with a unique name. Transactions reference
//! at most one category; the reference is optional and nulled out when the
//! category is deleted.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod list;

pub use create::create_category_endpoint;
pub use db::{
    create_category, create_category_table, delete_category, get_all_categories, get_category,
    resolve_category, update_category,
};
pub use delete::delete_category_endpoint;
pub use domain::{Category, CategoryId, CategoryName, MAX_CATEGORY_NAME_CHARS};
pub use edit::update_category_endpoint;
pub use list::list_categories_endpoint;

pub(crate) use domain::parse_category_payload;
