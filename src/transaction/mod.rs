//! Transaction management for the finance tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the field sets for inserting and updating
//! - Database functions for storing, querying, and managing transactions
//! - The filter builder for the list endpoint
//! - The JSON endpoints for creating, reading, updating and deleting

mod create;
mod db;
mod delete;
mod domain;
mod edit;
pub(crate) mod filter;
mod get;
mod list;
mod payload;

pub use create::create_transaction_endpoint;
pub use db::{
    count_transactions, create_transaction, create_transaction_table, delete_transaction,
    get_transaction, get_transactions, update_transaction,
};
pub use delete::delete_transaction_endpoint;
pub use domain::{
    NewTransaction, Transaction, TransactionChanges, TransactionId, TransactionKind,
    TransactionResponse,
};
pub use edit::update_transaction_endpoint;
pub use get::get_transaction_endpoint;
pub use list::list_transactions_endpoint;

pub(crate) use db::{column_decimal, column_kind};
