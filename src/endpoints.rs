//! The API endpoint URIs.

/// The route for the liveness check.
pub const HEALTH: &str = "/health";
/// The route to request a cup of coffee (experimental).
pub const COFFEE: &str = "/api/coffee";
/// The route to list and create transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route to access a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to list and create categories.
pub const CATEGORIES: &str = "/api/categories";
/// The route to access a single category.
pub const CATEGORY: &str = "/api/categories/{category_id}";
/// The route for aggregate income, expense and balance totals.
pub const STATS_SUMMARY: &str = "/api/stats/summary";
/// The route for the trailing monthly income/expense series.
pub const STATS_MONTHLY: &str = "/api/stats/monthly";
