//! Decimal-string money amounts.
//!
//! Amounts cross the API boundary as base-10 decimal strings (e.g. "25.50")
//! and are stored in the database as the exact text the client sent. All
//! arithmetic happens on [rust_decimal::Decimal] so repeated additions never
//! accumulate binary floating point error.

use std::str::FromStr;

use rust_decimal::Decimal;

/// Parse a non-negative money amount from a decimal string.
///
/// Accepts digits optionally followed by a decimal point and one or two
/// fractional digits (e.g. "120", "25.5", "25.50"). Returns `None` for
/// anything else, including signs, exponents, separators, and extra
/// precision.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let (whole, fraction) = match raw.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (raw, None),
    };

    if whole.is_empty() || !whole.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }

    if let Some(fraction) = fraction {
        if fraction.is_empty()
            || fraction.len() > 2
            || !fraction.bytes().all(|byte| byte.is_ascii_digit())
        {
            return None;
        }
    }

    Decimal::from_str(raw).ok()
}

/// Format an aggregate total with exactly two fractional digits.
///
/// Individual amounts keep the precision the client sent, but totals are
/// normalized at the boundary so "0" becomes "0.00" and "2474.5" becomes
/// "2474.50".
pub fn format_total(total: Decimal) -> String {
    let mut total = total;
    total.rescale(2);
    total.to_string()
}
