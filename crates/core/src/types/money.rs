//! Money rendering at the display boundary.
//!
//! Totals accumulate at full [`Decimal`] precision; rounding to two
//! decimal places happens only here, when an amount is turned into text.

use rust_decimal::{Decimal, RoundingStrategy};

/// Render an amount with two decimal places, e.g. `"19.99"`.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    format!(
        "{:.2}",
        amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
    )
}

/// Render an amount as a euro price, e.g. `"19.99 €"`.
#[must_use]
pub fn format_eur(amount: Decimal) -> String {
    format!("{} €", format_amount(amount))
}
