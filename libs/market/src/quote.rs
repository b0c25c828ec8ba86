use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::QuoteError;

/// Decimal places kept for prices, changes and percentages.
pub const DISPLAY_DP: u32 = 2;

/// Latest session open against the previous session close for one index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexQuote {
    pub symbol: String,
    pub name: String,
    pub open: Decimal,
    pub previous_close: Decimal,
    pub session: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Change {
    pub change: Decimal,
    pub percent: Decimal,
}

impl IndexQuote {
    pub fn change(&self) -> Result<Change, QuoteError> {
        calculate_change(self.open, self.previous_close)
            .ok_or_else(|| QuoteError::DivisionByZero(self.symbol.clone()))
    }
}

/// Absolute and percent change of `open` over `previous_close`, rounded half
/// away from zero. `None` when `previous_close` is zero.
pub fn calculate_change(open: Decimal, previous_close: Decimal) -> Option<Change> {
    let change = open - previous_close;
    let percent = change.checked_div(previous_close)? * Decimal::ONE_HUNDRED;

    Some(Change {
        change: round(change),
        percent: round(percent),
    })
}

pub fn round(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DISPLAY_DP, RoundingStrategy::MidpointAwayFromZero)
}
