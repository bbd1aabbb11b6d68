//! Currency unit conversion.
//!
//! The pricing API reports integer minor units (cents). The shop currency has
//! no minor unit, so converted amounts are whole integers. Rounding is always
//! half away from zero.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

const MINOR_UNIT_SCALE: u32 = 2;

/// 1234 cents -> 12.34
pub fn minor_to_major(minor: i64) -> Decimal {
    Decimal::new(minor, MINOR_UNIT_SCALE)
}

/// 12.345 -> 1235 cents. `None` when the amount does not fit in an i64.
pub fn major_to_minor(major: Decimal) -> Option<i64> {
    major
        .checked_mul(Decimal::ONE_HUNDRED)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

/// Minor units of the source currency times `rate` (target per source major
/// unit), rounded to a whole target amount.
pub fn convert_minor(minor: i64, rate: Decimal) -> Option<i64> {
    minor_to_major(minor)
        .checked_mul(rate)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

/// Whole target-currency amount back into source major units, 2 dp.
/// `None` for a zero rate.
pub fn foreign_to_local(amount: i64, rate: Decimal) -> Option<Decimal> {
    if rate.is_zero() {
        return None;
    }
    Some(
        Decimal::from(amount)
            .checked_div(rate)?
            .round_dp_with_strategy(MINOR_UNIT_SCALE, RoundingStrategy::MidpointAwayFromZero),
    )
}
