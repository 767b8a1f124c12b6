//! Decimal helpers shared by the analytics code.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round to two decimal places, half away from zero.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `part / total * 100`, rounded to two places. Zero when `total` is zero.
pub fn percentage(part: Decimal, total: Decimal) -> Decimal {
    if total.is_zero() {
        return Decimal::ZERO;
    }
    round2(part / total * Decimal::ONE_HUNDRED)
}

/// `sum / count`, rounded to two places. Zero when `count` is zero.
pub fn average(sum: Decimal, count: usize) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    round2(sum / Decimal::from(count))
}
