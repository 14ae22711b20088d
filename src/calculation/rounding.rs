//! Whole-number rounding shared by the engines.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to the nearest whole number, halves away from zero (`20.5 -> 21`).
///
/// All published figures (percentages, averages, salaries) go through this.
///
/// ```
/// use tuition_engine::calculation::round_whole;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_whole(Decimal::new(205, 1)), Decimal::new(21, 0));
/// assert_eq!(round_whole(Decimal::new(2049, 2)), Decimal::new(20, 0));
/// ```
pub fn round_whole(value: Decimal) -> Decimal {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}

/// Divides, returning zero when the divisor is zero.
pub(crate) fn ratio_or_zero(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        Decimal::ZERO
    } else {
        numerator / denominator
    }
}
