//! Rounding and clamping helpers shared by the engines.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero, the convention used
/// on payslips and bank schedules.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use calc_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(4211.325)), dec!(4211.33));
/// assert_eq!(round_half_up(dec!(128.8023)), dec!(128.80));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamps `value` into `[floor, ceiling]`.
pub fn clamp(
    value: Decimal,
    floor: Decimal,
    ceiling: Decimal,
) -> Decimal {
    value.max(floor).min(ceiling)
}

/// Expresses `part` as a percentage of `whole`, or zero when `whole` is zero.
pub fn percent_of(
    part: Decimal,
    whole: Decimal,
) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    part / whole * Decimal::ONE_HUNDRED
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
    }

    #[test]
    fn round_half_up_handles_negative_values() {
        assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
    }

    // =========================================================================
    // clamp tests
    // =========================================================================

    #[test]
    fn clamp_raises_to_floor() {
        assert_eq!(clamp(dec!(10), dec!(100), dec!(750)), dec!(100));
    }

    #[test]
    fn clamp_lowers_to_ceiling() {
        assert_eq!(clamp(dec!(1000), dec!(100), dec!(750)), dec!(750));
    }

    #[test]
    fn clamp_keeps_value_inside_range() {
        assert_eq!(clamp(dec!(500), dec!(100), dec!(750)), dec!(500));
    }

    // =========================================================================
    // percent_of tests
    // =========================================================================

    #[test]
    fn percent_of_divides_and_scales() {
        assert_eq!(percent_of(dec!(97500), dec!(500000)), dec!(19.5));
    }

    #[test]
    fn percent_of_zero_whole_is_zero() {
        assert_eq!(percent_of(dec!(10), dec!(0)), dec!(0));
    }
}
