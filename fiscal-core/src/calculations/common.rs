//! Shared numeric helpers for the regime derivations.
//!
//! Derivations never round intermediate values; [`round_half_up`] is meant
//! for presentation only.

use rust_decimal::Decimal;

/// Rounds a decimal value to two decimal places, half away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use fiscal_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(2647.09393)), dec!(2647.09));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
///
/// ```
/// use rust_decimal_macros::dec;
/// use fiscal_core::calculations::common::max;
///
/// assert_eq!(max(dec!(-100.00), dec!(0)), dec!(0));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Floors a derived base at zero.
pub fn non_negative(value: Decimal) -> Decimal {
    max(value, Decimal::ZERO)
}
