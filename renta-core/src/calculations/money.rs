//! Rounding and currency formatting for displayed amounts.
//!
//! Stored amounts keep full precision; these helpers are only applied at the
//! presentation edge.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to two decimal places, midpoints away from zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use renta_core::calculations::money::round_half_up;
///
/// assert_eq!(round_half_up(dec!(1012.3392)), dec!(1012.34));
/// assert_eq!(round_half_up(dec!(1012.335)), dec!(1012.34));
/// assert_eq!(round_half_up(dec!(1012.334)), dec!(1012.33));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount as dollars with exactly two decimals, e.g. `$744.00`.
pub fn format_currency(value: Decimal) -> String {
    format!("${:.2}", round_half_up(value))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn round_half_up_keeps_cents() {
        assert_eq!(round_half_up(dec!(2250.00)), dec!(2250.00));
    }

    #[test]
    fn round_half_up_rounds_midpoint_up() {
        assert_eq!(round_half_up(dec!(0.125)), dec!(0.13));
    }

    #[test]
    fn format_currency_pads_whole_amounts() {
        assert_eq!(format_currency(dec!(2250)), "$2250.00");
        assert_eq!(format_currency(dec!(744)), "$744.00");
    }

    #[test]
    fn format_currency_rounds_fractions() {
        assert_eq!(format_currency(dec!(1012.3392)), "$1012.34");
        assert_eq!(format_currency(dec!(0.005)), "$0.01");
    }

    #[test]
    fn format_currency_zero() {
        assert_eq!(format_currency(Decimal::ZERO), "$0.00");
    }
}
