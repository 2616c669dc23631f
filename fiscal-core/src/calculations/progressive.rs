//! Progressive bracket taxation.
//!
//! A single calculator serves the state scale, every regional scale, and the
//! savings scale used for dividends.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fiscal_core::Bracket;
//! use fiscal_core::calculations::compute_tax;
//!
//! let table = [
//!     Bracket::Capped { upper_bound: dec!(10000), rate: dec!(0.10) },
//!     Bracket::Capped { upper_bound: dec!(20000), rate: dec!(0.20) },
//!     Bracket::Open { rate: dec!(0.30) },
//! ];
//!
//! // 10000 × 10% + 10000 × 20% + 5000 × 30%
//! assert_eq!(compute_tax(dec!(25000), &table), dec!(4500));
//! ```

use rust_decimal::Decimal;

use crate::Bracket;

/// Computes the tax owed on `base` by walking `brackets` low to high.
///
/// Each capped bracket taxes the slice of the base between the previous cap
/// and its own bound; the walk stops as soon as the base is used up or a
/// slice comes out non-positive. An open bracket taxes whatever remains.
///
/// The table is assumed well formed (see [`crate::BracketTable::new`]); the
/// result is not rounded.
pub fn compute_tax(
    base: Decimal,
    brackets: &[Bracket],
) -> Decimal {
    let mut tax = Decimal::ZERO;
    let mut remaining_base = base;
    let mut previous_bound = Decimal::ZERO;

    for bracket in brackets {
        match *bracket {
            Bracket::Capped { upper_bound, rate } => {
                let slice = remaining_base.min(upper_bound - previous_bound);
                if slice <= Decimal::ZERO {
                    break;
                }

                tax += slice * rate;
                remaining_base -= slice;
                previous_bound = upper_bound;

                if remaining_base <= Decimal::ZERO {
                    break;
                }
            }
            Bracket::Open { rate } => {
                tax += remaining_base * rate;
            }
        }
    }

    tax
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn simple_table() -> Vec<Bracket> {
        vec![
            Bracket::Capped {
                upper_bound: dec!(10000),
                rate: dec!(0.10),
            },
            Bracket::Capped {
                upper_bound: dec!(20000),
                rate: dec!(0.20),
            },
            Bracket::Open { rate: dec!(0.30) },
        ]
    }

    fn spanish_state_scale() -> Vec<Bracket> {
        vec![
            Bracket::Capped {
                upper_bound: dec!(12450),
                rate: dec!(0.095),
            },
            Bracket::Capped {
                upper_bound: dec!(20200),
                rate: dec!(0.12),
            },
            Bracket::Capped {
                upper_bound: dec!(35200),
                rate: dec!(0.15),
            },
            Bracket::Capped {
                upper_bound: dec!(60000),
                rate: dec!(0.185),
            },
            Bracket::Capped {
                upper_bound: dec!(300000),
                rate: dec!(0.225),
            },
            Bracket::Open { rate: dec!(0.245) },
        ]
    }

    #[test]
    fn spans_all_brackets_into_open_bracket() {
        assert_eq!(compute_tax(dec!(25000), &simple_table()), dec!(4500));
    }

    #[test]
    fn zero_base_owes_nothing() {
        assert_eq!(compute_tax(dec!(0), &simple_table()), dec!(0));
    }

    #[test]
    fn base_inside_first_bracket() {
        assert_eq!(compute_tax(dec!(5000), &simple_table()), dec!(500));
    }

    #[test]
    fn base_exactly_on_a_bound() {
        assert_eq!(compute_tax(dec!(10000), &simple_table()), dec!(1000));
        assert_eq!(compute_tax(dec!(20000), &simple_table()), dec!(3000));
    }

    #[test]
    fn base_above_last_cap_without_open_bracket_is_untaxed_beyond_cap() {
        let table = vec![Bracket::Capped {
            upper_bound: dec!(6000),
            rate: dec!(0.19),
        }];

        assert_eq!(compute_tax(dec!(9000), &table), dec!(1140));
    }

    #[test]
    fn negative_base_stops_at_first_capped_bracket() {
        assert_eq!(compute_tax(dec!(-1500), &simple_table()), dec!(0));
    }

    #[test]
    fn empty_table_owes_nothing() {
        assert_eq!(compute_tax(dec!(50000), &[]), dec!(0));
    }

    #[test]
    fn open_only_table_is_flat_rate() {
        let table = vec![Bracket::Open { rate: dec!(0.25) }];

        assert_eq!(compute_tax(dec!(31500), &table), dec!(7875));
    }

    #[test]
    fn state_scale_on_employee_base() {
        // 12450 × 9.5% + 7750 × 12% + 5895 × 15%
        assert_eq!(compute_tax(dec!(26095), &spanish_state_scale()), dec!(2997.00));
    }

    #[test]
    fn state_scale_top_bracket() {
        let tax = compute_tax(dec!(400000), &spanish_state_scale());

        // 1182.75 + 930 + 2250 + 4588 + 54000 + 100000 × 24.5%
        assert_eq!(tax, dec!(87450.75));
    }

    #[test]
    fn tax_is_monotonic_in_base() {
        let table = spanish_state_scale();
        let mut previous = Decimal::ZERO;

        for step in 0..=80 {
            let base = Decimal::from(step * 5000);
            let tax = compute_tax(base, &table);
            assert!(tax >= previous, "tax decreased at base {base}");
            previous = tax;
        }
    }

    #[test]
    fn split_tables_match_combined_pass() {
        let lower = vec![
            Bracket::Capped {
                upper_bound: dec!(10000),
                rate: dec!(0.10),
            },
            Bracket::Capped {
                upper_bound: dec!(20000),
                rate: dec!(0.20),
            },
        ];
        let upper = vec![Bracket::Open { rate: dec!(0.30) }];
        let base = dec!(25000);

        let lower_tax = compute_tax(base, &lower);
        let upper_tax = compute_tax(base - dec!(20000), &upper);

        assert_eq!(lower_tax + upper_tax, compute_tax(base, &simple_table()));
    }

    #[test]
    fn repeated_calls_are_identical() {
        let table = spanish_state_scale();

        assert_eq!(
            compute_tax(dec!(123456.78), &table),
            compute_tax(dec!(123456.78), &table)
        );
    }
}
