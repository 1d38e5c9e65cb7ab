// Amount formatting tests
//
// The formatted amount participates in the outbound signature, so rounding
// must be deterministic and documented: exactly two decimals, '.' separator,
// half-up at the midpoint.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use paybridge::core::format_amount;

#[test]
fn test_half_up_rounding_at_midpoint() {
    assert_eq!(format_amount(dec!(19.995)), "20.00");
    assert_eq!(format_amount(dec!(0.005)), "0.01");
    assert_eq!(format_amount(dec!(2.675)), "2.68");
}

#[test]
fn test_rounding_below_midpoint_goes_down() {
    assert_eq!(format_amount(dec!(19.994)), "19.99");
    assert_eq!(format_amount(dec!(19.9949)), "19.99");
}

#[test]
fn test_rounding_above_midpoint_goes_up() {
    assert_eq!(format_amount(dec!(19.999)), "20.00");
    assert_eq!(format_amount(dec!(19.9951)), "20.00");
}

#[test]
fn test_whole_amounts_are_padded() {
    assert_eq!(format_amount(dec!(7)), "7.00");
    assert_eq!(format_amount(dec!(100)), "100.00");
    assert_eq!(format_amount(dec!(0.1)), "0.10");
}

proptest! {
    #[test]
    fn prop_output_always_has_exactly_two_decimals(cents in 1u64..1_000_000_000u64) {
        let amount = Decimal::new(cents as i64, 2);
        let formatted = format_amount(amount);

        let (whole, frac) = formatted.split_once('.').expect("missing '.' separator");
        prop_assert!(!whole.is_empty() && whole.chars().all(|c| c.is_ascii_digit()));
        prop_assert_eq!(frac.len(), 2);
        prop_assert!(frac.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn prop_two_decimal_inputs_format_verbatim(cents in 1u64..1_000_000_000u64) {
        // Amounts already at scale 2 must pass through unchanged
        let amount = Decimal::new(cents as i64, 2);
        let formatted = format_amount(amount);
        prop_assert_eq!(formatted.parse::<Decimal>().unwrap(), amount);
    }

    #[test]
    fn prop_formatting_is_deterministic(cents in 1u64..1_000_000_000u64, extra in 0u64..999) {
        let amount = Decimal::new((cents * 1000 + extra) as i64, 5);
        prop_assert_eq!(format_amount(amount), format_amount(amount));
    }
}
