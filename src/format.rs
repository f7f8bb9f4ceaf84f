//! Short magnitude formatting for HUD numbers (`1.2k`, `3.4M`).

const UNITS: [(f64, &str); 4] = [(1e12, "T"), (1e9, "G"), (1e6, "M"), (1e3, "k")];

/// Abbreviate `n` with a k/M/G/T suffix and one decimal place.
///
/// Values under 1000 are rounded to an integer. Halves round up (`1250` is
/// `1.3k`, `2.5` is `3`), unlike `format!` which rounds them to even.
/// Non-finite input yields `"0"`.
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return "0".into();
    }
    let abs = n.abs();
    let sign = if n < 0.0 { "-" } else { "" };
    for (value, suffix) in UNITS {
        if abs >= value {
            let tenths = (abs / value * 10.0).round() / 10.0;
            return format!("{sign}{tenths:.1}{suffix}");
        }
    }
    format!("{sign}{:.0}", abs.round())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_format_number_no_panic(n in proptest::num::f64::ANY) {
            let _ = format_number(n);
        }

        #[test]
        fn prop_nonneg_no_leading_minus(n in 0.0f64..1e15) {
            let s = format_number(n);
            prop_assert!(!s.starts_with('-'), "got: {}", s);
        }

        #[test]
        fn prop_negative_has_minus(n in -1e15f64..-1.0) {
            let s = format_number(n);
            prop_assert!(s.starts_with('-'), "got: {}", s);
        }

        #[test]
        fn prop_large_values_have_suffix(n in 1e3f64..1e15) {
            let s = format_number(n);
            let last = s.chars().last().unwrap();
            prop_assert!("kMGT".contains(last), "got: {}", s);
        }
    }
}
