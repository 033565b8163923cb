//! Symbolic inversion of rational-function conversions
//!
//! A2L `RAT_FUNC` coefficients describe the physical-to-internal direction:
//! `internal = (a*p^2 + b*p + c) / (d*p^2 + e*p + f)`. Calibration tools want
//! the opposite direction as a formula in the raw value `x`. For the linear
//! case (`a == d == 0`) that is `p = (f*x - c) / (b - e*x)`.

use crate::types::{format_number, CoefficientSet};

/// Equation text when the measurement has no usable computation method
pub const NO_CONVERSION: &str = "No conversion available";

/// Equation text when a coefficient set is present but malformed
pub const CONVERSION_ERROR: &str = "Conversion error";

/// Equation text for quadratic rational functions
pub const NOT_INVERTIBLE: &str =
    "Cannot handle polynomial ratfunc because we do not know how to invert!";

/// Render the inverse conversion as a formula in `x`, with coefficients
/// substituted as text. Non-linear sets yield [`NOT_INVERTIBLE`].
pub fn invert(coeffs: &CoefficientSet) -> String {
    if !coeffs.is_linear() {
        return NOT_INVERTIBLE.to_string();
    }

    format!(
        "(({f} * x) - {c} ) / ({b} - ({e} * x))",
        f = format_number(coeffs.f),
        c = format_number(coeffs.c),
        b = format_number(coeffs.b),
        e = format_number(coeffs.e),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_conversion() {
        let coeffs = CoefficientSet::new(0.0, 2.0, 1.0, 0.0, 0.0, 1.0);
        assert_eq!(invert(&coeffs), "((1 * x) - 1 ) / (2 - (0 * x))");
    }

    #[test]
    fn test_fractional_coefficients_are_verbatim() {
        let coeffs = CoefficientSet::new(0.0, 1.0, -40.0, 0.0, 0.0, 0.75);
        assert_eq!(invert(&coeffs), "((0.75 * x) - -40 ) / (1 - (0 * x))");

        let coeffs = CoefficientSet::new(0.0, 100.0, 0.0, 0.0, 0.5, 3.0);
        assert_eq!(invert(&coeffs), "((3 * x) - 0 ) / (100 - (0.5 * x))");
    }

    #[test]
    fn test_quadratic_is_not_inverted() {
        let quadratic_numerator = CoefficientSet::new(1.0, 0.0, 0.0, 0.0, 0.0, 1.0);
        assert_eq!(invert(&quadratic_numerator), NOT_INVERTIBLE);

        let quadratic_denominator = CoefficientSet::new(0.0, 1.0, 0.0, 2.5, 0.0, 1.0);
        assert_eq!(invert(&quadratic_denominator), NOT_INVERTIBLE);
    }

    #[test]
    fn test_negative_zero_is_not_linear() {
        let coeffs = CoefficientSet::new(0.0, 1.0, 0.0, -0.0, 0.0, 1.0);
        assert_eq!(invert(&coeffs), NOT_INVERTIBLE);
    }
}
