use crate::error::{A2lError, Result};
use serde_json::Value;

/// How a coefficient zero renders with [`format_number`]. The linear check
/// compares rendered text, so only positive zero qualifies.
pub const LINEAR_ZERO_LITERAL: &str = "0";

const COEFFICIENT_NAMES: [&str; 6] = ["a", "b", "c", "d", "e", "f"];

/// Coefficients of the rational function
/// `y = (a*x^2 + b*x + c) / (d*x^2 + e*x + f)` used by `RAT_FUNC`
/// computation methods.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoefficientSet {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl CoefficientSet {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Build from the database representation: an object keyed `a`..`f`
    /// or a six element array. Values may be numbers or numeric strings.
    pub fn from_value(value: &Value) -> Result<Self> {
        let values: Vec<f64> = match value {
            Value::Object(map) => COEFFICIENT_NAMES
                .iter()
                .map(|key| {
                    map.get(*key)
                        .and_then(coefficient_number)
                        .ok_or_else(|| {
                            A2lError::Coefficients(format!("missing or non-numeric '{key}'"))
                        })
                })
                .collect::<Result<_>>()?,
            Value::Array(items) if items.len() == COEFFICIENT_NAMES.len() => items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    coefficient_number(item).ok_or_else(|| {
                        A2lError::Coefficients(format!(
                            "non-numeric '{}'",
                            COEFFICIENT_NAMES[i]
                        ))
                    })
                })
                .collect::<Result<_>>()?,
            Value::Array(items) => {
                return Err(A2lError::Coefficients(format!(
                    "expected 6 values, found {}",
                    items.len()
                )))
            }
            other => {
                return Err(A2lError::Coefficients(format!(
                    "unsupported representation: {other}"
                )))
            }
        };

        Ok(Self::new(
            values[0], values[1], values[2], values[3], values[4], values[5],
        ))
    }

    /// Convert `COEFFS_LINEAR a b` (physical = a*x + b) to the equivalent
    /// rational function, internal = (phys - b) / a.
    pub fn from_linear(a: f64, b: f64) -> Self {
        let c = if b == 0.0 { 0.0 } else { -b };
        Self::new(0.0, 1.0, c, 0.0, 0.0, a)
    }

    /// Build from a `{a, b}` linear coefficient object
    pub fn from_linear_value(value: &Value) -> Result<Self> {
        let field = |key: &str| {
            value
                .get(key)
                .and_then(coefficient_number)
                .ok_or_else(|| A2lError::Coefficients(format!("missing or non-numeric '{key}'")))
        };
        Ok(Self::from_linear(field("a")?, field("b")?))
    }

    /// True when both squared terms render as the zero literal
    pub fn is_linear(&self) -> bool {
        format_number(self.a) == LINEAR_ZERO_LITERAL && format_number(self.d) == LINEAR_ZERO_LITERAL
    }
}

fn coefficient_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Magnitudes at or above this render in exponent form
const EXPONENT_ABOVE: f64 = 1e16;
/// Non-zero magnitudes below this render in exponent form
const EXPONENT_BELOW: f64 = 1e-4;

/// Shortest round-trip text for a number (`0`, `1`, `0.5`, `-0`).
/// Very large or very small magnitudes use exponent form (`3.4e38`).
pub fn format_number(value: f64) -> String {
    let magnitude = value.abs();
    if value.is_finite()
        && magnitude != 0.0
        && !(EXPONENT_BELOW..EXPONENT_ABOVE).contains(&magnitude)
    {
        format!("{value:e}")
    } else {
        format!("{value}")
    }
}
