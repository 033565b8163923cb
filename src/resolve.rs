//! Field resolution for loosely shaped database records
//!
//! Measurement and computation-method records do not share one schema: the
//! same logical field shows up under different attribute names (and
//! sometimes one level down inside a wrapper object) depending on which tool
//! produced the database. Each logical field therefore carries a ranked list
//! of [`Strategy`] values; the first strategy that yields a usable value
//! wins.
//!
//! Usable means present, not `null`, and not the field's empty sentinel
//! (zero for addresses and limits, empty strings and empty containers for
//! everything else).

use crate::database::RecordSource;
use crate::error::Result;
use crate::input::parse_address;
use crate::types::{CoefficientSet, Record};
use serde_json::Value;
use std::fmt;

/// Where a logical field may live on a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// A top-level attribute
    Attr(&'static str),
    /// An attribute of a nested container object, one level deep
    Nested {
        container: &'static str,
        leaf: &'static str,
    },
}

impl Strategy {
    /// Raw value this strategy points at, if any
    pub fn lookup<'r>(&self, record: &'r Record) -> Option<&'r Value> {
        match *self {
            Strategy::Attr(name) => record.get(name),
            Strategy::Nested { container, leaf } => record
                .get(container)?
                .as_object()?
                .get(leaf)
                .filter(|value| !value.is_null()),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Attr(name) => write!(f, "{name}"),
            Strategy::Nested { container, leaf } => write!(f, "{container}.{leaf}"),
        }
    }
}

/// A logical field with its ranked extraction strategies
pub trait LogicalField {
    type Output: fmt::Debug;

    /// Name used in debug traces
    const NAME: &'static str;

    /// Candidate locations, highest priority first
    const STRATEGIES: &'static [Strategy];

    /// Convert a raw value, or reject it as absent
    fn accept(value: &Value) -> Option<Self::Output>;

    fn describe(output: &Self::Output) -> String {
        format!("{output:?}")
    }
}

/// Resolve a logical field on a record. Never fails; `None` means absent.
pub fn resolve<F: LogicalField>(record: &Record, debug: bool) -> Option<F::Output> {
    for strategy in F::STRATEGIES {
        if let Some(output) = strategy.lookup(record).and_then(F::accept) {
            if debug {
                println!(
                    "Found {} via: {} = {}",
                    F::NAME,
                    strategy,
                    F::describe(&output)
                );
            }
            return Some(output);
        }
    }

    if debug {
        println!("No {} found on '{}'", F::NAME, record.name());
    }
    None
}

/// ECU address of a measurement, including the nested-container fallback
pub struct AddressField;

impl LogicalField for AddressField {
    type Output = u64;
    const NAME: &'static str = "ECU address";
    const STRATEGIES: &'static [Strategy] = &[
        Strategy::Attr("ecuAddress"),
        Strategy::Attr("address"),
        Strategy::Attr("memoryAddress"),
        Strategy::Attr("ecuAddr"),
        Strategy::Attr("addr"),
        Strategy::Attr("ecu_address"),
        Strategy::Nested { container: "ecuAddressExtension", leaf: "address" },
        Strategy::Nested { container: "ecuAddressExtension", leaf: "ecuAddress" },
        Strategy::Nested { container: "ecuAddressExtension", leaf: "offset" },
        Strategy::Nested { container: "memLayout", leaf: "address" },
        Strategy::Nested { container: "memLayout", leaf: "ecuAddress" },
        Strategy::Nested { container: "memLayout", leaf: "offset" },
        Strategy::Nested { container: "layout", leaf: "address" },
        Strategy::Nested { container: "layout", leaf: "ecuAddress" },
        Strategy::Nested { container: "layout", leaf: "offset" },
        Strategy::Nested { container: "ecu_address_extension", leaf: "address" },
        Strategy::Nested { container: "ecu_address_extension", leaf: "ecuAddress" },
        Strategy::Nested { container: "ecu_address_extension", leaf: "offset" },
    ];

    fn accept(value: &Value) -> Option<u64> {
        address_value(value)
    }

    fn describe(output: &u64) -> String {
        format!("{output:#x}")
    }
}

/// ECU address as used by the address scan: direct attributes only
pub struct LookupAddressField;

impl LogicalField for LookupAddressField {
    type Output = u64;
    const NAME: &'static str = "ECU address";
    const STRATEGIES: &'static [Strategy] = &[
        Strategy::Attr("ecu_address"),
        Strategy::Attr("ecuAddress"),
        Strategy::Attr("address"),
    ];

    fn accept(value: &Value) -> Option<u64> {
        address_value(value)
    }

    fn describe(output: &u64) -> String {
        format!("{output:#x}")
    }
}

pub struct DatatypeField;

impl LogicalField for DatatypeField {
    type Output = String;
    const NAME: &'static str = "datatype";
    const STRATEGIES: &'static [Strategy] = &[
        Strategy::Attr("datatype"),
        Strategy::Attr("dataType"),
        Strategy::Attr("data_type"),
    ];

    fn accept(value: &Value) -> Option<String> {
        non_empty_str(value)
    }
}

pub struct LowerLimitField;

impl LogicalField for LowerLimitField {
    type Output = f64;
    const NAME: &'static str = "lower limit";
    const STRATEGIES: &'static [Strategy] =
        &[Strategy::Attr("lowerLimit"), Strategy::Attr("lower_limit")];

    fn accept(value: &Value) -> Option<f64> {
        limit_value(value)
    }
}

pub struct UpperLimitField;

impl LogicalField for UpperLimitField {
    type Output = f64;
    const NAME: &'static str = "upper limit";
    const STRATEGIES: &'static [Strategy] =
        &[Strategy::Attr("upperLimit"), Strategy::Attr("upper_limit")];

    fn accept(value: &Value) -> Option<f64> {
        limit_value(value)
    }
}

/// Display format; rendering is left to the row builder
pub struct FormatField;

impl LogicalField for FormatField {
    type Output = Value;
    const NAME: &'static str = "format";
    const STRATEGIES: &'static [Strategy] = &[Strategy::Attr("format")];

    fn accept(value: &Value) -> Option<Value> {
        Some(value.clone())
    }
}

/// Computation method reference on a measurement
#[derive(Debug, Clone, PartialEq)]
pub enum CompuRef {
    /// The method object is embedded in the measurement
    Inline(Record),
    /// The method is referenced by name
    Named(String),
}

pub struct CompuMethodField;

impl LogicalField for CompuMethodField {
    type Output = CompuRef;
    const NAME: &'static str = "computation method";
    const STRATEGIES: &'static [Strategy] = &[
        Strategy::Attr("compuMethod"),
        Strategy::Attr("conversion"),
        Strategy::Attr("compu_method"),
        Strategy::Attr("conversionMethod"),
    ];

    fn accept(value: &Value) -> Option<CompuRef> {
        match value {
            Value::String(name) if !name.is_empty() => Some(CompuRef::Named(name.clone())),
            Value::Object(map) if !map.is_empty() => Some(CompuRef::Inline(Record::new(map.clone()))),
            _ => None,
        }
    }

    fn describe(output: &CompuRef) -> String {
        match output {
            CompuRef::Inline(record) => format!("inline '{}'", record.name()),
            CompuRef::Named(name) => format!("'{name}'"),
        }
    }
}

/// Unit string on a computation method
pub struct UnitField;

impl LogicalField for UnitField {
    type Output = String;
    const NAME: &'static str = "unit";
    const STRATEGIES: &'static [Strategy] = &[
        Strategy::Attr("unit"),
        Strategy::Attr("unitRef"),
        Strategy::Attr("physUnit"),
    ];

    fn accept(value: &Value) -> Option<String> {
        non_empty_str(value)
    }
}

/// Rational function coefficients on a computation method
pub struct CoefficientsField;

impl LogicalField for CoefficientsField {
    type Output = Result<CoefficientSet>;
    const NAME: &'static str = "coefficients";
    const STRATEGIES: &'static [Strategy] = &[
        Strategy::Attr("coeffs"),
        Strategy::Attr("coefficients"),
        Strategy::Attr("ratFunc"),
        Strategy::Attr("formula"),
    ];

    fn accept(value: &Value) -> Option<Result<CoefficientSet>> {
        non_empty(value).then(|| CoefficientSet::from_value(value))
    }
}

/// `COEFFS_LINEAR` pair, tried after every rational function location
pub struct LinearCoefficientsField;

impl LogicalField for LinearCoefficientsField {
    type Output = Result<CoefficientSet>;
    const NAME: &'static str = "linear coefficients";
    const STRATEGIES: &'static [Strategy] = &[
        Strategy::Attr("coeffs_linear"),
        Strategy::Attr("coeffsLinear"),
    ];

    fn accept(value: &Value) -> Option<Result<CoefficientSet>> {
        non_empty(value).then(|| CoefficientSet::from_linear_value(value))
    }
}

/// Resolve the computation method of a measurement, following a name
/// reference into the record source when needed.
pub fn resolve_compu_method<S: RecordSource + ?Sized>(
    measurement: &Record,
    source: &S,
    debug: bool,
) -> Option<Record> {
    match resolve::<CompuMethodField>(measurement, debug)? {
        CompuRef::Inline(record) => Some(record),
        CompuRef::Named(name) => match source.compu_method(&name) {
            Some(record) => {
                if debug {
                    println!("Found CompuMethod object: {}", record.name());
                }
                Some(record.clone())
            }
            None => {
                if debug {
                    println!("Could not find CompuMethod: {name}");
                }
                None
            }
        },
    }
}

/// Resolve coefficients, falling back to the linear pair
pub fn resolve_coefficients(compu_method: &Record, debug: bool) -> Option<Result<CoefficientSet>> {
    resolve::<CoefficientsField>(compu_method, debug)
        .or_else(|| resolve::<LinearCoefficientsField>(compu_method, debug))
}

/// Address from a raw value, unwrapping one `{"address": ..}` level.
/// Zero is the empty sentinel.
fn address_value(value: &Value) -> Option<u64> {
    let value = match value {
        Value::Object(map) => map.get("address")?,
        other => other,
    };

    let address = match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        }),
        Value::String(s) => parse_address(s.trim()).ok(),
        _ => None,
    }?;

    (address != 0).then_some(address)
}

fn limit_value(value: &Value) -> Option<f64> {
    let limit = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }?;

    (limit != 0.0).then_some(limit)
}

fn non_empty_str(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn non_empty(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}
