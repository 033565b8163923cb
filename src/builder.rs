//! Output row construction for a single measurement

use crate::database::RecordSource;
use crate::equation::{invert, CONVERSION_ERROR, NO_CONVERSION};
use crate::resolve::{
    resolve, resolve_coefficients, resolve_compu_method, AddressField, DatatypeField,
    FormatField, LowerLimitField, UnitField, UpperLimitField,
};
use crate::types::{format_number, MeasurementRecord, OutputRow};
use serde_json::Value;

/// Datatype assumed when a measurement carries none
pub const DEFAULT_DATATYPE: &str = "UWORD";

/// Byte length used for unknown datatypes
pub const DEFAULT_DATATYPE_SIZE: u8 = 2;

/// Byte length of an A2L datatype tag
pub fn datatype_size(datatype: &str) -> u8 {
    match datatype {
        "UBYTE" | "SBYTE" => 1,
        "UWORD" | "SWORD" => 2,
        "ULONG" | "SLONG" | "FLOAT32_IEEE" => 4,
        _ => DEFAULT_DATATYPE_SIZE,
    }
}

/// Signed datatypes are the `S*` tags
pub fn is_signed(datatype: &str) -> bool {
    datatype.starts_with('S')
}

/// Render the Format column.
///
/// Format objects carry a printf-style `formatString` such as `%7.2`, which
/// becomes `7.2f`. Plain values are stringified and suffixed with `f`.
pub fn render_format(format: Option<&Value>) -> String {
    match format {
        None => "0f".to_string(),
        Some(Value::Object(map)) if map.contains_key("formatString") => {
            let format_string = map
                .get("formatString")
                .and_then(Value::as_str)
                .unwrap_or("%7.0");
            format!("{}f", format_string.replace(&['%', 'f'][..], ""))
        }
        Some(other) => format!("{}f", value_text(other)),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            (_, _, Some(f)) => format_number(f),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

/// Look up `param_name` and build its row. Prints a notice and returns
/// `None` when the measurement does not exist.
pub fn build_row<S: RecordSource + ?Sized>(
    source: &S,
    param_name: &str,
    custom_name: &str,
    debug: bool,
) -> Option<OutputRow> {
    let Some(measurement) = source.measurement(param_name) else {
        println!("******** Could not find ! {param_name}");
        return None;
    };

    Some(row_from_measurement(source, measurement, custom_name, debug))
}

/// Build the row for a measurement record. Missing fields fall back to
/// defaults, so this never fails.
pub fn row_from_measurement<S: RecordSource + ?Sized>(
    source: &S,
    measurement: &MeasurementRecord,
    custom_name: &str,
    debug: bool,
) -> OutputRow {
    if debug {
        println!("\n=== Debug info for {} ===", measurement.name());
        println!("Available attributes: {:?}", measurement.attribute_names());
    }

    let (unit, equation) = match resolve_compu_method(measurement, source, debug) {
        Some(compu_method) => {
            let unit = resolve::<UnitField>(&compu_method, debug).unwrap_or_default();
            let equation = match resolve_coefficients(&compu_method, debug) {
                Some(Ok(coeffs)) => invert(&coeffs),
                Some(Err(e)) => {
                    if debug {
                        println!("Error processing coefficients: {e}");
                    }
                    CONVERSION_ERROR.to_string()
                }
                None => NO_CONVERSION.to_string(),
            };
            (unit, equation)
        }
        None => (String::new(), NO_CONVERSION.to_string()),
    };

    if debug {
        println!("Unit: '{unit}', Math: '{equation}'");
    }

    let name = if custom_name.is_empty() {
        measurement.name().to_string()
    } else {
        custom_name.to_string()
    };

    let format = render_format(resolve::<FormatField>(measurement, debug).as_ref());
    let address = resolve::<AddressField>(measurement, debug).unwrap_or(0);
    let datatype = resolve::<DatatypeField>(measurement, debug)
        .unwrap_or_else(|| DEFAULT_DATATYPE.to_string());
    let lower_limit = format_number(resolve::<LowerLimitField>(measurement, debug).unwrap_or(0.0));
    let upper_limit = format_number(resolve::<UpperLimitField>(measurement, debug).unwrap_or(0.0));

    let row = OutputRow {
        name,
        unit,
        equation,
        format,
        address: format!("{address:#x}"),
        length: datatype_size(&datatype).to_string(),
        signed: if is_signed(&datatype) { "TRUE" } else { "FALSE" }.to_string(),
        prog_min: lower_limit.clone(),
        prog_max: upper_limit.clone(),
        warn_min: lower_limit,
        warn_max: upper_limit,
        smoothing: "0".to_string(),
        enabled: "TRUE".to_string(),
        tabs: String::new(),
        assign_to: String::new(),
    };

    if debug {
        println!("Final output row: {:?}", row.fields());
        println!("=== End debug info ===\n");
    }

    row
}
