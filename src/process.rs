//! Per-mode request processing
//!
//! Every requested item is handled on its own: lookup failures and bad
//! address tokens print a notice and are skipped, so a run always produces
//! rows for whatever did resolve.

use crate::builder::build_row;
use crate::database::RecordSource;
use crate::humanize::humanize;
use crate::input::{parse_address, split_spec, RequestItem};
use crate::lookup::find_by_address;
use crate::types::OutputRow;

/// How command-line items are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    /// Items are measurement names
    Names,
    /// Items are ECU addresses
    Addresses,
}

/// Build rows for measurement-name requests, in request order
pub fn process_requests<S: RecordSource + ?Sized>(
    source: &S,
    items: &[RequestItem],
    debug: bool,
) -> Vec<OutputRow> {
    items
        .iter()
        .filter_map(|item| build_row(source, &item.key, &item.custom_name, debug))
        .collect()
}

/// Build rows for `name[:custom]` command-line specs
pub fn process_name_specs<S: RecordSource + ?Sized>(
    source: &S,
    specs: &[String],
    debug: bool,
) -> Vec<OutputRow> {
    let items: Vec<RequestItem> = specs
        .iter()
        .filter(|spec| spec.as_str() != "--debug")
        .map(|spec| split_spec(spec))
        .collect();
    process_requests(source, &items, debug)
}

/// Build rows for `address[:custom]` command-line specs. Measurements found
/// without a custom name get a humanized display name.
pub fn process_address_specs<S: RecordSource + ?Sized>(
    source: &S,
    specs: &[String],
    debug: bool,
) -> Vec<OutputRow> {
    let mut rows = Vec::new();

    for spec in specs.iter().filter(|spec| spec.as_str() != "--debug") {
        let item = split_spec(spec);

        let target = match parse_address(&item.key) {
            Ok(address) => address,
            Err(e) => {
                println!("Error: {e}");
                continue;
            }
        };

        let Some(param_name) = find_by_address(source, target, debug) else {
            println!("******** Could not find measurement at address {target:#x}");
            continue;
        };

        let custom_name = if item.custom_name.is_empty() {
            humanize(&param_name)
        } else {
            item.custom_name
        };

        if let Some(row) = build_row(source, &param_name, &custom_name, debug) {
            rows.push(row);
        }
    }

    rows
}

/// Dispatch command-line specs by mode
pub fn process_specs<S: RecordSource + ?Sized>(
    source: &S,
    mode: RequestMode,
    specs: &[String],
    debug: bool,
) -> Vec<OutputRow> {
    match mode {
        RequestMode::Names => process_name_specs(source, specs, debug),
        RequestMode::Addresses => process_address_specs(source, specs, debug),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use crate::types::Record;
    use serde_json::json;

    fn db() -> Database {
        Database::from_records(
            vec![
                Record::from_value(json!({"name": "n_tcha", "ecu_address": {"address": 0xb00095fc_u64}}))
                    .unwrap(),
                Record::from_value(json!({"name": "xyz_custom", "ecu_address": {"address": 0x20}}))
                    .unwrap(),
                Record::from_value(json!({"name": "RPM", "ecuAddress": 0x1000})).unwrap(),
            ],
            Vec::new(),
        )
    }

    fn specs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_name_specs_skip_unknown() {
        let rows = process_name_specs(&db(), &specs(&["RPM", "MISSING", "n_tcha:Turbo"]), false);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "RPM");
        assert_eq!(rows[1].name, "Turbo");
    }

    #[test]
    fn test_address_specs_humanize_names() {
        let rows = process_address_specs(
            &db(),
            &specs(&["0xb00095fc", "32", "0x1000:Engine"]),
            false,
        );
        let names: Vec<&str> = rows.iter().map(|row| row.name.as_str()).collect();
        assert_eq!(names, vec!["TurboSpeed", "Xyz Custom", "Engine"]);
        assert_eq!(rows[0].address, "0xb00095fc");
    }

    #[test]
    fn test_address_specs_skip_failures() {
        let rows = process_address_specs(
            &db(),
            &specs(&["0xdeadbeef", "not-an-address", "--debug", "0x1000"]),
            false,
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "EngineRPM");
    }

    #[test]
    fn test_rows_never_exceed_requests() {
        let requested = specs(&["RPM", "RPM", "nope"]);
        let rows = process_specs(&db(), RequestMode::Names, &requested, false);
        assert_eq!(rows.len(), 2);
        assert!(rows.len() <= requested.len());
    }
}
