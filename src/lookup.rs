//! Reverse lookup from ECU address to measurement name

use crate::database::RecordSource;
use crate::resolve::{resolve, LookupAddressField};

/// Name of the first measurement, in database order, whose address equals
/// `target`. Scans every record.
pub fn find_by_address<S: RecordSource + ?Sized>(
    source: &S,
    target: u64,
    debug: bool,
) -> Option<String> {
    if debug {
        println!("Searching for measurement at address: {target:#x}");
    }

    let found = source
        .measurements()
        .iter()
        .find(|measurement| resolve::<LookupAddressField>(measurement, false) == Some(target));

    match found {
        Some(measurement) => {
            if debug {
                println!(
                    "Found measurement: {} at address {target:#x}",
                    measurement.name()
                );
            }
            Some(measurement.name().to_string())
        }
        None => {
            if debug {
                println!("No measurement found at address {target:#x}");
            }
            None
        }
    }
}
