//! A2L Measurement Library
//!
//! Extracts measurement metadata (name, unit, scaling equation, address,
//! format) from A2L calibration descriptions and renders the flat CSV that
//! calibration tools import.
//!
//! # Features
//!
//! - **`cli`** (default): Build the `a2lmeasurement` command-line binary
//!
//! # Quick Start
//!
//! Open a database and build rows for a few measurements:
//! ```rust,no_run
//! use a2l_measurement::{output_path, process_name_specs, write_rows, Database};
//! use std::path::Path;
//!
//! let stem = Path::new("engine");
//! let db = Database::open(stem, false).unwrap();
//! let specs = vec!["RPM".to_string(), "MAP:ManifoldPressure".to_string()];
//! let rows = process_name_specs(&db, &specs, false);
//! write_rows(&output_path(stem), &rows).unwrap();
//! println!("Processed {} measurements", rows.len());
//! ```
//!
//! Resolve a single field on a loosely shaped record:
//! ```rust
//! use a2l_measurement::{resolve, AddressField, Record};
//! use serde_json::json;
//!
//! let record = Record::from_value(json!({"ecuAddress": 0x10, "address": 0x20})).unwrap();
//! assert_eq!(resolve::<AddressField>(&record, false), Some(0x10));
//! ```
//!
//! # Public API
//!
//! ## Database
//! - [`Database`] - Parsed records, cached as `<stem>.a2ldb`
//! - [`RecordSource`] - Read-only record access used by the core
//! - [`import_a2l`] / [`import_a2l_file`] - Minimal A2L import
//!
//! ## Resolution
//! - [`resolve`] - Resolve a [`LogicalField`] by its ranked strategies
//! - [`resolve_compu_method`] - Follow a measurement's conversion reference
//! - [`invert`] - Render a linear rational function as an inverse formula
//! - [`humanize`] - Readable names for technical identifiers
//!
//! ## Rows
//! - [`build_row`] - Row for a named measurement
//! - [`find_by_address`] - Measurement name for an ECU address
//! - [`process_name_specs`], [`process_address_specs`], [`process_requests`]
//! - [`write_rows`] - Write the import CSV

// Module declarations
pub mod builder;
pub mod database;
pub mod equation;
pub mod error;
pub mod export;
pub mod humanize;
pub mod input;
pub mod lookup;
pub mod process;
pub mod resolve;
pub mod types;

// Re-export everything from modules for convenience
pub use builder::*;
pub use database::*;
pub use equation::*;
pub use error::*;
pub use export::*;
pub use humanize::*;
pub use input::*;
pub use lookup::*;
pub use process::*;
pub use resolve::*;
pub use types::*;
