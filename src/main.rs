use a2l_measurement::{
    database_stem, output_path, process_requests, process_specs, read_request_csv, write_rows,
    A2lError, Database, RequestMode,
};
use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{Arg, Command};
use std::path::Path;

const EXAMPLES: &str = "\
Examples:
  a2lmeasurement engine.a2l --csv measurements.csv
  a2lmeasurement engine.a2l RPM MAP:ManifoldPressure LAMBDA
  a2lmeasurement engine.a2l n_tcha:TurboSpeed --debug
  a2lmeasurement engine.a2l --addr 0xb00095fc:TurboSpeed
  a2lmeasurement engine.a2l --addr 0x12345678 0xABCDEF00:CustomName";

fn build_command() -> Command {
    Command::new("A2L Measurement Export")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Export A2L measurement metadata to a calibration-tool import CSV (<file>_params.csv).")
        .after_help(EXAMPLES)
        .arg(
            Arg::new("file")
                .help("A2L file or database stem. Opens <file>.a2ldb if present, otherwise imports <file>.a2l")
                .required(false)
                .index(1),
        )
        .arg(
            Arg::new("items")
                .help("Measurement names, or ECU addresses with --addr. Append :CustomName to rename a row")
                .num_args(1..)
                .index(2),
        )
        .arg(
            Arg::new("csv")
                .long("csv")
                .help("Read measurement names from a CSV file with 'Param Name' and 'Custom Name' columns")
                .value_name("CSV_FILE"),
        )
        .arg(
            Arg::new("addr")
                .long("addr")
                .help("Look up measurements by ECU address (hex 0x1234ABCD or decimal)")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Enable debug output to troubleshoot attribute resolution")
                .action(clap::ArgAction::SetTrue),
        )
}

/// Print the problem and usage, then exit with status 1
fn usage_error(message: &str) -> ! {
    eprintln!("Error: {message}");
    eprintln!();
    let _ = build_command().print_help();
    println!();
    std::process::exit(1);
}

fn main() -> Result<()> {
    let matches = match build_command().try_get_matches() {
        Ok(matches) => matches,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                let _ = e.print();
                usage_error("invalid arguments");
            }
        },
    };

    let debug = matches.get_flag("debug");
    let address_mode = matches.get_flag("addr");
    let csv_file = matches.get_one::<String>("csv");
    let items: Vec<String> = matches
        .get_many::<String>("items")
        .map(|items| items.cloned().collect())
        .unwrap_or_default();

    let Some(file) = matches.get_one::<String>("file") else {
        usage_error("missing A2L file argument");
    };

    if debug {
        println!(
            "a2lmeasurement {} ({})",
            env!("CARGO_PKG_VERSION"),
            option_env!("VERGEN_GIT_SHA").unwrap_or("unknown")
        );
    }

    // Validate arguments before touching any file
    if let Some(csv_file) = csv_file {
        if !Path::new(csv_file).exists() {
            usage_error(&format!("CSV file not found: {csv_file}"));
        }
        if !items.is_empty() {
            eprintln!("Warning: Ignoring {} extra arguments in --csv mode", items.len());
        }
    } else if items.is_empty() {
        if address_mode {
            usage_error("--addr option requires at least one address argument");
        }
        usage_error("no measurement names given");
    }

    let stem = database_stem(Path::new(file));

    println!("Opening A2l as database");
    let db = match Database::open(&stem, debug) {
        Ok(db) => db,
        Err(e @ A2lError::NotFound(_)) => usage_error(&e.to_string()),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to open A2L database for {file}"));
        }
    };
    println!("A2l Opened as database");

    let rows = if let Some(csv_file) = csv_file {
        println!("Processing measurements from CSV file: {csv_file}");
        if debug {
            println!("Debug mode enabled");
        }
        let requests = match read_request_csv(Path::new(csv_file)) {
            Ok(requests) => requests,
            Err(e @ A2lError::MissingColumn(_)) => usage_error(&e.to_string()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read CSV file: {csv_file}"));
            }
        };
        process_requests(&db, &requests, debug)
    } else {
        let mode = if address_mode {
            println!("Processing measurements from ECU addresses");
            RequestMode::Addresses
        } else {
            println!("Processing measurements from command line arguments");
            RequestMode::Names
        };
        if debug {
            println!("Debug mode enabled");
        }
        process_specs(&db, mode, &items, debug)
    };

    let output_filename = output_path(&stem);
    write_rows(&output_filename, &rows)
        .with_context(|| format!("Failed to write output CSV file: {output_filename:?}"))?;

    println!("Output written to: {}", output_filename.display());
    println!("Processed {} measurements", rows.len());

    Ok(())
}
