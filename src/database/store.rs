use crate::database::import::import_a2l_file;
use crate::database::source::RecordSource;
use crate::error::{A2lError, Result};
use crate::types::{CompuMethodRecord, MeasurementRecord, Record};
use semver::Version;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Extension of the cached database file
pub const DATABASE_EXTENSION: &str = "a2ldb";

/// Extension of the raw A2L description file
pub const A2L_EXTENSION: &str = "a2l";

/// Parsed A2L records, persisted as a JSON document next to the A2L file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Database {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asap2_version: Option<String>,
    #[serde(default)]
    pub measurements: Vec<MeasurementRecord>,
    #[serde(default)]
    pub compu_methods: Vec<CompuMethodRecord>,
}

impl Database {
    pub fn from_records(
        measurements: Vec<MeasurementRecord>,
        compu_methods: Vec<CompuMethodRecord>,
    ) -> Self {
        Self {
            asap2_version: None,
            measurements,
            compu_methods,
        }
    }

    /// Open `<stem>.a2ldb` if present, otherwise import `<stem>.a2l` and
    /// cache the result as `<stem>.a2ldb`.
    pub fn open(stem: &Path, debug: bool) -> Result<Self> {
        let db_path = with_suffix(stem, DATABASE_EXTENSION);
        let a2l_path = with_suffix(stem, A2L_EXTENSION);

        if db_path.exists() {
            if debug {
                println!("Loading database: {}", db_path.display());
            }
            let db = Self::load(&db_path)?;
            db.print_summary(debug);
            return Ok(db);
        }

        if a2l_path.exists() {
            if debug {
                println!("Importing A2L file: {}", a2l_path.display());
            }
            let db = import_a2l_file(&a2l_path, debug)?;
            db.print_summary(debug);

            if let Err(e) = db.save(&db_path) {
                eprintln!(
                    "Warning: Could not write database cache {}: {}",
                    db_path.display(),
                    e
                );
            } else if debug {
                println!("Wrote database cache: {}", db_path.display());
            }
            return Ok(db);
        }

        Err(A2lError::NotFound(stem.to_path_buf()))
    }

    /// Read a database document
    pub fn load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Write the database document
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// ASAP2 version the records were imported from, when known
    pub fn version(&self) -> Option<Version> {
        self.asap2_version
            .as_deref()
            .and_then(|v| Version::parse(v).ok())
    }

    fn print_summary(&self, debug: bool) {
        if !debug {
            return;
        }
        match self.version() {
            Some(version) => println!("ASAP2 version: {version}"),
            None => println!("ASAP2 version: unknown"),
        }
        println!(
            "Database holds {} measurements and {} computation methods",
            self.measurements.len(),
            self.compu_methods.len()
        );
    }
}

impl RecordSource for Database {
    fn measurement(&self, name: &str) -> Option<&MeasurementRecord> {
        find_named(&self.measurements, name)
    }

    fn compu_method(&self, name: &str) -> Option<&CompuMethodRecord> {
        find_named(&self.compu_methods, name)
    }

    fn measurements(&self) -> &[MeasurementRecord] {
        &self.measurements
    }
}

fn find_named<'a>(records: &'a [Record], name: &str) -> Option<&'a Record> {
    records.iter().find(|record| record.name() == name)
}

/// Strip a trailing `.a2l` or `.a2ldb` so either file can be named on the
/// command line. Other paths are returned unchanged.
pub fn database_stem(path: &Path) -> PathBuf {
    let known = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext_lower = ext.to_ascii_lowercase();
            ext_lower == A2L_EXTENSION || ext_lower == DATABASE_EXTENSION
        })
        .unwrap_or(false);

    if known {
        path.with_extension("")
    } else {
        path.to_path_buf()
    }
}

/// `<stem>.<suffix>` without replacing dots already in the stem
pub fn with_suffix(stem: &Path, suffix: &str) -> PathBuf {
    let mut name = stem.as_os_str().to_os_string();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}
