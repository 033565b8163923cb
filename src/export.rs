//! CSV output for calibration-tool import

use crate::error::Result;
use crate::types::{OutputRow, OUTPUT_HEADER};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// `<stem>_params.csv`
pub fn output_path(stem: &Path) -> PathBuf {
    let mut name = stem.as_os_str().to_os_string();
    name.push("_params.csv");
    PathBuf::from(name)
}

/// Write the header and every row to `path`
pub fn write_rows(path: &Path, rows: &[OutputRow]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_rows_to(&mut writer, rows)?;
    writer.flush()?;
    Ok(())
}

/// Write the header and every row. The header is written even when there
/// are no rows.
pub fn write_rows_to<W: Write>(writer: W, rows: &[OutputRow]) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv_writer.write_record(OUTPUT_HEADER)?;
    for row in rows {
        csv_writer.write_record(row.fields())?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> OutputRow {
        OutputRow {
            name: "RPM".to_string(),
            equation: "No conversion available".to_string(),
            format: "0f".to_string(),
            address: "0x1000".to_string(),
            length: "2".to_string(),
            signed: "FALSE".to_string(),
            prog_min: "0".to_string(),
            prog_max: "0".to_string(),
            warn_min: "0".to_string(),
            warn_max: "0".to_string(),
            smoothing: "0".to_string(),
            enabled: "TRUE".to_string(),
            ..OutputRow::default()
        }
    }

    #[test]
    fn test_header_only_when_empty() {
        let mut buffer = Vec::new();
        write_rows_to(&mut buffer, &[]).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "Name,Unit,Equation,Format,Address,Length,Signed,ProgMin,ProgMax,WarnMin,WarnMax,Smoothing,Enabled,Tabs,Assign To\n"
        );
    }

    #[test]
    fn test_row_layout() {
        let mut buffer = Vec::new();
        write_rows_to(&mut buffer, &[sample_row()]).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "RPM,,No conversion available,0f,0x1000,2,FALSE,0,0,0,0,0,TRUE,,");
    }

    #[test]
    fn test_commas_are_quoted() {
        let mut row = sample_row();
        row.unit = "m/s,avg".to_string();
        let mut buffer = Vec::new();
        write_rows_to(&mut buffer, &[row]).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("RPM,\"m/s,avg\",No conversion available"));
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("data/engine")),
            PathBuf::from("data/engine_params.csv")
        );
    }
}
