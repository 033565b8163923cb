//! Request parsing: `name[:custom]` specs, address tokens and request CSVs

use crate::error::{A2lError, Result};
use std::path::Path;

/// Column holding the measurement name in a request CSV
pub const PARAM_NAME_COLUMN: &str = "Param Name";

/// Column holding the optional display name in a request CSV
pub const CUSTOM_NAME_COLUMN: &str = "Custom Name";

/// One requested item: a measurement name or an address token, plus the
/// optional display name to export it under.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestItem {
    pub key: String,
    pub custom_name: String,
}

impl RequestItem {
    pub fn new(key: impl Into<String>, custom_name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            custom_name: custom_name.into(),
        }
    }
}

/// Split `item[:custom name]` on the first colon
pub fn split_spec(spec: &str) -> RequestItem {
    match spec.split_once(':') {
        Some((key, custom_name)) => RequestItem::new(key, custom_name),
        None => RequestItem::new(spec, ""),
    }
}

/// Parse an address token: `0x`/`0X` prefix means hexadecimal, anything
/// else must be decimal.
pub fn parse_address(token: &str) -> Result<u64> {
    let parsed = match token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => token.parse::<u64>(),
    };
    parsed.map_err(|_| A2lError::InvalidAddress(token.to_string()))
}

/// Read requests from a CSV file with `Param Name` and `Custom Name`
/// columns. A UTF-8 byte-order mark is ignored.
pub fn read_request_csv(path: &Path) -> Result<Vec<RequestItem>> {
    let content = std::fs::read_to_string(path)?;
    parse_request_csv(&content)
}

/// Parse request CSV text. `Custom Name` may be missing entirely.
pub fn parse_request_csv(content: &str) -> Result<Vec<RequestItem>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h == name);
    let name_index = column(PARAM_NAME_COLUMN)
        .ok_or_else(|| A2lError::MissingColumn(PARAM_NAME_COLUMN.to_string()))?;
    let custom_index = column(CUSTOM_NAME_COLUMN);

    let mut items = Vec::new();
    for record in reader.records() {
        let record = record?;
        let key = record.get(name_index).unwrap_or("");
        let custom_name = custom_index
            .and_then(|index| record.get(index))
            .unwrap_or("");
        items.push(RequestItem::new(key, custom_name));
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_spec() {
        assert_eq!(split_spec("RPM"), RequestItem::new("RPM", ""));
        assert_eq!(
            split_spec("MAP:ManifoldPressure"),
            RequestItem::new("MAP", "ManifoldPressure")
        );
        // Only the first colon separates
        assert_eq!(split_spec("A:B:C"), RequestItem::new("A", "B:C"));
        assert_eq!(split_spec("0x10:"), RequestItem::new("0x10", ""));
    }

    #[test]
    fn test_parse_address() {
        assert_eq!(parse_address("0xb00095fc").unwrap(), 0xb000_95fc);
        assert_eq!(parse_address("0XABCDEF00").unwrap(), 0xabcd_ef00);
        assert_eq!(parse_address("4096").unwrap(), 4096);
        assert!(matches!(
            parse_address("b00095fc"),
            Err(A2lError::InvalidAddress(_))
        ));
        assert!(parse_address("0x").is_err());
        assert!(parse_address("-1").is_err());
        assert!(parse_address("").is_err());
    }

    #[test]
    fn test_parse_request_csv_with_bom() {
        let content = "\u{feff}Param Name,Custom Name\nRPM,\nn_tcha,TurboSpeed\n";
        let items = parse_request_csv(content).unwrap();
        assert_eq!(
            items,
            vec![
                RequestItem::new("RPM", ""),
                RequestItem::new("n_tcha", "TurboSpeed"),
            ]
        );
    }

    #[test]
    fn test_parse_request_csv_column_order() {
        let content = "Custom Name,Param Name\nBoost,p_boost\n";
        let items = parse_request_csv(content).unwrap();
        assert_eq!(items, vec![RequestItem::new("p_boost", "Boost")]);
    }

    #[test]
    fn test_parse_request_csv_without_custom_column() {
        let items = parse_request_csv("Param Name\nRPM\nMAP\n").unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|item| item.custom_name.is_empty()));
    }

    #[test]
    fn test_parse_request_csv_missing_name_column() {
        let result = parse_request_csv("Name,Custom Name\nRPM,\n");
        assert!(matches!(result, Err(A2lError::MissingColumn(_))));
    }
}
