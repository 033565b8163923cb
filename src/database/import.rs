//! Minimal A2L import
//!
//! Only the blocks the measurement export needs are read: `ASAP2_VERSION`,
//! `MEASUREMENT` and `COMPU_METHOD`. Everything else, including `IF_DATA`
//! and `A2ML` payloads, is skipped. Imported blocks are stored with the
//! attribute names the field resolver already understands.

use crate::database::store::Database;
use crate::error::{A2lError, Result};
use crate::input::parse_address;
use crate::types::Record;
use regex::Regex;
use semver::Version;
use serde::Serialize;
use std::path::Path;

/// Token pattern: block comment, line comment, quoted string, bare word
const TOKEN_PATTERN: &str = r#"(?s)/\*.*?\*/|//[^\n]*|"(?:[^"\\]|\\.|"")*"|\S+"#;

#[derive(Debug, Clone, PartialEq)]
enum Token<'a> {
    Word(&'a str),
    Text(String),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MeasurementEntry {
    name: String,
    long_identifier: String,
    datatype: String,
    conversion: String,
    resolution: u64,
    accuracy: f64,
    lower_limit: f64,
    upper_limit: f64,
    #[serde(rename = "ecu_address", skip_serializing_if = "Option::is_none")]
    ecu_address: Option<AddressEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address_extension: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<FormatEntry>,
}

#[derive(Debug, Serialize)]
struct AddressEntry {
    address: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FormatEntry {
    format_string: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompuMethodEntry {
    name: String,
    long_identifier: String,
    conversion_type: String,
    format: String,
    unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    coeffs: Option<CoeffsEntry>,
    #[serde(rename = "coeffs_linear", skip_serializing_if = "Option::is_none")]
    coeffs_linear: Option<LinearCoeffsEntry>,
}

#[derive(Debug, Serialize)]
struct CoeffsEntry {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    f: f64,
}

#[derive(Debug, Serialize)]
struct LinearCoeffsEntry {
    a: f64,
    b: f64,
}

struct Cursor<'t, 'a> {
    tokens: &'t [Token<'a>],
    pos: usize,
}

impl<'t, 'a> Cursor<'t, 'a> {
    fn new(tokens: &'t [Token<'a>]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn next(&mut self) -> Option<&'t Token<'a>> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    fn word(&mut self, what: &str) -> Result<&'a str> {
        match self.next() {
            Some(Token::Word(word)) => Ok(*word),
            Some(Token::Text(text)) => Err(A2lError::Import(format!(
                "expected {what}, found string \"{text}\""
            ))),
            None => Err(A2lError::Import(format!(
                "expected {what}, found end of file"
            ))),
        }
    }

    /// Quoted string. Bare words are accepted for sloppy generators.
    fn text(&mut self, what: &str) -> Result<String> {
        match self.next() {
            Some(Token::Text(text)) => Ok(text.clone()),
            Some(Token::Word(word)) => Ok(word.to_string()),
            None => Err(A2lError::Import(format!(
                "expected {what}, found end of file"
            ))),
        }
    }

    fn integer(&mut self, what: &str) -> Result<u64> {
        let word = self.word(what)?;
        parse_address(word)
            .map_err(|_| A2lError::Import(format!("expected integer {what}, found '{word}'")))
    }

    /// Signed integer, decimal or `0x` hex with an optional leading `-`
    fn signed(&mut self, what: &str) -> Result<i64> {
        let word = self.word(what)?;
        let (negative, digits) = match word.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, word.strip_prefix('+').unwrap_or(word)),
        };
        parse_address(digits)
            .ok()
            .and_then(|v| i64::try_from(v).ok())
            .map(|v| if negative { -v } else { v })
            .ok_or_else(|| A2lError::Import(format!("expected integer {what}, found '{word}'")))
    }

    fn float(&mut self, what: &str) -> Result<f64> {
        let word = self.word(what)?;
        word.parse::<f64>()
            .or_else(|_| parse_address(word).map(|v| v as f64))
            .map_err(|_| A2lError::Import(format!("expected number {what}, found '{word}'")))
    }

    /// Skip to the `/end` matching a `/begin <name>` that was just read
    fn skip_block(&mut self, name: &str) -> Result<()> {
        let mut depth = 1usize;
        while let Some(token) = self.next() {
            match token {
                Token::Word("/begin") => {
                    self.word("block name")?;
                    depth += 1;
                }
                Token::Word("/end") => {
                    self.word("block name")?;
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                _ => {}
            }
        }
        Err(A2lError::Import(format!("unterminated /begin {name}")))
    }

    /// Consume the block name after `/end`, which must close `name`
    fn end_block(&mut self, name: &str) -> Result<()> {
        let closing = self.word("block name")?;
        if closing != name {
            return Err(A2lError::Import(format!(
                "/begin {name} closed by /end {closing}"
            )));
        }
        Ok(())
    }
}

/// Import an A2L file. Bytes that are not UTF-8 are decoded lossily.
pub fn import_a2l_file(path: &Path, debug: bool) -> Result<Database> {
    let bytes = std::fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes);
    import_a2l(&text, debug)
}

/// Import measurements and computation methods from A2L text
pub fn import_a2l(text: &str, debug: bool) -> Result<Database> {
    // Latin-1 degree signs come through lossy decoding as U+FFFD
    let text = fix_degree(text);
    let tokens = tokenize(&text)?;
    let mut cursor = Cursor::new(&tokens);
    let mut db = Database::default();

    while let Some(token) = cursor.next() {
        match token {
            Token::Word("/begin") => match cursor.word("block name")? {
                "MEASUREMENT" => {
                    let entry = parse_measurement(&mut cursor)?;
                    db.measurements.push(into_record(&entry)?);
                }
                "COMPU_METHOD" => {
                    let entry = parse_compu_method(&mut cursor)?;
                    db.compu_methods.push(into_record(&entry)?);
                }
                block @ ("A2ML" | "IF_DATA") => cursor.skip_block(block)?,
                // PROJECT, MODULE and friends only contain other blocks
                _ => {}
            },
            Token::Word("ASAP2_VERSION") => {
                let major = cursor.integer("ASAP2 major version")?;
                let minor = cursor.integer("ASAP2 minor version")?;
                db.asap2_version = Some(Version::new(major, minor, 0).to_string());
            }
            _ => {}
        }
    }

    if debug {
        println!(
            "Imported {} measurements and {} computation methods",
            db.measurements.len(),
            db.compu_methods.len()
        );
    }

    Ok(db)
}

/// Replace the Unicode replacement character with a degree sign
pub fn fix_degree(text: &str) -> String {
    text.replace('\u{FFFD}', "\u{00B0}")
}

fn tokenize(text: &str) -> Result<Vec<Token<'_>>> {
    let pattern = Regex::new(TOKEN_PATTERN).map_err(|e| A2lError::Import(e.to_string()))?;

    Ok(pattern
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|s| !s.starts_with("/*") && !s.starts_with("//"))
        .map(|s| {
            if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
                Token::Text(unescape(&s[1..s.len() - 1]))
            } else {
                Token::Word(s)
            }
        })
        .collect())
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        let next = chars.peek().copied();
        match (c, next) {
            ('\\', Some('"')) | ('\\', Some('\\')) | ('"', Some('"')) => {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            _ => out.push(c),
        }
    }
    out
}

fn parse_measurement(cursor: &mut Cursor) -> Result<MeasurementEntry> {
    let name = cursor.word("measurement name")?.to_string();
    let context = |e: A2lError| match e {
        A2lError::Import(msg) => A2lError::Import(format!("MEASUREMENT {name}: {msg}")),
        other => other,
    };

    let mut entry = MeasurementEntry {
        long_identifier: cursor.text("long identifier").map_err(context)?,
        datatype: cursor.word("datatype").map_err(context)?.to_string(),
        conversion: cursor.word("conversion").map_err(context)?.to_string(),
        resolution: cursor.integer("resolution").map_err(context)?,
        accuracy: cursor.float("accuracy").map_err(context)?,
        lower_limit: cursor.float("lower limit").map_err(context)?,
        upper_limit: cursor.float("upper limit").map_err(context)?,
        ecu_address: None,
        address_extension: None,
        format: None,
        name: name.clone(),
    };

    loop {
        match cursor.next() {
            Some(Token::Word("/end")) => {
                cursor.end_block("MEASUREMENT").map_err(context)?;
                return Ok(entry);
            }
            Some(Token::Word("/begin")) => {
                let block = cursor.word("block name").map_err(context)?;
                cursor.skip_block(block).map_err(context)?;
            }
            Some(Token::Word("ECU_ADDRESS")) => {
                let address = cursor.integer("ECU address").map_err(context)?;
                entry.ecu_address = Some(AddressEntry { address });
            }
            Some(Token::Word("ECU_ADDRESS_EXTENSION")) => {
                entry.address_extension =
                    Some(cursor.signed("address extension").map_err(context)?);
            }
            Some(Token::Word("FORMAT")) => {
                let format_string = cursor.text("format string").map_err(context)?;
                entry.format = Some(FormatEntry { format_string });
            }
            Some(_) => {}
            None => return Err(context(A2lError::Import("missing /end MEASUREMENT".into()))),
        }
    }
}

fn parse_compu_method(cursor: &mut Cursor) -> Result<CompuMethodEntry> {
    let name = cursor.word("computation method name")?.to_string();
    let context = |e: A2lError| match e {
        A2lError::Import(msg) => A2lError::Import(format!("COMPU_METHOD {name}: {msg}")),
        other => other,
    };

    let mut entry = CompuMethodEntry {
        long_identifier: cursor.text("long identifier").map_err(context)?,
        conversion_type: cursor.word("conversion type").map_err(context)?.to_string(),
        format: cursor.text("format").map_err(context)?,
        unit: cursor.text("unit").map_err(context)?,
        coeffs: None,
        coeffs_linear: None,
        name: name.clone(),
    };

    loop {
        match cursor.next() {
            Some(Token::Word("/end")) => {
                cursor.end_block("COMPU_METHOD").map_err(context)?;
                return Ok(entry);
            }
            Some(Token::Word("/begin")) => {
                let block = cursor.word("block name").map_err(context)?;
                cursor.skip_block(block).map_err(context)?;
            }
            Some(Token::Word("COEFFS")) => {
                let mut read = |key: &str| cursor.float(&format!("coefficient {key}"));
                entry.coeffs = Some(CoeffsEntry {
                    a: read("a").map_err(context)?,
                    b: read("b").map_err(context)?,
                    c: read("c").map_err(context)?,
                    d: read("d").map_err(context)?,
                    e: read("e").map_err(context)?,
                    f: read("f").map_err(context)?,
                });
            }
            Some(Token::Word("COEFFS_LINEAR")) => {
                let a = cursor.float("coefficient a").map_err(context)?;
                let b = cursor.float("coefficient b").map_err(context)?;
                entry.coeffs_linear = Some(LinearCoeffsEntry { a, b });
            }
            Some(_) => {}
            None => return Err(context(A2lError::Import("missing /end COMPU_METHOD".into()))),
        }
    }
}

fn into_record<T: Serialize>(entry: &T) -> Result<Record> {
    Record::from_value(serde_json::to_value(entry)?)
        .ok_or_else(|| A2lError::Import("imported block is not an object".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::RecordSource;
    use serde_json::json;

    const SAMPLE: &str = r#"
ASAP2_VERSION 1 71
/begin PROJECT demo ""
  /begin MODULE engine "Engine ECU"
    /begin A2ML
      struct Protocol_Layer { uint; };
    /end A2ML
    /* a block comment with /begin MEASUREMENT inside */
    /begin MEASUREMENT n_tcha "Turbo speed" UWORD CM_RPM 0 0 0 250000
      ECU_ADDRESS 0xB00095FC
      FORMAT "%7.0"
      /begin IF_DATA XCP
        /begin DAQ_EVENT FIXED_EVENT_LIST EVENT 0x1 /end DAQ_EVENT
      /end IF_DATA
    /end MEASUREMENT
    /begin MEASUREMENT t_cool "Coolant \"temp\"" SBYTE CM_TEMP 0 0 -40 215
      ECU_ADDRESS 4096 // trailing comment
      ECU_ADDRESS_EXTENSION 0x1
    /end MEASUREMENT
    /begin COMPU_METHOD CM_RPM "" RAT_FUNC "%6.1" "rpm"
      COEFFS 0 1 0 0 0 1
    /end COMPU_METHOD
    /begin COMPU_METHOD CM_TEMP "" LINEAR "%4.1" "degC"
      COEFFS_LINEAR 1 -40
    /end COMPU_METHOD
    /begin COMPU_METHOD CM_GEAR "" TAB_VERB "%1.0" ""
      COMPU_TAB_REF TAB_GEAR
    /end COMPU_METHOD
  /end MODULE
/end PROJECT
"#;

    #[test]
    fn test_import_sample() {
        let db = import_a2l(SAMPLE, false).unwrap();
        assert_eq!(db.asap2_version.as_deref(), Some("1.71.0"));
        assert_eq!(db.measurements.len(), 2);
        assert_eq!(db.compu_methods.len(), 3);

        let rpm = db.measurement("n_tcha").unwrap();
        assert_eq!(rpm.get("datatype"), Some(&json!("UWORD")));
        assert_eq!(rpm.get("conversion"), Some(&json!("CM_RPM")));
        assert_eq!(rpm.get("ecu_address"), Some(&json!({"address": 0xB000_95FC_u64})));
        assert_eq!(rpm.get("format"), Some(&json!({"formatString": "%7.0"})));
        assert_eq!(rpm.get("upperLimit"), Some(&json!(250000.0)));

        let cool = db.measurement("t_cool").unwrap();
        assert_eq!(cool.get("longIdentifier"), Some(&json!("Coolant \"temp\"")));
        assert_eq!(cool.get("lowerLimit"), Some(&json!(-40.0)));
        assert_eq!(cool.get("addressExtension"), Some(&json!(1)));
        assert!(cool.get("format").is_none());

        let cm = db.compu_method("CM_RPM").unwrap();
        assert_eq!(cm.get("unit"), Some(&json!("rpm")));
        assert_eq!(
            cm.get("coeffs"),
            Some(&json!({"a": 0.0, "b": 1.0, "c": 0.0, "d": 0.0, "e": 0.0, "f": 1.0}))
        );

        let cm = db.compu_method("CM_TEMP").unwrap();
        assert_eq!(cm.get("coeffs_linear"), Some(&json!({"a": 1.0, "b": -40.0})));
        assert!(cm.get("coeffs").is_none());

        // Table conversions carry no coefficients and nothing else is kept
        let cm = db.compu_method("CM_GEAR").unwrap();
        assert_eq!(cm.get("conversionType"), Some(&json!("TAB_VERB")));
        assert!(cm.get("coeffs").is_none());
        assert!(cm.get("compuTabRef").is_none());
    }

    #[test]
    fn test_negative_address_extension() {
        let text = "\
/begin MEASUREMENT A \"\" UWORD NO_COMPU_METHOD 0 0 0 100
  ECU_ADDRESS 0x10
  ECU_ADDRESS_EXTENSION -1
/end MEASUREMENT
/begin MEASUREMENT B \"\" UWORD NO_COMPU_METHOD 0 0 0 100
  ECU_ADDRESS 0x20
  ECU_ADDRESS_EXTENSION -0x2
/end MEASUREMENT";
        let db = import_a2l(text, false).unwrap();
        assert_eq!(db.measurements.len(), 2);

        let a = db.measurement("A").unwrap();
        assert_eq!(a.get("addressExtension"), Some(&json!(-1)));
        assert_eq!(a.get("ecu_address"), Some(&json!({"address": 0x10})));

        let b = db.measurement("B").unwrap();
        assert_eq!(b.get("addressExtension"), Some(&json!(-2)));
        assert_eq!(b.get("ecu_address"), Some(&json!({"address": 0x20})));
    }

    #[test]
    fn test_tokenize_strings_and_comments() {
        let tokens = tokenize(r#"A "b c" /* x */ "say ""hi""" // gone"#).unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Word("A"),
                Token::Text("b c".to_string()),
                Token::Text("say \"hi\"".to_string()),
            ]
        );
    }

    #[test]
    fn test_unterminated_measurement() {
        let result = import_a2l("/begin MEASUREMENT X \"\" UWORD NO_COMPU_METHOD 0 0 0 1", false);
        match result {
            Err(A2lError::Import(msg)) => assert!(msg.contains("MEASUREMENT X")),
            other => panic!("expected import error, got {other:?}"),
        }
    }

    #[test]
    fn test_mismatched_end() {
        let result = import_a2l(
            "/begin MEASUREMENT X \"\" UWORD NO_COMPU_METHOD 0 0 0 1 /end CHARACTERISTIC",
            false,
        );
        assert!(matches!(result, Err(A2lError::Import(_))));
    }

    #[test]
    fn test_bad_number() {
        let result = import_a2l(
            "/begin MEASUREMENT X \"\" UWORD NO_COMPU_METHOD zero 0 0 1 /end MEASUREMENT",
            false,
        );
        assert!(matches!(result, Err(A2lError::Import(_))));
    }

    #[test]
    fn test_latin1_degree_sign() {
        let mut bytes = b"/begin COMPU_METHOD CM \"\" LINEAR \"%4.1\" \"".to_vec();
        bytes.push(0xB0);
        bytes.extend_from_slice(b"C\" /end COMPU_METHOD");

        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("latin1.a2l");
        std::fs::write(&path, bytes).unwrap();

        let db = import_a2l_file(&path, false).unwrap();
        assert_eq!(db.compu_method("CM").unwrap().get("unit"), Some(&json!("°C")));
    }
}
