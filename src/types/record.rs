use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A loosely shaped record from the measurement database.
///
/// Field names and nesting drift between A2L tool versions, so records keep
/// their raw JSON object and are interpreted by the field resolver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

/// Measurement entry (`MEASUREMENT` block)
pub type MeasurementRecord = Record;

/// Computation method entry (`COMPU_METHOD` block)
pub type CompuMethodRecord = Record;

impl Record {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Wrap a JSON value, which must be an object
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    /// Look up an attribute. JSON `null` counts as absent.
    pub fn get(&self, attr: &str) -> Option<&Value> {
        self.fields.get(attr).filter(|value| !value.is_null())
    }

    /// Record name, empty when the record carries none
    pub fn name(&self) -> &str {
        self.fields
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("")
    }

    /// Attribute names in storage order, used by debug traces
    pub fn attribute_names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }
}
