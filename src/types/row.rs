use serde::{Deserialize, Serialize};

/// Column header of the calibration-tool import CSV
pub const OUTPUT_HEADER: [&str; 15] = [
    "Name",
    "Unit",
    "Equation",
    "Format",
    "Address",
    "Length",
    "Signed",
    "ProgMin",
    "ProgMax",
    "WarnMin",
    "WarnMax",
    "Smoothing",
    "Enabled",
    "Tabs",
    "Assign To",
];

/// One exported measurement. All values are already rendered as text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRow {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Unit")]
    pub unit: String,
    #[serde(rename = "Equation")]
    pub equation: String,
    #[serde(rename = "Format")]
    pub format: String,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "Length")]
    pub length: String,
    #[serde(rename = "Signed")]
    pub signed: String,
    #[serde(rename = "ProgMin")]
    pub prog_min: String,
    #[serde(rename = "ProgMax")]
    pub prog_max: String,
    #[serde(rename = "WarnMin")]
    pub warn_min: String,
    #[serde(rename = "WarnMax")]
    pub warn_max: String,
    #[serde(rename = "Smoothing")]
    pub smoothing: String,
    #[serde(rename = "Enabled")]
    pub enabled: String,
    #[serde(rename = "Tabs")]
    pub tabs: String,
    #[serde(rename = "Assign To")]
    pub assign_to: String,
}

impl OutputRow {
    /// Values in header order
    pub fn fields(&self) -> [&str; 15] {
        [
            &self.name,
            &self.unit,
            &self.equation,
            &self.format,
            &self.address,
            &self.length,
            &self.signed,
            &self.prog_min,
            &self.prog_max,
            &self.warn_min,
            &self.warn_max,
            &self.smoothing,
            &self.enabled,
            &self.tabs,
            &self.assign_to,
        ]
    }
}
