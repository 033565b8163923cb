use crate::types::{CompuMethodRecord, MeasurementRecord};

/// Read-only access to parsed A2L records
pub trait RecordSource {
    /// First measurement whose name matches exactly
    fn measurement(&self, name: &str) -> Option<&MeasurementRecord>;

    /// First computation method whose name matches exactly
    fn compu_method(&self, name: &str) -> Option<&CompuMethodRecord>;

    /// Every measurement, in database order
    fn measurements(&self) -> &[MeasurementRecord];
}
