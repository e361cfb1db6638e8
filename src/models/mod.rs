use serde::{Deserialize, Serialize};

/// Result of one read cycle. Each register is independently optional: an
/// absent field means the meter's response carried no parseable group for
/// it, never that the transport failed (transport failures abort the read
/// before a reading exists).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeterReading {
    pub heat_energy: Option<f64>,
    pub volume: Option<f64>,
    pub hours_counter: Option<u32>,
}

impl MeterReading {
    /// True when no register could be extracted at all. Interpreting this
    /// case (bad IR alignment, wrong meter) is up to the caller.
    pub fn is_empty(&self) -> bool {
        self.heat_energy.is_none() && self.volume.is_none() && self.hours_counter.is_none()
    }
}
