use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::Counters;

/// One telemetry sample, produced once per publish tick and not retained
/// beyond it; history lives in the remote store.
///
/// Field names match the store's sensor-data wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub vibration_level: f64,
    pub actuator_voltage: f64,
    pub actuator_current: f64,
    pub power_consumption: f64,
    pub mass: f64,
    pub brightness: f64,
    pub good_product: u64,
    pub bad_product: u64,
    pub actuator_id: u32,
}

impl TelemetrySample {
    /// Sample for a stopped line: every sensor field is exactly zero while
    /// the counters pass through unchanged.
    pub fn quiescent(counters: Counters, actuator_id: u32, timestamp: OffsetDateTime) -> Self {
        Self {
            timestamp,
            vibration_level: 0.0,
            actuator_voltage: 0.0,
            actuator_current: 0.0,
            power_consumption: 0.0,
            mass: 0.0,
            brightness: 0.0,
            good_product: counters.good,
            bad_product: counters.bad,
            actuator_id,
        }
    }

    /// Whether every sensor field is zero.
    pub fn is_quiescent(&self) -> bool {
        self.vibration_level == 0.0
            && self.actuator_voltage == 0.0
            && self.actuator_current == 0.0
            && self.power_consumption == 0.0
            && self.mass == 0.0
            && self.brightness == 0.0
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn quiescent_zeroes_sensors_and_keeps_counters() {
        let at = datetime!(2024-05-01 12:00:00 UTC);
        let sample = TelemetrySample::quiescent(Counters { good: 4, bad: 1 }, 1, at);

        assert!(sample.is_quiescent());
        assert_eq!(sample.good_product, 4);
        assert_eq!(sample.bad_product, 1);
    }

    #[test]
    fn wire_shape() {
        let at = datetime!(2024-05-01 12:00:00 UTC);
        let sample = TelemetrySample::quiescent(Counters::default(), 3, at);
        let value = serde_json::to_value(&sample).unwrap();

        assert_eq!(value["timestamp"], "2024-05-01T12:00:00Z");
        assert_eq!(value["vibration_level"], 0.0);
        assert_eq!(value["good_product"], 0);
        assert_eq!(value["actuator_id"], 3);
    }
}
