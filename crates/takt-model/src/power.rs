use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Authoritative run-state record fetched from the store's power history.
///
/// The wire record carries more (timestamp, reason, a telemetry snapshot);
/// only the monotonic id and the status matter for reconciliation, so the
/// rest is ignored on deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerRecord {
    pub id: u64,
    pub status: bool,
}

impl PowerRecord {
    /// The record with the greatest id, if any.
    ///
    /// The store returns its history in insertion order, but a late or
    /// reordered response must not pick a stale record, so selection is by
    /// id rather than by position.
    pub fn newest(records: &[PowerRecord]) -> Option<PowerRecord> {
        records.iter().copied().max_by_key(|r| r.id)
    }
}

/// Record appended to the store's power history after a command-driven
/// transition, carrying the safe default snapshot the store schema expects
/// alongside the status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerStateReport {
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub status: bool,
    pub reason: String,
    pub voltage: f64,
    pub vibration: bool,
    pub current: f64,
    pub power_consumption: f64,
}

impl PowerStateReport {
    /// Report for an operator-driven transition.
    pub fn manual(status: bool, timestamp: OffsetDateTime) -> Self {
        let reason = if status {
            "Manual activation"
        } else {
            "Manual deactivation"
        };

        Self {
            timestamp,
            status,
            reason: reason.to_string(),
            voltage: 0.0,
            vibration: true,
            current: 0.0,
            power_consumption: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn tolerates_extra_wire_fields() {
        let json = r#"{
            "id": 12,
            "timestamp": "2024-05-01T12:00:00Z",
            "status": true,
            "reason": "Manual activation",
            "voltage": 0.0
        }"#;

        let record: PowerRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record, PowerRecord { id: 12, status: true });
    }

    #[test]
    fn newest_picks_greatest_id() {
        let records = [
            PowerRecord { id: 3, status: true },
            PowerRecord { id: 9, status: false },
            PowerRecord { id: 7, status: true },
        ];

        assert_eq!(
            PowerRecord::newest(&records),
            Some(PowerRecord { id: 9, status: false })
        );
        assert_eq!(PowerRecord::newest(&[]), None);
    }

    #[test]
    fn manual_report_reason_follows_status() {
        let at = datetime!(2024-05-01 12:00:00 UTC);

        let on = PowerStateReport::manual(true, at);
        assert_eq!(on.reason, "Manual activation");
        assert!(on.vibration);

        let off = PowerStateReport::manual(false, at);
        assert_eq!(off.reason, "Manual deactivation");
        assert_eq!(off.voltage, 0.0);
    }
}
