// web-server/src/status.rs
//! Flattening of the raw device status document into display rows.

use common::models::vehicle::DeviceDataEntry;
use serde::Deserialize;
use serde_json::Value;

/// One raw signal as reported by the device data API
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignalReading {
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub timestamp: Option<Value>,
    #[serde(default)]
    pub source: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDeviceStatus {
    pub dtc: Option<SignalReading>,
    pub maf: Option<SignalReading>,
    pub vin: Option<SignalReading>,
    pub cell: Option<SignalReading>,
    pub hdop: Option<SignalReading>,
    pub nsat: Option<SignalReading>,
    pub wifi: Option<SignalReading>,
    pub speed: Option<SignalReading>,
    pub device: Option<SignalReading>,
    pub run_time: Option<SignalReading>,
    pub altitude: Option<SignalReading>,
    pub timestamp: Option<SignalReading>,
    pub engine_load: Option<SignalReading>,
    pub intake_temp: Option<SignalReading>,
    pub coolant_temp: Option<SignalReading>,
    pub engine_speed: Option<SignalReading>,
    pub throttle_position: Option<SignalReading>,
    pub long_term_fuel_trim1: Option<SignalReading>,
    pub barometric_pressure: Option<SignalReading>,
    pub short_term_fuel_trim1: Option<SignalReading>,
    pub accelerator_pedal_position_d: Option<SignalReading>,
    pub accelerator_pedal_position_e: Option<SignalReading>,
}

impl RawDeviceStatus {
    /// Every known signal in display order
    pub fn readings(&self) -> [(&'static str, Option<&SignalReading>); 22] {
        [
            ("dtc", self.dtc.as_ref()),
            ("maf", self.maf.as_ref()),
            ("vin", self.vin.as_ref()),
            ("cell", self.cell.as_ref()),
            ("hdop", self.hdop.as_ref()),
            ("nsat", self.nsat.as_ref()),
            ("wifi", self.wifi.as_ref()),
            ("speed", self.speed.as_ref()),
            ("device", self.device.as_ref()),
            ("runTime", self.run_time.as_ref()),
            ("altitude", self.altitude.as_ref()),
            ("timestamp", self.timestamp.as_ref()),
            ("engineLoad", self.engine_load.as_ref()),
            ("intakeTemp", self.intake_temp.as_ref()),
            ("coolantTemp", self.coolant_temp.as_ref()),
            ("engineSpeed", self.engine_speed.as_ref()),
            ("throttlePosition", self.throttle_position.as_ref()),
            ("longTermFuelTrim1", self.long_term_fuel_trim1.as_ref()),
            ("barometricPressure", self.barometric_pressure.as_ref()),
            ("shortTermFuelTrim1", self.short_term_fuel_trim1.as_ref()),
            ("acceleratorPedalPositionD", self.accelerator_pedal_position_d.as_ref()),
            ("acceleratorPedalPositionE", self.accelerator_pedal_position_e.as_ref()),
        ]
    }
}

fn display(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Flatten reported signals. Object values become one row per key (`signal.key`).
pub fn flatten(status: &RawDeviceStatus) -> Vec<DeviceDataEntry> {
    let mut entries = Vec::new();

    for (name, reading) in status.readings() {
        let Some(reading) = reading else { continue };
        let timestamp = display(reading.timestamp.as_ref());
        let source = display(reading.source.as_ref());

        match &reading.value {
            Some(Value::Object(fields)) => {
                for (key, value) in fields {
                    entries.push(DeviceDataEntry {
                        signal_name: format!("{}.{}", name, key),
                        value: display(Some(value)),
                        timestamp: timestamp.clone(),
                        source: source.clone(),
                    });
                }
            },
            value => entries.push(DeviceDataEntry {
                signal_name: name.to_string(),
                value: display(value.as_ref()),
                timestamp,
                source,
            }),
        }
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_scalar_nested_and_missing_values() {
        let status: RawDeviceStatus = serde_json::from_value(json!({
            "speed": { "value": 42.5, "timestamp": "2024-02-01T09:00:00Z", "source": "autopi" },
            "vin": { "value": "1FTFW1E50MFA00000", "timestamp": "t", "source": "smartcar" },
            "cell": { "value": { "ip": "10.0.0.1", "details": { "mcc": 262 } }, "timestamp": "t", "source": "autopi" },
            "altitude": { "timestamp": "t", "source": "autopi" }
        }))
        .unwrap();

        let entries = flatten(&status);
        let names: Vec<_> = entries.iter().map(|e| e.signal_name.as_str()).collect();

        // table order, nested keys sorted
        assert_eq!(names, vec!["vin", "cell.details", "cell.ip", "speed", "altitude"]);

        assert_eq!(entries[0].value, "1FTFW1E50MFA00000");
        assert_eq!(entries[1].value, r#"{"mcc":262}"#);
        assert_eq!(entries[2].value, "10.0.0.1");
        assert_eq!(entries[3].value, "42.5");
        assert_eq!(entries[3].source, "autopi");
        assert_eq!(entries[4].value, "");
        assert_eq!(entries[4].timestamp, "t");
    }

    #[test]
    fn test_empty_status_has_no_rows() {
        assert!(flatten(&RawDeviceStatus::default()).is_empty());
    }
}
