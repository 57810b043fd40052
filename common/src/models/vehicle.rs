// common/src/models/vehicle.rs
use serde::{Deserialize, Serialize};

use super::trip::Trip;

/// Vehicle node returned by the identity service, enriched per request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub token_id: i64,
    #[serde(default)]
    pub earnings: Option<Earnings>,
    #[serde(default)]
    pub definition: Option<Definition>,
    #[serde(default)]
    pub aftermarket_device: Option<AftermarketDevice>,
    #[serde(default)]
    pub device_status_entries: Vec<DeviceDataEntry>,
    #[serde(default)]
    pub trips: Vec<Trip>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Earnings {
    #[serde(default)]
    pub total_tokens: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Definition {
    #[serde(default)]
    pub make: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub year: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AftermarketDevice {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub serial: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<Manufacturer>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manufacturer {
    pub name: String,
}

/// One flattened device signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDataEntry {
    pub signal_name: String,
    pub value: String,
    pub timestamp: String,
    pub source: String,
}

impl Vehicle {
    /// "2021 Ford F-150" style label, falling back to the token id
    pub fn display_name(&self) -> String {
        match &self.definition {
            Some(d) if !d.make.is_empty() => format!("{} {} {}", d.year, d.make, d.model),
            _ => format!("Vehicle #{}", self.token_id),
        }
    }
}
