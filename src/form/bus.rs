use serde::Serialize;
use serde_json::Value;

use super::{parse_count, required, Draft, FormMode};
use crate::error::Result;
use crate::models::Bus;

/// Editable bus fields. Capacity is kept as typed until submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusDraft {
    pub name: String,
    pub company: String,
    pub license_plate: String,
    pub capacity: String,
    pub phone: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BusPayload<'a> {
    name: &'a str,
    company: &'a str,
    license_plate: &'a str,
    capacity: u32,
    phone: &'a str,
}

impl Draft for BusDraft {
    type Record = Bus;

    fn from_record(bus: &Bus) -> Self {
        Self {
            name: bus.name.clone(),
            company: bus.company.clone(),
            license_plate: bus.license_plate.clone(),
            capacity: bus.capacity.to_string(),
            phone: bus.phone.clone().unwrap_or_default(),
        }
    }

    fn payload(&self, _mode: &FormMode) -> Result<Value> {
        let payload = BusPayload {
            name: required("Name", &self.name)?,
            company: required("Company", &self.company)?,
            license_plate: required("License plate", &self.license_plate)?,
            capacity: parse_count("Capacity", &self.capacity)?,
            phone: self.phone.trim(),
        };
        Ok(serde_json::to_value(payload)?)
    }
}
