use serde::{Deserialize, Serialize};

use super::{null_default, BusSummary, Identified, Ref};

wire_enum! {
    /// Whether a schedule is bookable
    pub enum ScheduleStatus {
        Active => "active",
        Inactive => "inactive",
    }
}

impl Default for ScheduleStatus {
    fn default() -> Self {
        ScheduleStatus::Active
    }
}

/// Origin and destination of a trip
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    #[serde(default, deserialize_with = "null_default")]
    pub from: String,

    #[serde(default, deserialize_with = "null_default")]
    pub to: String,
}

impl Route {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// `from → to`
    pub fn label(&self) -> String {
        format!("{} → {}", self.from, self.to)
    }
}

/// A dated departure of one bus on one route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(default, deserialize_with = "null_default")]
    pub route: Route,

    #[serde(rename = "busId", default, skip_serializing_if = "Option::is_none")]
    pub bus: Option<Ref<BusSummary>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(default, deserialize_with = "null_default")]
    pub departure_time: String,

    #[serde(default, deserialize_with = "null_default")]
    pub arrival_time: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,

    #[serde(default, deserialize_with = "null_default")]
    pub price: f64,

    #[serde(default, deserialize_with = "null_default")]
    pub available_seats: u32,

    #[serde(default, deserialize_with = "null_default")]
    pub status: ScheduleStatus,
}

impl Schedule {
    pub fn bus_id(&self) -> Option<&str> {
        self.bus.as_ref().map(Ref::id)
    }

    /// Name of the populated bus, if the backend sent one
    pub fn bus_name(&self) -> Option<&str> {
        self.bus
            .as_ref()
            .and_then(Ref::populated)
            .and_then(|bus| bus.name.as_deref())
    }
}

impl Identified for Schedule {
    fn id(&self) -> &str {
        &self.id
    }
}

/// A schedule reference as populated inside bookings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSummary {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_time: Option<String>,
}

impl Identified for ScheduleSummary {
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bus_reference_accepts_id_or_populated() {
        let bare: Schedule = serde_json::from_value(json!({
            "_id": "s1",
            "route": { "from": "Vientiane", "to": "Pakse" },
            "busId": "b1",
            "price": 150000,
            "availableSeats": 40,
            "status": "active"
        }))
        .unwrap();
        assert_eq!(bare.bus_id(), Some("b1"));
        assert_eq!(bare.bus_name(), None);

        let populated: Schedule = serde_json::from_value(json!({
            "_id": "s2",
            "route": { "from": "Vientiane", "to": "Luang Prabang" },
            "busId": { "_id": "b2", "name": "Northern Star", "company": "KVT" },
            "status": "inactive"
        }))
        .unwrap();
        assert_eq!(populated.bus_id(), Some("b2"));
        assert_eq!(populated.bus_name(), Some("Northern Star"));
        assert_eq!(populated.status, ScheduleStatus::Inactive);
        assert_eq!(populated.route.label(), "Vientiane → Luang Prabang");
    }
}
