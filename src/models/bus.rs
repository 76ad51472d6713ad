use serde::{Deserialize, Serialize};

use super::{null_default, Identified};

/// A vehicle operated by a company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bus {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(default, deserialize_with = "null_default")]
    pub name: String,

    /// Operating company
    #[serde(default, deserialize_with = "null_default")]
    pub company: String,

    #[serde(default, deserialize_with = "null_default")]
    pub license_plate: String,

    /// Seat capacity
    #[serde(default, deserialize_with = "null_default")]
    pub capacity: u32,

    /// Contact phone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Identified for Bus {
    fn id(&self) -> &str {
        &self.id
    }
}

/// A bus reference as populated inside schedules and bookings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusSummary {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

impl Identified for BusSummary {
    fn id(&self) -> &str {
        &self.id
    }
}
