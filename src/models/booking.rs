use serde::{Deserialize, Serialize};

use super::{
    null_default, string_or_number, BusSummary, Identified, Ref, ScheduleSummary, UserSummary,
};

wire_enum! {
    /// Payment state of a booking
    pub enum PaymentStatus {
        Pending => "pending",
        Completed => "completed",
        Refunded => "refunded",
    }
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

wire_enum! {
    /// Lifecycle state of a booking
    pub enum BookingStatus {
        Booked => "booked",
        Cancelled => "cancelled",
        Completed => "completed",
        Expired => "expired",
    }
}

/// Passenger details captured at booking time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PassengerDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// A seat reservation with a snapshot of the route it was made on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Ref<UserSummary>>,

    #[serde(rename = "busId", default, skip_serializing_if = "Option::is_none")]
    pub bus: Option<Ref<BusSummary>>,

    #[serde(rename = "scheduleId", default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Ref<ScheduleSummary>>,

    #[serde(default, deserialize_with = "null_default")]
    pub departure_station: String,

    #[serde(default, deserialize_with = "null_default")]
    pub arrival_station: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_time: Option<String>,

    #[serde(default, deserialize_with = "string_or_number")]
    pub seat_number: String,

    #[serde(default, deserialize_with = "null_default")]
    pub price: f64,

    #[serde(default, deserialize_with = "null_default")]
    pub payment_status: PaymentStatus,

    pub status: BookingStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passenger_details: Option<PassengerDetails>,
}

impl Booking {
    /// Populated username, else the captured passenger name
    pub fn passenger_name(&self) -> Option<&str> {
        self.user
            .as_ref()
            .and_then(Ref::populated)
            .and_then(|user| user.username.as_deref())
            .or_else(|| {
                self.passenger_details
                    .as_ref()
                    .and_then(|details| details.name.as_deref())
            })
    }

    pub fn bus_id(&self) -> Option<&str> {
        self.bus.as_ref().map(Ref::id)
    }

    pub fn bus_name(&self) -> Option<&str> {
        self.bus
            .as_ref()
            .and_then(Ref::populated)
            .and_then(|bus| bus.name.as_deref())
    }

    pub fn schedule_id(&self) -> Option<&str> {
        self.schedule.as_ref().map(Ref::id)
    }

    /// `departure → arrival` from the route snapshot
    pub fn route_label(&self) -> String {
        format!("{} → {}", self.departure_station, self.arrival_station)
    }

    /// Quick row actions apply only while the seat is still held
    pub fn is_open(&self) -> bool {
        self.status == BookingStatus::Booked
    }
}

impl Identified for Booking {
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserialize_populated_booking() {
        let booking: Booking = serde_json::from_value(json!({
            "_id": "665f1c2ab93e4d0012a7c9e1",
            "userId": { "_id": "u1", "username": "noy" },
            "busId": { "_id": "b1", "name": "Vientaine-Paksun", "company": "Sabaidee" },
            "departureStation": "Vientiane",
            "arrivalStation": "Pakse",
            "departureTime": "2025-12-02T20:00:00.000Z",
            "seatNumber": 12,
            "price": 180000,
            "status": "booked"
        }))
        .unwrap();

        assert_eq!(booking.passenger_name(), Some("noy"));
        assert_eq!(booking.bus_name(), Some("Vientaine-Paksun"));
        assert_eq!(booking.seat_number, "12");
        assert_eq!(booking.payment_status, PaymentStatus::Pending);
        assert_eq!(booking.route_label(), "Vientiane → Pakse");
        assert!(booking.is_open());
    }

    #[test]
    fn passenger_name_falls_back_to_details() {
        let booking: Booking = serde_json::from_value(json!({
            "_id": "b-2",
            "userId": "u9",
            "passengerDetails": { "name": "Vilay" },
            "seatNumber": "A3",
            "paymentStatus": "refunded",
            "status": "cancelled"
        }))
        .unwrap();

        assert_eq!(booking.passenger_name(), Some("Vilay"));
        assert_eq!(booking.seat_number, "A3");
        assert_eq!(booking.payment_status, PaymentStatus::Refunded);
        assert!(!booking.is_open());
    }

    #[test]
    fn null_fields_read_as_defaults() {
        let booking: Booking = serde_json::from_value(json!({
            "_id": "b-3",
            "departureStation": null,
            "seatNumber": null,
            "price": null,
            "paymentStatus": null,
            "status": "booked"
        }))
        .unwrap();

        assert_eq!(booking.departure_station, "");
        assert_eq!(booking.seat_number, "");
        assert_eq!(booking.price, 0.0);
        assert_eq!(booking.payment_status, PaymentStatus::Pending);
    }
}
