use std::collections::HashMap;

use super::{date_part, id_suffix, Booking, BookingStatus, Bus, Schedule};

const UNKNOWN: &str = "Unknown";

/// Printable ticket derived from a booking joined with its schedule and bus.
///
/// Tickets are never stored or sent; they are rebuilt from the bookings
/// cache whenever needed.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticket {
    pub id: String,
    pub booking_id: String,
    pub passenger_name: String,
    pub bus: String,
    pub route: String,
    pub date: String,
    pub departure: String,
    pub seat: String,
    pub price: f64,
    pub status: BookingStatus,
}

impl Ticket {
    /// `TKT-` plus the last six id characters, zero padded
    pub fn number_for(booking_id: &str) -> String {
        format!("TKT-{:0>6}", id_suffix(booking_id))
    }

    pub fn project(booking: &Booking, schedule: Option<&Schedule>, bus: Option<&Bus>) -> Self {
        let bus_name = bus
            .map(|b| b.name.as_str())
            .or_else(|| booking.bus_name())
            .or_else(|| schedule.and_then(Schedule::bus_name))
            .unwrap_or(UNKNOWN);

        let route = if !booking.departure_station.is_empty() || !booking.arrival_station.is_empty() {
            booking.route_label()
        } else {
            schedule
                .map(|s| s.route.label())
                .unwrap_or_else(|| UNKNOWN.to_string())
        };

        let date = schedule
            .and_then(|s| s.date.as_deref())
            .or(booking.departure_time.as_deref())
            .map(date_part)
            .unwrap_or_else(|| UNKNOWN.to_string());

        let departure = schedule
            .map(|s| s.departure_time.as_str())
            .filter(|t| !t.is_empty())
            .unwrap_or(UNKNOWN);

        Self {
            id: Self::number_for(&booking.id),
            booking_id: booking.id.clone(),
            passenger_name: booking.passenger_name().unwrap_or(UNKNOWN).to_string(),
            bus: bus_name.to_string(),
            route,
            date,
            departure: departure.to_string(),
            seat: booking.seat_number.clone(),
            price: booking.price,
            status: booking.status,
        }
    }

    /// Join every booking against the given schedules and buses by id
    pub fn project_all(bookings: &[Booking], schedules: &[Schedule], buses: &[Bus]) -> Vec<Self> {
        let schedules: HashMap<&str, &Schedule> =
            schedules.iter().map(|s| (s.id.as_str(), s)).collect();
        let buses: HashMap<&str, &Bus> = buses.iter().map(|b| (b.id.as_str(), b)).collect();

        bookings
            .iter()
            .map(|booking| {
                let schedule = booking
                    .schedule_id()
                    .and_then(|id| schedules.get(id).copied());
                let bus = booking
                    .bus_id()
                    .or_else(|| schedule.and_then(Schedule::bus_id))
                    .and_then(|id| buses.get(id).copied());
                Self::project(booking, schedule, bus)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn booking(value: serde_json::Value) -> Booking {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn ticket_number_is_zero_padded() {
        assert_eq!(Ticket::number_for("1"), "TKT-000001");
        assert_eq!(Ticket::number_for("665f1c2ab93e4d0012a7c9e1"), "TKT-a7c9e1");
    }

    #[test]
    fn project_joins_schedule_and_bus() {
        let schedules: Vec<Schedule> = serde_json::from_value(json!([{
            "_id": "s1",
            "route": { "from": "Vientiane", "to": "Vang Vieng" },
            "busId": "b1",
            "date": "2025-12-02",
            "departureTime": "08:00",
            "status": "active"
        }]))
        .unwrap();
        let buses: Vec<Bus> = serde_json::from_value(json!([{
            "_id": "b1", "name": "VIP Sleeper", "company": "KVT", "licensePlate": "LA-1", "capacity": 40
        }]))
        .unwrap();
        let bookings = vec![booking(json!({
            "_id": "1",
            "scheduleId": "s1",
            "passengerDetails": { "name": "Somchai" },
            "seatNumber": 2,
            "price": 170,
            "status": "booked"
        }))];

        let tickets = Ticket::project_all(&bookings, &schedules, &buses);
        assert_eq!(tickets.len(), 1);
        let ticket = &tickets[0];
        assert_eq!(ticket.id, "TKT-000001");
        assert_eq!(ticket.bus, "VIP Sleeper");
        assert_eq!(ticket.route, "Vientiane → Vang Vieng");
        assert_eq!(ticket.date, "2025-12-02");
        assert_eq!(ticket.departure, "08:00");
        assert_eq!(ticket.passenger_name, "Somchai");
    }

    #[test]
    fn project_without_join_marks_unknown() {
        let ticket = Ticket::project(
            &booking(json!({ "_id": "77", "status": "expired" })),
            None,
            None,
        );
        assert_eq!(ticket.bus, "Unknown");
        assert_eq!(ticket.route, "Unknown");
        assert_eq!(ticket.date, "Unknown");
        assert_eq!(ticket.departure, "Unknown");
        assert_eq!(ticket.passenger_name, "Unknown");
    }
}
