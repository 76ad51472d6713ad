use serde::Serialize;
use serde_json::Value;

use super::{parse_amount, parse_count, required, Draft, FormController, FormMode};
use crate::error::Result;
use crate::models::{date_part, Route, Schedule, ScheduleStatus};
use crate::view::SchedulesPage;

/// Editable schedule fields. Price and seats are kept as typed until submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleDraft {
    pub from: String,
    pub to: String,
    pub bus_id: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub duration: String,
    pub price: String,
    pub available_seats: String,
    pub status: ScheduleStatus,
}

impl ScheduleDraft {
    /// Empty draft with the bus pre-selected
    pub fn for_bus(bus_id: Option<&str>) -> Self {
        Self {
            bus_id: bus_id.unwrap_or_default().to_string(),
            ..Self::default()
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SchedulePayload<'a> {
    route: Route,
    bus_id: &'a str,
    date: &'a str,
    departure_time: &'a str,
    arrival_time: &'a str,
    duration: &'a str,
    price: f64,
    price_per_seat: f64,
    available_seats: u32,
    status: ScheduleStatus,
}

impl Draft for ScheduleDraft {
    type Record = Schedule;

    const FAILURE: &'static str = "Failed to save schedule";

    fn from_record(schedule: &Schedule) -> Self {
        Self {
            from: schedule.route.from.clone(),
            to: schedule.route.to.clone(),
            bus_id: schedule.bus_id().unwrap_or_default().to_string(),
            date: schedule.date.as_deref().map(date_part).unwrap_or_default(),
            departure_time: schedule.departure_time.clone(),
            arrival_time: schedule.arrival_time.clone(),
            duration: schedule.duration.clone().unwrap_or_default(),
            price: schedule.price.to_string(),
            available_seats: schedule.available_seats.to_string(),
            status: schedule.status,
        }
    }

    fn payload(&self, _mode: &FormMode) -> Result<Value> {
        let price = parse_amount("Price", &self.price)?;
        let payload = SchedulePayload {
            route: Route::new(required("From", &self.from)?, required("To", &self.to)?),
            bus_id: required("Bus", &self.bus_id)?,
            date: required("Date", &self.date)?,
            departure_time: self.departure_time.trim(),
            arrival_time: self.arrival_time.trim(),
            duration: self.duration.trim(),
            price,
            price_per_seat: price,
            available_seats: parse_count("Available seats", &self.available_seats)?,
            status: self.status,
        };
        Ok(serde_json::to_value(payload)?)
    }
}

impl FormController<ScheduleDraft> {
    /// Open a create form pre-seeded with the page's bus scope
    pub fn open_create_for(&mut self, page: &SchedulesPage) {
        self.open_create_with(ScheduleDraft::for_bus(page.bus_filter()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn edit_draft_trims_date_and_flattens_bus() {
        let schedule: Schedule = serde_json::from_value(json!({
            "_id": "s1",
            "route": { "from": "Vientiane", "to": "Pakse" },
            "busId": { "_id": "b1", "name": "Vientaine-Paksun" },
            "date": "2025-12-02T00:00:00.000Z",
            "departureTime": "20:00",
            "arrivalTime": "06:00",
            "duration": "10h",
            "price": 180000,
            "availableSeats": 40,
            "status": "active"
        }))
        .unwrap();

        let draft = ScheduleDraft::from_record(&schedule);
        assert_eq!(draft.bus_id, "b1");
        assert_eq!(draft.date, "2025-12-02");
        assert_eq!(draft.price, "180000");
    }

    #[test]
    fn payload_coerces_numbers_and_mirrors_price() {
        let draft = ScheduleDraft {
            from: "Vientiane".to_string(),
            to: "Pakse".to_string(),
            date: "2025-12-02".to_string(),
            departure_time: "20:00".to_string(),
            arrival_time: "06:00".to_string(),
            duration: "10h".to_string(),
            price: "180000.50".to_string(),
            available_seats: "40".to_string(),
            ..ScheduleDraft::for_bus(Some("b1"))
        };

        let payload = draft.payload(&FormMode::Create).unwrap();
        assert_eq!(payload["route"], json!({ "from": "Vientiane", "to": "Pakse" }));
        assert_eq!(payload["busId"], "b1");
        assert_eq!(payload["price"], 180000.5);
        assert_eq!(payload["pricePerSeat"], 180000.5);
        assert_eq!(payload["availableSeats"], 40);
        assert_eq!(payload["status"], "active");
    }

    #[test]
    fn bad_seat_count_is_a_validation_error() {
        let draft = ScheduleDraft {
            from: "A".to_string(),
            to: "B".to_string(),
            bus_id: "b1".to_string(),
            date: "2025-12-02".to_string(),
            price: "10".to_string(),
            available_seats: "4.5".to_string(),
            ..ScheduleDraft::default()
        };
        let err = draft.payload(&FormMode::Create).unwrap_err();
        assert_eq!(err.user_message("fallback"), "Available seats must be a whole number");
    }
}
