//! Plain-text rendering of the admin tables

use crate::models::{date_part, id_suffix, Booking, Bus, Schedule, Ticket, User};

const NONE: &str = "-";
const NOT_AVAILABLE: &str = "N/A";
const UNKNOWN: &str = "Unknown";

/// A record that renders as one table row
pub trait Tabular {
    fn headers() -> &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

/// `#` plus the last six id characters
pub fn short_id(id: &str) -> String {
    format!("#{}", id_suffix(id))
}

/// Amount with thousands separators and the currency suffix, e.g.
/// `180,000 LAK`
pub fn format_amount(amount: f64) -> String {
    let negative = amount < 0.0;
    let rounded = (amount.abs() * 100.0).round() / 100.0;
    let whole = rounded.trunc() as u64;
    let cents = ((rounded - rounded.trunc()) * 100.0).round() as u64;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative && (whole > 0 || cents > 0) { "-" } else { "" };
    if cents == 0 {
        format!("{}{} LAK", sign, grouped)
    } else {
        format!("{}{}.{:02} LAK", sign, grouped, cents)
    }
}

fn date_or(value: Option<&str>, fallback: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .map(date_part)
        .unwrap_or_else(|| fallback.to_string())
}

/// Render rows under their headers with space-padded columns
pub fn render<'a, T, I>(rows: I) -> String
where
    T: Tabular + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let headers = T::headers();
    let rows: Vec<Vec<String>> = rows.into_iter().map(T::cells).collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, headers.iter().copied(), &widths);
    push_line(
        &mut out,
        widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().iter().map(String::as_str),
        &widths,
    );
    for row in &rows {
        push_line(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line = cells
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

impl Tabular for User {
    fn headers() -> &'static [&'static str] {
        &["ID", "Name", "Email", "Phone", "Role", "Status"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            short_id(&self.id),
            self.username.clone(),
            self.email.clone(),
            self.phone.clone().filter(|p| !p.is_empty()).unwrap_or_else(|| NONE.to_string()),
            self.role.label().to_string(),
            if self.is_active { "Active" } else { "Inactive" }.to_string(),
        ]
    }
}

impl Tabular for Bus {
    fn headers() -> &'static [&'static str] {
        &["ID", "Name", "Company", "License Plate", "Capacity", "Phone"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            short_id(&self.id),
            self.name.clone(),
            self.company.clone(),
            self.license_plate.clone(),
            format!("{} seats", self.capacity),
            self.phone.clone().unwrap_or_else(|| NONE.to_string()),
        ]
    }
}

impl Tabular for Schedule {
    fn headers() -> &'static [&'static str] {
        &[
            "ID", "Route", "Bus", "Date", "Departure", "Arrival", "Duration", "Price", "Seats", "Status",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            short_id(&self.id),
            self.route.label(),
            self.bus_name().unwrap_or(NOT_AVAILABLE).to_string(),
            date_or(self.date.as_deref(), NONE),
            self.departure_time.clone(),
            self.arrival_time.clone(),
            self.duration.clone().unwrap_or_default(),
            format_amount(self.price),
            self.available_seats.to_string(),
            self.status.to_string(),
        ]
    }
}

impl Tabular for Booking {
    fn headers() -> &'static [&'static str] {
        &[
            "Booking ID", "Passenger", "Bus", "Route", "Departure", "Seat", "Price", "Payment", "Status",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            short_id(&self.id),
            self.passenger_name().unwrap_or(UNKNOWN).to_string(),
            self.bus_name().unwrap_or(NOT_AVAILABLE).to_string(),
            self.route_label(),
            date_or(self.departure_time.as_deref(), NONE),
            self.seat_number.clone(),
            format_amount(self.price),
            self.payment_status.to_string(),
            self.status.to_string(),
        ]
    }
}

impl Tabular for Ticket {
    fn headers() -> &'static [&'static str] {
        &[
            "Ticket", "Passenger", "Bus", "Route", "Date", "Departure", "Seat", "Price", "Status",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.passenger_name.clone(),
            self.bus.clone(),
            self.route.clone(),
            self.date.clone(),
            self.departure.clone(),
            self.seat.clone(),
            format_amount(self.price),
            self.status.to_string(),
        ]
    }
}

/// A booking as shown in the dashboard's recent table
#[derive(Debug, Clone, Copy)]
pub struct RecentBooking<'a>(pub &'a Booking);

impl Tabular for RecentBooking<'_> {
    fn headers() -> &'static [&'static str] {
        &["Booking ID", "Passenger", "Route", "Date", "Seats", "Total", "Status"]
    }

    fn cells(&self) -> Vec<String> {
        let booking = self.0;
        vec![
            short_id(&booking.id),
            booking.passenger_name().unwrap_or(NOT_AVAILABLE).to_string(),
            booking.route_label(),
            date_or(booking.departure_time.as_deref(), NONE),
            booking.seat_number.clone(),
            format_amount(booking.price),
            booking.status.to_string(),
        ]
    }
}

/// Label/value pairs for the booking detail panel
pub fn booking_details(booking: &Booking) -> Vec<(&'static str, String)> {
    let contact = booking
        .passenger_details
        .as_ref()
        .and_then(|details| details.phone.clone())
        .unwrap_or_else(|| NONE.to_string());

    vec![
        ("Booking ID", booking.id.clone()),
        ("Passenger", booking.passenger_name().unwrap_or(UNKNOWN).to_string()),
        ("Phone", contact),
        ("Bus", booking.bus_name().unwrap_or(NOT_AVAILABLE).to_string()),
        ("Route", booking.route_label()),
        ("Departure", booking.departure_time.clone().unwrap_or_else(|| NONE.to_string())),
        ("Arrival", booking.arrival_time.clone().unwrap_or_else(|| NONE.to_string())),
        ("Seat", booking.seat_number.clone()),
        ("Price", format_amount(booking.price)),
        ("Payment", booking.payment_status.to_string()),
        ("Status", booking.status.to_string()),
    ]
}
