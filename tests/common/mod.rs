#![allow(dead_code)]

use bus_admin::config::AdminConfig;
use bus_admin::session::Credentials;
use bus_admin::BusAdmin;
use serde_json::{json, Value};
use wiremock::MockServer;

pub const TOKEN: &str = "jwt-test-token";

/// A client pointed at the mock server's `/api`, already signed in
pub fn signed_in(server: &MockServer) -> BusAdmin {
    let admin = signed_out(server);
    admin
        .session()
        .store_credentials(Credentials::new(TOKEN, None))
        .unwrap();
    admin
}

pub fn signed_out(server: &MockServer) -> BusAdmin {
    BusAdmin::in_memory(config(server)).unwrap()
}

pub fn config(server: &MockServer) -> AdminConfig {
    AdminConfig::new(&format!("{}/api", server.uri())).unwrap()
}

pub fn envelope(data: Value) -> Value {
    json!({ "success": true, "data": data })
}

pub fn paged(data: Value, total: u64) -> Value {
    json!({
        "success": true,
        "data": data,
        "pagination": { "total": total, "page": 1, "limit": 10, "pages": 1 }
    })
}

pub fn bus(id: &str, name: &str, company: &str, plate: &str) -> Value {
    json!({
        "_id": id,
        "name": name,
        "company": company,
        "licensePlate": plate,
        "capacity": 40,
        "phone": "020 1234 5678"
    })
}

pub fn user(id: &str, username: &str, role: &str, active: bool) -> Value {
    json!({
        "_id": id,
        "username": username,
        "email": format!("{}@busbook.la", username),
        "role": role,
        "isActive": active
    })
}

pub fn booking(id: &str, passenger: &str, status: &str) -> Value {
    json!({
        "_id": id,
        "userId": { "_id": "u1", "username": passenger },
        "busId": { "_id": "bus1", "name": "Sabaidee Express" },
        "scheduleId": "s1",
        "departureStation": "Vientiane",
        "arrivalStation": "Pakse",
        "seatNumber": 12,
        "price": 180000,
        "paymentStatus": "pending",
        "status": status
    })
}

pub fn schedule(id: &str, from: &str, to: &str, bus_id: &str) -> Value {
    json!({
        "_id": id,
        "route": { "from": from, "to": to },
        "busId": bus_id,
        "date": "2026-11-02T00:00:00.000Z",
        "departureTime": "08:00",
        "arrivalTime": "18:30",
        "price": 180000,
        "availableSeats": 38,
        "status": "active"
    })
}
