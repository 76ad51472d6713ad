use std::borrow::Cow;

use serde_json::json;

use super::{Category, ListController, RecordFilter, Resource, SyncStrategy};
use crate::error::{Error, Result};
use crate::models::{id_suffix, Booking, BookingStatus, PaymentStatus};

/// Booking-status filter for the bookings table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingFilter {
    pub status: Category<BookingStatus>,
}

impl RecordFilter<Booking> for BookingFilter {
    fn matches(&self, booking: &Booking) -> bool {
        self.status.admits(&booking.status)
    }
}

impl Resource for Booking {
    const PATH: &'static str = "/bookings";
    const NOUN: &'static str = "booking";
    const SYNC: SyncStrategy = SyncStrategy::PatchInPlace;

    type Filter = BookingFilter;

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.id.as_str()),
            Cow::Borrowed(self.passenger_name().unwrap_or_default()),
        ]
    }

    fn label(&self) -> String {
        format!("#{}", id_suffix(&self.id))
    }
}

/// Confirmation required before a booking is cancelled from the table
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "the booking is only cancelled once the confirmation is passed to confirm_cancel"]
pub struct CancelConfirmation {
    id: String,
}

impl CancelConfirmation {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn prompt(&self) -> &'static str {
        "Are you sure you want to cancel this booking?"
    }
}

impl ListController<Booking> {
    /// Set any booking status, as offered by the detail panel
    pub async fn set_status(&mut self, id: &str, status: BookingStatus) -> Result<()> {
        self.update(id, &json!({ "status": status }), "Failed to update status")
            .await
    }

    pub async fn set_payment_status(&mut self, id: &str, status: PaymentStatus) -> Result<()> {
        self.update(
            id,
            &json!({ "paymentStatus": status }),
            "Failed to update payment status",
        )
        .await
    }

    /// Quick action: mark an open booking completed
    pub async fn complete(&mut self, id: &str) -> Result<()> {
        self.open_booking(id)?;
        self.set_status(id, BookingStatus::Completed).await
    }

    /// Quick action, first step: ask before cancelling an open booking
    pub fn request_cancel(&self, id: &str) -> Result<CancelConfirmation> {
        self.open_booking(id)?;
        Ok(CancelConfirmation { id: id.to_string() })
    }

    pub async fn confirm_cancel(&mut self, confirmation: CancelConfirmation) -> Result<()> {
        self.set_status(&confirmation.id, BookingStatus::Cancelled)
            .await
    }

    fn open_booking(&self, id: &str) -> Result<&Booking> {
        let booking = self
            .find(id)
            .ok_or_else(|| Error::validation(format!("no booking with id '{}'", id)))?;
        if !booking.is_open() {
            return Err(Error::validation(format!(
                "booking #{} is {}, quick actions need a booked seat",
                id_suffix(id),
                booking.status
            )));
        }
        Ok(booking)
    }
}
