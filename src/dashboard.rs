//! Summary counters and the recent bookings table

use log::{debug, error};
use serde::de::IgnoredAny;

use crate::api::{ApiClient, Payload};
use crate::error::Result;
use crate::models::Booking;
use crate::view::table::{format_amount, RecentBooking};
use crate::view::{ViewScope, ViewState};

/// Counters shown on the dashboard cards
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_users: u64,
    pub total_buses: u64,
    pub total_bookings: u64,
    /// `total_bookings` times the flat per-ticket amount
    pub total_revenue: u64,
    /// Bookings whose payment is still pending
    pub pending_bookings: u64,
    /// Bookings with status `completed`
    pub confirmed_bookings: u64,
}

/// One summary card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub label: &'static str,
    pub value: String,
}

impl DashboardStats {
    pub fn cards(&self) -> Vec<StatCard> {
        let card = |label: &'static str, value: u64| StatCard {
            label,
            value: value.to_string(),
        };
        vec![
            card("Active Users", self.total_users),
            card("Active Buses", self.total_buses),
            card("Total Bookings", self.total_bookings),
            StatCard {
                label: "Total Revenue",
                value: format_amount(self.total_revenue as f64),
            },
            card("Pending Bookings", self.pending_bookings),
            card("Confirmed Bookings", self.confirmed_bookings),
        ]
    }
}

/// Loads the dashboard's five reads as one batch
pub struct DashboardAggregator {
    api: ApiClient,
    scope: ViewScope,
    state: ViewState,
    stats: DashboardStats,
    recent: Vec<Booking>,
}

impl DashboardAggregator {
    pub fn new(api: ApiClient, scope: ViewScope) -> Self {
        Self {
            api,
            scope,
            state: ViewState::Loading,
            stats: DashboardStats::default(),
            recent: Vec::new(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn stats(&self) -> &DashboardStats {
        &self.stats
    }

    /// Most recent bookings, newest first as the server orders them
    pub fn recent_bookings(&self) -> &[Booking] {
        &self.recent
    }

    /// Recent bookings wrapped for table rendering
    pub fn recent_rows(&self) -> Vec<RecentBooking<'_>> {
        self.recent.iter().map(RecentBooking).collect()
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    /// Fetch every counter and the recent bookings. Any failed read zeroes
    /// the whole dashboard.
    pub async fn load(&mut self) -> Result<()> {
        self.state = ViewState::Loading;
        let result = self.scope.guard(self.fetch()).await;

        match result {
            Ok((stats, recent)) => {
                debug!("Dashboard loaded: {:?}", stats);
                self.stats = stats;
                self.recent = recent;
                self.state = ViewState::Ready;
                Ok(())
            }
            Err(err) if err.is_cancelled() => Err(err),
            Err(err) => {
                error!("Error fetching dashboard data: {}", err);
                self.stats = DashboardStats::default();
                self.recent.clear();
                self.state = ViewState::Failed(err.user_message("Failed to load dashboard"));
                Err(err)
            }
        }
    }

    async fn fetch(&self) -> Result<(DashboardStats, Vec<Booking>)> {
        let options = self.api.options();
        let one = || ("limit", "1".to_string());
        let users_query = [one()];
        let buses_query = [one()];
        let recent_query = [("limit", options.recent_bookings_limit.to_string())];
        let pending_query = [("paymentStatus", "pending".to_string()), one()];
        let completed_query = [("status", "completed".to_string()), one()];

        let (users, buses, bookings, pending, completed) = tokio::try_join!(
            self.count("/users", &users_query),
            self.count("/buses", &buses_query),
            self.api.get::<Vec<Booking>>("/bookings", &recent_query),
            self.count("/bookings", &pending_query),
            self.count("/bookings", &completed_query),
        )?;

        let total_bookings = bookings.total();
        let stats = DashboardStats {
            total_users: users,
            total_buses: buses,
            total_bookings,
            total_revenue: total_bookings.saturating_mul(options.revenue_per_ticket),
            pending_bookings: pending,
            confirmed_bookings: completed,
        };
        Ok((stats, bookings.into_data_or_default()))
    }

    async fn count(&self, path: &str, query: &[(&str, String)]) -> Result<u64> {
        let payload: Payload<IgnoredAny> = self.api.get(path, query).await?;
        Ok(payload.total())
    }
}

impl std::fmt::Debug for DashboardAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardAggregator")
            .field("state", &self.state)
            .field("stats", &self.stats)
            .field("recent", &self.recent.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cards_follow_the_dashboard_layout() {
        let stats = DashboardStats {
            total_users: 12,
            total_buses: 3,
            total_bookings: 40,
            total_revenue: 1000,
            pending_bookings: 5,
            confirmed_bookings: 20,
        };
        let cards = stats.cards();
        let labels: Vec<_> = cards.iter().map(|c| c.label).collect();
        assert_eq!(
            labels,
            [
                "Active Users",
                "Active Buses",
                "Total Bookings",
                "Total Revenue",
                "Pending Bookings",
                "Confirmed Bookings"
            ]
        );
        assert_eq!(cards[3].value, "1,000 LAK");
        assert_eq!(cards[5].value, "20");
    }

    #[test]
    fn default_stats_are_zero() {
        assert!(DashboardStats::default()
            .cards()
            .iter()
            .all(|c| c.value == "0" || c.value == "0 LAK"));
    }
}
