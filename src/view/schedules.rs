use std::borrow::Cow;

use async_trait::async_trait;
use log::{error, info, warn};
use serde::de::IgnoredAny;
use serde_json::json;

use super::{Category, ListController, RecordFilter, Reload, Resource, SyncStrategy, ViewScope};
use crate::api::ApiClient;
use crate::error::Result;
use crate::models::{id_suffix, Bus, Schedule, ScheduleStatus};

const UPDATE_EXPIRED_PATH: &str = "/schedules/update-expired";

/// Status filter plus the optional bus scope taken from the route
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleFilter {
    pub status: Category<ScheduleStatus>,
    pub bus: Option<String>,
}

impl RecordFilter<Schedule> for ScheduleFilter {
    fn matches(&self, schedule: &Schedule) -> bool {
        let on_bus = match self.bus.as_deref() {
            Some(bus_id) => schedule.bus_id() == Some(bus_id),
            None => true,
        };
        on_bus && self.status.admits(&schedule.status)
    }
}

impl Resource for Schedule {
    const PATH: &'static str = "/schedules";
    const NOUN: &'static str = "schedule";
    const SYNC: SyncStrategy = SyncStrategy::Refetch;

    type Filter = ScheduleFilter;

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![Cow::Owned(format!("{} {}", self.route.from, self.route.to))]
    }

    fn label(&self) -> String {
        self.route.label()
    }
}

/// The schedules screen: schedules plus the buses offered in its form.
///
/// Both collections are fetched together and replaced together.
#[derive(Debug)]
pub struct SchedulesPage {
    schedules: ListController<Schedule>,
    buses: ListController<Bus>,
    alert: Option<String>,
    scope: ViewScope,
}

impl SchedulesPage {
    pub fn new(api: ApiClient, scope: ViewScope, bus_filter: Option<String>) -> Self {
        let limit = api.options().lookup_limit.to_string();
        let mut schedules: ListController<Schedule> =
            ListController::new(api.clone(), scope.child()).with_query("limit", limit.clone());
        schedules.filter_mut().bus = bus_filter;
        let buses = ListController::new(api, scope.child()).with_query("limit", limit);

        Self {
            schedules,
            buses,
            alert: None,
            scope,
        }
    }

    pub fn schedules(&self) -> &ListController<Schedule> {
        &self.schedules
    }

    pub fn schedules_mut(&mut self) -> &mut ListController<Schedule> {
        &mut self.schedules
    }

    /// Buses offered by the schedule form
    pub fn buses(&self) -> &ListController<Bus> {
        &self.buses
    }

    /// Bus id the page is scoped to, if any
    pub fn bus_filter(&self) -> Option<&str> {
        self.schedules.filter().bus.as_deref()
    }

    pub fn title(&self) -> String {
        match self.bus_filter() {
            Some(bus_id) => format!("Bus Schedules (Filtered by Bus ID: {})", id_suffix(bus_id)),
            None => "All Schedules".to_string(),
        }
    }

    /// Result of the last page-level action
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    /// Fetch schedules and buses concurrently. Either both are replaced or
    /// neither is.
    pub async fn load(&mut self) -> Result<()> {
        self.schedules.begin_load();
        self.buses.begin_load();

        let result = tokio::try_join!(self.schedules.fetch(), self.buses.fetch());
        match result {
            Ok((schedules, buses)) => {
                self.schedules.fill(schedules);
                self.buses.fill(buses);
                Ok(())
            }
            Err(err) => {
                self.schedules.fail(&err);
                self.buses.fail(&err);
                Err(err)
            }
        }
    }

    /// Ask the server to expire schedules whose date has passed, then
    /// reload. Returns the server's message.
    pub async fn update_expired(&mut self) -> Result<String> {
        let request = self
            .schedules
            .api()
            .post_empty::<IgnoredAny>(UPDATE_EXPIRED_PATH);

        match self.scope.guard(request).await {
            Ok(payload) => {
                let message = payload
                    .message
                    .unwrap_or_else(|| "Expired schedules updated".to_string());
                info!("{}", message);
                self.alert = Some(message.clone());
                if let Err(err) = self.load().await {
                    warn!("Reload after updating expired schedules failed: {}", err);
                }
                Ok(message)
            }
            Err(err) => {
                if !err.is_cancelled() {
                    error!("Error updating schedules: {}", err);
                    self.alert = Some(err.user_message("Failed to update schedules"));
                }
                Err(err)
            }
        }
    }
}

impl ListController<Schedule> {
    /// Switch a schedule between active and inactive straight from the table
    pub async fn set_status(&mut self, id: &str, status: ScheduleStatus) -> Result<()> {
        self.update(id, &json!({ "status": status }), "Failed to update schedule status")
            .await
    }
}

#[async_trait]
impl Reload for SchedulesPage {
    async fn reload(&mut self) -> Result<()> {
        self.load().await
    }
}
