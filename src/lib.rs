//! Bus ticketing admin client
//!
//! A Rust client for the bus ticketing admin console: login, guarded
//! navigation, list views over users, buses, schedules and bookings with
//! their create/edit forms, and the summary dashboard.

pub mod api;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod fetch;
pub mod form;
pub mod guard;
pub mod models;
pub mod session;
pub mod view;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::api::ApiClient;
use crate::auth::Auth;
use crate::config::AdminConfig;
use crate::dashboard::DashboardAggregator;
use crate::error::Result;
use crate::form::{Draft, FormController};
use crate::guard::{Navigation, Route, SessionGuard};
use crate::models::{Booking, Bus, User};
use crate::session::{CredentialStore, SessionManager};
use crate::view::{ListController, SchedulesPage, ViewScope};

/// A mounted screen, loaded and ready to render
#[derive(Debug)]
pub enum Page {
    Login,
    Dashboard(DashboardAggregator),
    Users(ListController<User>),
    Buses(ListController<Bus>),
    Schedules(SchedulesPage),
    Bookings(ListController<Booking>),
}

/// The main entry point for the admin client.
///
/// Owns the session and the HTTP stack, and hands out views that share
/// them. Every view's cancellation scope is a child of this client's root
/// token, so dropping the client tears every view down.
pub struct BusAdmin {
    config: AdminConfig,
    session: SessionManager,
    api: ApiClient,
    root: CancellationToken,
}

impl BusAdmin {
    /// Create a client whose credentials live in `store`
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::sync::Arc;
    /// use bus_admin::{config::AdminConfig, session::FileStore, BusAdmin};
    ///
    /// # async fn run() -> bus_admin::error::Result<()> {
    /// let config = AdminConfig::new("http://localhost:5000/api")?;
    /// let admin = BusAdmin::new(config, Arc::new(FileStore::new("session.json")))?;
    /// admin.auth().login("admin@example.la", "secret").await?;
    ///
    /// let mut buses = admin.buses();
    /// buses.load().await?;
    /// buses.search("paksun");
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: AdminConfig, store: Arc<dyn CredentialStore>) -> Result<Self> {
        let session = SessionManager::restore(store)?;
        let api = ApiClient::new(&config, session.clone())?;
        Ok(Self {
            config,
            session,
            api,
            root: CancellationToken::new(),
        })
    }

    /// Create a client that forgets its session on exit
    pub fn in_memory(config: AdminConfig) -> Result<Self> {
        let api = ApiClient::new(&config, SessionManager::in_memory())?;
        Ok(Self {
            config,
            session: api.session().clone(),
            api,
            root: CancellationToken::new(),
        })
    }

    pub fn config(&self) -> &AdminConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn auth(&self) -> Auth {
        Auth::new(self.api.clone())
    }

    pub fn guard(&self) -> SessionGuard {
        SessionGuard::new(self.session.clone())
    }

    /// A fresh scope for a view mounted now
    pub fn scope(&self) -> ViewScope {
        ViewScope::new(&self.root)
    }

    pub fn users(&self) -> ListController<User> {
        ListController::new(self.api.clone(), self.scope())
    }

    pub fn buses(&self) -> ListController<Bus> {
        ListController::new(self.api.clone(), self.scope())
    }

    /// The schedules screen, optionally scoped to one bus
    pub fn schedules(&self, bus_id: Option<String>) -> SchedulesPage {
        SchedulesPage::new(self.api.clone(), self.scope(), bus_id)
    }

    pub fn bookings(&self) -> ListController<Booking> {
        ListController::new(self.api.clone(), self.scope())
    }

    pub fn dashboard(&self) -> DashboardAggregator {
        DashboardAggregator::new(self.api.clone(), self.scope())
    }

    /// A closed create/edit form for `D`'s entity
    pub fn form<D: Draft>(&self) -> FormController<D> {
        FormController::new(self.api.clone(), self.scope())
    }

    /// Resolve `path` through the guard, then mount and load the screen
    /// it lands on.
    ///
    /// A failed load is not an error here: the page comes back in its
    /// failed state and renders inert.
    pub async fn open(&self, path: &str) -> (Navigation, Page) {
        let navigation = self.guard().resolve(path);
        let page = self.mount(navigation.route().clone()).await;
        (navigation, page)
    }

    async fn mount(&self, route: Route) -> Page {
        match route {
            Route::Login => Page::Login,
            Route::Dashboard => {
                let mut dashboard = self.dashboard();
                let _ = dashboard.load().await;
                Page::Dashboard(dashboard)
            }
            Route::Users => {
                let mut users = self.users();
                let _ = users.load().await;
                Page::Users(users)
            }
            Route::Buses => {
                let mut buses = self.buses();
                let _ = buses.load().await;
                Page::Buses(buses)
            }
            Route::Schedules { bus_id } => {
                let mut schedules = self.schedules(bus_id);
                let _ = schedules.load().await;
                Page::Schedules(schedules)
            }
            Route::Bookings => {
                let mut bookings = self.bookings();
                let _ = bookings.load().await;
                Page::Bookings(bookings)
            }
        }
    }

    /// Tear down every view handed out so far
    pub fn shutdown(&self) {
        self.root.cancel();
    }
}

impl Drop for BusAdmin {
    fn drop(&mut self) {
        self.root.cancel();
    }
}

impl std::fmt::Debug for BusAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BusAdmin")
            .field("api", &self.api)
            .field("shut_down", &self.root.is_cancelled())
            .finish()
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::config::{AdminConfig, ClientOptions};
    pub use crate::error::{Error, Result};
    pub use crate::form::{BusDraft, Draft, FormController, ScheduleDraft, UserDraft};
    pub use crate::guard::{Navigation, Route};
    pub use crate::models::{Booking, BookingStatus, Bus, PaymentStatus, Schedule, Ticket, User};
    pub use crate::session::{FileStore, MemoryStore, SessionManager};
    pub use crate::view::{Category, ListController, Reload, SchedulesPage, ViewState};
    pub use crate::{BusAdmin, Page};
}
