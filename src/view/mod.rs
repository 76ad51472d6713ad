//! List views over the admin collections
//!
//! Each entity gets a [`ListController`] that owns the fetched collection,
//! the search and categorical filters, the selected row and the alert text
//! of the last failed action. Entity specifics live in the per-entity
//! modules: which fields are searched, which filter applies and how the
//! cache is kept in sync after a mutation.

mod bookings;
mod buses;
mod filter;
mod list;
mod schedules;
mod scope;
pub mod table;
mod users;

use std::borrow::Cow;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::models::Identified;

pub use bookings::*;
pub use buses::*;
pub use filter::*;
pub use list::*;
pub use schedules::*;
pub use scope::*;
pub use users::*;

/// Fetch state of a view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    Ready,
    /// The last fetch failed; the view keeps whatever it showed before
    Failed(String),
}

impl ViewState {
    pub fn is_ready(&self) -> bool {
        matches!(self, ViewState::Ready)
    }
}

/// How a collection catches up with a successful mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStrategy {
    /// Fetch the whole collection again
    Refetch,
    /// Replace the matching record with the one the server returned
    PatchInPlace,
}

/// Invalidate and reload
#[async_trait]
pub trait Reload: Send {
    async fn reload(&mut self) -> Result<()>;
}

/// A collection exposed by the admin API
pub trait Resource: Identified + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection path, e.g. `/users`
    const PATH: &'static str;

    /// Singular noun used in prompts and alerts
    const NOUN: &'static str;

    const SYNC: SyncStrategy;

    /// Categorical filter applied on top of the search
    type Filter: RecordFilter<Self> + Default + Clone + Send + Sync;

    /// Fields matched by the search box
    fn search_fields(&self) -> Vec<Cow<'_, str>>;

    /// Short human label, used in confirmation prompts
    fn label(&self) -> String;

    /// Path of a single record
    fn member_path(id: &str) -> String {
        format!("{}/{}", Self::PATH, id)
    }
}
