use async_trait::async_trait;
use log::{debug, error, info, warn};
use serde::{de::IgnoredAny, Serialize};

use super::{RecordFilter, Reload, Resource, SearchTerm, SyncStrategy, ViewScope, ViewState};
use crate::api::ApiClient;
use crate::error::{Error, Result};

/// Confirmation that must be handed back before a record is deleted
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a delete only happens once the confirmation is passed to confirm_delete"]
pub struct DeleteConfirmation {
    id: String,
    prompt: String,
}

impl DeleteConfirmation {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Question to put to the operator
    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

enum Change<R> {
    Saved(Option<R>),
    Removed(String),
}

/// Fetch, filter and row actions for one collection
pub struct ListController<R: Resource> {
    api: ApiClient,
    scope: ViewScope,
    state: ViewState,
    items: Vec<R>,
    query: Vec<(&'static str, String)>,
    search: SearchTerm,
    filter: R::Filter,
    selected: Option<String>,
    alert: Option<String>,
}

impl<R: Resource> ListController<R> {
    pub fn new(api: ApiClient, scope: ViewScope) -> Self {
        Self {
            api,
            scope,
            state: ViewState::Loading,
            items: Vec::new(),
            query: Vec::new(),
            search: SearchTerm::default(),
            filter: R::Filter::default(),
            selected: None,
            alert: None,
        }
    }

    /// Add a query pair sent with every fetch
    pub fn with_query(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.query.push((key, value.into()));
        self
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// The cached collection as last fetched or patched
    pub fn items(&self) -> &[R] {
        &self.items
    }

    /// Alert text left by the last failed action
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    pub(crate) fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Fetch the collection. A failure leaves the previous items in place
    /// and moves the view to [`ViewState::Failed`].
    pub async fn load(&mut self) -> Result<()> {
        self.begin_load();
        let result = self.fetch().await;
        self.finish_load(result)
    }

    pub(crate) fn begin_load(&mut self) {
        debug!("Loading {}", R::PATH);
        self.state = ViewState::Loading;
    }

    pub(crate) async fn fetch(&self) -> Result<Vec<R>> {
        let request = self.api.get::<Vec<R>>(R::PATH, &self.query);
        let payload = self.scope.guard(request).await?;
        Ok(payload.into_data_or_default())
    }

    pub(crate) fn finish_load(&mut self, result: Result<Vec<R>>) -> Result<()> {
        match result {
            Ok(items) => {
                self.fill(items);
                Ok(())
            }
            Err(err) => {
                self.fail(&err);
                Err(err)
            }
        }
    }

    pub(crate) fn fill(&mut self, items: Vec<R>) {
        debug!("Loaded {} {} records", items.len(), R::NOUN);
        self.items = items;
        self.state = ViewState::Ready;
    }

    pub(crate) fn fail(&mut self, err: &Error) {
        if err.is_cancelled() {
            debug!("Fetch of {} dropped after teardown", R::PATH);
            return;
        }
        error!("Error fetching {}: {}", R::PATH, err);
        self.state = ViewState::Failed(err.user_message(&format!("Failed to load {}s", R::NOUN)));
    }

    pub fn search(&mut self, text: &str) {
        self.search = SearchTerm::new(text);
    }

    pub fn search_term(&self) -> &SearchTerm {
        &self.search
    }

    pub fn filter(&self) -> &R::Filter {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut R::Filter {
        &mut self.filter
    }

    pub fn set_filter(&mut self, filter: R::Filter) {
        self.filter = filter;
    }

    /// Records passing both the search and the categorical filter, in
    /// fetch order
    pub fn visible(&self) -> Vec<&R> {
        self.items
            .iter()
            .filter(|record| self.search.matches_any(record.search_fields()))
            .filter(|record| self.filter.matches(record))
            .collect()
    }

    pub fn find(&self, id: &str) -> Option<&R> {
        self.items.iter().find(|record| record.id() == id)
    }

    /// Open the detail panel for a row
    pub fn select(&mut self, id: &str) -> Option<&R> {
        self.find(id)?;
        self.selected = Some(id.to_string());
        self.selected()
    }

    /// The selected record as currently cached
    pub fn selected(&self) -> Option<&R> {
        self.selected.as_deref().and_then(|id| self.find(id))
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// First step of a delete
    pub fn request_delete(&self, id: &str) -> Result<DeleteConfirmation> {
        let record = self
            .find(id)
            .ok_or_else(|| Error::validation(format!("no {} with id '{}'", R::NOUN, id)))?;
        Ok(DeleteConfirmation {
            id: id.to_string(),
            prompt: format!(
                "Are you sure you want to delete {} {}?",
                R::NOUN,
                record.label()
            ),
        })
    }

    /// Drop a pending delete without contacting the server
    pub fn cancel_delete(&mut self, confirmation: DeleteConfirmation) {
        debug!("Delete of {} {} cancelled", R::NOUN, confirmation.id);
    }

    pub async fn confirm_delete(&mut self, confirmation: DeleteConfirmation) -> Result<()> {
        let path = R::member_path(&confirmation.id);
        let result = self
            .scope
            .guard(self.api.delete::<IgnoredAny>(&path))
            .await;

        match result {
            Ok(_) => {
                info!("Deleted {} {}", R::NOUN, confirmation.id);
                self.alert = None;
                if self.selected.as_deref() == Some(confirmation.id.as_str()) {
                    self.selected = None;
                }
                self.synchronize(Change::Removed(confirmation.id)).await;
                Ok(())
            }
            Err(err) => Err(self.action_failed(err, &format!("Failed to delete {}", R::NOUN))),
        }
    }

    /// `PUT` a partial update to one record, then bring the cache up to
    /// date according to the entity's [`SyncStrategy`]
    pub async fn update<B>(&mut self, id: &str, body: &B, failure: &str) -> Result<()>
    where
        B: Serialize + Sync + ?Sized,
    {
        let path = R::member_path(id);
        let result = self.scope.guard(self.api.put::<B, R>(&path, body)).await;

        match result {
            Ok(payload) => {
                info!("Updated {} {}", R::NOUN, id);
                self.alert = None;
                self.synchronize(Change::Saved(payload.data)).await;
                Ok(())
            }
            Err(err) => Err(self.action_failed(err, failure)),
        }
    }

    fn action_failed(&mut self, err: Error, fallback: &str) -> Error {
        if !err.is_cancelled() {
            error!("{}: {}", fallback, err);
            self.alert = Some(err.user_message(fallback));
        }
        err
    }

    async fn synchronize(&mut self, change: Change<R>) {
        let patch = match (R::SYNC, change) {
            (SyncStrategy::PatchInPlace, Change::Saved(Some(record))) => {
                self.patch(record);
                return;
            }
            (SyncStrategy::PatchInPlace, Change::Removed(id)) => {
                self.items.retain(|record| record.id() != id);
                return;
            }
            (SyncStrategy::PatchInPlace, Change::Saved(None)) => true,
            (SyncStrategy::Refetch, _) => false,
        };

        if patch {
            warn!("Server returned no {} record, reloading {}", R::NOUN, R::PATH);
        }
        if let Err(err) = self.load().await {
            warn!("Reload of {} after change failed: {}", R::PATH, err);
        }
    }

    fn patch(&mut self, record: R) {
        match self.items.iter_mut().find(|slot| slot.id() == record.id()) {
            Some(slot) => *slot = record,
            None => debug!("{} {} not cached, patch skipped", R::NOUN, record.id()),
        }
    }
}

#[async_trait]
impl<R: Resource> Reload for ListController<R> {
    async fn reload(&mut self) -> Result<()> {
        self.load().await
    }
}

impl<R: Resource> std::fmt::Debug for ListController<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListController")
            .field("path", &R::PATH)
            .field("state", &self.state)
            .field("items", &self.items.len())
            .field("search", &self.search.as_str())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdminConfig;
    use crate::models::Bus;
    use crate::session::SessionManager;
    use serde_json::json;

    fn controller() -> ListController<Bus> {
        let config = AdminConfig::new("http://localhost:5000/api").unwrap();
        let api = ApiClient::new(&config, SessionManager::in_memory()).unwrap();
        let mut list = ListController::new(api, ViewScope::detached());
        list.fill(
            serde_json::from_value(json!([
                { "_id": "b1", "name": "Vientaine-Paksun", "company": "Sabaidee", "licensePlate": "LA-1001", "capacity": 40 },
                { "_id": "b2", "name": "Luang Prabang Express", "company": "KVT", "licensePlate": "LA-2002", "capacity": 32 }
            ]))
            .unwrap(),
        );
        list
    }

    #[test]
    fn new_controller_starts_loading() {
        let config = AdminConfig::new("http://localhost:5000/api").unwrap();
        let api = ApiClient::new(&config, SessionManager::in_memory()).unwrap();
        let list: ListController<Bus> = ListController::new(api, ViewScope::detached());
        assert_eq!(list.state(), &ViewState::Loading);
        assert!(list.items().is_empty());
    }

    #[test]
    fn select_tracks_cached_record() {
        let mut list = controller();
        assert_eq!(list.select("b2").map(|b| b.name.as_str()), Some("Luang Prabang Express"));
        assert!(list.select("missing").is_none());
        assert_eq!(list.selected().map(|b| b.id.as_str()), Some("b2"));
        list.clear_selection();
        assert!(list.selected().is_none());
    }

    #[test]
    fn request_delete_needs_a_cached_record() {
        let list = controller();
        let confirmation = list.request_delete("b1").unwrap();
        assert_eq!(confirmation.id(), "b1");
        assert!(confirmation.prompt().contains("Vientaine-Paksun"));
        assert!(matches!(list.request_delete("nope"), Err(Error::Validation(_))));
    }

    #[test]
    fn failed_fetch_keeps_stale_items() {
        let mut list = controller();
        let result = list.finish_load(Err(Error::api(500, "Internal Server Error")));
        assert!(result.is_err());
        assert_eq!(list.state(), &ViewState::Failed("Internal Server Error".to_string()));
        assert_eq!(list.items().len(), 2);
    }

    #[test]
    fn cancelled_fetch_leaves_state_alone() {
        let mut list = controller();
        let result = list.finish_load(Err(Error::Cancelled));
        assert!(matches!(result, Err(Error::Cancelled)));
        assert!(list.state().is_ready());
    }
}
