use std::borrow::Cow;

use super::{Category, ListController, RecordFilter, Resource, SyncStrategy};
use crate::models::Bus;

/// Company filter for the buses table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusFilter {
    pub company: Category<String>,
}

impl RecordFilter<Bus> for BusFilter {
    fn matches(&self, bus: &Bus) -> bool {
        self.company.admits(&bus.company)
    }
}

impl Resource for Bus {
    const PATH: &'static str = "/buses";
    const NOUN: &'static str = "bus";
    const SYNC: SyncStrategy = SyncStrategy::Refetch;

    type Filter = BusFilter;

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![Cow::Borrowed(self.name.as_str()), Cow::Borrowed(self.license_plate.as_str())]
    }

    fn label(&self) -> String {
        format!("{} ({})", self.name, self.license_plate)
    }
}

impl ListController<Bus> {
    /// Distinct companies of the fetched buses in first-seen order
    pub fn companies(&self) -> Vec<&str> {
        let mut companies: Vec<&str> = Vec::new();
        for bus in self.items() {
            if !bus.company.is_empty() && !companies.contains(&bus.company.as_str()) {
                companies.push(&bus.company);
            }
        }
        companies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::config::AdminConfig;
    use crate::session::SessionManager;
    use crate::view::ViewScope;
    use serde_json::json;

    fn loaded() -> ListController<Bus> {
        let config = AdminConfig::new("http://localhost:5000/api").unwrap();
        let api = ApiClient::new(&config, SessionManager::in_memory()).unwrap();
        let mut list = ListController::new(api, ViewScope::detached());
        list.fill(
            serde_json::from_value(json!([
                { "_id": "b1", "name": "Vientaine-Paksun", "company": "Sabaidee", "licensePlate": "LA-1001", "capacity": 40 },
                { "_id": "b2", "name": "Luang Prabang Express", "company": "KVT", "licensePlate": "LA-2002", "capacity": 32 },
                { "_id": "b3", "name": "Southern VIP", "company": "Sabaidee", "licensePlate": "LA-3003", "capacity": 24 }
            ]))
            .unwrap(),
        );
        list
    }

    #[test]
    fn search_paksun_shows_one_bus() {
        let mut list = loaded();
        list.search("paksun");
        let names: Vec<_> = list.visible().iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["Vientaine-Paksun"]);
    }

    #[test]
    fn search_matches_license_plate() {
        let mut list = loaded();
        list.search("la-200");
        assert_eq!(list.visible().len(), 1);
    }

    #[test]
    fn company_filter_intersects_search() {
        let mut list = loaded();
        list.filter_mut().company = Category::Only("Sabaidee".to_string());
        assert_eq!(list.visible().len(), 2);

        list.search("express");
        assert!(list.visible().is_empty());

        list.search("vip");
        let ids: Vec<_> = list.visible().iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["b3"]);
        assert_eq!(list.items().len(), 3);
    }

    #[test]
    fn companies_are_distinct_in_first_seen_order() {
        assert_eq!(loaded().companies(), ["Sabaidee", "KVT"]);
    }
}
