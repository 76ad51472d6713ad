use std::borrow::Cow;

use super::{Category, RecordFilter, Resource, SyncStrategy};
use crate::models::{AccountStatus, Role, User};

/// Role and account-status filter for the users table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub role: Category<Role>,
    pub status: Category<AccountStatus>,
}

impl RecordFilter<User> for UserFilter {
    fn matches(&self, user: &User) -> bool {
        self.role.admits(&user.role) && self.status.admits(&user.status())
    }
}

impl Resource for User {
    const PATH: &'static str = "/users";
    const NOUN: &'static str = "user";
    const SYNC: SyncStrategy = SyncStrategy::Refetch;

    type Filter = UserFilter;

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![Cow::Borrowed(self.username.as_str()), Cow::Borrowed(self.email.as_str())]
    }

    fn label(&self) -> String {
        self.username.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::SearchTerm;
    use serde_json::json;

    fn users() -> Vec<User> {
        serde_json::from_value(json!([
            { "_id": "u1", "username": "somchai", "email": "somchai@example.la", "role": "admin" },
            { "_id": "u2", "username": "noy", "email": "noy@example.la", "role": "customer", "isActive": false },
            { "_id": "u3", "username": "vilay", "email": "vilay@mail.la", "role": "customer" }
        ]))
        .unwrap()
    }

    #[test]
    fn search_covers_username_and_email() {
        let term = SearchTerm::new("EXAMPLE");
        let hits: Vec<_> = users()
            .into_iter()
            .filter(|u| term.matches_any(u.search_fields()))
            .map(|u| u.id)
            .collect();
        assert_eq!(hits, ["u1", "u2"]);
    }

    #[test]
    fn role_and_status_compose() {
        let filter = UserFilter {
            role: Category::Only(Role::Customer),
            status: Category::Only(AccountStatus::Active),
        };
        let hits: Vec<_> = users()
            .into_iter()
            .filter(|u| filter.matches(u))
            .map(|u| u.id)
            .collect();
        assert_eq!(hits, ["u3"]);

        let all = UserFilter::default();
        assert!(users().iter().all(|u| all.matches(u)));
    }
}
