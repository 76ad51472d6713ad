use serde::{Deserialize, Serialize};

use super::{default_true, null_default, null_true, Identified};

wire_enum! {
    /// Account role
    pub enum Role {
        #[serde(alias = "user")]
        Customer => "customer",
        Admin => "admin",
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Customer
    }
}

impl Role {
    /// Label shown in the role column
    pub fn label(&self) -> &'static str {
        match self {
            Role::Customer => "Customer",
            Role::Admin => "Admin",
        }
    }
}

wire_enum! {
    /// Account state derived from the `isActive` flag
    pub enum AccountStatus {
        Active => "active",
        Inactive => "inactive",
    }
}

impl From<bool> for AccountStatus {
    fn from(is_active: bool) -> Self {
        if is_active {
            AccountStatus::Active
        } else {
            AccountStatus::Inactive
        }
    }
}

/// A platform account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(default, deserialize_with = "null_default")]
    pub username: String,

    #[serde(default, deserialize_with = "null_default")]
    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, deserialize_with = "null_default")]
    pub role: Role,

    #[serde(default = "default_true", deserialize_with = "null_true")]
    pub is_active: bool,
}

impl User {
    pub fn status(&self) -> AccountStatus {
        AccountStatus::from(self.is_active)
    }
}

impl Identified for User {
    fn id(&self) -> &str {
        &self.id
    }
}

/// A user reference as populated inside bookings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Identified for UserSummary {
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserialize_user_defaults() {
        let user: User = serde_json::from_value(json!({
            "_id": "u1",
            "username": "somchai",
            "email": "somchai@example.la",
            "role": "user"
        }))
        .unwrap();

        assert_eq!(user.role, Role::Customer);
        assert!(user.is_active);
        assert_eq!(user.status(), AccountStatus::Active);
        assert!(user.phone.is_none());
    }

    #[test]
    fn role_serializes_canonical_name() {
        assert_eq!(serde_json::to_value(Role::Customer).unwrap(), json!("customer"));
        assert_eq!(serde_json::to_value(Role::Admin).unwrap(), json!("admin"));
    }

    #[test]
    fn null_profile_fields_do_not_reject_the_user() {
        let user: User = serde_json::from_value(json!({
            "_id": "u2",
            "username": null,
            "email": null,
            "role": null,
            "isActive": null
        }))
        .unwrap();

        assert_eq!(user.username, "");
        assert_eq!(user.role, Role::Customer);
        assert!(user.is_active);
    }
}
