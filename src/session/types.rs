//! Types for the stored admin session

use serde::{Deserialize, Serialize};

/// Profile of the signed-in administrator, as returned by the login call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminProfile {
    /// The user ID
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Email address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Role as reported by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Any other profile fields, kept verbatim
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl AdminProfile {
    /// Name to show in the navigation header
    pub fn display_name(&self) -> &str {
        self.username
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("Admin")
    }
}

/// Token plus profile, the unit written at login and cleared at logout
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    /// Opaque bearer token
    pub token: String,

    /// Profile of the signed-in user, when one was stored
    pub profile: Option<AdminProfile>,
}

impl Credentials {
    pub fn new(token: impl Into<String>, profile: Option<AdminProfile>) -> Self {
        Self {
            token: token.into(),
            profile,
        }
    }
}
