use serde::Serialize;
use serde_json::Value;

use super::{required, Draft, FormMode};
use crate::error::Result;
use crate::models::{Role, User};

/// Editable user fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    pub username: String,
    pub email: String,
    /// Left blank on edit to keep the current password
    pub password: String,
    pub phone: String,
    pub role: Role,
    pub is_active: bool,
}

impl Default for UserDraft {
    fn default() -> Self {
        Self {
            username: String::new(),
            email: String::new(),
            password: String::new(),
            phone: String::new(),
            role: Role::Customer,
            is_active: true,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UserPayload<'a> {
    username: &'a str,
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
    phone: &'a str,
    role: Role,
    is_active: bool,
}

impl Draft for UserDraft {
    type Record = User;

    fn from_record(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            password: String::new(),
            phone: user.phone.clone().unwrap_or_default(),
            role: user.role,
            is_active: user.is_active,
        }
    }

    fn payload(&self, mode: &FormMode) -> Result<Value> {
        let password = match mode {
            FormMode::Create => Some(required("Password", &self.password)?),
            FormMode::Edit { .. } if self.password.trim().is_empty() => None,
            FormMode::Edit { .. } => Some(self.password.as_str()),
        };

        let payload = UserPayload {
            username: required("Username", &self.username)?,
            email: required("Email", &self.email)?,
            password,
            phone: self.phone.trim(),
            role: self.role,
            is_active: self.is_active,
        };
        Ok(serde_json::to_value(payload)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn edit() -> FormMode {
        FormMode::Edit { id: "u1".to_string() }
    }

    #[test]
    fn blank_password_is_omitted_on_edit() {
        let user: User = serde_json::from_value(json!({
            "_id": "u1", "username": "noy", "email": "noy@example.la", "role": "admin", "isActive": false
        }))
        .unwrap();
        let draft = UserDraft::from_record(&user);
        assert!(draft.password.is_empty());

        let payload = draft.payload(&edit()).unwrap();
        assert_eq!(
            payload,
            json!({
                "username": "noy",
                "email": "noy@example.la",
                "phone": "",
                "role": "admin",
                "isActive": false
            })
        );
    }

    #[test]
    fn changed_password_is_sent_on_edit() {
        let draft = UserDraft {
            username: "noy".to_string(),
            email: "noy@example.la".to_string(),
            password: "s3cret".to_string(),
            ..UserDraft::default()
        };
        let payload = draft.payload(&edit()).unwrap();
        assert_eq!(payload["password"], "s3cret");
        assert_eq!(payload["role"], "customer");
        assert_eq!(payload["isActive"], true);
    }

    #[test]
    fn create_requires_password() {
        let draft = UserDraft {
            username: "noy".to_string(),
            email: "noy@example.la".to_string(),
            ..UserDraft::default()
        };
        assert!(draft.payload(&FormMode::Create).is_err());
    }
}
