//! Admin login and logout

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::api::{ApiClient, Envelope};
use crate::error::{Error, Result};
use crate::fetch::Fetch;
use crate::session::{AdminProfile, Credentials, SessionManager};

const LOGIN_PATH: &str = "/auth/login";

/// Body of the login request
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// `data` of a successful login: the token next to the profile fields
#[derive(Debug, Clone, Deserialize)]
struct LoginData {
    token: String,
    #[serde(flatten)]
    profile: AdminProfile,
}

/// Client for the admin authentication endpoints
#[derive(Debug, Clone)]
pub struct Auth {
    api: ApiClient,
}

impl Auth {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    fn session(&self) -> &SessionManager {
        self.api.session()
    }

    /// Sign in with email and password and store the issued credentials.
    ///
    /// The request never carries a bearer token, even when a stale one is
    /// still stored.
    pub async fn login(&self, email: &str, password: &str) -> Result<Credentials> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(Error::validation("Email and password are required"));
        }

        let url = self.api.url(LOGIN_PATH);
        let data = Fetch::post(self.api.http_client(), &url)
            .header("X-Client-Info", &self.api.options().client_info)
            .json(&LoginRequest { email, password })?
            .execute::<Envelope<LoginData>>()
            .await?
            .into_payload()?
            .into_data()?;

        let credentials = Credentials::new(data.token, Some(data.profile));
        self.session().store_credentials(credentials.clone())?;
        info!("Logged in as {}", email);
        Ok(credentials)
    }

    /// Forget the stored credentials. The server is not contacted.
    pub fn logout(&self) -> Result<()> {
        if !self.session().is_authenticated() {
            warn!("Logout without a stored session");
        }
        self.session().clear()
    }

    /// Profile of the signed-in admin
    pub fn current_user(&self) -> Option<AdminProfile> {
        self.session().profile()
    }

    /// Text for the login form's error box
    pub fn failure_message(err: &Error) -> String {
        err.user_message("Login failed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn login_data_splits_token_from_profile() {
        let data: LoginData = serde_json::from_value(json!({
            "token": "jwt-abc",
            "_id": "a1",
            "username": "admin",
            "email": "admin@busbook.la",
            "role": "admin",
            "phone": "020 5555 1234"
        }))
        .unwrap();

        assert_eq!(data.token, "jwt-abc");
        assert_eq!(data.profile.display_name(), "admin");
        assert_eq!(data.profile.role.as_deref(), Some("admin"));
        assert!(!data.profile.extra.contains_key("token"));
        assert_eq!(data.profile.extra["phone"], "020 5555 1234");
    }

    #[test]
    fn failure_message_prefers_server_text() {
        assert_eq!(
            Auth::failure_message(&Error::api(401, "Invalid credentials")),
            "Invalid credentials"
        );
        assert_eq!(Auth::failure_message(&Error::Cancelled), "Login failed");
    }

    #[tokio::test]
    async fn blank_credentials_are_rejected_locally() {
        let config = crate::config::AdminConfig::new("http://localhost:5000/api").unwrap();
        let api = ApiClient::new(&config, SessionManager::in_memory()).unwrap();
        let auth = Auth::new(api);
        assert!(matches!(auth.login(" ", "pw").await, Err(Error::Validation(_))));
        assert!(!auth.session().is_authenticated());
    }
}
