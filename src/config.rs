//! Configuration options for the bus admin client

use std::time::Duration;
use url::Url;

use crate::error::{Error, Result};

/// Environment variable holding the API base URL
pub const API_URL_ENV: &str = "BUS_ADMIN_API_URL";

/// Configuration options for the bus admin client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// The request timeout. `None` leaves requests unbounded.
    pub request_timeout: Option<Duration>,

    /// Value sent in the `X-Client-Info` header
    pub client_info: String,

    /// Flat per-ticket amount used for the dashboard revenue estimate
    pub revenue_per_ticket: u64,

    /// Number of rows in the dashboard's recent bookings table
    pub recent_bookings_limit: u32,

    /// `limit` used when loading schedules and their bus options
    pub lookup_limit: u32,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: None,
            client_info: format!("bus-admin/{}", env!("CARGO_PKG_VERSION")),
            revenue_per_ticket: 25,
            recent_bookings_limit: 5,
            lookup_limit: 1000,
        }
    }
}

impl ClientOptions {
    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the client info header value
    pub fn with_client_info(mut self, value: &str) -> Self {
        self.client_info = value.to_string();
        self
    }

    /// Set the per-ticket revenue estimate
    pub fn with_revenue_per_ticket(mut self, value: u64) -> Self {
        self.revenue_per_ticket = value;
        self
    }

    /// Set the size of the recent bookings table
    pub fn with_recent_bookings_limit(mut self, value: u32) -> Self {
        self.recent_bookings_limit = value;
        self
    }

    /// Set the limit used for schedule and bus option loads
    pub fn with_lookup_limit(mut self, value: u32) -> Self {
        self.lookup_limit = value;
        self
    }
}

/// Where the admin API lives and how to talk to it.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub api_url: Url,
    pub options: ClientOptions,
}

impl AdminConfig {
    /// Creates a new configuration, validating the URL.
    pub fn new(api_url: &str) -> Result<Self> {
        Self::new_with_options(api_url, ClientOptions::default())
    }

    /// Creates a new configuration with custom options.
    pub fn new_with_options(api_url: &str, options: ClientOptions) -> Result<Self> {
        let api_url = Url::parse(api_url)?;
        if api_url.cannot_be_a_base() {
            return Err(Error::config(format!("{} is not a base URL", api_url)));
        }
        Ok(Self { api_url, options })
    }

    /// Attempts to create configuration from the environment.
    pub fn from_env() -> Result<Self> {
        let api_url = std::env::var(API_URL_ENV)
            .map_err(|_| Error::config(format!("{} environment variable not found", API_URL_ENV)))?;
        Self::new(&api_url)
    }

    /// Base URL without a trailing slash, ready for path concatenation
    pub fn base_url(&self) -> String {
        self.api_url.as_str().trim_end_matches('/').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_new_valid() {
        let config = AdminConfig::new("http://localhost:5000/api").unwrap();
        assert_eq!(config.base_url(), "http://localhost:5000/api");
        assert_eq!(config.options.revenue_per_ticket, 25);
        assert!(config.options.request_timeout.is_none());
    }

    #[test]
    fn config_trailing_slash_is_trimmed() {
        let config = AdminConfig::new("http://localhost:5000/api/").unwrap();
        assert_eq!(config.base_url(), "http://localhost:5000/api");
    }

    #[test]
    fn config_new_invalid_url() {
        let config = AdminConfig::new("not a valid url");
        match config.err().unwrap() {
            Error::Url(_) => {}
            other => panic!("Expected Url error, got {:?}", other),
        }
    }

    #[test]
    fn config_rejects_non_base_url() {
        assert!(matches!(
            AdminConfig::new("mailto:ops@example.com"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn options_builder() {
        let options = ClientOptions::default()
            .with_revenue_per_ticket(40)
            .with_recent_bookings_limit(10)
            .with_request_timeout(Some(Duration::from_secs(5)));
        assert_eq!(options.revenue_per_ticket, 40);
        assert_eq!(options.recent_bookings_limit, 10);
        assert_eq!(options.request_timeout, Some(Duration::from_secs(5)));
    }
}
