//! API gateway client
//!
//! Every call goes through [`ApiClient`], which attaches the stored bearer
//! token and validates the response envelope before anything reaches a
//! view.

mod envelope;

use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};

use crate::config::{AdminConfig, ClientOptions};
use crate::error::{Error, Result};
use crate::fetch::{Fetch, FetchBuilder};
use crate::session::SessionManager;

pub use envelope::*;

/// Query pairs appended to a request URL
pub type Query<'q> = [(&'q str, String)];

/// Verb-based client for the admin REST API
#[derive(Clone)]
pub struct ApiClient {
    /// Base URL without a trailing slash
    base_url: String,

    /// HTTP client used for requests
    http_client: Client,

    /// Source of the bearer token
    session: SessionManager,

    /// Client options
    options: ClientOptions,
}

impl ApiClient {
    /// Create a client with an HTTP stack built from `config.options`
    pub fn new(config: &AdminConfig, session: SessionManager) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().map_err(Error::Http)?;
        Ok(Self::with_http_client(config, session, http_client))
    }

    /// Create a client sharing an existing HTTP client
    pub fn with_http_client(config: &AdminConfig, session: SessionManager, http_client: Client) -> Self {
        Self {
            base_url: config.base_url(),
            http_client,
            session,
            options: config.options.clone(),
        }
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn http_client(&self) -> &Client {
        &self.http_client
    }

    /// Absolute URL for a path relative to the API base
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize<'a>(&self, fetch: FetchBuilder<'a>) -> FetchBuilder<'a> {
        let fetch = fetch.header("X-Client-Info", &self.options.client_info);
        match self.session.token() {
            Some(token) => fetch.bearer_auth(&token),
            None => fetch,
        }
    }

    async fn send<T: DeserializeOwned>(&self, fetch: FetchBuilder<'_>) -> Result<Payload<T>> {
        self.authorize(fetch)
            .execute::<Envelope<T>>()
            .await?
            .into_payload()
    }

    /// `GET path?query`
    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &Query<'_>) -> Result<Payload<T>> {
        let url = self.url(path);
        self.send(Fetch::get(&self.http_client, &url).query(query))
            .await
    }

    /// `POST path` with a JSON body
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<Payload<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        self.send(Fetch::post(&self.http_client, &url).json(body)?)
            .await
    }

    /// `POST path` without a body
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<Payload<T>> {
        let url = self.url(path);
        self.send(Fetch::post(&self.http_client, &url)).await
    }

    /// `PUT path` with a JSON body
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<Payload<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        self.send(Fetch::put(&self.http_client, &url).json(body)?)
            .await
    }

    /// `DELETE path`
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<Payload<T>> {
        let url = self.url(path);
        self.send(Fetch::delete(&self.http_client, &url)).await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("session", &self.session)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_relative_paths() {
        let config = AdminConfig::new("http://localhost:5000/api/").unwrap();
        let client = ApiClient::new(&config, SessionManager::in_memory()).unwrap();
        assert_eq!(client.url("/users"), "http://localhost:5000/api/users");
        assert_eq!(client.url("users/42"), "http://localhost:5000/api/users/42");
    }
}
