//! HTTP request plumbing shared by the gateway and auth clients

use log::debug;
use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    Client, Method, RequestBuilder,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use url::Url;

use crate::error::Error;

/// Stands in for an empty 2xx body on mutations, such as a `204` on delete
const EMPTY_SUCCESS: &str = r#"{"success":true}"#;

/// Body shape the backend uses for failures
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// One outgoing request, assembled step by step and sent by [`execute`].
///
/// [`execute`]: FetchBuilder::execute
pub struct FetchBuilder<'a> {
    client: &'a Client,
    method: Method,
    url: String,
    headers: HeaderMap,
    query: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl<'a> FetchBuilder<'a> {
    pub fn new(client: &'a Client, url: &str, method: Method) -> Self {
        Self {
            client,
            method,
            url: url.to_string(),
            headers: HeaderMap::new(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Set a header. Values that are not valid header text are skipped.
    pub fn header(mut self, name: &'static str, value: &str) -> Self {
        match HeaderValue::from_str(value) {
            Ok(value) => {
                self.headers.insert(name, value);
            }
            Err(_) => debug!("Skipping invalid value for header {}", name),
        }
        self
    }

    pub fn bearer_auth(self, token: &str) -> Self {
        self.header("Authorization", &format!("Bearer {}", token))
    }

    /// Append query pairs, keeping their order
    pub fn query<K, V>(mut self, pairs: &[(K, V)]) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.query.extend(
            pairs
                .iter()
                .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string())),
        );
        self
    }

    /// Serialize `body` as the JSON request body
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, Error> {
        self.body = Some(serde_json::to_vec(body)?);
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(self)
    }

    fn into_request(self) -> Result<RequestBuilder, Error> {
        let mut url = Url::parse(&self.url)?;
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }

        let request = self
            .client
            .request(self.method, url)
            .headers(self.headers);
        Ok(match self.body {
            Some(body) => request.body(body),
            None => request,
        })
    }

    /// Send the request and decode a successful response as JSON.
    ///
    /// Non-2xx answers become [`Error::Api`] carrying the body's `message`
    /// when the server sent one.
    pub async fn execute<T: DeserializeOwned>(self) -> Result<T, Error> {
        let label = format!("{} {}", self.method, self.url);
        let is_read = self.method == Method::GET;
        debug!("{}", label);
        let response = self.into_request()?.send().await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));
            debug!("{} failed: {} {}", label, status, message);
            return Err(Error::api(status.as_u16(), message));
        }

        if text.trim().is_empty() && !is_read {
            debug!("{} answered {} with no body", label, status);
            return Ok(serde_json::from_str(EMPTY_SUCCESS)?);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

/// Entry points for building requests
pub struct Fetch;

impl Fetch {
    pub fn get<'a>(client: &'a Client, url: &str) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::GET)
    }

    pub fn post<'a>(client: &'a Client, url: &str) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::POST)
    }

    pub fn put<'a>(client: &'a Client, url: &str) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::PUT)
    }

    pub fn delete<'a>(client: &'a Client, url: &str) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::DELETE)
    }
}
