//! Response envelope shared by every endpoint

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Pagination block returned alongside list responses
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    /// Total number of matching records on the server
    #[serde(default)]
    pub total: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<u64>,
}

/// Raw `{ success, data, pagination?, message? }` wrapper as sent on the wire
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub pagination: Option<Pagination>,
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// Validate the envelope into a [`Payload`].
    ///
    /// `success: false` becomes [`Error::Rejected`] with the server's message.
    pub fn into_payload(self) -> Result<Payload<T>> {
        if !self.success {
            return Err(Error::rejected(
                self.message
                    .unwrap_or_else(|| "Request was not successful".to_string()),
            ));
        }
        Ok(Payload {
            data: self.data,
            pagination: self.pagination,
            message: self.message,
        })
    }
}

/// A validated successful response
#[derive(Debug, Clone, PartialEq)]
pub struct Payload<T> {
    pub data: Option<T>,
    pub pagination: Option<Pagination>,
    pub message: Option<String>,
}

impl<T> Payload<T> {
    /// The payload data, which the caller requires
    pub fn into_data(self) -> Result<T> {
        self.data
            .ok_or_else(|| Error::rejected("Response carried no data"))
    }

    /// `pagination.total`, or zero when the server sent none
    pub fn total(&self) -> u64 {
        self.pagination.map(|p| p.total).unwrap_or(0)
    }
}

impl<T: Default> Payload<T> {
    /// The payload data, or an empty value when absent
    pub fn into_data_or_default(self) -> T {
        self.data.unwrap_or_default()
    }
}
