//! Create/edit modals
//!
//! A [`FormController`] holds the draft of one entity's editable fields.
//! Submitting coerces the draft into a JSON payload, sends it with `POST`
//! (create) or `PUT` (edit) and asks the owning view to reload.

mod bus;
mod schedule;
mod user;

use log::{error, info, warn};
use serde::de::IgnoredAny;
use serde_json::Value;

use crate::api::ApiClient;
use crate::error::{Error, Result};
use crate::models::Identified;
use crate::view::{Reload, Resource, ViewScope};

pub use bus::*;
pub use schedule::*;
pub use user::*;

/// Whether a submit creates a record or updates one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { id: String },
}

/// The editable fields of one entity
pub trait Draft: Default + Clone + Send + Sync {
    type Record: Resource;

    /// Alert shown when the server gives no message
    const FAILURE: &'static str = "Operation failed";

    /// Seed a draft from an existing record
    fn from_record(record: &Self::Record) -> Self;

    /// Coerce the draft into the request body
    fn payload(&self, mode: &FormMode) -> Result<Value>;
}

/// Modal state around a [`Draft`]
pub struct FormController<D: Draft> {
    api: ApiClient,
    scope: ViewScope,
    mode: FormMode,
    draft: D,
    open: bool,
    alert: Option<String>,
}

impl<D: Draft> FormController<D> {
    pub fn new(api: ApiClient, scope: ViewScope) -> Self {
        Self {
            api,
            scope,
            mode: FormMode::Create,
            draft: D::default(),
            open: false,
            alert: None,
        }
    }

    /// Open with an empty draft
    pub fn open_create(&mut self) {
        self.open_create_with(D::default());
    }

    /// Open a create form with a pre-filled draft
    pub fn open_create_with(&mut self, draft: D) {
        self.mode = FormMode::Create;
        self.draft = draft;
        self.alert = None;
        self.open = true;
    }

    /// Open seeded from an existing record
    pub fn open_edit(&mut self, record: &D::Record) {
        self.mode = FormMode::Edit {
            id: record.id().to_string(),
        };
        self.draft = D::from_record(record);
        self.alert = None;
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.alert = None;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut D {
        &mut self.draft
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// Modal title, e.g. `Add New User` or `Edit User`
    pub fn title(&self) -> String {
        let noun = capitalize(<D::Record as Resource>::NOUN);
        match self.mode {
            FormMode::Create => format!("Add New {}", noun),
            FormMode::Edit { .. } => format!("Edit {}", noun),
        }
    }

    /// Send the draft. On success the form closes and `owner` reloads; on
    /// failure the form stays open with the draft intact and an alert set.
    pub async fn submit<O>(&mut self, owner: &mut O) -> Result<()>
    where
        O: Reload + ?Sized,
    {
        if !self.open {
            return Err(Error::validation("form is not open"));
        }

        let result = self.send().await;
        if let Err(err) = result {
            if !err.is_cancelled() {
                error!("Error saving {}: {}", <D::Record as Resource>::NOUN, err);
                self.alert = Some(err.user_message(D::FAILURE));
            }
            return Err(err);
        }

        info!("Saved {}", <D::Record as Resource>::NOUN);
        self.close();
        if let Err(err) = owner.reload().await {
            warn!("Reload after saving {} failed: {}", <D::Record as Resource>::NOUN, err);
        }
        Ok(())
    }

    async fn send(&self) -> Result<()> {
        let body = self.draft.payload(&self.mode)?;
        let request = async {
            match &self.mode {
                FormMode::Create => {
                    self.api
                        .post::<_, IgnoredAny>(<D::Record as Resource>::PATH, &body)
                        .await
                }
                FormMode::Edit { id } => {
                    self.api
                        .put::<_, IgnoredAny>(&<D::Record as Resource>::member_path(id), &body)
                        .await
                }
            }
        };
        self.scope.guard(request).await.map(|_| ())
    }
}

impl<D: Draft + std::fmt::Debug> std::fmt::Debug for FormController<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormController")
            .field("mode", &self.mode)
            .field("draft", &self.draft)
            .field("open", &self.open)
            .field("alert", &self.alert)
            .finish()
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Parse a whole number typed into a form field
pub(crate) fn parse_count(field: &str, value: &str) -> Result<u32> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::validation(format!("{} must be a whole number", field)))
}

/// Parse an amount typed into a form field
pub(crate) fn parse_amount(field: &str, value: &str) -> Result<f64> {
    match value.trim().parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount >= 0.0 => Ok(amount),
        _ => Err(Error::validation(format!("{} must be a non-negative number", field))),
    }
}

/// Reject blank required fields
pub(crate) fn required<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        Err(Error::validation(format!("{} is required", field)))
    } else {
        Ok(value)
    }
}
