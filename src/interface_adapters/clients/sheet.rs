use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::domain::{GuestPatch, GuestRecord, GuestStatus, GuestStore, NewGuest, StoreError};

// The sheet API wraps row fields in `{"data": {...}}` in one front end and sends
// them bare in the other. Both are accepted by the hosted store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyShape {
    #[default]
    Wrapped,
    Flat,
}

impl BodyShape {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "wrapped" => Some(BodyShape::Wrapped),
            "flat" => Some(BodyShape::Flat),
            _ => None,
        }
    }
}

// Column names used by the spreadsheet. Names are matched exactly, including
// any trailing whitespace the sheet header carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSchema {
    pub name_field: String,
    pub status_field: String,
    pub photo_field: String,
    pub body_shape: BodyShape,
}

impl Default for SheetSchema {
    fn default() -> Self {
        Self {
            name_field: "Convidados".to_string(),
            status_field: "Status".to_string(),
            photo_field: "Foto".to_string(),
            body_shape: BodyShape::Wrapped,
        }
    }
}

impl SheetSchema {
    fn record_from_row(&self, row: &Map<String, Value>) -> GuestRecord {
        GuestRecord {
            name: cell_text(row.get(&self.name_field)),
            status: cell_text(row.get(&self.status_field))
                .and_then(|value| GuestStatus::from_cell(&value)),
            photo: cell_text(row.get(&self.photo_field)).filter(|value| !value.is_empty()),
        }
    }

    fn envelope(&self, fields: Map<String, Value>) -> Value {
        match self.body_shape {
            BodyShape::Wrapped => serde_json::json!({ "data": fields }),
            BodyShape::Flat => Value::Object(fields),
        }
    }

    fn create_body(&self, guest: NewGuest) -> Value {
        let mut fields = Map::new();
        fields.insert(self.name_field.clone(), Value::String(guest.name));
        fields.insert(
            self.status_field.clone(),
            Value::String(guest.status.label().to_string()),
        );
        if let Some(photo) = guest.photo {
            fields.insert(self.photo_field.clone(), Value::String(photo));
        }
        self.envelope(fields)
    }

    fn patch_body(&self, patch: GuestPatch) -> Value {
        let mut fields = Map::new();
        if let Some(status) = patch.status {
            fields.insert(
                self.status_field.clone(),
                Value::String(status.label().to_string()),
            );
        }
        if let Some(photo) = patch.photo {
            fields.insert(self.photo_field.clone(), Value::String(photo));
        }
        self.envelope(fields)
    }
}

// Sheet cells come back as strings, but numbers and booleans show up too.
fn cell_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

#[derive(Debug, Error)]
pub enum SheetClientError {
    #[error("sheet transport error: {0}")]
    Transport(reqwest::Error),
    #[error("sheet upstream error {status}")]
    Upstream { status: StatusCode },
    #[error("sheet response decode error: {0}")]
    Decode(reqwest::Error),
    #[error("invalid sheet url: {0}")]
    InvalidUrl(String),
}

impl From<SheetClientError> for StoreError {
    fn from(err: SheetClientError) -> Self {
        match err {
            SheetClientError::Transport(err) => StoreError::Transport(err.to_string()),
            SheetClientError::Upstream { status } => StoreError::Upstream {
                status: status.as_u16(),
            },
            SheetClientError::Decode(err) => StoreError::Decode(err.to_string()),
            SheetClientError::InvalidUrl(message) => StoreError::Transport(message),
        }
    }
}

// Thin reqwest client for the spreadsheet REST API.
#[derive(Clone)]
pub struct SheetClient {
    http: Client,
    base_url: Url,
    schema: SheetSchema,
}

impl SheetClient {
    pub fn new(
        base_url: &str,
        schema: SheetSchema,
        timeout: Option<Duration>,
    ) -> Result<Self, SheetClientError> {
        let base_url =
            Url::parse(base_url).map_err(|err| SheetClientError::InvalidUrl(err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(SheetClientError::InvalidUrl(format!(
                "{base_url} cannot be used as a base url"
            )));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(SheetClientError::Transport)?;

        Ok(Self {
            http,
            base_url,
            schema,
        })
    }

    // `<base>/<name_field>/<name>` with both segments percent-encoded.
    pub fn row_url(&self, name: &str) -> Result<Url, SheetClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SheetClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push(&self.schema.name_field)
            .push(name);
        Ok(url)
    }

    async fn fetch_rows(&self) -> Result<Vec<GuestRecord>, SheetClientError> {
        let res = self
            .http
            .get(self.base_url.clone())
            .send()
            .await
            .map_err(SheetClientError::Transport)?;

        let status = res.status();
        if !status.is_success() {
            return Err(SheetClientError::Upstream { status });
        }

        let rows = res
            .json::<Vec<Map<String, Value>>>()
            .await
            .map_err(SheetClientError::Decode)?;
        Ok(rows
            .iter()
            .map(|row| self.schema.record_from_row(row))
            .collect())
    }

    async fn send_write(&self, req: reqwest::RequestBuilder) -> Result<(), SheetClientError> {
        let res = req.send().await.map_err(SheetClientError::Transport)?;
        let status = res.status();
        if !status.is_success() {
            return Err(SheetClientError::Upstream { status });
        }
        Ok(())
    }
}

#[async_trait]
impl GuestStore for SheetClient {
    async fn list(&self) -> Result<Vec<GuestRecord>, StoreError> {
        Ok(self.fetch_rows().await?)
    }

    async fn create(&self, guest: NewGuest) -> Result<(), StoreError> {
        let body = self.schema.create_body(guest);
        let req = self.http.post(self.base_url.clone()).json(&body);
        Ok(self.send_write(req).await?)
    }

    async fn update(&self, name: &str, patch: GuestPatch) -> Result<(), StoreError> {
        let url = self.row_url(name)?;
        let body = self.schema.patch_body(patch);
        let req = self.http.patch(url).json(&body);
        Ok(self.send_write(req).await?)
    }
}
