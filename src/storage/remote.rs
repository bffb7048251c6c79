use reqwest::header::{
    AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue,
    InvalidHeaderValue,
};
use serde::Deserialize;

use super::{BackendError, MAX_NOTES, NoteBackend};
use crate::config::{BackendConfig, DEFAULT_TABLE};
use crate::models::Note;

const SELECT_FIELDS: &str = "name,message,created";
const ORDER: &str = "created.desc";

/// Talks to a PostgREST style collection, e.g. a Supabase table.
#[derive(Debug, Clone)]
pub struct RemoteBackend {
    client: reqwest::Client,
    collection_url: String,
}

/// Create responses come back either as the row itself or as a list of rows.
#[derive(Deserialize)]
#[serde(untagged)]
enum CreatedRows {
    Many(Vec<Note>),
    One(Note),
}

impl RemoteBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .default_headers(auth_headers(config.key.trim())?)
            .build()?;

        Ok(Self {
            client,
            collection_url: collection_url(config),
        })
    }

    pub fn collection_url(&self) -> &str {
        &self.collection_url
    }
}

fn collection_url(config: &BackendConfig) -> String {
    let base = config.url.trim().trim_end_matches('/');
    let rest_path = config.rest_path.trim_matches('/');
    let table = match config.table.trim() {
        "" => DEFAULT_TABLE,
        table => table,
    };

    if rest_path.is_empty() {
        format!("{base}/{table}")
    } else {
        format!("{base}/{rest_path}/{table}")
    }
}

fn auth_headers(key: &str) -> Result<HeaderMap, InvalidHeaderValue> {
    let mut headers = HeaderMap::new();
    headers.insert(HeaderName::from_static("apikey"), HeaderValue::from_str(key)?);
    headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {key}"))?);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
        HeaderName::from_static("prefer"),
        HeaderValue::from_static("return=representation"),
    );
    Ok(headers)
}

/// Keeps every row that reads as a note; a bad row never hides the rest.
fn decode_rows(rows: Vec<serde_json::Value>) -> Vec<Note> {
    rows.into_iter()
        .filter_map(|row| match serde_json::from_value::<Note>(row) {
            Ok(note) => Some(note),
            Err(e) => {
                tracing::warn!("Skipping unreadable note row: {e}");
                None
            }
        })
        .collect()
}

impl NoteBackend for RemoteBackend {
    fn is_shared(&self) -> bool {
        true
    }

    async fn fetch_notes(&self) -> Result<Vec<Note>, BackendError> {
        tracing::debug!("Fetching notes from {}", self.collection_url);

        let limit = MAX_NOTES.to_string();
        let response = self
            .client
            .get(&self.collection_url)
            .query(&[
                ("select", SELECT_FIELDS),
                ("order", ORDER),
                ("limit", limit.as_str()),
            ])
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status));
        }

        let body = response.bytes().await?;
        match serde_json::from_slice::<serde_json::Value>(&body)? {
            serde_json::Value::Array(rows) => Ok(decode_rows(rows)),
            other => {
                tracing::warn!("Expected a list of notes, got {other}; showing an empty board");
                Ok(Vec::new())
            }
        }
    }

    async fn create_note(&self, note: &Note) -> Result<Note, BackendError> {
        tracing::debug!("Posting note to {}", self.collection_url);

        let response = self
            .client
            .post(&self.collection_url)
            .json(note)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status));
        }

        let body = response.bytes().await?;
        let stored = match serde_json::from_slice::<CreatedRows>(&body) {
            Ok(CreatedRows::One(row)) => Some(row),
            Ok(CreatedRows::Many(rows)) => rows.into_iter().next(),
            Err(e) => {
                tracing::debug!("Create response carried no usable row: {e}");
                None
            }
        };

        Ok(stored.unwrap_or_else(|| note.clone()))
    }
}
