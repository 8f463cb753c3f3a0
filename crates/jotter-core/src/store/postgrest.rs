//! Supabase PostgREST note store.
//!
//! Notes live in a single table with row-level security keyed on `user_id`;
//! every request carries the user's access token.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};

use super::{NoteStore, StoreError, StoreResult};
use crate::auth::Identity;
use crate::config::ResolvedBackendConfig;
use crate::models::{Note, NoteDocument, NoteId};
use crate::util::compact_text;

const NOTE_COLUMNS: &str = "id,title,description,timestamp";

#[derive(Debug, Clone)]
pub struct PostgrestNoteStore {
    table_url: String,
    anon_key: String,
    client: Client,
}

impl PostgrestNoteStore {
    pub fn new(config: &ResolvedBackendConfig) -> crate::Result<Self> {
        if config.supabase_anon_key.trim().is_empty() {
            return Err(crate::Error::Config(
                "Supabase anon key must not be empty".to_string(),
            ));
        }
        Ok(Self {
            table_url: format!("{}/{}", config.rest_url(), config.notes_table),
            anon_key: config.supabase_anon_key.clone(),
            client: Client::builder().build()?,
        })
    }


    fn authorized(&self, request: RequestBuilder, identity: &Identity) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(&identity.access_token)
            .header("Accept", "application/json")
    }

    fn list_url(&self, identity: &Identity) -> String {
        format!(
            "{}?select={NOTE_COLUMNS}&user_id=eq.{}&order=timestamp.desc",
            self.table_url,
            urlencoding::encode(identity.user_id.as_str())
        )
    }

    fn record_url(&self, identity: &Identity, id: &NoteId) -> String {
        format!(
            "{}?id=eq.{}&user_id=eq.{}",
            self.table_url,
            urlencoding::encode(id.as_str()),
            urlencoding::encode(identity.user_id.as_str())
        )
    }
}

#[async_trait]
impl NoteStore for PostgrestNoteStore {
    async fn list_notes(&self, identity: &Identity) -> StoreResult<Vec<Note>> {
        let request = self.authorized(self.client.get(self.list_url(identity)), identity);
        let response = send(request).await?;
        let rows = response
            .json::<Vec<NoteRow>>()
            .await
            .map_err(|error| StoreError::Unknown(format!("invalid notes payload: {error}")))?;
        tracing::debug!("Loaded {} notes for {}", rows.len(), identity.user_id);
        rows.into_iter().map(NoteRow::into_note).collect()
    }

    async fn create_note(
        &self,
        identity: &Identity,
        document: &NoteDocument,
    ) -> StoreResult<NoteId> {
        let body = NewNoteRow {
            user_id: identity.user_id.as_str(),
            document,
        };
        let request = self
            .authorized(self.client.post(&self.table_url), identity)
            .header("Prefer", "return=representation")
            .json(&body);
        let response = send(request).await?;
        let rows = response
            .json::<Vec<NoteRow>>()
            .await
            .map_err(|error| StoreError::Unknown(format!("invalid create payload: {error}")))?;
        let created = rows.into_iter().next().ok_or_else(|| {
            StoreError::Unknown("create response did not include the new note".to_string())
        })?;
        NoteId::new(created.id)
            .ok_or_else(|| StoreError::Unknown("store assigned an empty note id".to_string()))
    }

    async fn overwrite_note(
        &self,
        identity: &Identity,
        id: &NoteId,
        document: &NoteDocument,
    ) -> StoreResult<()> {
        let body = FullNoteRow {
            id: id.as_str(),
            user_id: identity.user_id.as_str(),
            document,
        };
        let url = format!("{}?id=eq.{}", self.table_url, urlencoding::encode(id.as_str()));
        let request = self
            .authorized(self.client.put(url), identity)
            .header("Prefer", "return=minimal")
            .json(&body);
        send(request).await?;
        Ok(())
    }

    async fn delete_note(&self, identity: &Identity, id: &NoteId) -> StoreResult<()> {
        let request = self
            .authorized(self.client.delete(self.record_url(identity, id)), identity)
            .header("Prefer", "return=minimal");
        send(request).await?;
        Ok(())
    }
}

async fn send(request: RequestBuilder) -> StoreResult<Response> {
    let response = request
        .send()
        .await
        .map_err(|error| StoreError::Network(error.to_string()))?;
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(classify_status(status, &body))
}

fn classify_status(status: StatusCode, body: &str) -> StoreError {
    let message = parse_api_error(status, body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StoreError::PermissionDenied(message),
        StatusCode::REQUEST_TIMEOUT
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => StoreError::Network(message),
        _ => StoreError::Unknown(message),
    }
}

#[derive(Debug, Deserialize)]
struct PostgrestErrorResponse {
    message: Option<String>,
    hint: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<PostgrestErrorResponse>(body) {
        if let Some(message) = payload.message.or(payload.hint) {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let trimmed = compact_text(body);
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}

#[derive(Debug, Deserialize)]
struct NoteRow {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    timestamp: Option<i64>,
}

impl NoteRow {
    fn into_note(self) -> StoreResult<Note> {
        let id = NoteId::new(self.id)
            .ok_or_else(|| StoreError::Unknown("note row without id".to_string()))?;
        let document = NoteDocument {
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            timestamp: self.timestamp.unwrap_or(0),
        };
        Ok(document.into_note(id))
    }
}

/// Accept both text/uuid and integer primary keys.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(value) => value,
        RawId::Number(value) => value.to_string(),
    })
}

#[derive(Serialize)]
struct NewNoteRow<'a> {
    user_id: &'a str,
    #[serde(flatten)]
    document: &'a NoteDocument,
}

#[derive(Serialize)]
struct FullNoteRow<'a> {
    id: &'a str,
    user_id: &'a str,
    #[serde(flatten)]
    document: &'a NoteDocument,
}
