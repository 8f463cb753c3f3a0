//! Backend configuration for client apps.
//!
//! Provides `BackendConfig`, the set of public values a client needs to reach
//! the Supabase project: the project URL, the anon key, and the notes table.

use serde::{Deserialize, Serialize};

pub use crate::util::normalize_text_option;
use crate::util::is_http_url;

pub const DEFAULT_NOTES_TABLE: &str = "notes";

const ENV_SUPABASE_URL: &str = "SUPABASE_URL";
const ENV_SUPABASE_ANON_KEY: &str = "SUPABASE_ANON_KEY";
const ENV_NOTES_TABLE: &str = "JOTTER_NOTES_TABLE";

/// Partially provided backend configuration.
///
/// These values are safe-to-ship public endpoints/keys. Secret credentials
/// (passwords, refresh tokens) must never be stored here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    #[serde(default)]
    pub supabase_url: Option<String>,
    #[serde(default)]
    pub supabase_anon_key: Option<String>,
    #[serde(default)]
    pub notes_table: Option<String>,
}

/// Backend configuration with every required value present and validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBackendConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub notes_table: String,
}

impl ResolvedBackendConfig {
    /// Base URL of the PostgREST endpoint.
    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.supabase_url)
    }
}

impl BackendConfig {
    /// Read configuration from `SUPABASE_URL`, `SUPABASE_ANON_KEY` and
    /// `JOTTER_NOTES_TABLE`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            supabase_url: normalize_text_option(lookup(ENV_SUPABASE_URL)),
            supabase_anon_key: normalize_text_option(lookup(ENV_SUPABASE_ANON_KEY)),
            notes_table: normalize_text_option(lookup(ENV_NOTES_TABLE)),
        }
    }

    /// Fill values missing from `self` with those from `fallback`.
    #[must_use]
    pub fn or(self, fallback: Self) -> Self {
        Self {
            supabase_url: normalize_text_option(self.supabase_url)
                .or_else(|| normalize_text_option(fallback.supabase_url)),
            supabase_anon_key: normalize_text_option(self.supabase_anon_key)
                .or_else(|| normalize_text_option(fallback.supabase_anon_key)),
            notes_table: normalize_text_option(self.notes_table)
                .or_else(|| normalize_text_option(fallback.notes_table)),
        }
    }

    /// Returns whether nothing has been configured at all.
    pub fn is_empty(&self) -> bool {
        normalize_text_option(self.supabase_url.clone()).is_none()
            && normalize_text_option(self.supabase_anon_key.clone()).is_none()
    }

    /// Validate and normalize into a usable configuration.
    pub fn resolve(&self) -> Result<ResolvedBackendConfig, String> {
        let supabase_url = normalize_required_http_url(self.supabase_url.clone(), "supabase_url")?;
        let supabase_anon_key =
            normalize_required_value(self.supabase_anon_key.clone(), "supabase_anon_key")?;
        let notes_table = normalize_text_option(self.notes_table.clone())
            .unwrap_or_else(|| DEFAULT_NOTES_TABLE.to_string());
        if !is_valid_table_name(&notes_table) {
            return Err(format!(
                "notes_table '{notes_table}' may only contain letters, digits and underscores"
            ));
        }

        Ok(ResolvedBackendConfig {
            supabase_url,
            supabase_anon_key,
            notes_table,
        })
    }
}

fn normalize_required_value(raw: Option<String>, field: &str) -> Result<String, String> {
    normalize_text_option(raw).ok_or_else(|| format!("backend field '{field}' is required"))
}

fn normalize_required_http_url(raw: Option<String>, field: &str) -> Result<String, String> {
    let value = normalize_required_value(raw, field)?;
    if is_http_url(&value) {
        Ok(value.trim_end_matches('/').to_string())
    } else {
        Err(format!(
            "backend field '{field}' must include http:// or https://"
        ))
    }
}

fn is_valid_table_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|character| character.is_ascii_alphanumeric() || character == '_')
}
