use std::sync::Arc;

use chrono::Utc;
use jotter_core::auth::{GateDecision, SessionGate, UserId};
use jotter_core::config::{BackendConfig, ResolvedBackendConfig};
use jotter_core::store::PostgrestNoteStore;
use jotter_core::sync::NoteListSynchronizer;
use jotter_core::editor::NoteEditor;
use jotter_core::{Note, NoteId};
use serde::Serialize;

use crate::auth::{auth_client_for, CliAuthClient};
use crate::config_profiles::{CliProfile, CliProfilesConfig};
use crate::error::CliError;
use crate::surface::TerminalSurface;

const ID_TARGET_PREFIX: &str = "id:";

#[derive(Debug, Serialize)]
pub struct NoteListItem {
    pub position: usize,
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    pub timestamp: i64,
    pub relative_time: String,
}

/// A signed-in user together with a synchronizer bound to the terminal.
pub struct NoteSession {
    pub user_id: UserId,
    pub synchronizer: NoteListSynchronizer,
}

/// Resolve the profile name and its backend config; env values fill gaps.
pub fn load_backend(
    global_profile: Option<&str>,
) -> Result<(String, ResolvedBackendConfig), CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(global_profile);
    let backend = config
        .profile(&profile_name)
        .map(CliProfile::backend_config)
        .unwrap_or_default()
        .or(BackendConfig::from_env());

    if backend.is_empty() {
        return Err(CliError::Config(format!(
            "Profile '{profile_name}' is not configured. Run `jotter config init --profile {profile_name}` or set SUPABASE_URL and SUPABASE_ANON_KEY."
        )));
    }

    let resolved = backend.resolve().map_err(CliError::Config)?;
    Ok((profile_name, resolved))
}

pub fn build_auth_client(
    profile_name: &str,
    backend: &ResolvedBackendConfig,
) -> Result<CliAuthClient, CliError> {
    auth_client_for(profile_name, backend).map_err(|error| CliError::Auth(error.to_string()))
}

/// Pass the session gate, then wire the synchronizer to the terminal.
pub async fn open_session(
    global_profile: Option<&str>,
    show_list: bool,
) -> Result<NoteSession, CliError> {
    let (profile_name, backend) = load_backend(global_profile)?;
    let auth = Arc::new(build_auth_client(&profile_name, &backend)?);

    let gate = SessionGate::new(auth.clone());
    let GateDecision::Admit(identity) = gate.enter().await else {
        return Err(CliError::NotSignedIn);
    };
    tracing::debug!("Profile '{}' admitted as {}", profile_name, identity.user_id);

    let store = Arc::new(PostgrestNoteStore::new(&backend)?);
    let synchronizer =
        NoteListSynchronizer::new(auth, store, Arc::new(TerminalSurface::new(show_list)));

    Ok(NoteSession {
        user_id: identity.user_id,
        synchronizer,
    })
}

/// Submit the editor, then hand its completion signal to the synchronizer.
///
/// Once the save succeeds the note id is returned even if the follow-up
/// refresh fails; that failure has already been shown as a message.
pub async fn save_and_refresh(
    editor: &NoteEditor,
    synchronizer: &NoteListSynchronizer,
    title: &str,
    description: &str,
) -> Result<NoteId, CliError> {
    let signal = editor
        .submit(title, description)
        .await
        .map_err(CliError::reported)?;
    let note_id = signal.note_id().clone();

    if let Err(error) = synchronizer.on_completion(signal).await {
        tracing::debug!("Refresh after saving {} failed: {}", note_id, error);
    }
    Ok(note_id)
}

/// Find a note by 1-based list position or by id.
///
/// A bare number inside the list bounds is a position; `id:<ID>` always
/// matches by id. Returns the 0-based position along with the note.
pub fn resolve_note_target(notes: &[Note], target: &str) -> Result<(usize, Note), CliError> {
    let target = normalize_note_identifier(target)?;

    let by_id = |id: &str| {
        notes
            .iter()
            .position(|note| note.id.as_ref().is_some_and(|note_id| note_id.as_str() == id))
            .map(|index| (index, notes[index].clone()))
    };

    let found = if let Some(id) = target.strip_prefix(ID_TARGET_PREFIX) {
        by_id(id.trim())
    } else {
        target
            .parse::<usize>()
            .ok()
            .filter(|position| (1..=notes.len()).contains(position))
            .map(|position| (position - 1, notes[position - 1].clone()))
            .or_else(|| by_id(&target))
    };

    found.ok_or_else(|| CliError::NoteNotFound(target))
}

pub fn format_note_lines(notes: &[Note]) -> Vec<String> {
    let now_ms = Utc::now().timestamp_millis();
    notes
        .iter()
        .enumerate()
        .map(|(index, note)| {
            let title = truncate_chars(&collapse_whitespace(&note.title), 32);
            let description = collapse_whitespace(&note.description_preview(40));
            let relative_time = format_relative_time(note.timestamp, now_ms);

            if description.is_empty() {
                format!("{:>3}. {title:<32}  {relative_time}", index + 1)
            } else {
                format!(
                    "{:>3}. {title:<32}  {description:<43}  {relative_time}",
                    index + 1
                )
            }
        })
        .collect()
}

pub fn note_to_list_item(position: usize, note: &Note) -> NoteListItem {
    let now_ms = Utc::now().timestamp_millis();
    NoteListItem {
        position: position + 1,
        id: note.id.as_ref().map(ToString::to_string),
        title: note.title.clone(),
        description: note.description.clone(),
        timestamp: note.timestamp,
        relative_time: format_relative_time(note.timestamp, now_ms),
    }
}

pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn truncate_chars(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        value.to_string()
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = value.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}

pub fn normalize_note_identifier(id: &str) -> Result<String, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyNoteTarget)
    } else {
        Ok(trimmed.to_string())
    }
}
