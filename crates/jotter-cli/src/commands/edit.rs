use jotter_core::editor::NoteEditor;

use crate::commands::common::{open_session, resolve_note_target, save_and_refresh};
use crate::error::CliError;

pub async fn run_edit(
    target: &str,
    title: Option<String>,
    description: Option<String>,
    global_profile: Option<&str>,
) -> Result<(), CliError> {
    let session = open_session(global_profile, false).await?;
    let notes = session
        .synchronizer
        .on_visible()
        .await
        .map_err(CliError::reported)?;
    let (_, note) = resolve_note_target(&notes, target)?;

    let editor = NoteEditor::open(session.synchronizer.clone(), session.user_id, Some(note));
    if title.is_none() && description.is_none() {
        editor.cancel();
        eprintln!("Nothing to change; pass --title and/or --description.");
        return Ok(());
    }

    let (current_title, current_description) = editor.initial_fields();
    let title = title.unwrap_or_else(|| current_title.to_string());
    let description = description.unwrap_or_else(|| current_description.to_string());

    let note_id =
        save_and_refresh(&editor, &session.synchronizer, &title, &description).await?;
    println!("{note_id}");
    Ok(())
}
