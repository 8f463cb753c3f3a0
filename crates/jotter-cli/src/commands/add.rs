use jotter_core::editor::NoteEditor;

use crate::commands::common::{open_session, save_and_refresh};
use crate::error::CliError;

pub async fn run_add(
    title_parts: &[String],
    description: Option<&str>,
    global_profile: Option<&str>,
) -> Result<(), CliError> {
    let session = open_session(global_profile, false).await?;
    let editor = NoteEditor::open(session.synchronizer.clone(), session.user_id, None);

    let note_id = save_and_refresh(
        &editor,
        &session.synchronizer,
        &title_parts.join(" "),
        description.unwrap_or_default(),
    )
    .await?;
    println!("{note_id}");
    Ok(())
}
