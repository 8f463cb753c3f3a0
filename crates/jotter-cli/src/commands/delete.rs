use jotter_core::confirm::{confirm_delete, Confirmer};

use crate::commands::common::{open_session, resolve_note_target};
use crate::error::CliError;
use crate::prompt::{AssumeYes, StdinConfirmer};

pub async fn run_delete(
    target: &str,
    assume_yes: bool,
    global_profile: Option<&str>,
) -> Result<(), CliError> {
    let session = open_session(global_profile, false).await?;
    let notes = session
        .synchronizer
        .on_visible()
        .await
        .map_err(CliError::reported)?;
    let (position, note) = resolve_note_target(&notes, target)?;
    let Some(note_id) = note.id else {
        return Err(CliError::NoteNotFound(target.to_string()));
    };

    let confirmer: &dyn Confirmer = if assume_yes { &AssumeYes } else { &StdinConfirmer };
    let pending = confirm_delete(confirmer, || {
        session
            .synchronizer
            .delete(&session.user_id, &note_id, position)
    });

    match pending {
        Some(deletion) => {
            deletion.await.map_err(CliError::reported)?;
            println!("{note_id}");
        }
        None => eprintln!("Delete cancelled."),
    }
    Ok(())
}
