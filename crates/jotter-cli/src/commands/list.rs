use crate::commands::common::{note_to_list_item, open_session};
use crate::error::CliError;

pub async fn run_list(json: bool, global_profile: Option<&str>) -> Result<(), CliError> {
    let session = open_session(global_profile, !json).await?;
    let notes = session
        .synchronizer
        .on_visible()
        .await
        .map_err(CliError::reported)?;

    if json {
        let items = notes
            .iter()
            .enumerate()
            .map(|(position, note)| note_to_list_item(position, note))
            .collect::<Vec<_>>();
        println!("{}", serde_json::to_string_pretty(&items)?);
    }

    Ok(())
}
