use jotter_core::config::{normalize_text_option, BackendConfig};

use crate::cli::ConfigCommands;
use crate::config_profiles::{CliProfile, CliProfilesConfig};
use crate::error::CliError;

pub fn run_config(command: ConfigCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            profile,
            supabase_url,
            supabase_anon_key,
            notes_table,
            no_activate,
        } => {
            let explicit = BackendConfig {
                supabase_url,
                supabase_anon_key,
                notes_table,
            };
            run_config_init(profile.as_deref().or(global_profile), explicit, no_activate)
        }
    }
}

pub fn run_config_init(
    profile_name: Option<&str>,
    explicit: BackendConfig,
    no_activate: bool,
) -> Result<(), CliError> {
    let mut config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile_name);
    let existing_profile = config.profile(&profile_name).cloned().unwrap_or_default();

    let merged = merge_profile(&existing_profile, explicit, BackendConfig::from_env());
    let missing_fields = missing_fields(&merged);
    if missing_fields.is_empty() {
        merged
            .backend_config()
            .resolve()
            .map_err(CliError::Config)?;
    }

    *config.profile_mut_or_default(&profile_name) = merged;
    if !no_activate {
        config.active_profile = Some(profile_name.clone());
    }

    let path = config.save().map_err(CliError::Config)?;
    println!(
        "Profile '{}' initialized at {}",
        profile_name,
        path.display()
    );

    if missing_fields.is_empty() {
        println!(
            "Profile '{profile_name}' is ready. Run `jotter auth login --email <email> --password <password>`."
        );
    } else {
        println!(
            "Profile '{}' is missing: {}",
            profile_name,
            missing_fields.join(", ")
        );
    }

    Ok(())
}

/// Explicit flags win, then environment values, then what the profile had.
pub fn merge_profile(existing: &CliProfile, explicit: BackendConfig, env: BackendConfig) -> CliProfile {
    let merged = explicit.or(env).or(existing.backend_config());
    CliProfile {
        supabase_url: merged.supabase_url,
        supabase_anon_key: merged.supabase_anon_key,
        notes_table: merged.notes_table,
    }
}

pub fn missing_fields(profile: &CliProfile) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if normalize_text_option(profile.supabase_url.clone()).is_none() {
        missing.push("supabase_url");
    }
    if normalize_text_option(profile.supabase_anon_key.clone()).is_none() {
        missing.push("supabase_anon_key");
    }
    missing
}
