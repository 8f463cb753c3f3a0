use std::sync::Arc;

use jotter_core::auth::{GateDecision, SessionGate};

use crate::auth::clear_stored_session;
use crate::cli::AuthCommands;
use crate::commands::common::{build_auth_client, load_backend};
use crate::config_profiles::CliProfilesConfig;
use crate::error::CliError;

pub async fn run_auth(command: AuthCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    match command {
        AuthCommands::Login {
            profile,
            email,
            password,
        } => run_login(profile.as_deref().or(global_profile), &email, &password).await,
        AuthCommands::Status { profile } => run_status(profile.as_deref().or(global_profile)).await,
        AuthCommands::Logout { profile } => run_logout(profile.as_deref().or(global_profile)).await,
    }
}

fn open_gate(profile: Option<&str>) -> Result<(String, SessionGate), CliError> {
    let (profile_name, backend) = load_backend(profile)?;
    let client = build_auth_client(&profile_name, &backend)?;
    Ok((profile_name, SessionGate::new(Arc::new(client))))
}

async fn run_login(profile: Option<&str>, email: &str, password: &str) -> Result<(), CliError> {
    let (profile_name, gate) = open_gate(profile)?;

    if let GateDecision::Admit(identity) = gate.enter().await {
        let email_label = identity.email.as_deref().unwrap_or("(no email)");
        println!("Profile '{profile_name}' is already signed in as {email_label}");
        return Ok(());
    }

    let identity = gate
        .sign_in(email, password)
        .await
        .map_err(|error| CliError::Auth(error.to_string()))?;
    let email_label = identity.email.as_deref().unwrap_or("(no email)");
    println!("Signed in profile '{profile_name}' as {email_label}");
    Ok(())
}

async fn run_status(profile: Option<&str>) -> Result<(), CliError> {
    let (profile_name, gate) = match open_gate(profile) {
        Ok(opened) => opened,
        Err(CliError::Config(message)) => {
            println!("{message}");
            return Ok(());
        }
        Err(error) => return Err(error),
    };

    match gate.enter().await {
        GateDecision::Admit(identity) => {
            let email_label = identity.email.as_deref().unwrap_or("(no email)");
            println!(
                "Profile '{}' is signed in as {} (user {})",
                profile_name, email_label, identity.user_id
            );
        }
        GateDecision::RequireCredentials => {
            println!("Profile '{profile_name}' is not signed in.");
        }
    }
    Ok(())
}

async fn run_logout(profile: Option<&str>) -> Result<(), CliError> {
    match open_gate(profile) {
        Ok((profile_name, gate)) => {
            gate.sign_out()
                .await
                .map_err(|error| CliError::Auth(error.to_string()))?;
            println!("Signed out profile '{profile_name}'");
        }
        Err(CliError::Config(_)) => {
            let config = CliProfilesConfig::load().map_err(CliError::Config)?;
            let profile_name = config.resolve_profile_name(profile);
            clear_stored_session(&profile_name)
                .map_err(|error| CliError::Auth(error.to_string()))?;
            println!("Signed out profile '{profile_name}'");
        }
        Err(error) => return Err(error),
    }
    Ok(())
}
