//! Yes/no prompts for destructive commands.

use std::io::{self, BufRead, Write};

use jotter_core::confirm::Confirmer;

/// Asks on stderr and reads one answer line from stdin.
pub struct StdinConfirmer;

impl Confirmer for StdinConfirmer {
    fn confirm(&self, title: &str, message: &str) -> bool {
        let mut stderr = io::stderr();
        if write!(stderr, "{title}: {message} [y/N] ")
            .and_then(|()| stderr.flush())
            .is_err()
        {
            return false;
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_affirmative(&answer),
            Err(error) => {
                tracing::warn!("Failed to read confirmation: {}", error);
                false
            }
        }
    }
}

/// Confirms without asking (`--yes`).
pub struct AssumeYes;

impl Confirmer for AssumeYes {
    fn confirm(&self, _title: &str, _message: &str) -> bool {
        true
    }
}

/// Only `y` or `yes` (any case) counts; empty input or EOF is a dismissal.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
