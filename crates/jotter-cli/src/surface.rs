//! Terminal rendering of the note list.

use jotter_core::sync::DisplaySurface;
use jotter_core::Note;

use crate::commands::common::format_note_lines;

/// Prints the list to stdout and messages to stderr.
///
/// With `show_list` off only messages are printed, so commands whose stdout
/// is a single value (an id, a JSON document) stay scriptable.
pub struct TerminalSurface {
    show_list: bool,
}

impl TerminalSurface {
    pub const fn new(show_list: bool) -> Self {
        Self { show_list }
    }

    fn print_list(&self, notes: &[Note]) {
        if !self.show_list {
            return;
        }
        if notes.is_empty() {
            println!("No notes yet.");
            return;
        }
        for line in format_note_lines(notes) {
            println!("{line}");
        }
    }
}

impl DisplaySurface for TerminalSurface {
    fn loading(&self) {
        tracing::debug!("Loading notes");
    }

    fn render(&self, notes: &[Note]) {
        self.print_list(notes);
    }

    fn remove_at(&self, position: usize, remaining: &[Note]) {
        tracing::debug!("Removed list row {}", position + 1);
        self.print_list(remaining);
    }

    fn show_message(&self, message: &str) {
        eprintln!("{message}");
    }
}
