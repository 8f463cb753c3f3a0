//! Delete confirmation prompt.

pub const DELETE_TITLE: &str = "Delete Note";
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this note?";

/// Presents a yes/no choice to the user.
pub trait Confirmer {
    /// `true` only on an explicit affirmative answer; dismissal is `false`.
    fn confirm(&self, title: &str, message: &str) -> bool;
}

/// Ask before deleting; `on_confirm` runs only when the user agrees.
///
/// Returns the callback's output, or `None` when the user backed out.
pub fn confirm_delete<C, T>(confirmer: &C, on_confirm: impl FnOnce() -> T) -> Option<T>
where
    C: Confirmer + ?Sized,
{
    if confirmer.confirm(DELETE_TITLE, DELETE_PROMPT) {
        Some(on_confirm())
    } else {
        tracing::debug!("Delete cancelled");
        None
    }
}
