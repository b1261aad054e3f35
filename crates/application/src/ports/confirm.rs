//! Confirmation port

/// Asks the user to approve a destructive action.
///
/// The controller only needs the answer; how the question is presented
/// (dialog, terminal prompt, auto-approve flag) is up to the implementor.
pub trait Confirmer: Send + Sync {
    /// Returns true if the user approved the prompt.
    fn confirm(&self, prompt: &str) -> bool;
}
