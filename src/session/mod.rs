//! Editing session: store, history and pointer interaction.

/// AI bulk-edit collaborator boundary.
pub mod bulk_edit;
/// Bounded snapshot history.
pub mod history;
/// Move/resize state machine.
pub mod interaction;
/// Editor options.
pub mod opts;
/// The editor store.
pub mod store;
