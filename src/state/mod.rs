//! State management components
//!
//! The [`AppContext`](app_context::AppContext) owns the record store, the
//! record view and the undo/redo history; the notifier and event types are
//! shared by the store and the view.

pub mod app_context;
pub mod events;
pub mod history;
pub mod notifier;
