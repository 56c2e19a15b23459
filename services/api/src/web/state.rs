//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use journal_core::service::EntryService;
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub entries: Arc<EntryService>,
}

impl AppState {
    pub fn new(entries: Arc<EntryService>) -> Self {
        Self { entries }
    }
}
