use std::sync::Arc;

use crate::{engine::CommandEngine, store::CommandStore};

/// Shared handles injected into the router; cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CommandStore>,
    pub engine: Arc<CommandEngine>,
}

impl AppState {
    pub fn new(store: Arc<CommandStore>, engine: Arc<CommandEngine>) -> Self {
        Self { store, engine }
    }
}
