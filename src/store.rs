use std::collections::HashMap;

use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::{CommandRecord, CommandStatus};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Command '{0}' already exists")]
    DuplicateId(String),
}

/// In-memory command registry, the single source of truth for command state.
///
/// The store exclusively owns every record; callers get cloned snapshots,
/// never references into the map. All access goes through the `RwLock`, so
/// a read concurrent with the terminal write sees either the NEW record or
/// the finished one, never a torn mix.
#[derive(Debug, Default)]
pub struct CommandStore {
    commands: RwLock<HashMap<String, CommandRecord>>,
}

impl CommandStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a freshly created record under its id.
    pub async fn insert(&self, record: CommandRecord) -> Result<(), StoreError> {
        let mut commands = self.commands.write().await;
        if commands.contains_key(&record.id) {
            return Err(StoreError::DuplicateId(record.id));
        }
        commands.insert(record.id.clone(), record);
        Ok(())
    }

    /// Current snapshot of the record, if the id is known.
    pub async fn get(&self, id: &str) -> Option<CommandRecord> {
        self.commands.read().await.get(id).cloned()
    }

    /// Writes the terminal status and error for `id` in one step.
    ///
    /// Unknown ids and already-terminal records are a no-op returning
    /// `false`; terminal statuses never revert.
    pub async fn complete(&self, id: &str, status: CommandStatus, error: Option<String>) -> bool {
        let mut commands = self.commands.write().await;
        let Some(record) = commands.get_mut(id) else {
            return false;
        };
        if record.status.is_terminal() {
            return false;
        }
        record.status = status;
        record.error = error;
        true
    }

    pub async fn len(&self) -> usize {
        self.commands.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.commands.read().await.is_empty()
    }
}
