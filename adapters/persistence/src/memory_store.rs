//! In-process store used by tests and ephemeral sessions.

use std::collections::HashMap;

use crate::{OwnerId, PersistenceError, SaveRequest, Workspace, WorkspaceStore};

/// Keeps saved requests in memory. Can be switched offline to simulate an
/// unreachable backend.
#[derive(Clone, Debug)]
pub struct MemoryStore {
    documents: HashMap<OwnerId, SaveRequest>,
    available: bool,
}

impl MemoryStore {
    /// Creates an empty, reachable store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            documents: HashMap::new(),
            available: true,
        }
    }

    /// Makes every subsequent call succeed or fail with [`PersistenceError::Unavailable`].
    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Last request saved for `owner`.
    #[must_use]
    pub fn document(&self, owner: &OwnerId) -> Option<&SaveRequest> {
        self.documents.get(owner)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkspaceStore for MemoryStore {
    fn fetch_workspace(&self, owner: &OwnerId) -> Result<Option<Workspace>, PersistenceError> {
        if !self.available {
            return Err(PersistenceError::Unavailable);
        }
        Ok(self
            .documents
            .get(owner)
            .map(|request| request.workspace.clone()))
    }

    fn save_workspace(&mut self, request: &SaveRequest) -> Result<(), PersistenceError> {
        if !self.available {
            return Err(PersistenceError::Unavailable);
        }
        let _ = self
            .documents
            .insert(request.owner_id.clone(), request.clone());
        Ok(())
    }
}
