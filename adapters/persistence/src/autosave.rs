//! Dirty tracking and save status for periodic saves.

use std::fmt;

use dental_planner_core::Event;
use dental_planner_world::{query, World};
use tracing::{error, info};

use crate::{OwnerId, SaveRequest, WorkspaceStore};

/// Outcome of the most recent save attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveStatus {
    /// The design was stored.
    Saved,
    /// The store reported an error; the design stays dirty.
    Failed(String),
}

impl fmt::Display for SaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Saved => f.write_str("Saved"),
            Self::Failed(reason) => write!(f, "Save failed: {reason}"),
        }
    }
}

/// Tracks unsaved changes and saves them when ticked.
///
/// Failures never roll back the in-memory design; the next tick retries.
#[derive(Clone, Debug)]
pub struct Autosave {
    owner: OwnerId,
    dirty: bool,
    status: Option<SaveStatus>,
}

impl Autosave {
    /// Creates a clean tracker saving on behalf of `owner`.
    #[must_use]
    pub fn new(owner: OwnerId) -> Self {
        Self {
            owner,
            dirty: false,
            status: None,
        }
    }

    /// Owner the tracker saves for.
    #[must_use]
    pub fn owner(&self) -> &OwnerId {
        &self.owner
    }

    /// Whether the design changed since the last successful save.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Outcome of the last save attempt, if any.
    #[must_use]
    pub fn status(&self) -> Option<&SaveStatus> {
        self.status.as_ref()
    }

    /// Flags the design as needing a save.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Consumes world events, tracking whether the design has unsaved changes.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::DesignLoaded { .. } | Event::DesignClosed => self.dirty = false,
                Event::ColorsChanged { .. } => self.dirty = true,
                other if other.changes_grid() => self.dirty = true,
                _ => {}
            }
        }
    }

    /// Saves the design when it is dirty and open.
    ///
    /// Returns the new status when a save was attempted.
    pub fn tick<S>(&mut self, store: &mut S, world: &World) -> Option<&SaveStatus>
    where
        S: WorkspaceStore + ?Sized,
    {
        if !self.dirty || !query::is_design_open(world) {
            return None;
        }
        Some(self.save_now(store, world))
    }

    /// Saves the design immediately, regardless of the dirty flag.
    pub fn save_now<S>(&mut self, store: &mut S, world: &World) -> &SaveStatus
    where
        S: WorkspaceStore + ?Sized,
    {
        let request = SaveRequest::from_world(self.owner.clone(), world);
        let status = match store.save_workspace(&request) {
            Ok(()) => {
                self.dirty = false;
                info!(owner = %self.owner, "autosave complete");
                SaveStatus::Saved
            }
            Err(failure) => {
                error!(owner = %self.owner, error = %failure, "autosave failed");
                SaveStatus::Failed(failure.to_string())
            }
        };
        self.status.insert(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use dental_planner_core::{HistoryDirection, DEFAULT_FLOOR_COLOR, DEFAULT_WORLD_COLOR};

    #[test]
    fn status_messages_match_display() {
        assert_eq!(SaveStatus::Saved.to_string(), "Saved");
        assert_eq!(
            SaveStatus::Failed("workspace store is unavailable".to_owned()).to_string(),
            "Save failed: workspace store is unavailable"
        );
    }

    #[test]
    fn loads_clear_and_edits_set_dirty_flag() {
        let mut autosave = Autosave::new(OwnerId::new("owner").expect("valid owner"));
        autosave.handle(&[Event::HistoryRestored {
            direction: HistoryDirection::Undo,
        }]);
        assert!(autosave.is_dirty());

        autosave.handle(&[Event::DesignLoaded { size: 15 }]);
        assert!(!autosave.is_dirty());

        autosave.handle(&[Event::ColorsChanged {
            world_color: DEFAULT_WORLD_COLOR,
            floor_color: DEFAULT_FLOOR_COLOR,
        }]);
        assert!(autosave.is_dirty());
    }

    #[test]
    fn clean_design_is_not_saved() {
        let mut autosave = Autosave::new(OwnerId::new("owner").expect("valid owner"));
        let mut store = MemoryStore::new();
        assert_eq!(autosave.tick(&mut store, &World::new()), None);
        assert!(store.document(autosave.owner()).is_none());
    }
}
