#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Workspace persistence for the dental clinic planner.
//!
//! A workspace is the grid plus its scene colors, stored per owner. Stores
//! implement [`WorkspaceStore`]; the editing session never waits on them and
//! keeps its in-memory grid regardless of whether a save succeeds.

use std::{fmt, io, path::PathBuf};

use dental_planner_core::{
    Command, Event, Grid, GridError, Rgb, DEFAULT_FLOOR_COLOR, DEFAULT_WORLD_COLOR,
};
use dental_planner_system_inventory::{aggregate, InventoryEntry};
use dental_planner_world::{apply, query, World};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

mod autosave;
mod file_store;
mod memory_store;

pub use autosave::{Autosave, SaveStatus};
pub use file_store::FileStore;
pub use memory_store::MemoryStore;

/// Identifier of the account owning a workspace.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OwnerId(String);

impl OwnerId {
    /// Validates an owner identifier.
    ///
    /// Identifiers double as file names, so only ASCII letters, digits, `-`
    /// and `_` are accepted.
    pub fn new(value: impl Into<String>) -> Result<Self, PersistenceError> {
        let value = value.into();
        let valid = !value.is_empty()
            && value
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
        if valid {
            Ok(Self(value))
        } else {
            Err(PersistenceError::InvalidOwner(value))
        }
    }

    /// The identifier as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for OwnerId {
    type Error = PersistenceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OwnerId> for String {
    fn from(owner: OwnerId) -> Self {
        owner.0
    }
}

/// Persisted design: the grid and its scene colors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    /// Tile matrix, serialized as nested rows.
    pub grid: Grid,
    /// Background color of the scene.
    pub world_color: Rgb,
    /// Floor color of the scene.
    pub floor_color: Rgb,
}

impl Workspace {
    /// Empty design with default colors.
    #[must_use]
    pub fn fresh() -> Self {
        Self {
            grid: Grid::default(),
            world_color: DEFAULT_WORLD_COLOR,
            floor_color: DEFAULT_FLOOR_COLOR,
        }
    }

    /// Snapshot of the design currently held by `world`.
    #[must_use]
    pub fn from_world(world: &World) -> Self {
        Self {
            grid: query::grid(world).clone(),
            world_color: query::world_color(world),
            floor_color: query::floor_color(world),
        }
    }

    /// Command installing this workspace into a world.
    #[must_use]
    pub fn into_command(self) -> Command {
        Command::LoadDesign {
            grid: self.grid,
            world_color: self.world_color,
            floor_color: self.floor_color,
        }
    }
}

/// Payload handed to [`WorkspaceStore::save_workspace`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    /// Owner of the workspace.
    pub owner_id: OwnerId,
    /// Design being saved.
    #[serde(flatten)]
    pub workspace: Workspace,
    /// Flattened inventory derived from the grid.
    pub inventory: Vec<InventoryEntry>,
}

impl SaveRequest {
    /// Builds a request from the design held by `world`.
    #[must_use]
    pub fn from_world(owner_id: OwnerId, world: &World) -> Self {
        Self {
            owner_id,
            workspace: Workspace::from_world(world),
            inventory: aggregate(query::grid(world)),
        }
    }
}

/// Load/save contract implemented by every workspace backend.
pub trait WorkspaceStore {
    /// Returns the owner's saved workspace, or `None` when nothing was saved yet.
    fn fetch_workspace(&self, owner: &OwnerId) -> Result<Option<Workspace>, PersistenceError>;

    /// Persists the provided request, replacing any previous save.
    fn save_workspace(&mut self, request: &SaveRequest) -> Result<(), PersistenceError>;
}

/// Loads the owner's workspace into `world`, falling back to a fresh design.
///
/// Returns whether a saved workspace was found. The world's history is not
/// touched by the load. A saved design the world refuses to install is
/// reported as [`PersistenceError::Rejected`] and leaves `world` unchanged.
pub fn open_workspace<S>(
    store: &S,
    owner: &OwnerId,
    world: &mut World,
    out_events: &mut Vec<Event>,
) -> Result<bool, PersistenceError>
where
    S: WorkspaceStore + ?Sized,
{
    let saved = store.fetch_workspace(owner)?;
    let found = saved.is_some();
    let workspace = saved.unwrap_or_else(Workspace::fresh);
    let size = workspace.grid.size();
    let first_new = out_events.len();
    apply(world, workspace.into_command(), out_events);
    if let Some(reason) = out_events[first_new..].iter().find_map(|event| match event {
        Event::DesignRejected { reason } => Some(reason.clone()),
        _ => None,
    }) {
        return Err(PersistenceError::Rejected(reason));
    }
    info!(owner = %owner, found, size, "workspace opened");
    Ok(found)
}

/// Errors raised by workspace stores.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The owner identifier cannot be used as a storage key.
    #[error("owner id '{0}' must be non-empty and use only ASCII letters, digits, '-' or '_'")]
    InvalidOwner(String),
    /// Reading or writing the backing file failed.
    #[error("failed to access {path}")]
    Io {
        /// File or directory being accessed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A stored document could not be decoded.
    #[error("workspace at {path} is not a valid document")]
    Decode {
        /// File holding the document.
        path: PathBuf,
        /// Underlying decoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// A request could not be encoded.
    #[error("failed to encode workspace")]
    Encode(#[from] serde_json::Error),
    /// The backend cannot be reached.
    #[error("workspace store is unavailable")]
    Unavailable,
    /// The stored design breaks a grid invariant.
    #[error("stored workspace cannot be opened")]
    Rejected(#[source] GridError),
}
