//! Directory-backed store holding one pretty-printed JSON document per owner.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use crate::{OwnerId, PersistenceError, SaveRequest, Workspace, WorkspaceStore};

/// Stores workspaces as `<owner>.json` files inside a directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileStore {
    directory: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `directory`. The directory is created on first save.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Directory holding the documents.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the document belonging to `owner`.
    #[must_use]
    pub fn path_for(&self, owner: &OwnerId) -> PathBuf {
        self.directory.join(format!("{owner}.json"))
    }
}

impl WorkspaceStore for FileStore {
    fn fetch_workspace(&self, owner: &OwnerId) -> Result<Option<Workspace>, PersistenceError> {
        let path = self.path_for(owner);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no saved workspace");
                return Ok(None);
            }
            Err(source) => return Err(PersistenceError::Io { path, source }),
        };

        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| PersistenceError::Decode { path, source })
    }

    fn save_workspace(&mut self, request: &SaveRequest) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.directory).map_err(|source| PersistenceError::Io {
            path: self.directory.clone(),
            source,
        })?;

        let json = serde_json::to_string_pretty(request)?;
        let path = self.path_for(&request.owner_id);
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, json).map_err(|source| PersistenceError::Io {
            path: staging.clone(),
            source,
        })?;
        fs::rename(&staging, &path).map_err(|source| PersistenceError::Io {
            path: path.clone(),
            source,
        })?;

        info!(
            owner = %request.owner_id,
            path = %path.display(),
            inventory = request.inventory.len(),
            "workspace saved"
        );
        Ok(())
    }
}
