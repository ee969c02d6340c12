#[cfg(test)]
use std::{collections::HashMap, sync::Mutex};
use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use indexmap::IndexMap;
use tracing::{debug, warn};

use super::*;

const COMMENTS_KEY: &str = "codenotes.comments";
const LOWEST_ID_KEY: &str = "codenotes.lowest-id";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not serialize local comments: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("no negative ids are left for local comments")]
    IdsExhausted,
}

/// A string key-value store shaped like a browser's `localStorage`.
pub trait Storage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set_item(&self, key: &str, value: String) -> Result<(), StoreError>;
}

/// Storage kept in a single JSON object file.
///
/// The file is read on every access so that edits made by hand between
/// requests are picked up.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStorage { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<IndexMap<String, String>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(IndexMap::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        match serde_json::from_str(&contents) {
            Ok(items) => Ok(items),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "storage file is malformed, starting empty"
                );
                Ok(IndexMap::new())
            }
        }
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read()?.shift_remove(key))
    }

    fn set_item(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut items = self.read()?;
        items.insert(key.to_owned(), value);
        let contents = serde_json::to_string_pretty(&items)?;
        fs::write(&self.path, contents).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// Storage that lives as long as the process.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let items = self.items.lock().unwrap_or_else(|e| e.into_inner());
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut items = self.items.lock().unwrap_or_else(|e| e.into_inner());
        items.insert(key.to_owned(), value);
        Ok(())
    }
}

/// The comments that only exist on this machine.
#[derive(Clone)]
pub struct LocalStore {
    storage: Arc<dyn Storage>,
}

impl LocalStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        LocalStore { storage }
    }

    /// All local comments in the order they were saved.
    ///
    /// Missing or malformed content counts as no comments.
    pub fn load(&self) -> Result<Vec<Comment>, StoreError> {
        let Some(raw) = self.storage.get_item(COMMENTS_KEY)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str(&raw) {
            Ok(comments) => Ok(comments),
            Err(e) => {
                warn!(error = %e, "local comments are malformed, ignoring them");
                Ok(Vec::new())
            }
        }
    }

    /// Add a comment to the end of the list.
    ///
    /// Comments with blank text are ignored.
    pub fn append(&self, comment: Comment) -> Result<(), StoreError> {
        if comment.text.trim().is_empty() {
            debug!(line = comment.line, "ignoring blank local comment");
            return Ok(());
        }

        let mut comments = self.load()?;
        comments.push(comment);
        self.save(&comments)
    }

    /// Remove the comment with the given id, if there is one.
    pub fn remove(&self, id: i64) -> Result<(), StoreError> {
        let mut comments = self.load()?;
        let before = comments.len();
        comments.retain(|c| c.id != id);
        if comments.len() == before {
            debug!(id, "no local comment to remove");
            return Ok(());
        }
        self.save(&comments)
    }

    /// Allocate an id for a new local comment.
    ///
    /// The lowest id ever handed out is persisted, so ids freed by
    /// [`LocalStore::remove`] are never reused.
    pub fn next_id(&self) -> Result<i64, StoreError> {
        let comments = self.load()?;
        let mut id = next_local_id(&comments).ok_or(StoreError::IdsExhausted)?;
        if let Some(lowest) = self.lowest_id()? {
            let below = lowest.checked_sub(1).ok_or(StoreError::IdsExhausted)?;
            id = id.min(below);
        }
        self.storage.set_item(LOWEST_ID_KEY, id.to_string())?;
        Ok(id)
    }

    fn lowest_id(&self) -> Result<Option<i64>, StoreError> {
        let raw = self.storage.get_item(LOWEST_ID_KEY)?;
        Ok(raw.and_then(|r| match r.trim().parse::<i64>() {
            Ok(id) if id < 0 => Some(id),
            _ => {
                warn!(value = %r, "ignoring invalid lowest local id");
                None
            }
        }))
    }

    fn save(&self, comments: &[Comment]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(comments)?;
        self.storage.set_item(COMMENTS_KEY, raw)
    }
}
