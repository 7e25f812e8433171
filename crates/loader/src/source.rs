use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use tileworld_kernel::World;

use crate::document::{parse_world, world_to_json};
use crate::error::LoadError;

/// Where worlds come from. The store only sees the validated [`World`];
/// how the bytes arrive is up to the implementation.
pub trait WorldLoader {
    fn load(&self, name: &str) -> impl Future<Output = Result<World, LoadError>>;
}

/// Loads `<root>/<name>.json` from disk.
#[derive(Debug, Clone)]
pub struct FileWorldLoader {
    root: PathBuf,
}

impl FileWorldLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path for a world name. Names are plain file stems; anything that could
    /// escape the root is rejected.
    pub fn path_for(&self, name: &str) -> Result<PathBuf, LoadError> {
        if name.is_empty()
            || name.contains(['/', '\\'])
            || name == "."
            || name == ".."
        {
            return Err(LoadError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(format!("{name}.json")))
    }
}

impl WorldLoader for FileWorldLoader {
    async fn load(&self, name: &str) -> Result<World, LoadError> {
        let path = self.path_for(name)?;
        let _span = tracing::info_span!("load_world", path = %path.display()).entered();

        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(LoadError::NotFound(name.to_string()));
            }
            Err(source) => return Err(LoadError::Io { path, source }),
        };

        let world = parse_world(&text)?;
        tracing::info!(dimensions = %world.dimensions(), "world loaded");
        Ok(world)
    }
}

/// Serves world documents held in memory, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct MemoryWorldLoader {
    documents: HashMap<String, String>,
}

impl MemoryWorldLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register raw JSON under `name`. It is parsed on every load.
    pub fn insert(&mut self, name: impl Into<String>, json: impl Into<String>) {
        self.documents.insert(name.into(), json.into());
    }

    /// Register an existing world by serializing it.
    pub fn insert_world(
        &mut self,
        name: impl Into<String>,
        world: &World,
    ) -> Result<(), serde_json::Error> {
        self.insert(name, world_to_json(world)?);
        Ok(())
    }
}

impl WorldLoader for MemoryWorldLoader {
    async fn load(&self, name: &str) -> Result<World, LoadError> {
        let text = self
            .documents
            .get(name)
            .ok_or_else(|| LoadError::NotFound(name.to_string()))?;
        parse_world(text)
    }
}
