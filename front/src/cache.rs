use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use taskify_api::v1::Task;
use tempfile::NamedTempFile;

/// File name of the default on-disk cache.
pub const CACHE_FILE: &str = "taskify-tasks.json";

/// Local persistent copy of the client's task list.
///
/// The board reads it once when it opens and overwrites it in full after
/// every change.
pub trait TaskCache {
    fn load(&self) -> eyre::Result<Vec<Task>>;

    fn save(&mut self, tasks: &[Task]) -> eyre::Result<()>;
}

/// A JSON snapshot in a single file. A missing file is an empty list.
#[derive(Clone, Debug)]
pub struct FileCache {
    path: PathBuf,
}

impl FileCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileCache {
    fn default() -> Self {
        Self::new(CACHE_FILE)
    }
}

impl TaskCache for FileCache {
    fn load(&self) -> eyre::Result<Vec<Task>> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => eyre::bail!(err),
        };

        Ok(serde_json::from_str(&data)?)
    }

    fn save(&mut self, tasks: &[Task]) -> eyre::Result<()> {
        let snapshot = serde_json::to_string_pretty(tasks)?;
        replace_file(&self.path, |file| Ok(file.write_all(snapshot.as_bytes())?))
    }
}

// the old snapshot stays in place until the new one is fully written
fn replace_file(
    path: &Path,
    write: impl FnOnce(&mut NamedTempFile) -> eyre::Result<()>,
) -> eyre::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    write(&mut file)?;
    file.persist(path)?;

    Ok(())
}

/// Keeps the serialized snapshot in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryCache {
    snapshot: Option<String>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: impl Into<String>) -> Self {
        Self {
            snapshot: Some(snapshot.into()),
        }
    }

    pub fn snapshot(&self) -> Option<&str> {
        self.snapshot.as_deref()
    }
}

impl TaskCache for MemoryCache {
    fn load(&self) -> eyre::Result<Vec<Task>> {
        match &self.snapshot {
            Some(snapshot) => Ok(serde_json::from_str(snapshot)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&mut self, tasks: &[Task]) -> eyre::Result<()> {
        self.snapshot = Some(serde_json::to_string(tasks)?);
        Ok(())
    }
}
