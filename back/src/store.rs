use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use taskify_api::v1::{Task, TaskId, TaskPatch};
use tempfile::NamedTempFile;
use tokio::{sync::Mutex, task};

/// The task collection, written through to a RON data file on every change.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Mutex<Vec<Task>>,
    data_file: Option<PathBuf>,
}

impl TaskStore {
    /// A store that lives only in memory.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Loads the collection from `path`, starting empty if the file does not
    /// exist yet.
    pub fn open(path: impl Into<PathBuf>) -> eyre::Result<Self> {
        let path = path.into();

        let file = match fs::File::open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(Self {
                    tasks: Mutex::default(),
                    data_file: Some(path),
                });
            }
            Err(err) => eyre::bail!(err),
        };
        let data: DataOwned = ron::de::from_reader(file)?;

        match data {
            DataOwned::V1 { tasks } => Ok(Self {
                tasks: Mutex::new(tasks),
                data_file: Some(path),
            }),
        }
    }

    pub async fn list(&self) -> Vec<Task> {
        self.tasks.lock().await.clone()
    }

    pub async fn insert(&self, task: Task) -> eyre::Result<()> {
        self.modify(|tasks| tasks.push(task)).await
    }

    /// Applies `patch` to the task with the given id. Returns whether a task
    /// matched.
    pub async fn update(&self, id: &TaskId, patch: &TaskPatch) -> eyre::Result<bool> {
        self.modify(|tasks| match tasks.iter_mut().find(|task| &task.id == id) {
            Some(task) => {
                patch.apply(task);
                true
            }
            None => false,
        })
        .await
    }

    /// Removes the task with the given id. Returns whether a task matched.
    pub async fn remove(&self, id: &TaskId) -> eyre::Result<bool> {
        self.modify(|tasks| match tasks.iter().position(|task| &task.id == id) {
            Some(index) => {
                tasks.remove(index);
                true
            }
            None => false,
        })
        .await
    }

    // the change only becomes visible once the data file accepted it
    async fn modify<T>(&self, f: impl FnOnce(&mut Vec<Task>) -> T) -> eyre::Result<T> {
        let mut tasks = self.tasks.lock().await;

        let mut next = tasks.clone();
        let output = f(&mut next);

        if let Some(path) = &self.data_file {
            let data = DataBorrowed::V1 { tasks: &next };
            let contents = ron::ser::to_string_pretty(&data, Default::default())?;

            let path = path.clone();
            task::spawn_blocking(move || {
                replace_file(&path, |file| Ok(file.write_all(contents.as_bytes())?))
            })
            .await??;
        }

        *tasks = next;
        Ok(output)
    }
}

// writes next to `path` and renames over it, so a failed write keeps the old file
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
    file.as_file().sync_all()?;
    file.persist(path)?;

    Ok(())
}

#[derive(Serialize)]
enum DataBorrowed<'a> {
    V1 { tasks: &'a [Task] },
}

#[derive(Deserialize)]
enum DataOwned {
    V1 { tasks: Vec<Task> },
}

#[cfg(test)]
mod tests {
    use taskify_api::v1::{NewTask, TaskStatus};

    use super::*;

    fn task(title: &str) -> Task {
        NewTask::titled(title).into_task(TaskId::generate(), taskify_api::v1::today())
    }

    #[tokio::test]
    async fn missing_data_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::open(dir.path().join("tasks.ron")).unwrap();

        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn changes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.ron");

        let first = task("first");
        let second = task("second");
        {
            let store = TaskStore::open(&path).unwrap();
            store.insert(first.clone()).await.unwrap();
            store.insert(second.clone()).await.unwrap();
            store
                .update(
                    &first.id,
                    &TaskPatch {
                        title: None,
                        status: Some(TaskStatus::Completed),
                    },
                )
                .await
                .unwrap();
            store.remove(&second.id).await.unwrap();
        }

        let reopened = TaskStore::open(&path).unwrap();
        let tasks = reopened.list().await;

        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, first.id);
        assert_eq!(tasks[0].status, TaskStatus::Completed);
        assert_eq!(tasks[0].due, first.due);
    }

    #[tokio::test]
    async fn remove_only_touches_matching_task() {
        let store = TaskStore::in_memory();
        let keep = task("keep");
        let gone = task("gone");
        store.insert(keep.clone()).await.unwrap();
        store.insert(gone.clone()).await.unwrap();

        assert!(store.remove(&gone.id).await.unwrap());
        assert!(!store.remove(&gone.id).await.unwrap());
        assert_eq!(store.list().await, vec![keep]);
    }

    #[tokio::test]
    async fn update_of_unknown_id_reports_no_match() {
        let store = TaskStore::in_memory();
        store.insert(task("only")).await.unwrap();

        let matched = store
            .update(&TaskId::from("nope"), &TaskPatch::default())
            .await
            .unwrap();

        assert!(!matched);
    }

    #[tokio::test]
    async fn failed_write_leaves_collection_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::open(dir.path().join("missing").join("tasks.ron")).unwrap();

        assert!(store.insert(task("lost")).await.is_err());
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn interrupted_write_keeps_previous_data_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.ron");

        let saved = task("saved");
        let store = TaskStore::open(&path).unwrap();
        store.insert(saved.clone()).await.unwrap();

        let result = replace_file(&path, |file| {
            file.write_all(b"(V1(tasks:[(id:\"half")?;
            eyre::bail!("disk full")
        });
        assert!(result.is_err());

        let reopened = TaskStore::open(&path).unwrap();
        assert_eq!(reopened.list().await, vec![saved]);

        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn corrupt_data_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.ron");
        fs::write(&path, "not ron at all {").unwrap();

        assert!(TaskStore::open(&path).is_err());
    }
}
