//! Study-plan repository contracts and JSON-file implementation.

use crate::config::StoreConfig;
use crate::model::task::Task;
use crate::repo::collection::JsonCollection;
use crate::repo::StoreResult;
use std::path::Path;

/// Repository interface for study plans.
pub trait TaskRepository {
    /// Appends one task to the end of the collection.
    fn append_task(&self, task: &Task) -> StoreResult<()>;
    /// Lists every task in insertion order.
    fn list_tasks(&self) -> StoreResult<Vec<Task>>;
}

/// Tasks stored as one JSON array file.
pub struct JsonTaskRepository {
    collection: JsonCollection<Task>,
}

impl JsonTaskRepository {
    /// Opens the tasks collection under the configured data directory.
    pub fn new(config: &StoreConfig) -> Self {
        Self::at_path(config.tasks_path())
    }

    /// Opens a tasks collection at an explicit file path.
    pub fn at_path(path: impl AsRef<Path>) -> Self {
        Self {
            collection: JsonCollection::new("tasks", path.as_ref()),
        }
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        self.collection.path()
    }
}

impl TaskRepository for JsonTaskRepository {
    fn append_task(&self, task: &Task) -> StoreResult<()> {
        self.collection.append(task.clone()).map(|_| ())
    }

    fn list_tasks(&self) -> StoreResult<Vec<Task>> {
        self.collection.load()
    }
}
