//! Transient task bookkeeping for background uploads and analyses.
//!
//! Each entry is owned by exactly one request: a terminal status
//! (completed or failed) is removed the first time it is polled, so a
//! task handle resolves at most once. Nothing here survives a restart.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use uuid::Uuid;

/// Lifecycle of one background task.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TaskStatus<T> {
    Processing,
    Completed { result: T },
    Failed { error: String },
}

/// Immediate acknowledgement returned when background work is accepted.
#[derive(Debug, Clone, Serialize)]
pub struct TaskAccepted {
    pub task_id: Uuid,
    pub status: &'static str,
}

impl TaskAccepted {
    pub fn processing(task_id: Uuid) -> Self {
        TaskAccepted {
            task_id,
            status: "processing",
        }
    }
}

/// In-memory store correlating task handles with their eventual results.
///
/// Locks are held only for map operations, never across an await point.
pub struct TaskStore<T> {
    entries: Arc<Mutex<HashMap<Uuid, TaskStatus<T>>>>,
}

impl<T> Clone for TaskStore<T> {
    fn clone(&self) -> Self {
        TaskStore {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<T> Default for TaskStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TaskStore<T> {
    pub fn new() -> Self {
        TaskStore {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, TaskStatus<T>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a new task in the processing state and returns its handle.
    pub fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.lock().insert(id, TaskStatus::Processing);
        id
    }

    pub fn complete(&self, id: Uuid, result: T) {
        self.lock().insert(id, TaskStatus::Completed { result });
    }

    pub fn fail(&self, id: Uuid, error: impl Into<String>) {
        self.lock().insert(
            id,
            TaskStatus::Failed {
                error: error.into(),
            },
        );
    }

    /// Reads a task's status. A terminal entry (completed or failed) is
    /// removed on read — the second poll of the same handle returns `None`.
    pub fn poll(&self, id: Uuid) -> Option<TaskStatus<T>> {
        let mut entries = self.lock();
        match entries.get(&id) {
            None => None,
            Some(TaskStatus::Processing) => Some(TaskStatus::Processing),
            Some(_) => entries.remove(&id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_handle_is_none() {
        let store: TaskStore<String> = TaskStore::new();
        assert!(store.poll(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_processing_can_be_polled_repeatedly() {
        let store: TaskStore<String> = TaskStore::new();
        let id = store.create();
        assert!(matches!(store.poll(id), Some(TaskStatus::Processing)));
        assert!(matches!(store.poll(id), Some(TaskStatus::Processing)));
    }

    #[test]
    fn test_completed_result_is_taken_exactly_once() {
        let store: TaskStore<String> = TaskStore::new();
        let id = store.create();
        store.complete(id, "done".to_string());

        match store.poll(id) {
            Some(TaskStatus::Completed { result }) => assert_eq!(result, "done"),
            other => panic!("Expected completed status, got {other:?}"),
        }
        assert!(store.poll(id).is_none());
    }

    #[test]
    fn test_failure_is_taken_exactly_once() {
        let store: TaskStore<()> = TaskStore::new();
        let id = store.create();
        store.fail(id, "boom");

        match store.poll(id) {
            Some(TaskStatus::Failed { error }) => assert_eq!(error, "boom"),
            other => panic!("Expected failed status, got {other:?}"),
        }
        assert!(store.poll(id).is_none());
    }

    #[test]
    fn test_stores_are_independent_per_handle() {
        let store: TaskStore<u32> = TaskStore::new();
        let first = store.create();
        let second = store.create();
        store.complete(first, 1);

        assert!(matches!(store.poll(second), Some(TaskStatus::Processing)));
        assert!(matches!(
            store.poll(first),
            Some(TaskStatus::Completed { result: 1 })
        ));
    }

    #[test]
    fn test_status_serializes_with_tag() {
        let status: TaskStatus<u32> = TaskStatus::Completed { result: 7 };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["status"], "completed");
        assert_eq!(json["result"], 7);
    }
}
