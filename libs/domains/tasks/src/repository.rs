use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::TaskResult;
use crate::models::{NewTask, Task};

/// Repository trait for Task persistence
///
/// Ids are assigned by the store on insert and never reused.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Store a validated task under a fresh id
    async fn insert(&self, input: NewTask) -> TaskResult<Task>;

    /// Replace the stored task with the same id. `None` if no such task.
    async fn update(&self, task: Task) -> TaskResult<Option<Task>>;

    /// Remove a task. `false` if no such task.
    async fn delete(&self, id: i64) -> TaskResult<bool>;

    async fn find_by_id(&self, id: i64) -> TaskResult<Option<Task>>;

    /// All tasks in insertion order
    async fn find_all(&self) -> TaskResult<Vec<Task>>;

    async fn exists_by_id(&self, id: i64) -> TaskResult<bool>;
}

#[derive(Debug)]
struct Store {
    tasks: BTreeMap<i64, Task>,
    next_id: i64,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            tasks: BTreeMap::new(),
            next_id: 1,
        }
    }
}

/// In-memory implementation of TaskRepository
///
/// Ids start at 1. Iteration follows id order, which is insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn insert(&self, input: NewTask) -> TaskResult<Task> {
        let mut store = self.store.write().await;
        let id = store.next_id;
        store.next_id += 1;

        let task = input.into_task(id);
        store.tasks.insert(id, task.clone());

        tracing::info!(task_id = id, "Created task");
        Ok(task)
    }

    async fn update(&self, task: Task) -> TaskResult<Option<Task>> {
        let mut store = self.store.write().await;
        match store.tasks.get_mut(&task.id) {
            Some(slot) => {
                *slot = task.clone();
                tracing::info!(task_id = task.id, "Updated task");
                Ok(Some(task))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i64) -> TaskResult<bool> {
        let removed = self.store.write().await.tasks.remove(&id).is_some();
        if removed {
            tracing::info!(task_id = id, "Deleted task");
        }
        Ok(removed)
    }

    async fn find_by_id(&self, id: i64) -> TaskResult<Option<Task>> {
        Ok(self.store.read().await.tasks.get(&id).cloned())
    }

    async fn find_all(&self) -> TaskResult<Vec<Task>> {
        Ok(self.store.read().await.tasks.values().cloned().collect())
    }

    async fn exists_by_id(&self, id: i64) -> TaskResult<bool> {
        Ok(self.store.read().await.tasks.contains_key(&id))
    }
}
