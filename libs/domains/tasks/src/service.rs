use std::sync::Arc;
use tracing::instrument;

use crate::clock::{Clock, SystemClock};
use crate::error::{TaskError, TaskResult};
use crate::models::{SortKey, Task, TaskDraft, TaskQuery, TaskStatus};
use crate::repository::TaskRepository;
use crate::validation::validate_task;

/// Service layer for Task business logic
///
/// Every write is validated first. Nothing else talks to the repository.
pub struct TaskService<R: TaskRepository> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R: TaskRepository> Clone for TaskService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repository: R) -> Self {
        Self::with_clock(repository, Arc::new(SystemClock))
    }

    pub fn with_clock(repository: R, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository: Arc::new(repository),
            clock,
        }
    }

    /// Validate and store a new task. Any id on the draft is ignored.
    #[instrument(skip(self, draft))]
    pub async fn create_task(&self, draft: impl Into<Option<TaskDraft>>) -> TaskResult<Task> {
        let draft = draft.into();
        let input = validate_task(draft.as_ref(), self.clock.today())?;

        self.repository.insert(input).await
    }

    /// Replace every field of task `id`
    #[instrument(skip(self, draft), fields(task_id = id))]
    pub async fn update_task(
        &self,
        id: i64,
        draft: impl Into<Option<TaskDraft>>,
    ) -> TaskResult<Task> {
        let draft = draft.into();
        let input = validate_task(draft.as_ref(), self.clock.today())?;

        if !self.repository.exists_by_id(id).await? {
            return Err(TaskError::NotFound(id));
        }

        // The row can still disappear between the check and the write
        self.repository
            .update(input.into_task(id))
            .await?
            .ok_or(TaskError::NotFound(id))
    }

    #[instrument(skip(self), fields(task_id = id))]
    pub async fn delete_task(&self, id: i64) -> TaskResult<()> {
        if !self.repository.exists_by_id(id).await? {
            return Err(TaskError::NotFound(id));
        }

        let deleted = self.repository.delete(id).await?;

        if !deleted {
            return Err(TaskError::NotFound(id));
        }

        Ok(())
    }

    #[instrument(skip(self), fields(task_id = id))]
    pub async fn get_task_by_id(&self, id: i64) -> TaskResult<Task> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(TaskError::NotFound(id))
    }

    pub async fn get_all_tasks(&self) -> TaskResult<Vec<Task>> {
        self.repository.find_all().await
    }

    /// Tasks with the given status, in store order
    #[instrument(skip(self))]
    pub async fn filter_tasks_by_status(&self, status: Option<TaskStatus>) -> TaskResult<Vec<Task>> {
        let status =
            status.ok_or_else(|| TaskError::InvalidArgument("Status cannot be null".into()))?;

        let mut tasks = self.repository.find_all().await?;
        tasks.retain(|task| task.status == status);
        Ok(tasks)
    }

    /// Earliest due date first. Ties keep store order.
    pub async fn get_all_tasks_sorted_by_due_date(&self) -> TaskResult<Vec<Task>> {
        self.sorted(SortKey::DueDate).await
    }

    /// `TODO`, then `IN_PROGRESS`, then `DONE`. Ties keep store order.
    pub async fn get_all_tasks_sorted_by_status(&self) -> TaskResult<Vec<Task>> {
        self.sorted(SortKey::Status).await
    }

    /// Listing rule shared by the HTTP adapters: a status filter wins over a
    /// sort key, an unknown sort key lists unsorted.
    #[instrument(skip(self))]
    pub async fn query_tasks(&self, query: TaskQuery) -> TaskResult<Vec<Task>> {
        if let Some(status) = query.status {
            return self.filter_tasks_by_status(Some(status)).await;
        }

        match query.sort_key() {
            Some(key) => self.sorted(key).await,
            None => self.get_all_tasks().await,
        }
    }

    async fn sorted(&self, key: SortKey) -> TaskResult<Vec<Task>> {
        let mut tasks = self.repository.find_all().await?;
        match key {
            SortKey::DueDate => tasks.sort_by_key(|task| task.due_date),
            SortKey::Status => tasks.sort_by_key(|task| task.status),
        }
        Ok(tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::repository::MockTaskRepository;
    use crate::validation::{DueDateError, ValidationError};
    use chrono::NaiveDate;
    use mockall::predicate::eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn service(repo: MockTaskRepository) -> TaskService<MockTaskRepository> {
        TaskService::with_clock(repo, Arc::new(FixedClock(date(2025, 7, 1))))
    }

    fn task(id: i64, due: NaiveDate, status: TaskStatus) -> Task {
        Task {
            id,
            title: format!("task {id}"),
            description: None,
            due_date: due,
            status,
        }
    }

    fn sample() -> Vec<Task> {
        vec![
            task(1, date(2025, 8, 10), TaskStatus::Done),
            task(2, date(2025, 7, 1), TaskStatus::Todo),
            task(3, date(2025, 8, 1), TaskStatus::InProgress),
            task(4, date(2025, 7, 1), TaskStatus::Todo),
        ]
    }

    fn ids(tasks: &[Task]) -> Vec<i64> {
        tasks.iter().map(|t| t.id).collect()
    }

    #[tokio::test]
    async fn test_create_task_stores_validated_input() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo
            .expect_insert()
            .withf(|input| input.title == "Buy milk" && input.status == TaskStatus::Todo)
            .times(1)
            .returning(|input| Ok(input.into_task(1)));

        let draft = TaskDraft::new("Buy milk", date(2025, 7, 2), TaskStatus::Todo);
        let created = service(mock_repo).create_task(draft).await.unwrap();

        assert_eq!(created.id, 1);
        assert_eq!(created.due_date, date(2025, 7, 2));
    }

    #[tokio::test]
    async fn test_create_task_rejects_before_touching_store() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo.expect_insert().never();

        let draft = TaskDraft::new("Too late", date(2025, 6, 30), TaskStatus::Todo);
        let err = service(mock_repo).create_task(draft).await.unwrap_err();

        assert!(matches!(
            err,
            TaskError::Validation(ValidationError::InvalidDueDate(DueDateError::InPast))
        ));
    }

    #[tokio::test]
    async fn test_create_task_without_body() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo.expect_insert().never();

        let err = service(mock_repo).create_task(None::<TaskDraft>).await.unwrap_err();

        assert!(matches!(err, TaskError::Validation(ValidationError::MissingTask)));
    }

    #[tokio::test]
    async fn test_update_task_unknown_id() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo
            .expect_exists_by_id()
            .with(eq(42))
            .returning(|_| Ok(false));
        mock_repo.expect_update().never();

        let draft = TaskDraft::new("x", date(2025, 7, 1), TaskStatus::Done);
        let err = service(mock_repo).update_task(42, draft).await.unwrap_err();

        assert!(matches!(err, TaskError::NotFound(42)));
    }

    #[tokio::test]
    async fn test_update_task_validates_before_lookup() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo.expect_exists_by_id().never();

        let draft = TaskDraft {
            title: Some("  ".into()),
            ..TaskDraft::new("x", date(2025, 7, 1), TaskStatus::Done)
        };
        let err = service(mock_repo).update_task(1, draft).await.unwrap_err();

        assert!(matches!(err, TaskError::Validation(ValidationError::InvalidTitle)));
    }

    #[tokio::test]
    async fn test_update_task_rejects_past_due_date() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo.expect_exists_by_id().never();
        mock_repo.expect_update().never();

        let draft = TaskDraft::new("Reschedule", date(2025, 6, 30), TaskStatus::Todo);
        let err = service(mock_repo).update_task(3, draft).await.unwrap_err();

        assert!(matches!(
            err,
            TaskError::Validation(ValidationError::InvalidDueDate(DueDateError::InPast))
        ));
    }

    #[tokio::test]
    async fn test_update_task_replaces_all_fields() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo.expect_exists_by_id().returning(|_| Ok(true));
        mock_repo
            .expect_update()
            .withf(|task| task.id == 7 && task.status == TaskStatus::Done && task.description.is_none())
            .returning(|task| Ok(Some(task)));

        let draft = TaskDraft::new("Done now", date(2025, 9, 1), TaskStatus::Done);
        let updated = service(mock_repo).update_task(7, draft).await.unwrap();

        assert_eq!(updated.id, 7);
        assert_eq!(updated.title, "Done now");
    }

    #[tokio::test]
    async fn test_update_task_row_vanished_after_check() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo.expect_exists_by_id().returning(|_| Ok(true));
        mock_repo.expect_update().returning(|_| Ok(None));

        let draft = TaskDraft::new("x", date(2025, 7, 1), TaskStatus::Todo);
        let err = service(mock_repo).update_task(3, draft).await.unwrap_err();

        assert!(matches!(err, TaskError::NotFound(3)));
    }

    #[tokio::test]
    async fn test_delete_task_unknown_id() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo.expect_exists_by_id().returning(|_| Ok(false));
        mock_repo.expect_delete().never();

        let err = service(mock_repo).delete_task(5).await.unwrap_err();

        assert!(matches!(err, TaskError::NotFound(5)));
    }

    #[tokio::test]
    async fn test_delete_task_row_vanished_after_check() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo.expect_exists_by_id().returning(|_| Ok(true));
        mock_repo.expect_delete().with(eq(5)).returning(|_| Ok(false));

        let err = service(mock_repo).delete_task(5).await.unwrap_err();

        assert!(matches!(err, TaskError::NotFound(5)));
    }

    #[tokio::test]
    async fn test_get_task_by_id_missing() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo.expect_find_by_id().returning(|_| Ok(None));

        let err = service(mock_repo).get_task_by_id(9).await.unwrap_err();

        assert_eq!(err.to_string(), "Task with id 9 not found");
    }

    #[tokio::test]
    async fn test_store_errors_propagate() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo
            .expect_find_all()
            .returning(|| Err(TaskError::Database("down".into())));

        let err = service(mock_repo).get_all_tasks().await.unwrap_err();

        assert!(matches!(err, TaskError::Database(_)));
    }

    #[tokio::test]
    async fn test_filter_requires_status() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo.expect_find_all().never();

        let err = service(mock_repo).filter_tasks_by_status(None).await.unwrap_err();

        assert!(matches!(err, TaskError::InvalidArgument(ref msg) if msg == "Status cannot be null"));
    }

    #[tokio::test]
    async fn test_filters_partition_all_tasks() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo.expect_find_all().returning(|| Ok(sample()));
        let service = service(mock_repo);

        let mut seen = Vec::new();
        for status in TaskStatus::ALL {
            let tasks = service.filter_tasks_by_status(Some(status)).await.unwrap();
            assert!(tasks.iter().all(|t| t.status == status));
            seen.extend(ids(&tasks));
        }
        seen.sort();

        assert_eq!(seen, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_sort_by_due_date_is_stable() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo.expect_find_all().returning(|| Ok(sample()));

        let tasks = service(mock_repo)
            .get_all_tasks_sorted_by_due_date()
            .await
            .unwrap();

        assert_eq!(ids(&tasks), vec![2, 4, 3, 1]);
    }

    #[tokio::test]
    async fn test_sort_by_status_rank() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo.expect_find_all().returning(|| Ok(sample()));

        let tasks = service(mock_repo)
            .get_all_tasks_sorted_by_status()
            .await
            .unwrap();

        assert_eq!(ids(&tasks), vec![2, 4, 3, 1]);
    }

    #[tokio::test]
    async fn test_query_status_wins_over_sort() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo.expect_find_all().returning(|| Ok(sample()));

        let tasks = service(mock_repo)
            .query_tasks(TaskQuery {
                status: Some(TaskStatus::Todo),
                sort: Some("dueDate".into()),
            })
            .await
            .unwrap();

        assert_eq!(ids(&tasks), vec![2, 4]);
    }

    #[tokio::test]
    async fn test_query_unknown_sort_is_unsorted() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo.expect_find_all().returning(|| Ok(sample()));

        let tasks = service(mock_repo)
            .query_tasks(TaskQuery {
                status: None,
                sort: Some("priority".into()),
            })
            .await
            .unwrap();

        assert_eq!(ids(&tasks), vec![1, 2, 3, 4]);
    }
}
