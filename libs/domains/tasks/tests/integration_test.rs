//! Integration tests for the Tasks domain against a real PostgreSQL
//!
//! These tests start a container via testcontainers and are ignored unless
//! Docker is available: `cargo test -- --ignored`.

use chrono::NaiveDate;
use domain_tasks::postgres::SCHEMA;
use domain_tasks::*;
use std::sync::Arc;
use test_utils::{TestDataBuilder, TestDatabase, assertions::*};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_task(title: String, due_date: NaiveDate, status: TaskStatus) -> NewTask {
    NewTask {
        title,
        description: None,
        due_date,
        status,
    }
}

async fn database() -> TestDatabase {
    TestDatabase::with_sql(SCHEMA).await
}

// ============================================================================
// Repository Tests
// ============================================================================

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_insert_and_find_task() {
    let db = database().await;
    let repo = PgTaskRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("insert_and_find");

    let created = repo
        .insert(NewTask {
            description: Some("from postgres".into()),
            ..new_task(builder.title("main"), date(2030, 1, 1), TaskStatus::InProgress)
        })
        .await
        .unwrap();

    assert!(created.id > 0);

    let found = assert_some(repo.find_by_id(created.id).await.unwrap(), "task should exist");
    assert_eq!(found, created);
    assert!(repo.exists_by_id(created.id).await.unwrap());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_update_and_delete_report_missing_rows() {
    let db = database().await;
    let repo = PgTaskRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("update_and_delete");

    let mut task = repo
        .insert(new_task(builder.title("a"), date(2030, 1, 1), TaskStatus::Todo))
        .await
        .unwrap();
    task.status = TaskStatus::Done;

    assert_eq!(repo.update(task.clone()).await.unwrap(), Some(task.clone()));
    assert_eq!(repo.find_by_id(task.id).await.unwrap(), Some(task.clone()));

    assert!(repo.delete(task.id).await.unwrap());
    assert!(!repo.delete(task.id).await.unwrap());
    assert_eq!(repo.update(task.clone()).await.unwrap(), None);
    assert!(!repo.exists_by_id(task.id).await.unwrap());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_find_all_in_insertion_order() {
    let db = database().await;
    let repo = PgTaskRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("find_all_order");

    for suffix in ["c", "a", "b"] {
        repo.insert(new_task(builder.title(suffix), date(2030, 1, 1), TaskStatus::Todo))
            .await
            .unwrap();
    }

    let titles: Vec<String> = repo.find_all().await.unwrap().into_iter().map(|t| t.title).collect();
    assert_eq!(
        titles,
        [builder.title("c"), builder.title("a"), builder.title("b")]
    );
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_schema_is_idempotent() {
    let db = database().await;

    postgres::ensure_schema(&db.connection).await.unwrap();
}

// ============================================================================
// Service Tests
// ============================================================================

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_service_sorting_over_postgres() {
    let db = database().await;
    let service = TaskService::with_clock(
        PgTaskRepository::new(db.connection()),
        Arc::new(FixedClock(date(2025, 7, 1))),
    );

    for (due, status) in [
        (date(2025, 8, 10), TaskStatus::Done),
        (date(2025, 7, 1), TaskStatus::Todo),
        (date(2025, 8, 1), TaskStatus::InProgress),
    ] {
        service
            .create_task(TaskDraft::new(format!("due {due}"), due, status))
            .await
            .unwrap();
    }

    let by_date = service.get_all_tasks_sorted_by_due_date().await.unwrap();
    let dates: Vec<NaiveDate> = by_date.iter().map(|t| t.due_date).collect();
    assert_non_decreasing(&dates, "due dates");
    assert_eq!(dates, [date(2025, 7, 1), date(2025, 8, 1), date(2025, 8, 10)]);

    let by_status = service.get_all_tasks_sorted_by_status().await.unwrap();
    let statuses: Vec<TaskStatus> = by_status.iter().map(|t| t.status).collect();
    assert_non_decreasing(&statuses, "statuses");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_service_not_found_after_delete() {
    let db = database().await;
    let service = TaskService::with_clock(
        PgTaskRepository::new(db.connection()),
        Arc::new(FixedClock(date(2025, 7, 1))),
    );

    let task = service
        .create_task(TaskDraft::new("short lived", date(2025, 7, 1), TaskStatus::Todo))
        .await
        .unwrap();
    service.delete_task(task.id).await.unwrap();

    assert!(matches!(
        service.get_task_by_id(task.id).await,
        Err(TaskError::NotFound(id)) if id == task.id
    ));
    assert!(matches!(
        service
            .update_task(task.id, TaskDraft::new("x", date(2025, 7, 1), TaskStatus::Done))
            .await,
        Err(TaskError::NotFound(_))
    ));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_status_check_constraint() {
    let db = database().await;

    let result = sea_orm::ConnectionTrait::execute_unprepared(
        &db.connection,
        "INSERT INTO tasks (title, due_date, status) VALUES ('x', '2030-01-01', 'ARCHIVED')",
    )
    .await;

    assert!(result.is_err());
}
