use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_helpers::{
    IdPath, JsonBody, QueryParams,
    errors::responses::{
        BadRequestResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
};
use std::sync::Arc;

use crate::error::TaskResult;
use crate::models::{Task, TaskDraft, TaskQuery};
use crate::repository::TaskRepository;
use crate::service::TaskService;

pub(crate) const TAG: &str = "tasks";

/// List tasks, optionally filtered by status or sorted
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(TaskQuery),
    responses(
        (status = 200, description = "List of tasks", body = Vec<Task>),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub async fn list_tasks<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    QueryParams(query): QueryParams<TaskQuery>,
) -> TaskResult<Json<Vec<Task>>> {
    let tasks = service.query_tasks(query).await?;
    Ok(Json(tasks))
}

/// Get a task by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "Task ID")
    ),
    responses(
        (status = 200, description = "Task found", body = Task),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub async fn get_task<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    IdPath(id): IdPath,
) -> TaskResult<Json<Task>> {
    let task = service.get_task_by_id(id).await?;
    Ok(Json(task))
}

/// Create a new task
///
/// An `id` in the body is ignored; the store assigns one.
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = TaskDraft,
    responses(
        (status = 201, description = "Task created successfully", body = Task),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub async fn create_task<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    JsonBody(draft): JsonBody<Option<TaskDraft>>,
) -> TaskResult<impl IntoResponse> {
    let task = service.create_task(draft).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// Replace a task
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "Task ID")
    ),
    request_body = TaskDraft,
    responses(
        (status = 200, description = "Task updated successfully", body = Task),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub async fn update_task<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    IdPath(id): IdPath,
    JsonBody(draft): JsonBody<Option<TaskDraft>>,
) -> TaskResult<Json<Task>> {
    let task = service.update_task(id, draft).await?;
    Ok(Json(task))
}

/// Delete a task
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "Task ID")
    ),
    responses(
        (status = 204, description = "Task deleted successfully"),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub async fn delete_task<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    IdPath(id): IdPath,
) -> TaskResult<StatusCode> {
    service.delete_task(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
