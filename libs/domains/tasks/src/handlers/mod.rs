mod rest;
mod web;

pub use web::{ListPageQuery, TaskForm, WebState};

use axum::{Router, routing::get};
use axum_helpers::errors::responses::{
    BadRequestResponse, BadRequestValidationResponse, InternalServerErrorResponse,
    NotFoundResponse,
};
use axum_helpers::ErrorResponse;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::models::{Task, TaskDraft, TaskStatus};
use crate::pages::Pages;
use crate::repository::TaskRepository;
use crate::service::TaskService;

/// OpenAPI documentation for the Tasks REST API
#[derive(OpenApi)]
#[openapi(
    paths(
        rest::list_tasks,
        rest::get_task,
        rest::create_task,
        rest::update_task,
        rest::delete_task,
    ),
    components(
        schemas(Task, TaskDraft, TaskStatus, ErrorResponse),
        responses(
            NotFoundResponse,
            BadRequestResponse,
            BadRequestValidationResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = rest::TAG, description = "Task management endpoints")
    )
)]
pub struct TasksApiDoc;

/// JSON endpoints, to be nested under `/api/v1/tasks`
pub fn router<R: TaskRepository + 'static>(service: Arc<TaskService<R>>) -> Router {
    Router::new()
        .route("/", get(rest::list_tasks).post(rest::create_task))
        .route(
            "/{id}",
            get(rest::get_task)
                .put(rest::update_task)
                .delete(rest::delete_task),
        )
        .with_state(service)
}

/// Server-rendered pages, to be merged at the root
pub fn web_router<R: TaskRepository + 'static>(
    service: Arc<TaskService<R>>,
    pages: Pages,
) -> Router {
    Router::new()
        .route("/", get(web::list_page))
        .route("/create", get(web::create_form).post(web::create_submit))
        .route("/tasks/{id}", get(web::detail_page))
        .route("/edit/{id}", get(web::edit_form).post(web::edit_submit))
        .with_state(WebState { service, pages })
}
