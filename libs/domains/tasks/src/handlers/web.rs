use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_helpers::{FormBody, IdPath};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{TaskError, TaskResult};
use crate::models::{TaskDraft, TaskQuery, TaskStatus};
use crate::pages::{FormMode, FormValues, Pages};
use crate::repository::TaskRepository;
use crate::service::TaskService;
use crate::validation::{DueDateError, StatusError, ValidationError};

/// Shared state of the page routes
pub struct WebState<R: TaskRepository> {
    pub service: Arc<TaskService<R>>,
    pub pages: Pages,
}

impl<R: TaskRepository> Clone for WebState<R> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            pages: self.pages.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListPageQuery {
    #[serde(default)]
    pub sort: Option<String>,
}

/// Form submission from the create and edit pages. Every field arrives as
/// text; an empty field counts as missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub status: String,
}

impl TaskForm {
    /// Parse the text fields into a draft.
    ///
    /// A date that is not `YYYY-MM-DD` or an unknown status literal is
    /// reported before the draft reaches the validator.
    pub fn to_draft(&self) -> Result<TaskDraft, ValidationError> {
        let due_date = match self.due_date.trim() {
            "" => None,
            raw => Some(NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                ValidationError::InvalidDueDate(DueDateError::Unparseable(raw.to_string()))
            })?),
        };

        let status = match self.status.trim() {
            "" => None,
            raw => Some(raw.parse::<TaskStatus>().map_err(|_| {
                ValidationError::InvalidStatus(StatusError::Unknown(raw.to_string()))
            })?),
        };

        Ok(TaskDraft {
            title: non_empty(&self.title),
            description: non_empty(&self.description),
            due_date,
            status,
        })
    }

    fn values(&self) -> FormValues {
        FormValues {
            title: self.title.clone(),
            description: self.description.clone(),
            due_date: self.due_date.clone(),
            status: self.status.clone(),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn render_not_found<R: TaskRepository>(state: &WebState<R>, id: i64) -> TaskResult<Response> {
    let html = state
        .pages
        .render_not_found(&TaskError::NotFound(id).to_string())?;
    Ok((StatusCode::NOT_FOUND, Html(html)).into_response())
}

fn render_invalid_form<R: TaskRepository>(
    state: &WebState<R>,
    mode: FormMode,
    form: &TaskForm,
    error: &ValidationError,
) -> TaskResult<Response> {
    let html = state
        .pages
        .render_form(mode, &form.values(), Some(&error.to_string()))?;
    Ok((StatusCode::BAD_REQUEST, Html(html)).into_response())
}

/// `GET /` task list, optionally sorted
pub async fn list_page<R: TaskRepository>(
    State(state): State<WebState<R>>,
    Query(query): Query<ListPageQuery>,
) -> TaskResult<Html<String>> {
    let tasks = state
        .service
        .query_tasks(TaskQuery {
            status: None,
            sort: query.sort,
        })
        .await?;

    Ok(Html(state.pages.render_list(&tasks)?))
}

/// `GET /tasks/{id}`
pub async fn detail_page<R: TaskRepository>(
    State(state): State<WebState<R>>,
    IdPath(id): IdPath,
) -> TaskResult<Response> {
    match state.service.get_task_by_id(id).await {
        Ok(task) => Ok(Html(state.pages.render_detail(&task)?).into_response()),
        Err(TaskError::NotFound(_)) => render_not_found(&state, id),
        Err(e) => Err(e),
    }
}

/// `GET /create`
pub async fn create_form<R: TaskRepository>(
    State(state): State<WebState<R>>,
) -> TaskResult<Html<String>> {
    let html = state
        .pages
        .render_form(FormMode::Create, &FormValues::default(), None)?;
    Ok(Html(html))
}

/// `POST /create`
pub async fn create_submit<R: TaskRepository>(
    State(state): State<WebState<R>>,
    FormBody(form): FormBody<TaskForm>,
) -> TaskResult<Response> {
    let draft = match form.to_draft() {
        Ok(draft) => draft,
        Err(e) => return render_invalid_form(&state, FormMode::Create, &form, &e),
    };

    match state.service.create_task(draft).await {
        Ok(_) => Ok(Redirect::to("/").into_response()),
        Err(TaskError::Validation(e)) => render_invalid_form(&state, FormMode::Create, &form, &e),
        Err(e) => Err(e),
    }
}

/// `GET /edit/{id}`
pub async fn edit_form<R: TaskRepository>(
    State(state): State<WebState<R>>,
    IdPath(id): IdPath,
) -> TaskResult<Response> {
    match state.service.get_task_by_id(id).await {
        Ok(task) => {
            let html = state
                .pages
                .render_form(FormMode::Edit(id), &FormValues::from(&task), None)?;
            Ok(Html(html).into_response())
        }
        Err(TaskError::NotFound(_)) => render_not_found(&state, id),
        Err(e) => Err(e),
    }
}

/// `POST /edit/{id}`
pub async fn edit_submit<R: TaskRepository>(
    State(state): State<WebState<R>>,
    IdPath(id): IdPath,
    FormBody(form): FormBody<TaskForm>,
) -> TaskResult<Response> {
    let mode = FormMode::Edit(id);
    let draft = match form.to_draft() {
        Ok(draft) => draft,
        Err(e) => return render_invalid_form(&state, mode, &form, &e),
    };

    match state.service.update_task(id, draft).await {
        Ok(_) => Ok(Redirect::to("/").into_response()),
        Err(TaskError::Validation(e)) => render_invalid_form(&state, mode, &form, &e),
        Err(TaskError::NotFound(_)) => render_not_found(&state, id),
        Err(e) => Err(e),
    }
}
