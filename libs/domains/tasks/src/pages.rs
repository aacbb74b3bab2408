//! HTML rendering for the server-side task pages.

use handlebars::Handlebars;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::error::{TaskError, TaskResult};
use crate::models::{Task, TaskStatus};

const HEADER_PARTIAL: &str = include_str!("../templates/header.hbs");
const FOOTER_PARTIAL: &str = include_str!("../templates/footer.hbs");
const LIST_TEMPLATE: &str = include_str!("../templates/list.hbs");
const DETAIL_TEMPLATE: &str = include_str!("../templates/detail.hbs");
const FORM_TEMPLATE: &str = include_str!("../templates/form.hbs");
const NOT_FOUND_TEMPLATE: &str = include_str!("../templates/not_found.hbs");

/// Raw form values echoed back into a form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormValues {
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub status: String,
}

impl From<&Task> for FormValues {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            due_date: task.due_date.to_string(),
            status: task.status.to_string(),
        }
    }
}

/// Which form is being rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(i64),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusOption {
    value: TaskStatus,
    selected: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListView<'a> {
    page_title: &'static str,
    tasks: &'a [Task],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DetailView<'a> {
    page_title: &'a str,
    task: &'a Task,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FormView<'a> {
    page_title: String,
    action: String,
    submit_label: &'static str,
    error: Option<&'a str>,
    values: &'a FormValues,
    statuses: Vec<StatusOption>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NotFoundView<'a> {
    page_title: &'static str,
    message: &'a str,
}

/// Template engine for the task pages
#[derive(Clone)]
pub struct Pages {
    handlebars: Arc<Handlebars<'static>>,
}

impl Pages {
    /// Create the engine with every page template registered.
    pub fn new() -> TaskResult<Self> {
        let mut handlebars = Handlebars::new();

        for (name, partial) in [("header", HEADER_PARTIAL), ("footer", FOOTER_PARTIAL)] {
            handlebars
                .register_partial(name, partial)
                .map_err(|e| TaskError::Template(format!("Failed to register {}: {}", name, e)))?;
        }

        for (name, template) in [
            ("list", LIST_TEMPLATE),
            ("detail", DETAIL_TEMPLATE),
            ("form", FORM_TEMPLATE),
            ("not_found", NOT_FOUND_TEMPLATE),
        ] {
            handlebars
                .register_template_string(name, template)
                .map_err(|e| TaskError::Template(format!("Failed to register {}: {}", name, e)))?;
        }

        Ok(Self {
            handlebars: Arc::new(handlebars),
        })
    }

    fn render<T: Serialize>(&self, template_name: &str, data: &T) -> TaskResult<String> {
        self.handlebars
            .render(template_name, data)
            .map_err(|e| TaskError::Template(e.to_string()))
    }

    pub fn render_list(&self, tasks: &[Task]) -> TaskResult<String> {
        debug!(count = tasks.len(), "Rendering task list");
        self.render(
            "list",
            &ListView {
                page_title: "Tasks",
                tasks,
            },
        )
    }

    pub fn render_detail(&self, task: &Task) -> TaskResult<String> {
        self.render(
            "detail",
            &DetailView {
                page_title: &task.title,
                task,
            },
        )
    }

    /// Render the create or edit form, optionally with an error banner.
    pub fn render_form(
        &self,
        mode: FormMode,
        values: &FormValues,
        error: Option<&str>,
    ) -> TaskResult<String> {
        let (page_title, action, submit_label) = match mode {
            FormMode::Create => ("New task".to_string(), "/create".to_string(), "Create"),
            FormMode::Edit(id) => (format!("Edit task {}", id), format!("/edit/{}", id), "Save"),
        };

        let statuses = TaskStatus::ALL
            .into_iter()
            .map(|value| StatusOption {
                value,
                selected: values.status == value.to_string(),
            })
            .collect();

        self.render(
            "form",
            &FormView {
                page_title,
                action,
                submit_label,
                error,
                values,
                statuses,
            },
        )
    }

    pub fn render_not_found(&self, message: &str) -> TaskResult<String> {
        self.render(
            "not_found",
            &NotFoundView {
                page_title: "Task not found",
                message,
            },
        )
    }
}
