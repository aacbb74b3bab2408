//! Task validation
//!
//! Rules are checked in a fixed order and the first failure wins:
//! presence of the task, due date, title, status. The description is never
//! checked.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{NewTask, TaskDraft};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DueDateError {
    #[error("Due date cannot be null")]
    Missing,

    #[error("Due date cannot be in the past")]
    InPast,

    /// Raw input that is not a `YYYY-MM-DD` date (form submissions only)
    #[error("Due date '{0}' is not a valid date")]
    Unparseable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatusError {
    #[error("Status cannot be null")]
    Missing,

    /// Raw input that is not a known status (form submissions only)
    #[error("Status '{0}' is not one of TODO, IN_PROGRESS, DONE")]
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Task cannot be null")]
    MissingTask,

    #[error(transparent)]
    InvalidDueDate(DueDateError),

    #[error("Title cannot be null or blank")]
    InvalidTitle,

    #[error(transparent)]
    InvalidStatus(StatusError),
}

impl ValidationError {
    /// Name of the offending field as it appears on the wire, if any
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::MissingTask => None,
            ValidationError::InvalidDueDate(_) => Some("dueDate"),
            ValidationError::InvalidTitle => Some("title"),
            ValidationError::InvalidStatus(_) => Some("status"),
        }
    }
}

/// Check a candidate task against `today` and turn it into a [`NewTask`].
///
/// A due date equal to `today` is accepted. A title is blank when it has no
/// non-whitespace characters; the accepted title is stored as given.
pub fn validate_task(
    draft: Option<&TaskDraft>,
    today: NaiveDate,
) -> Result<NewTask, ValidationError> {
    let draft = draft.ok_or(ValidationError::MissingTask)?;

    let due_date = match draft.due_date {
        None => return Err(ValidationError::InvalidDueDate(DueDateError::Missing)),
        Some(date) if date < today => {
            return Err(ValidationError::InvalidDueDate(DueDateError::InPast));
        }
        Some(date) => date,
    };

    let title = match draft.title.as_deref() {
        Some(title) if !title.trim().is_empty() => title.to_owned(),
        _ => return Err(ValidationError::InvalidTitle),
    };

    let status = draft
        .status
        .ok_or(ValidationError::InvalidStatus(StatusError::Missing))?;

    Ok(NewTask {
        title,
        description: draft.description.clone(),
        due_date,
        status,
    })
}
