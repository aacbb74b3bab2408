use chrono::NaiveDate;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Deserializer, Serialize, de};
use std::fmt::Display;
use std::str::FromStr;
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};

/// Task status
///
/// Declaration order is the sort order: `TODO < IN_PROGRESS < DONE`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Not started
    #[sea_orm(string_value = "TODO")]
    Todo,
    #[sea_orm(string_value = "IN_PROGRESS")]
    InProgress,
    /// Finished
    #[sea_orm(string_value = "DONE")]
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];
}

/// A stored task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Store-assigned identifier
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    /// Calendar date, `YYYY-MM-DD`
    pub due_date: NaiveDate,
    pub status: TaskStatus,
}

/// Candidate task as submitted by a client, before validation.
///
/// Every field is optional so a missing field surfaces as a validation error
/// rather than a decoding error. Unknown fields (including `id`) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<TaskStatus>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, due_date: NaiveDate, status: TaskStatus) -> Self {
        Self {
            title: Some(title.into()),
            description: None,
            due_date: Some(due_date),
            status: Some(status),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl From<Task> for TaskDraft {
    fn from(task: Task) -> Self {
        Self {
            title: Some(task.title),
            description: task.description,
            due_date: Some(task.due_date),
            status: Some(task.status),
        }
    }
}

/// A draft that passed validation. Only the validator constructs one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub due_date: NaiveDate,
    pub status: TaskStatus,
}

impl NewTask {
    pub fn into_task(self, id: i64) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            due_date: self.due_date,
            status: self.status,
        }
    }
}

/// Orderings offered by the listing endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    DueDate,
    Status,
}

impl SortKey {
    /// Case-insensitive match on `dueDate` / `status`; anything else is `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("dueDate") {
            Some(SortKey::DueDate)
        } else if raw.eq_ignore_ascii_case("status") {
            Some(SortKey::Status)
        } else {
            None
        }
    }
}

/// Listing query: `?status=<STATUS>&sort=<dueDate|status>`
///
/// `status` wins over `sort`. An unknown `sort` value means "unsorted".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TaskQuery {
    /// Only tasks with this status
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<TaskStatus>)]
    pub status: Option<TaskStatus>,
    /// `dueDate` or `status`, case-insensitive
    #[serde(default)]
    pub sort: Option<String>,
}

impl TaskQuery {
    pub fn sort_key(&self) -> Option<SortKey> {
        self.sort.as_deref().and_then(SortKey::parse)
    }
}

/// Treats `?field=` as absent instead of a parse failure.
fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => T::from_str(value).map(Some).map_err(de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_wire_format() {
        assert_eq!(serde_json::to_value(TaskStatus::InProgress).unwrap(), json!("IN_PROGRESS"));
        assert_eq!(TaskStatus::InProgress.to_string(), "IN_PROGRESS");
        assert_eq!("DONE".parse::<TaskStatus>().unwrap(), TaskStatus::Done);
        assert!("done".parse::<TaskStatus>().is_err());
        assert!("ARCHIVED".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_status_order_follows_declaration() {
        assert!(TaskStatus::Todo < TaskStatus::InProgress);
        assert!(TaskStatus::InProgress < TaskStatus::Done);
        let mut all = TaskStatus::ALL;
        all.reverse();
        all.sort();
        assert_eq!(all, TaskStatus::ALL);
    }

    #[test]
    fn test_task_serializes_camel_case() {
        let task = Task {
            id: 1,
            title: "Buy milk".into(),
            description: None,
            due_date: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
            status: TaskStatus::Todo,
        };
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["dueDate"], "2025-08-01");
        assert_eq!(value["status"], "TODO");
        assert!(value["description"].is_null());
    }

    #[test]
    fn test_draft_ignores_id_and_unknown_fields() {
        let draft: TaskDraft = serde_json::from_value(json!({
            "id": 99,
            "title": "Buy milk",
            "dueDate": "2025-08-01",
            "status": "TODO",
            "priority": "high"
        }))
        .unwrap();
        assert_eq!(draft.title.as_deref(), Some("Buy milk"));
        assert_eq!(draft.due_date, NaiveDate::from_ymd_opt(2025, 8, 1));
    }

    #[test]
    fn test_draft_allows_missing_fields() {
        let draft: TaskDraft = serde_json::from_value(json!({})).unwrap();
        assert_eq!(draft, TaskDraft::default());
    }

    #[test]
    fn test_sort_key_is_case_insensitive() {
        assert_eq!(SortKey::parse("dueDate"), Some(SortKey::DueDate));
        assert_eq!(SortKey::parse("DUEDATE"), Some(SortKey::DueDate));
        assert_eq!(SortKey::parse("Status"), Some(SortKey::Status));
        assert_eq!(SortKey::parse("title"), None);
        assert_eq!(SortKey::parse(""), None);
    }

    fn parse_query(query: &str) -> Option<TaskQuery> {
        let uri: axum::http::Uri = format!("/tasks?{query}").parse().unwrap();
        axum::extract::Query::<TaskQuery>::try_from_uri(&uri)
            .ok()
            .map(|q| q.0)
    }

    #[test]
    fn test_query_treats_empty_status_as_absent() {
        let query = parse_query("status=&sort=dueDate").unwrap();
        assert_eq!(query.status, None);
        assert_eq!(query.sort_key(), Some(SortKey::DueDate));

        let query = parse_query("status=IN_PROGRESS").unwrap();
        assert_eq!(query.status, Some(TaskStatus::InProgress));

        assert!(parse_query("status=LATER").is_none());
    }
}
