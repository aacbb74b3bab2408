//! Tasks Domain
//!
//! Task management: validation, storage, listing rules and the HTTP surface
//! (JSON API plus server-rendered pages).
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │ Handlers (REST, web) │  ← Extraction, status codes, HTML
//! └──────────┬───────────┘
//!            │
//! ┌──────────▼───────────┐
//! │       Service        │  ← Validation, filtering, sorting
//! └──────────┬───────────┘
//!            │
//! ┌──────────▼───────────┐
//! │      Repository      │  ← In-memory or PostgreSQL
//! └──────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_tasks::{PgTaskRepository, TaskService, postgres::ensure_schema};
//! use sea_orm::Database;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("postgres://...").await?;
//! ensure_schema(&db).await?;
//!
//! let service = TaskService::new(PgTaskRepository::new(db));
//! let tasks = service.get_all_tasks_sorted_by_due_date().await?;
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod pages;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod validation;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{TaskError, TaskResult};
pub use handlers::{TasksApiDoc, router, web_router};
pub use models::{NewTask, SortKey, Task, TaskDraft, TaskQuery, TaskStatus};
pub use pages::Pages;
pub use postgres::PgTaskRepository;
pub use repository::{InMemoryTaskRepository, TaskRepository};
pub use service::TaskService;
pub use validation::{ValidationError, validate_task};
