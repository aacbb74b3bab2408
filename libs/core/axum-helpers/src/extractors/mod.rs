//! Custom extractors for Axum handlers.
//!
//! Each extractor rejects with an [`AppError`](crate::errors::AppError) so
//! malformed input gets the same JSON error body as domain failures.

pub mod form_body;
pub mod id_path;
pub mod json_body;
pub mod query_params;

pub use form_body::FormBody;
pub use id_path::IdPath;
pub use json_body::JsonBody;
pub use query_params::QueryParams;
