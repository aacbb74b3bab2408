//! Application state management.

use database::postgres::DatabaseConnection;

/// State of the operational routes (`/ready`).
///
/// Task routes carry their own state; this only holds what readiness needs.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL pool, absent when running on the in-memory store
    pub db: Option<DatabaseConnection>,
}
