//! Database connectivity shared by the workspace's services.
//!
//! # Features
//!
//! - `postgres` (default): PostgreSQL on SeaORM (connect, retry, health, DDL bootstrap)
//! - `config`: `core_config::FromEnv` for [`postgres::PostgresConfig`] and
//!   [`common::RetryConfig`]
//!
//! ```ignore
//! use database::postgres::{self, PostgresConfig};
//!
//! let db = postgres::connect_from_config_with_retry(PostgresConfig::from_env()?, None).await?;
//! postgres::check_health(&db).await?;
//! ```

pub mod common;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use common::{DatabaseError, RetryConfig};
