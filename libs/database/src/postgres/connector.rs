use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use tracing::{info, warn};

use super::PostgresConfig;
use crate::common::{DatabaseError, RetryConfig, retry_with_backoff};

/// Connect with explicit SeaORM connection options.
pub async fn connect_with_options(options: ConnectOptions) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(options).await?;
    info!("Connected to PostgreSQL");
    Ok(db)
}

/// Connect with exponential backoff, for start-up while the database may
/// still be coming up.
///
/// ```ignore
/// let retry = RetryConfig::new().with_max_retries(5);
/// let db = connect_from_config_with_retry(config, Some(retry)).await?;
/// ```
pub async fn connect_from_config_with_retry(
    config: PostgresConfig,
    retry_config: Option<RetryConfig>,
) -> Result<DatabaseConnection, DatabaseError> {
    let options = config.into_connect_options();

    retry_with_backoff(
        || connect_with_options(options.clone()),
        retry_config.unwrap_or_default(),
    )
    .await
    .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))
}

/// Run idempotent DDL statements (e.g. `CREATE TABLE IF NOT EXISTS`) in order.
///
/// Stops at the first failing statement.
pub async fn execute_ddl(db: &DatabaseConnection, statements: &[&str]) -> Result<(), DatabaseError> {
    for statement in statements {
        db.execute_unprepared(statement)
            .await
            .map_err(|e| DatabaseError::SchemaError(e.to_string()))?;
    }
    info!(statements = statements.len(), "Schema bootstrap applied");
    Ok(())
}

/// Close the connection pool, logging instead of failing on error.
pub async fn close(db: DatabaseConnection) {
    match db.close().await {
        Ok(()) => info!("PostgreSQL connection pool closed"),
        Err(e) => warn!("Failed to close PostgreSQL connection pool: {}", e),
    }
}
