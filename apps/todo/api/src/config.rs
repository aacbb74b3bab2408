use core_config::{AppInfo, FromEnv, app_info, env_optional, env_parse, server::ServerConfig};
use database::RetryConfig;
use database::postgres::PostgresConfig;

pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    /// `None` when `DATABASE_URL` is unset: tasks live in memory
    pub database: Option<PostgresConfig>,
    pub retry: RetryConfig,
    /// Run `CREATE TABLE IF NOT EXISTS tasks` at start-up (`DB_BOOTSTRAP_SCHEMA`)
    pub bootstrap_schema: bool,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080
        let database = match env_optional("DATABASE_URL") {
            Some(_) => Some(PostgresConfig::from_env()?),
            None => None,
        };

        Ok(Self {
            app: app_info!(),
            environment,
            server,
            database,
            retry: RetryConfig::from_env()?,
            bootstrap_schema: env_parse("DB_BOOTSTRAP_SCHEMA", true)?,
        })
    }
}
