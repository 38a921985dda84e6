//! Application configuration

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;

/// Application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
}

/// Database configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

/// Remote service configuration. The engine only needs something that
/// implements its remote trait; this build ships a JSON-file transport for
/// local use.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RemoteConfig {
    pub recipes_file: Option<String>,
}

impl Settings {
    /// Load configuration, later sources overriding earlier ones:
    /// built-in defaults, config/default.toml, an explicit config file,
    /// then MEALPREP_-prefixed environment variables
    /// (e.g. MEALPREP_DATABASE__URL=sqlite://test.db).
    pub fn load(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = ConfigLoader::builder()
            .set_default("database.url", "sqlite://mealprep.db")?
            .set_default("database.max_connections", 4)?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .add_source(File::with_name("config/default").required(false));

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path));
        }

        let config = builder
            .add_source(Environment::with_prefix("MEALPREP").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
