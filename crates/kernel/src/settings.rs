use std::fmt;
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use serde::Deserialize;

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "BOOKSTORE_ENV";
const CONFIG_DIR_ENV: &str = "BOOKSTORE_CONFIG_DIR";
const ENV_PREFIX: &str = "BOOKSTORE";

/// Classic connection variables, honoured on top of every other source.
const DATABASE_ENV_OVERRIDES: &[(&str, &str)] = &[
    ("DB_HOST", "database.host"),
    ("DB_PORT", "database.port"),
    ("DB_USER", "database.user"),
    ("DB_PASSWORD", "database.password"),
    ("DB_NAME", "database.name"),
];

/// Deployment environment the application is running in.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

/// Top-level configuration structure loaded from layered sources.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, environment overlay,
    /// `BOOKSTORE_*` variables and finally the `DB_*` connection variables.
    pub fn load() -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let environment = std::env::var(ENV_VAR_NAME).unwrap_or_else(|_| DEFAULT_ENV.to_string());
        let config_dir = match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) => PathBuf::from(dir),
            // Default to the `config` directory next to the working directory.
            Err(_) => std::env::current_dir()
                .map(|cwd| cwd.join("config"))
                .with_context(|| "unable to resolve current directory")?,
        };

        let base_path = config_dir.join("base.toml");
        let environment_filename = format!("{}.toml", environment);
        let environment_path = config_dir.join(environment_filename);

        let mut builder = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        for (var, key) in DATABASE_ENV_OVERRIDES {
            builder = builder
                .set_override_option(*key, non_empty_env(var))
                .with_context(|| format!("invalid override for {key}"))?;
        }

        let cfg = builder
            .build()
            .with_context(|| "failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;

        // Override environment field with parsed enum variant.
        settings.environment = match environment.as_str() {
            "local" => Environment::Local,
            "staging" => Environment::Staging,
            "production" => Environment::Production,
            other => {
                return Err(anyhow!(
                    "unsupported environment '{}'; expected local/staging/production",
                    other
                ));
            }
        };

        settings
            .database
            .pool
            .validate()
            .with_context(|| "invalid database pool settings")?;

        Ok(settings)
    }
}

/// Reads an environment variable, treating an empty value as unset.
fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "ServerSettings::default_host")]
    pub host: String,
    #[serde(default = "ServerSettings::default_port")]
    pub port: u16,
}

impl ServerSettings {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        8080
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

/// TLS negotiation mode for the store connection.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SslMode {
    #[default]
    Disable,
    Prefer,
    Require,
}

/// Connection parameters for the PostgreSQL store.
#[derive(Clone, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "DatabaseSettings::default_host")]
    pub host: String,
    #[serde(default = "DatabaseSettings::default_port")]
    pub port: u16,
    #[serde(default = "DatabaseSettings::default_user")]
    pub user: String,
    #[serde(default = "DatabaseSettings::default_password")]
    pub password: String,
    #[serde(default = "DatabaseSettings::default_name")]
    pub name: String,
    #[serde(default)]
    pub ssl_mode: SslMode,
    #[serde(default)]
    pub pool: PoolSettings,
    #[serde(default)]
    pub retry: RetrySettings,
}

impl DatabaseSettings {
    fn default_host() -> String {
        "localhost".to_string()
    }

    fn default_port() -> u16 {
        5432
    }

    fn default_user() -> String {
        "postgres".to_string()
    }

    fn default_password() -> String {
        "postgres".to_string()
    }

    fn default_name() -> String {
        "bookstore".to_string()
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            user: Self::default_user(),
            password: Self::default_password(),
            name: Self::default_name(),
            ssl_mode: SslMode::default(),
            pool: PoolSettings::default(),
            retry: RetrySettings::default(),
        }
    }
}

impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("name", &self.name)
            .field("ssl_mode", &self.ssl_mode)
            .field("pool", &self.pool)
            .field("retry", &self.retry)
            .finish()
    }
}

/// Bounds applied to the connection pool.
#[derive(Debug, Clone, Deserialize)]
pub struct PoolSettings {
    #[serde(default = "PoolSettings::default_max_open_connections")]
    pub max_open_connections: u32,
    #[serde(default = "PoolSettings::default_max_idle_connections")]
    pub max_idle_connections: u32,
    #[serde(default = "PoolSettings::default_max_lifetime_secs")]
    pub max_lifetime_secs: u64,
    #[serde(default = "PoolSettings::default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
    #[serde(default = "PoolSettings::default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

impl PoolSettings {
    fn default_max_open_connections() -> u32 {
        25
    }

    fn default_max_idle_connections() -> u32 {
        20
    }

    fn default_max_lifetime_secs() -> u64 {
        300
    }

    fn default_idle_timeout_secs() -> u64 {
        600
    }

    fn default_acquire_timeout_secs() -> u64 {
        5
    }

    /// Reject bounds the pool cannot honour.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_open_connections == 0 {
            return Err(anyhow!("max_open_connections must be at least 1"));
        }
        if self.max_idle_connections > self.max_open_connections {
            return Err(anyhow!(
                "max_idle_connections ({}) exceeds max_open_connections ({})",
                self.max_idle_connections,
                self.max_open_connections
            ));
        }
        Ok(())
    }
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_open_connections: Self::default_max_open_connections(),
            max_idle_connections: Self::default_max_idle_connections(),
            max_lifetime_secs: Self::default_max_lifetime_secs(),
            idle_timeout_secs: Self::default_idle_timeout_secs(),
            acquire_timeout_secs: Self::default_acquire_timeout_secs(),
        }
    }
}

/// Startup ping budget.
#[derive(Debug, Clone, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "RetrySettings::default_attempts")]
    pub attempts: u32,
    #[serde(default = "RetrySettings::default_delay_ms")]
    pub delay_ms: u64,
}

impl RetrySettings {
    fn default_attempts() -> u32 {
        10
    }

    fn default_delay_ms() -> u64 {
        3000
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            attempts: Self::default_attempts(),
            delay_ms: Self::default_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub log_format: LogFormat,
    #[serde(default = "TelemetrySettings::default_log_filter")]
    pub log_filter: String,
}

impl TelemetrySettings {
    fn default_log_filter() -> String {
        "info".to_string()
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            log_filter: Self::default_log_filter(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}
