use crate::error::ConfigError;
use serde::Deserialize;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub session: SessionSettings,
    pub logging: LoggingSettings,
}

/// Where and how the HTTP server listens.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Maximum accepted request body, in bytes.
    pub body_limit_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// e.g. `sqlite://data/fintrack.db`, or `sqlite::memory:` for tests.
    pub url: String,
    pub max_connections: u32,
}

/// Login session cookie parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub cookie_name: String,
    /// How long a login stays valid.
    pub lifetime_days: i64,
    /// Mark the cookie `Secure`. Enable behind HTTPS.
    pub secure_cookie: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive. `RUST_LOG` takes precedence when set.
    pub filter: String,
    /// When set, logs are also written to a daily-rotated file in this directory.
    pub directory: Option<String>,
    pub file_prefix: String,
}

// --- Default Implementations ---
// This allows a user to omit any section (or the whole file)
// and still have it work with sensible defaults.

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            body_limit_bytes: 1024 * 1024,
        }
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "sqlite://data/fintrack.db".to_string(),
            max_connections: 5,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            cookie_name: "fintrack_session".to_string(),
            lifetime_days: 7,
            secure_cookie: false,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info,tower_http=info".to_string(),
            directory: None,
            file_prefix: "fintrack.log".to_string(),
        }
    }
}

impl ServerSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Upper bound for `session.lifetime_days`, roughly ten years.
pub const MAX_SESSION_LIFETIME_DAYS: i64 = 3650;

impl Settings {
    /// Rejects values that would make the application unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be non-zero".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        if !(1..=MAX_SESSION_LIFETIME_DAYS).contains(&self.session.lifetime_days) {
            return Err(ConfigError::ValidationError(format!(
                "session.lifetime_days must be between 1 and {MAX_SESSION_LIFETIME_DAYS}"
            )));
        }
        if self.session.cookie_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "session.cookie_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
