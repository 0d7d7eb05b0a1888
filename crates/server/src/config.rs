use serde::Deserialize;

/// Environment variable overriding the admin password.
pub const ADMIN_PASSWORD_ENV: &str = "PINBOARD_ADMIN_PASSWORD";

/// Environment variable overriding the session signing secret.
pub const SESSION_SECRET_ENV: &str = "PINBOARD_SESSION_SECRET";

/// Top-level configuration for the Pinboard server, loaded from a TOML file.
#[derive(Debug, Default, Deserialize)]
pub struct PinboardConfig {
    /// HTTP server bind configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Storage paths.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Upload limits.
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Admin credentials.
    #[serde(default)]
    pub admin: AdminConfig,
    /// Session cookie configuration.
    #[serde(default)]
    pub session: SessionConfig,
}

impl PinboardConfig {
    /// Apply environment overrides for secrets.
    ///
    /// `PINBOARD_ADMIN_PASSWORD` and `PINBOARD_SESSION_SECRET` take
    /// precedence over values from the config file, so deployments can keep
    /// secrets out of the file entirely.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(password) = std::env::var(ADMIN_PASSWORD_ENV) {
            self.admin.password = Some(password);
        }
        if let Ok(secret) = std::env::var(SESSION_SECRET_ENV) {
            self.session.secret = Some(secret);
        }
    }
}

/// HTTP server bind configuration.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_owned()
}

fn default_port() -> u16 {
    8080
}

/// Filesystem locations for the card log and attachment uploads.
#[derive(Debug, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the card log file.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Root directory for attachment uploads.
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            uploads_dir: default_uploads_dir(),
        }
    }
}

fn default_data_dir() -> String {
    "data".to_owned()
}

fn default_uploads_dir() -> String {
    "data/uploads".to_owned()
}

/// Upload size limits.
#[derive(Debug, Deserialize)]
pub struct LimitsConfig {
    /// Maximum total upload bytes per create request.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_max_upload_bytes() -> usize {
    120 * 1024 * 1024
}

/// Admin credentials.
///
/// When no password is configured (neither here nor via the environment),
/// login always fails and the board is effectively read-only.
#[derive(Debug, Default, Deserialize)]
pub struct AdminConfig {
    /// The single shared admin password, compared exactly.
    pub password: Option<String>,
}

/// Session cookie configuration.
#[derive(Debug, Deserialize)]
pub struct SessionConfig {
    /// Secret used to sign session cookies.
    ///
    /// If not set, a random secret is generated on startup (admin sessions
    /// will not survive server restarts).
    pub secret: Option<String>,
    /// Session lifetime in seconds.
    #[serde(default = "default_session_ttl")]
    pub ttl_seconds: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: None,
            ttl_seconds: default_session_ttl(),
        }
    }
}

fn default_session_ttl() -> u64 {
    24 * 60 * 60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config: PinboardConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.data_dir, "data");
        assert_eq!(config.storage.uploads_dir, "data/uploads");
        assert_eq!(config.limits.max_upload_bytes, 120 * 1024 * 1024);
        assert!(config.admin.password.is_none());
        assert_eq!(config.session.ttl_seconds, 24 * 60 * 60);
    }

    #[test]
    fn partial_sections_fill_in_defaults() {
        let config: PinboardConfig = toml::from_str(
            r#"
            [server]
            port = 3000

            [limits]
            max_upload_bytes = 1024

            [admin]
            password = "hunter2"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.limits.max_upload_bytes, 1024);
        assert_eq!(config.admin.password.as_deref(), Some("hunter2"));
    }
}
