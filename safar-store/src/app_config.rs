use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub uploads: UploadsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Origin allowed by CORS. `None` allows any origin.
    pub site_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Postgres,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub backend: Backend,
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_seconds: u64,
}

fn default_max_connections() -> u32 { 5 }
fn default_acquire_timeout() -> u64 { 3 }

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Shared HS256 secret of the identity provider.
    pub jwt_secret: String,
    #[serde(default = "default_audience")]
    pub audience: String,
    #[serde(default = "default_session_cookie")]
    pub session_cookie: String,
}

fn default_audience() -> String { "authenticated".to_string() }
fn default_session_cookie() -> String { "sb-access-token".to_string() }

#[derive(Debug, Deserialize, Clone)]
pub struct UploadsConfig {
    pub dir: String,
    pub public_path: String,
    pub max_image_mb: u64,
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            dir: "uploads".to_string(),
            public_path: "/uploads".to_string(),
            max_image_mb: 10,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides are optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `SAFAR_AUTH__JWT_SECRET=...`
            .add_source(config::Environment::with_prefix("SAFAR").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
