use crate::store::LoginLookup;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration build error: {0}")]
    Build(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// Table holding the user records.
    #[serde(default = "default_user_table")]
    pub user_table: String,
    /// Which fields a submitted login name is matched against.
    #[serde(default)]
    pub login_lookup: LoginLookup,
    /// Base URL of the authorization server's admin API.
    #[serde(default = "default_hydra_private_url")]
    pub hydra_private_url: String,
    #[serde(default = "default_admin_timeout_secs")]
    pub admin_timeout_secs: u64,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory served under `/public/`.
    #[serde(default = "default_public_assets_path")]
    pub public_assets_path: PathBuf,
    pub custom_header_path: Option<PathBuf>,
    pub custom_footer_path: Option<PathBuf>,
    /// Stylesheet URL linked from the login page, e.g. `/static/custom.css`.
    pub custom_stylesheet_path: Option<String>,
    /// Directory served under `/static/`.
    pub custom_static_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            user_table: default_user_table(),
            login_lookup: LoginLookup::default(),
            hydra_private_url: default_hydra_private_url(),
            admin_timeout_secs: default_admin_timeout_secs(),
            port: default_port(),
            public_assets_path: default_public_assets_path(),
            custom_header_path: None,
            custom_footer_path: None,
            custom_stylesheet_path: None,
            custom_static_path: None,
        }
    }
}

fn default_database_url() -> String {
    "postgres://localhost:5432/db".to_string()
}

fn default_user_table() -> String {
    "users".to_string()
}

fn default_hydra_private_url() -> String {
    "http://localhost:4445".to_string()
}

fn default_admin_timeout_secs() -> u64 {
    crate::admin::ADMIN_TIMEOUT_SECS
}

fn default_port() -> u16 {
    5000
}

fn default_public_assets_path() -> PathBuf {
    PathBuf::from("assets/public")
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::Validation("port must be > 0".into()));
        }
        if self.admin_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "admin_timeout_secs must be > 0".into(),
            ));
        }
        match Url::parse(&self.hydra_private_url) {
            Ok(url) if !url.cannot_be_a_base() => {}
            Ok(_) => {
                return Err(ConfigError::Validation(format!(
                    "hydra_private_url '{}' cannot be used as a base URL",
                    self.hydra_private_url
                )));
            }
            Err(e) => {
                return Err(ConfigError::Validation(format!(
                    "hydra_private_url '{}' is not a valid URL: {e}",
                    self.hydra_private_url
                )));
            }
        }
        if !is_identifier(&self.user_table) {
            return Err(ConfigError::Validation(format!(
                "user_table '{}' must only contain ASCII letters, digits and '_'",
                self.user_table
            )));
        }
        Ok(())
    }
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty()
        && !s.starts_with(|c: char| c.is_ascii_digit())
        && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Load application configuration from an optional `config.yaml` + environment overrides.
///
/// Every key can be overridden by the upper-cased environment variable of the same
/// name, e.g. `HYDRA_PRIVATE_URL` or `CUSTOM_HEADER_PATH`.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    use config::{Config, Environment, File};
    let cfg = Config::builder()
        .add_source(File::with_name("config.yaml").required(false))
        .add_source(
            Environment::default()
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let app: AppConfig = cfg.try_deserialize()?;
    app.validate()?;
    Ok(app)
}
