use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Startup reconciliation (default registries, default snapshot)
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::invalid("server.port must be > 0"));
        }
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(ConfigError::invalid(format!(
                "logging.level must be one of {valid_levels:?}"
            )));
        }
        Ok(())
    }

    pub fn addr(&self) -> SocketAddr {
        use std::net::{IpAddr, Ipv4Addr};
        let host: IpAddr = self
            .server
            .host
            .parse()
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));
        SocketAddr::from((host, self.server.port))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config build error: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Startup reconciliation configuration.
///
/// Can be set via environment variables, e.g.:
/// - DOCKYARD__BOOTSTRAP__DEFAULT_SNAPSHOT
/// - DOCKYARD__BOOTSTRAP__TRANSIENT_REGISTRY__URL
/// - DOCKYARD__BOOTSTRAP__INTERNAL_REGISTRY__PASSWORD
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BootstrapConfig {
    /// Registry for images pushed during builds. Optional.
    #[serde(default)]
    pub transient_registry: RegistryConfig,
    /// Platform-managed registry for snapshot images. Optional.
    #[serde(default)]
    pub internal_registry: RegistryConfig,
    /// Image offered to every tenant; required once the admin organization is usable.
    #[serde(default)]
    pub default_snapshot: Option<String>,
}

/// Connection settings for one default registry.
///
/// All four values must be present for the registry to be provisioned.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RegistryConfig {
    /// Registry URL; a leading http:// or https:// is stripped before storing.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, alias = "admin")]
    pub username: Option<String>,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
}

impl RegistryConfig {
    /// Names of the settings that are unset or blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let fields = [
            ("url", &self.url),
            ("username", &self.username),
            ("password", &self.password),
            ("project_id", &self.project_id),
        ];
        fields
            .into_iter()
            .filter(|(_, value)| value.as_deref().is_none_or(|v| v.trim().is_empty()))
            .map(|(name, _)| name)
            .collect()
    }
}

pub mod loader {
    use super::{AppConfig, ConfigError};
    use config::{Config, Environment, File};
    use std::path::PathBuf;

    /// Default configuration file, read when no path is given.
    pub const DEFAULT_CONFIG_FILE: &str = "dockyard.toml";

    pub fn load_config(path: Option<&str>) -> Result<AppConfig, ConfigError> {
        let mut builder = Config::builder();
        let pathbuf = PathBuf::from(path.unwrap_or(DEFAULT_CONFIG_FILE));
        if pathbuf.exists() {
            builder = builder.add_source(File::from(pathbuf));
        }
        // Environment variable overrides, e.g., DOCKYARD__SERVER__PORT=9090
        builder = builder.add_source(
            Environment::with_prefix("DOCKYARD")
                .try_parsing(true)
                .separator("__"),
        );
        let merged: AppConfig = builder.build()?.try_deserialize()?;
        merged.validate()?;
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_treats_blank_as_missing() {
        let cfg = RegistryConfig {
            url: Some("https://registry.local".into()),
            username: Some("  ".into()),
            password: None,
            project_id: Some("dockyard".into()),
        };
        assert_eq!(cfg.missing_fields(), vec!["username", "password"]);
        assert_eq!(RegistryConfig::default().missing_fields().len(), 4);
    }

    #[test]
    fn complete_registry_has_no_missing_fields() {
        let cfg = RegistryConfig {
            url: Some("registry.local".into()),
            username: Some("admin".into()),
            password: Some("secret".into()),
            project_id: Some("dockyard".into()),
        };
        assert!(cfg.missing_fields().is_empty());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut cfg = AppConfig::default();
        assert!(cfg.validate().is_ok());

        cfg.logging.level = "loud".into();
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));

        cfg.logging.level = "debug".into();
        cfg.server.port = 0;
        let err = cfg.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid configuration: server.port must be > 0"
        );
    }

    #[test]
    fn addr_falls_back_to_unspecified_host() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "not-an-ip".into();
        cfg.server.port = 8081;
        assert_eq!(cfg.addr().to_string(), "0.0.0.0:8081");
    }
}
