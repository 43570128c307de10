//! Application configuration loaded from environment variables.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// Every field has a default, so the service starts with no environment at all.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Server Configuration ===
    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Deployment environment name (NODE_ENV).
    #[serde(default = "default_node_env")]
    pub node_env: String,

    // === Application Identity ===
    /// Application version string (APP_VERSION).
    #[serde(default = "default_app_version")]
    pub app_version: String,

    // === Orchestration Context ===
    /// Kubernetes namespace the pod runs in.
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Kubernetes pod name.
    #[serde(default = "default_pod_name")]
    pub pod_name: String,

    /// Kubernetes node name.
    #[serde(default = "default_node_name")]
    pub node_name: String,

    // === Logging ===
    /// Log level filter (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,
}

fn default_port() -> u16 {
    3000
}

fn default_node_env() -> String {
    "development".to_string()
}

fn default_app_version() -> String {
    "1.0.0".to_string()
}

fn default_namespace() -> String {
    "default".to_string()
}

fn default_pod_name() -> String {
    "unknown".to_string()
}

fn default_node_name() -> String {
    "unknown".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if running in a production-like environment.
    pub fn is_production(&self) -> bool {
        self.node_env == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            node_env: default_node_env(),
            app_version: default_app_version(),
            namespace: default_namespace(),
            pod_name: default_pod_name(),
            node_name: default_node_name(),
            rust_log: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_values_are_sensible() {
        assert_eq!(default_port(), 3000);
        assert_eq!(default_node_env(), "development");
        assert_eq!(default_app_version(), "1.0.0");
        assert_eq!(default_namespace(), "default");
        assert_eq!(default_pod_name(), "unknown");
        assert_eq!(default_node_name(), "unknown");
    }

    #[test]
    fn default_config_is_not_production() {
        let config = Config::default();
        assert!(!config.is_production());
    }

    #[test]
    fn production_env_is_detected() {
        let config = Config {
            node_env: "production".to_string(),
            ..Config::default()
        };
        assert!(config.is_production());
    }
}
