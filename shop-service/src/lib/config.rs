use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub bootstrap_admin: Option<BootstrapAdminConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct JwtConfig {
    /// Signing secret. Empty selects `auth::INSECURE_DEFAULT_SECRET`.
    #[serde(default)]
    pub secret: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    /// Deadline for credential store lookups during login.
    #[serde(default = "default_lookup_timeout_ms")]
    pub lookup_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            lookup_timeout_ms: default_lookup_timeout_ms(),
        }
    }
}

/// Admin account created at startup if its username is not taken yet.
#[derive(Debug, Deserialize, Clone)]
pub struct BootstrapAdminConfig {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: Option<String>,
}

fn default_max_connections() -> u32 {
    5
}

fn default_lookup_timeout_ms() -> u64 {
    5000
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. JWT_SECRET, as an alias for jwt.secret
    /// 2. Environment variables (DATABASE__URL, SERVER__HTTP_PORT, etc.)
    /// 3. Environment-specific config file (config/{environment}.toml)
    /// 4. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .set_override_option("jwt.secret", env::var("JWT_SECRET").ok())?
            // Example: DATABASE__URL=postgres://... overrides database.url
            .add_source(Environment::default().separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn parse(toml: &str) -> Config {
        ConfigBuilder::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .and_then(|c| c.try_deserialize())
            .unwrap()
    }

    const MINIMAL: &str = r#"
        [database]
        url = "postgres://localhost/shop"

        [server]
        http_port = 3000

        [jwt]
        secret = ""
    "#;

    #[test]
    fn test_defaults_apply() {
        let config = parse(MINIMAL);

        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.store.lookup_timeout_ms, 5000);
        assert!(config.jwt.secret.is_empty());
        assert!(config.bootstrap_admin.is_none());
    }

    #[test]
    fn test_bootstrap_admin_first_name_is_optional() {
        let config = parse(&format!(
            "{MINIMAL}\n[bootstrap_admin]\nusername = \"root\"\nemail = \"root@example.com\"\npassword = \"rootpass123\"\n"
        ));

        let admin = config.bootstrap_admin.unwrap();
        assert_eq!(admin.username, "root");
        assert_eq!(admin.first_name, None);
    }
}
