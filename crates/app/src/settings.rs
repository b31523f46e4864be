//! Settings of the application.
//!
//! Read from `config/pocketpal.toml` (or the file named by
//! `POCKETPAL_CONFIG`) and overridden by `POCKETPAL__<SECTION>__<KEY>`
//! environment variables, e.g. `POCKETPAL__SERVER__PORT=8080`.

use config::{Config, ConfigError, Environment, File};
use payment_gateway::RazorpayConfig;
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "config/pocketpal";

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub database: Database,
    pub bind: Option<String>,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub server: Option<Server>,
    pub payment: Option<RazorpayConfig>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let path =
            std::env::var("POCKETPAL_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::from_builder(
            Config::builder()
                .add_source(File::with_name(&path).required(false))
                .add_source(Environment::with_prefix("POCKETPAL").separator("__")),
        )
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn parse(toml: &str) -> Settings {
        Settings::from_builder(
            Config::builder().add_source(File::from_str(toml, FileFormat::Toml)),
        )
        .unwrap()
    }

    #[test]
    fn empty_config_has_defaults() {
        let settings = parse("");
        assert_eq!(settings.app.level, "info");
        assert!(settings.server.is_none());
        assert!(settings.payment.is_none());
    }

    #[test]
    fn server_and_payment_sections_are_read() {
        let settings = parse(
            r#"
            [app]
            level = "debug"

            [server]
            database = { sqlite = "data.db" }
            port = 8080

            [payment]
            base_url = "https://gateway.test/v1"
            key_id = "id"
            key_secret = "secret"
            "#,
        );
        let server = settings.server.unwrap();
        assert!(matches!(server.database, Database::Sqlite(ref path) if path == "data.db"));
        assert_eq!(server.port, 8080);
        assert_eq!(server.bind, None);
        assert_eq!(settings.payment.unwrap().key_id, "id");
    }

    #[test]
    fn memory_database_is_a_plain_string() {
        let settings = parse(
            r#"
            [server]
            database = "memory"
            port = 3000
            "#,
        );
        assert!(matches!(
            settings.server.unwrap().database,
            Database::Memory
        ));
    }
}
