use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub shop: ShopConfig,
    pub pdf: PdfConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// `postgres://...` or `memory://`
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Insert the default price list when the catalog is empty
    #[serde(default)]
    pub seed_catalog: bool,
}

fn default_max_connections() -> u32 { 5 }

/// Letterhead printed on receipts and reports
#[derive(Debug, Deserialize, Clone)]
pub struct ShopConfig {
    pub name: String,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub address_lines: Vec<String>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_currency_symbol() -> String { "$".into() }

#[derive(Debug, Deserialize, Clone)]
pub struct PdfConfig {
    pub font_dir: String,
    pub font_family: String,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Optional per-environment overrides
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Never checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `PRINTPILOT__DATABASE__URL=memory://`
            .add_source(config::Environment::with_prefix("PRINTPILOT").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
