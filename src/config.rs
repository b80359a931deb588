//! Environment configuration. Loaded once at startup into an immutable
//! snapshot; handlers and background tasks share it through `Arc`.

use crate::error::ConfigError;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    /// Expected value of the `APIKey` request header.
    pub api_key: String,
    /// Cooperative ids allowed to use the API. Empty list rejects everything.
    pub allowed_cooperatives: Vec<String>,
    /// Artificial delay before the conditional write of each code field.
    /// Widens the allocation race window on purpose for downstream testing.
    pub customer_delay: Duration,
    pub vendor_delay: Duration,
    pub sales_delay: Duration,
    /// Delivery document TTL for the expiration sweeper.
    pub expiration_ttl_seconds: i64,
}

impl AppConfig {
    /// Read configuration from the environment (a `.env` file is honored if
    /// present). Fails on missing `DATABASE_URL`/`API_KEY` or unparseable
    /// numeric values.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        Ok(AppConfig {
            database_url: require("DATABASE_URL")?,
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8001".into()),
            api_key: require("API_KEY")?,
            allowed_cooperatives: parse_list(
                &std::env::var("ALLOWED_COOPERATIVES").unwrap_or_default(),
            ),
            customer_delay: Duration::from_secs(seconds("CUSTOMER_TIME_SECONDS", 0)?),
            vendor_delay: Duration::from_secs(seconds("VENDOR_TIME_SECONDS", 0)?),
            sales_delay: Duration::from_secs(seconds("SALES_TIME_SECONDS", 0)?),
            expiration_ttl_seconds: seconds("EXPIRATION_TIME_SECONDS", 3600)? as i64,
        })
    }

    pub fn coop_allowed(&self, coop_id: &str) -> bool {
        self.allowed_cooperatives.iter().any(|c| c == coop_id)
    }
}

fn require(var: &'static str) -> Result<String, ConfigError> {
    std::env::var(var).map_err(|_| ConfigError::MissingVar(var))
}

fn seconds(var: &'static str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(var) {
        Err(_) => Ok(default),
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { var, value: raw }),
    }
}

/// Comma-separated list; entries are trimmed and empties dropped.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_coops(raw: &str) -> AppConfig {
        AppConfig {
            database_url: "postgres://localhost/erp".into(),
            bind_addr: "0.0.0.0:8001".into(),
            api_key: "secret".into(),
            allowed_cooperatives: parse_list(raw),
            customer_delay: Duration::ZERO,
            vendor_delay: Duration::ZERO,
            sales_delay: Duration::ZERO,
            expiration_ttl_seconds: 3600,
        }
    }

    #[test]
    fn list_parsing_trims_and_drops_empties() {
        assert_eq!(parse_list("coop1, coop2 ,,coop3"), vec!["coop1", "coop2", "coop3"]);
        assert!(parse_list("").is_empty());
        assert!(parse_list(" , ").is_empty());
    }

    #[test]
    fn coop_allow_list_is_exact_match() {
        let config = config_with_coops("coop1,coop2");
        assert!(config.coop_allowed("coop1"));
        assert!(!config.coop_allowed("coop"));
        assert!(!config.coop_allowed("coop12"));
    }

    #[test]
    fn empty_allow_list_rejects_all() {
        let config = config_with_coops("");
        assert!(!config.coop_allowed("coop1"));
    }
}
