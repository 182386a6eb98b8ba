//! API server configuration, read from the environment after `.env` is loaded

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use anyhow::{anyhow, Result};

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Which `EmployeeStore` backs the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(format!("unknown store backend '{}'", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("unknown log format '{}'", s)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreBackend,
    /// Required when `store` is Postgres (env: DATABASE_URL)
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub host: IpAddr,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let store = parse_or("EMPLOYEE_STORE", &lookup, StoreBackend::Postgres)?;
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        if store == StoreBackend::Postgres && database_url.is_none() {
            return Err(anyhow!("DATABASE_URL must be set when EMPLOYEE_STORE=postgres"));
        }

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_else(|| vec![DEFAULT_CORS_ORIGIN.to_string()]);

        Ok(Self {
            store,
            database_url,
            max_connections: parse_or("DB_MAX_CONNECTIONS", &lookup, DEFAULT_MAX_CONNECTIONS)?,
            host: parse_or("API_HOST", &lookup, IpAddr::V4(Ipv4Addr::UNSPECIFIED))?,
            port: parse_or("API_PORT", &lookup, DEFAULT_PORT)?,
            cors_allowed_origins,
            log_format: parse_or("LOG_FORMAT", &lookup, LogFormat::Pretty)?,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn database_url(&self) -> Result<&str> {
        self.database_url
            .as_deref()
            .ok_or_else(|| anyhow!("DATABASE_URL must be set"))
    }
}

fn parse_or<T>(key: &str, lookup: &impl Fn(&str) -> Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|err| anyhow!("invalid value for {key}: '{raw}' ({err})")),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults_with_database_url() {
        let config = config_from(&[("DATABASE_URL", "postgres://localhost/employees")]).unwrap();
        assert_eq!(config.store, StoreBackend::Postgres);
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:3001");
        assert_eq!(config.cors_allowed_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.database_url().unwrap(), "postgres://localhost/employees");
    }

    #[test]
    fn test_postgres_requires_database_url() {
        let err = config_from(&[]).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn test_memory_store_needs_no_database() {
        let config = config_from(&[("EMPLOYEE_STORE", "memory"), ("API_PORT", "8080")]).unwrap();
        assert_eq!(config.store, StoreBackend::Memory);
        assert_eq!(config.port, 8080);
        assert!(config.database_url().is_err());
    }

    #[test]
    fn test_invalid_value_names_the_variable() {
        let err = config_from(&[("EMPLOYEE_STORE", "memory"), ("API_PORT", "eighty")]).unwrap_err();
        assert!(format!("{err:#}").contains("API_PORT"));
    }

    #[test]
    fn test_cors_origins_are_split_and_trimmed() {
        let config = config_from(&[
            ("EMPLOYEE_STORE", "memory"),
            ("CORS_ALLOWED_ORIGINS", "http://a.test, https://b.test ,"),
            ("LOG_FORMAT", "json"),
        ])
        .unwrap();
        assert_eq!(config.cors_allowed_origins, vec!["http://a.test", "https://b.test"]);
        assert_eq!(config.log_format, LogFormat::Json);
    }
}
