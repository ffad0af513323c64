use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub graphql: GraphQLConfig,
    pub auth: AuthConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// How long in-flight requests get to finish after a shutdown signal
    pub close_timeout_seconds: u64,
}

#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    pub enabled: bool,
    pub debug: bool,
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct GraphQLConfig {
    pub playground: bool,
    pub log_queries: bool,
}

#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// Require a bearer token on every API request
    pub enabled: bool,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// When false the server runs against the in-memory store
    pub enabled: bool,
    pub url: Option<String>,
    /// Log every SQL statement
    pub log: bool,
    pub max_connections: u32,
    pub acquire_timeout_ms: u64,
    pub migrations_folder: Option<PathBuf>,
}

impl Config {
    /// Load `.env` if present, then read the environment
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load the given env file, then read the environment
    pub fn from_file(path: &Path) -> Result<Self> {
        dotenvy::from_path(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?;
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key/value source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let database_enabled = parse(&get("DATABASE_ENABLED", "false"), "DATABASE_ENABLED")?;
        let database_url = lookup("DATABASE_URL").filter(|url| !url.is_empty());
        if database_enabled && database_url.is_none() {
            anyhow::bail!("DATABASE_URL must be set when DATABASE_ENABLED=true");
        }

        Ok(Config {
            server: ServerConfig {
                host: get("SERVER_HOST", "0.0.0.0"),
                port: parse(&get("SERVER_PORT", "8080"), "SERVER_PORT")?,
                close_timeout_seconds: parse(
                    &get("SERVER_CLOSE_TIMEOUT_SECONDS", "10"),
                    "SERVER_CLOSE_TIMEOUT_SECONDS",
                )?,
            },
            cors: CorsConfig {
                enabled: parse(&get("CORS_ENABLED", "false"), "CORS_ENABLED")?,
                debug: parse(&get("CORS_DEBUG", "false"), "CORS_DEBUG")?,
                allowed_origins: split_list(&get("CORS_ALLOWED_ORIGINS", "")),
            },
            graphql: GraphQLConfig {
                playground: parse(&get("GRAPHQL_PLAYGROUND", "false"), "GRAPHQL_PLAYGROUND")?,
                log_queries: parse(&get("GRAPHQL_LOG_QUERIES", "false"), "GRAPHQL_LOG_QUERIES")?,
            },
            auth: AuthConfig {
                enabled: parse(&get("AUTH_ENABLED", "false"), "AUTH_ENABLED")?,
            },
            database: DatabaseConfig {
                enabled: database_enabled,
                url: database_url,
                log: parse(&get("DATABASE_LOG", "false"), "DATABASE_LOG")?,
                max_connections: parse(
                    &get("DATABASE_MAX_CONNECTIONS", "10"),
                    "DATABASE_MAX_CONNECTIONS",
                )?,
                acquire_timeout_ms: parse(
                    &get("DATABASE_ACQUIRE_TIMEOUT_MS", "30000"),
                    "DATABASE_ACQUIRE_TIMEOUT_MS",
                )?,
                migrations_folder: lookup("DATABASE_MIGRATIONS_FOLDER")
                    .filter(|folder| !folder.is_empty())
                    .map(PathBuf::from),
            },
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn close_timeout(&self) -> Duration {
        Duration::from_secs(self.server.close_timeout_seconds)
    }
}

fn parse<T>(value: &str, key: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse()
        .with_context(|| format!("{key} has an invalid value: {value:?}"))
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.server_address(), "0.0.0.0:8080");
        assert_eq!(config.close_timeout(), Duration::from_secs(10));
        assert!(!config.cors.enabled);
        assert!(config.cors.allowed_origins.is_empty());
        assert!(!config.graphql.playground);
        assert!(!config.auth.enabled);
        assert!(!config.database.enabled);
        assert_eq!(config.database.max_connections, 10);
        assert!(config.database.migrations_folder.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("SERVER_HOST", "127.0.0.1"),
            ("SERVER_PORT", "3000"),
            ("CORS_ENABLED", "true"),
            ("CORS_ALLOWED_ORIGINS", "http://a.test, http://b.test,"),
            ("GRAPHQL_PLAYGROUND", "true"),
            ("AUTH_ENABLED", "true"),
            ("DATABASE_ENABLED", "true"),
            ("DATABASE_URL", "postgres://localhost/demo"),
            ("DATABASE_MIGRATIONS_FOLDER", "./migrations"),
        ])
        .unwrap();

        assert_eq!(config.server_address(), "127.0.0.1:3000");
        assert_eq!(
            config.cors.allowed_origins,
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
        assert!(config.graphql.playground);
        assert!(config.auth.enabled);
        assert_eq!(
            config.database.url.as_deref(),
            Some("postgres://localhost/demo")
        );
        assert_eq!(
            config.database.migrations_folder,
            Some(PathBuf::from("./migrations"))
        );
    }

    #[test]
    fn test_database_url_required_when_enabled() {
        let err = config_from(&[("DATABASE_ENABLED", "true")]).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn test_invalid_value_names_variable() {
        let err = config_from(&[("SERVER_PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("SERVER_PORT"));
    }
}
