use std::net::SocketAddr;

use thiserror::Error;

const DEFAULT_TOKEN_TTL_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid listen address {0}")]
    InvalidAddr(String),
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_seconds: u64,
}

/// Remote activity-log sink. `url: None` turns the logger into a no-op.
#[derive(Debug, Clone, Default)]
pub struct ActivityLogConfig {
    pub url: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt: JwtConfig,
    pub activity_log: ActivityLogConfig,
    pub webhook_url: Option<String>,
    pub host: String,
    pub port: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = get("POSTGRES_DSN")
            .or_else(|| get("DATABASE_URL"))
            .ok_or(ConfigError::Missing("POSTGRES_DSN"))?;
        let secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let jwt = JwtConfig {
            secret,
            ttl_seconds: get("TOKEN_TTL")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(DEFAULT_TOKEN_TTL_SECS),
        };

        Ok(Self {
            database_url,
            db_max_connections: get("DB_MAX_CONNECTIONS")
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(10),
            jwt,
            activity_log: ActivityLogConfig {
                url: get("ACTIVITY_LOG_URL"),
                token: get("ACTIVITY_LOG_TOKEN"),
            },
            webhook_url: get("WEBHOOK_URL"),
            host: get("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: get("PORT")
                .or_else(|| get("APP_PORT"))
                .unwrap_or_else(|| "8080".into()),
        })
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse().map_err(|_| ConfigError::InvalidAddr(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn requires_dsn_and_secret() {
        let err = AppConfig::from_lookup(lookup(&[("JWT_SECRET", "s")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("POSTGRES_DSN")));

        let err = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://x")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));
    }

    #[test]
    fn empty_values_are_unset() {
        let err = AppConfig::from_lookup(lookup(&[
            ("POSTGRES_DSN", ""),
            ("DATABASE_URL", "  "),
            ("JWT_SECRET", "s"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("POSTGRES_DSN")));
    }

    #[test]
    fn postgres_dsn_wins_over_database_url() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("POSTGRES_DSN", "postgres://primary"),
            ("DATABASE_URL", "postgres://fallback"),
            ("JWT_SECRET", "s"),
        ]))
        .unwrap();
        assert_eq!(cfg.database_url, "postgres://primary");
    }

    #[test]
    fn defaults_apply() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db"),
            ("JWT_SECRET", "s"),
            ("TOKEN_TTL", "soon"),
        ]))
        .unwrap();
        assert_eq!(cfg.jwt.ttl_seconds, 86_400);
        assert_eq!(cfg.db_max_connections, 10);
        assert!(cfg.activity_log.url.is_none());
        assert!(cfg.webhook_url.is_none());
        assert_eq!(cfg.listen_addr().unwrap().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn port_overrides_app_port() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db"),
            ("JWT_SECRET", "s"),
            ("APP_HOST", "127.0.0.1"),
            ("APP_PORT", "3000"),
            ("PORT", "9090"),
            ("TOKEN_TTL", "60"),
        ]))
        .unwrap();
        assert_eq!(cfg.jwt.ttl_seconds, 60);
        assert_eq!(cfg.listen_addr().unwrap().to_string(), "127.0.0.1:9090");
    }

    #[test]
    fn bad_listen_addr_is_reported() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db"),
            ("JWT_SECRET", "s"),
            ("APP_PORT", "not-a-port"),
        ]))
        .unwrap();
        assert!(matches!(cfg.listen_addr(), Err(ConfigError::InvalidAddr(_))));
    }
}
