//! Process configuration, read once at startup.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use thiserror::Error;

use empdesk_auth::PrivilegePolicy;
use empdesk_observability::LogFormat;

/// Used when `ACCESS_TOKEN_SECRET` is unset. Never acceptable in production.
pub const DEV_ACCESS_TOKEN_SECRET: &str = "dev-access-token-secret";

const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid {var}={value:?}: {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

#[derive(Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub access_token_secret: String,
    pub database_url: Option<String>,
    pub exclude_fired: bool,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        let host = match get("HOST") {
            Some(v) => parse("HOST", &v)?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };
        let port = match get("PORT") {
            Some(v) => parse("PORT", &v)?,
            None => DEFAULT_PORT,
        };
        let exclude_fired = match get("GATE_EXCLUDE_FIRED") {
            Some(v) => parse_bool("GATE_EXCLUDE_FIRED", &v)?,
            None => false,
        };
        let log_format = match get("LOG_FORMAT") {
            Some(v) => parse("LOG_FORMAT", &v)?,
            None => LogFormat::default(),
        };

        Ok(Self {
            host,
            port,
            access_token_secret: get("ACCESS_TOKEN_SECRET")
                .unwrap_or_else(|| DEV_ACCESS_TOKEN_SECRET.to_string()),
            database_url: get("DATABASE_URL"),
            exclude_fired,
            log_format,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn privilege_policy(&self) -> PrivilegePolicy {
        PrivilegePolicy {
            exclude_fired: self.exclude_fired,
        }
    }

    pub fn using_dev_secret(&self) -> bool {
        self.access_token_secret == DEV_ACCESS_TOKEN_SECRET
    }
}

impl core::fmt::Debug for Config {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("access_token_secret", &"<redacted>")
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("exclude_fired", &self.exclude_fired)
            .field("log_format", &self.log_format)
            .finish()
    }
}

fn parse<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: core::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError {
        var,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError {
            var,
            value: value.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults() {
        let c = config(&[]).unwrap();
        assert_eq!(c.socket_addr(), "0.0.0.0:5000".parse().unwrap());
        assert!(c.using_dev_secret());
        assert!(c.database_url.is_none());
        assert!(!c.privilege_policy().exclude_fired);
        assert_eq!(c.log_format, LogFormat::Json);
    }

    #[test]
    fn reads_overrides() {
        let c = config(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8081"),
            ("ACCESS_TOKEN_SECRET", "s3cret"),
            ("DATABASE_URL", "postgres://localhost/empdesk"),
            ("GATE_EXCLUDE_FIRED", "TRUE"),
            ("LOG_FORMAT", "pretty"),
        ])
        .unwrap();

        assert_eq!(c.socket_addr(), "127.0.0.1:8081".parse().unwrap());
        assert!(!c.using_dev_secret());
        assert_eq!(c.database_url.as_deref(), Some("postgres://localhost/empdesk"));
        assert!(c.privilege_policy().exclude_fired);
        assert_eq!(c.log_format, LogFormat::Pretty);
    }

    #[test]
    fn empty_values_are_unset() {
        let c = config(&[("DATABASE_URL", ""), ("ACCESS_TOKEN_SECRET", "  ")]).unwrap();
        assert!(c.database_url.is_none());
        assert!(c.using_dev_secret());
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert_eq!(config(&[("PORT", "http")]).unwrap_err().var, "PORT");
        assert_eq!(config(&[("PORT", "70000")]).unwrap_err().var, "PORT");
        assert_eq!(
            config(&[("GATE_EXCLUDE_FIRED", "maybe")]).unwrap_err().var,
            "GATE_EXCLUDE_FIRED"
        );
    }

    #[test]
    fn debug_hides_secrets() {
        let c = config(&[("ACCESS_TOKEN_SECRET", "s3cret")]).unwrap();
        assert!(!format!("{c:?}").contains("s3cret"));
    }
}
