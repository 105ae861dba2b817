// Server configuration

use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_MODEL_SERVICE_URL: &str = "http://localhost:8501";
pub const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_CONTENT_LENGTH: usize = 5 * 1024 * 1024;

/// Allowed browser origins for CORS
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

impl CorsOrigins {
    fn parse(value: &str) -> Self {
        let origins: Vec<String> = value
            .split(',')
            .map(|o| o.trim())
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();

        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            CorsOrigins::Any
        } else {
            CorsOrigins::List(origins)
        }
    }
}

impl Default for CorsOrigins {
    fn default() -> Self {
        CorsOrigins::List(vec![
            "http://localhost:3000".to_string(),
            "http://localhost:5173".to_string(),
            "http://localhost:8080".to_string(),
            "http://127.0.0.1:8080".to_string(),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub model_service_url: String,
    pub model_timeout: Duration,
    /// Upper bound on an uploaded image, in bytes
    pub max_content_length: usize,
    pub cors_origins: CorsOrigins,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
            model_service_url: DEFAULT_MODEL_SERVICE_URL.to_string(),
            model_timeout: Duration::from_secs(DEFAULT_MODEL_TIMEOUT_SECS),
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            cors_origins: CorsOrigins::default(),
        }
    }
}

impl ServerConfig {
    /// Read the process environment (after `.env` has been loaded)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; malformed values keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or(lookup("PORT"), DEFAULT_PORT);
        let bind_addr = format!("{}:{}", host.trim(), port)
            .parse()
            .unwrap_or_else(|_| {
                tracing::warn!(host = %host, port, "Invalid bind address, using default");
                defaults.bind_addr
            });

        Self {
            bind_addr,
            model_service_url: lookup("MODEL_SERVICE_URL")
                .map(|u| u.trim().to_string())
                .filter(|u| !u.is_empty())
                .unwrap_or(defaults.model_service_url),
            model_timeout: Duration::from_secs(parse_or(
                lookup("MODEL_TIMEOUT_SECS"),
                DEFAULT_MODEL_TIMEOUT_SECS,
            )),
            max_content_length: parse_or(lookup("MAX_CONTENT_LENGTH"), DEFAULT_MAX_CONTENT_LENGTH),
            cors_origins: lookup("CORS_ORIGINS")
                .map(|v| CorsOrigins::parse(&v))
                .unwrap_or(defaults.cors_origins),
        }
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
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
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(|_| None);
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_addr.port(), 5000);
        assert_eq!(config.max_content_length, 5 * 1024 * 1024);
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "8000"),
            ("MODEL_SERVICE_URL", "http://model:9000"),
            ("MODEL_TIMEOUT_SECS", "5"),
            ("MAX_CONTENT_LENGTH", "1024"),
            ("CORS_ORIGINS", "https://a.example, https://b.example"),
        ]));
        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:8000");
        assert_eq!(config.model_service_url, "http://model:9000");
        assert_eq!(config.model_timeout, Duration::from_secs(5));
        assert_eq!(config.max_content_length, 1024);
        assert_eq!(
            config.cors_origins,
            CorsOrigins::List(vec![
                "https://a.example".to_string(),
                "https://b.example".to_string()
            ])
        );
    }

    #[test]
    fn test_malformed_values_fall_back() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("PORT", "eighty"),
            ("MAX_CONTENT_LENGTH", "-1"),
            ("HOST", "not a host"),
        ]));
        assert_eq!(config.bind_addr.port(), 5000);
        assert_eq!(config.max_content_length, DEFAULT_MAX_CONTENT_LENGTH);
    }

    #[test]
    fn test_wildcard_cors() {
        let config = ServerConfig::from_lookup(lookup(&[("CORS_ORIGINS", "*")]));
        assert_eq!(config.cors_origins, CorsOrigins::Any);
    }
}
