use std::fmt;
use std::net::SocketAddr;

use anyhow::{Context, Result};

pub const DEFAULT_PORT: &str = "8080";
pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";
pub const DEFAULT_MESSAGING_API_BASE: &str =
    "https://business-api.tiktok.com/open_api/v1/business_messages";
pub const DEFAULT_MARKETING_API_BASE: &str = "https://business-api.tiktok.com/open_api/v1.3";

/// Credentials and listen settings, resolved once at start-up and shared
/// read-only (behind an `Arc`) by every client and handler.
///
/// Empty credentials are accepted; the remote API rejects them at call time.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub client_key: String,
    pub client_secret: String,
    pub access_token: String,
    pub verify_token: String,
    pub port: String,
    pub bind_host: String,
    pub messaging_api_base: String,
    pub marketing_api_base: String,
}

impl Config {
    /// Reads the process environment.
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, fallback: &str| lookup(key).unwrap_or_else(|| fallback.to_string());
        Self {
            client_key: get("CLIENT_KEY", ""),
            client_secret: get("CLIENT_SECRET", ""),
            access_token: get("ACCESS_TOKEN", ""),
            verify_token: get("VERIFY_TOKEN", ""),
            port: get("PORT", DEFAULT_PORT),
            bind_host: get("BIND_HOST", DEFAULT_BIND_HOST),
            messaging_api_base: get("TIKTOK_MESSAGING_API_BASE", DEFAULT_MESSAGING_API_BASE),
            marketing_api_base: get("TIKTOK_MARKETING_API_BASE", DEFAULT_MARKETING_API_BASE),
        }
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.bind_host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.bind_host, self.port))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("client_key", &self.client_key)
            .field("client_secret", &redact(&self.client_secret))
            .field("access_token", &redact(&self.access_token))
            .field("verify_token", &redact(&self.verify_token))
            .field("port", &self.port)
            .field("bind_host", &self.bind_host)
            .field("messaging_api_base", &self.messaging_api_base)
            .field("marketing_api_base", &self.marketing_api_base)
            .finish()
    }
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() { "<unset>" } else { "<redacted>" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let cfg = Config::default();
        assert_eq!(cfg.port, "8080");
        assert_eq!(cfg.client_key, "");
        assert_eq!(cfg.access_token, "");
        assert_eq!(cfg.verify_token, "");
        assert_eq!(cfg.messaging_api_base, DEFAULT_MESSAGING_API_BASE);
        assert_eq!(cfg.marketing_api_base, DEFAULT_MARKETING_API_BASE);
        assert_eq!(cfg.listen_addr().unwrap(), "0.0.0.0:8080".parse().unwrap());
    }

    #[test]
    fn reads_all_variables() {
        let cfg = Config::from_lookup(lookup_from(&[
            ("CLIENT_KEY", "ck"),
            ("CLIENT_SECRET", "cs"),
            ("ACCESS_TOKEN", "at"),
            ("VERIFY_TOKEN", "vt"),
            ("PORT", "9000"),
            ("BIND_HOST", "127.0.0.1"),
        ]));
        assert_eq!(cfg.client_key, "ck");
        assert_eq!(cfg.client_secret, "cs");
        assert_eq!(cfg.access_token, "at");
        assert_eq!(cfg.verify_token, "vt");
        assert_eq!(cfg.listen_addr().unwrap(), "127.0.0.1:9000".parse().unwrap());
    }

    #[test]
    fn invalid_port_is_rejected() {
        let cfg = Config::from_lookup(lookup_from(&[("PORT", "http")]));
        let err = cfg.listen_addr().unwrap_err();
        assert!(err.to_string().contains("0.0.0.0:http"));
    }

    #[test]
    fn debug_output_hides_secrets() {
        let cfg = Config::from_lookup(lookup_from(&[
            ("ACCESS_TOKEN", "super-secret"),
            ("VERIFY_TOKEN", "hush"),
        ]));
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(!rendered.contains("hush"));
        assert!(rendered.contains("<redacted>"));
    }
}
