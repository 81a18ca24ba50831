//! Application settings loaded from environment variables.

use std::env;
use std::fmt;
use std::str::FromStr;

use super::constants::{
    DEFAULT_APP_NAMESPACE, DEFAULT_CULTURE, DEFAULT_FLASH_TTL_SECONDS, DEFAULT_LOCALES_DIR,
    DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEFAULT_THEME,
};

/// Whether pages must be served over HTTPS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpsRequirement {
    /// Plain HTTP requests are redirected to HTTPS
    Yes,
    /// HTTPS requests are redirected to plain HTTP
    No,
    /// Both schemes are served as-is
    #[default]
    Ignore,
}

impl FromStr for HttpsRequirement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "true" | "required" => Ok(HttpsRequirement::Yes),
            "no" | "false" => Ok(HttpsRequirement::No),
            "ignore" | "" => Ok(HttpsRequirement::Ignore),
            other => Err(format!("unknown HTTPS requirement '{}'", other)),
        }
    }
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub app_namespace: String,
    pub default_culture: String,
    pub locales_dir: String,
    pub redis_url: Option<String>,
    pub flash_ttl_seconds: u64,
    pub https_requirement: HttpsRequirement,
    pub default_theme: String,
    pub server_host: String,
    pub server_port: u16,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("app_namespace", &self.app_namespace)
            .field("default_culture", &self.default_culture)
            .field("locales_dir", &self.locales_dir)
            .field("redis_url", &self.redis_url.as_ref().map(|_| "[REDACTED]"))
            .field("flash_ttl_seconds", &self.flash_ttl_seconds)
            .field("https_requirement", &self.https_requirement)
            .field("default_theme", &self.default_theme)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_namespace: DEFAULT_APP_NAMESPACE.to_string(),
            default_culture: DEFAULT_CULTURE.to_string(),
            locales_dir: DEFAULT_LOCALES_DIR.to_string(),
            redis_url: None,
            flash_ttl_seconds: DEFAULT_FLASH_TTL_SECONDS,
            https_requirement: HttpsRequirement::default(),
            default_theme: DEFAULT_THEME.to_string(),
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable values fall back to the defaults in
    /// [`crate::config`]. `REDIS_URL` is optional; without it the flash
    /// store is kept in process memory.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let https_requirement = match env::var("HTTPS_REQUIREMENT") {
            Ok(value) => value.parse().unwrap_or_else(|e| {
                tracing::warn!("{}, falling back to 'ignore'", e);
                HttpsRequirement::Ignore
            }),
            Err(_) => defaults.https_requirement,
        };

        Self {
            app_namespace: env::var("APP_NAMESPACE").unwrap_or(defaults.app_namespace),
            default_culture: env::var("DEFAULT_CULTURE").unwrap_or(defaults.default_culture),
            locales_dir: env::var("LOCALES_DIR").unwrap_or(defaults.locales_dir),
            redis_url: env::var("REDIS_URL").ok().filter(|url| !url.trim().is_empty()),
            flash_ttl_seconds: flash_ttl_from(
                env::var("FLASH_TTL_SECONDS").ok().as_deref(),
                defaults.flash_ttl_seconds,
            ),
            https_requirement,
            default_theme: env::var("DEFAULT_THEME").unwrap_or(defaults.default_theme),
            server_host: env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
        }
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

/// Flash TTL in whole seconds; zero or unparsable values fall back to
/// `default`.
fn flash_ttl_from(value: Option<&str>, default: u64) -> u64 {
    let Some(value) = value else {
        return default;
    };

    match value.trim().parse::<u64>() {
        Ok(seconds) if seconds > 0 => seconds,
        _ => {
            tracing::warn!(value = %value, "FLASH_TTL_SECONDS must be a positive integer, using {}", default);
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_https_requirement_parsing() {
        assert_eq!("yes".parse::<HttpsRequirement>(), Ok(HttpsRequirement::Yes));
        assert_eq!("No".parse::<HttpsRequirement>(), Ok(HttpsRequirement::No));
        assert_eq!("".parse::<HttpsRequirement>(), Ok(HttpsRequirement::Ignore));
        assert!("sometimes".parse::<HttpsRequirement>().is_err());
    }

    #[test]
    fn test_debug_redacts_redis_url() {
        let config = Config {
            redis_url: Some("redis://:secret@localhost".to_string()),
            ..Config::default()
        };

        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn test_server_addr() {
        let config = Config::default();
        assert_eq!(config.server_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_flash_ttl_rejects_zero() {
        assert_eq!(flash_ttl_from(None, 300), 300);
        assert_eq!(flash_ttl_from(Some("120"), 300), 120);
        assert_eq!(flash_ttl_from(Some("0"), 300), 300);
        assert_eq!(flash_ttl_from(Some("soon"), 300), 300);
    }
}
