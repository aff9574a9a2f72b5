use std::{collections::HashMap, path::PathBuf, str::FromStr};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub extractor: ExtractorConfig,
    pub runtime: RuntimeConfig,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// `None` allows any origin.
    pub cors_origins: Option<Vec<String>>,
}

#[derive(Clone, Debug)]
pub struct ExtractorConfig {
    pub ytdlp_path: PathBuf,
    pub timeout_secs: u64,
    pub instagram_cookies: Option<PathBuf>,
    pub facebook_cookies: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    pub download_dir: PathBuf,
    pub queue_capacity: usize,
    pub worker_concurrency: usize,
    /// How long finished task records stay queryable. Zero keeps them forever.
    pub task_ttl_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars().collect())
    }

    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        info!("Building AppConfig...");
        let get = |key: &str| vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

        let config = AppConfig {
            server: ServerConfig {
                host: get("HOST").unwrap_or("0.0.0.0").to_string(),
                port: parse_or(get("PORT"), "PORT", 5000)?,
                cors_origins: parse_origins(get("CORS_ORIGINS").unwrap_or("*")),
            },
            extractor: ExtractorConfig {
                ytdlp_path: PathBuf::from(get("YTDLP_PATH").unwrap_or("yt-dlp")),
                timeout_secs: parse_or(get("EXTRACTOR_TIMEOUT_SECS"), "EXTRACTOR_TIMEOUT_SECS", 60)?,
                instagram_cookies: get("INSTAGRAM_COOKIES").map(PathBuf::from),
                facebook_cookies: get("FACEBOOK_COOKIES").map(PathBuf::from),
            },
            runtime: RuntimeConfig {
                download_dir: PathBuf::from(get("DOWNLOAD_DIR").unwrap_or("downloads")),
                queue_capacity: parse_or(get("QUEUE_CAPACITY"), "QUEUE_CAPACITY", 100)?,
                worker_concurrency: parse_or(get("WORKER_CONCURRENCY"), "WORKER_CONCURRENCY", 2)?,
                task_ttl_secs: parse_or(get("TASK_TTL_SECS"), "TASK_TTL_SECS", 3600)?,
            },
        };
        info!("AppConfig built");

        Ok(config)
    }
}

fn parse_or<T: FromStr>(value: Option<&str>, key: &'static str, default: T) -> Result<T, ConfigError> {
    match value {
        Some(value) => value.parse::<T>().map_err(|_| ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }),
        None => Ok(default),
    }
}

fn parse_origins(value: &str) -> Option<Vec<String>> {
    let origins: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        None
    } else {
        Some(origins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_vars(HashMap::new()).unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.server.cors_origins.is_none());
        assert_eq!(config.extractor.ytdlp_path, PathBuf::from("yt-dlp"));
        assert_eq!(config.extractor.timeout_secs, 60);
        assert!(config.extractor.instagram_cookies.is_none());
        assert_eq!(config.runtime.download_dir, PathBuf::from("downloads"));
        assert_eq!(config.runtime.queue_capacity, 100);
        assert_eq!(config.runtime.worker_concurrency, 2);
        assert_eq!(config.runtime.task_ttl_secs, 3600);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_vars(vars(&[
            ("PORT", "8080"),
            ("CORS_ORIGINS", "https://a.example, https://b.example"),
            ("INSTAGRAM_COOKIES", "/secrets/ig.txt"),
            ("FACEBOOK_COOKIES", "  "),
            ("WORKER_CONCURRENCY", "4"),
            ("TASK_TTL_SECS", "0"),
        ]))
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(
            config.server.cors_origins,
            Some(vec!["https://a.example".to_string(), "https://b.example".to_string()])
        );
        assert_eq!(config.extractor.instagram_cookies, Some(PathBuf::from("/secrets/ig.txt")));
        assert!(config.extractor.facebook_cookies.is_none());
        assert_eq!(config.runtime.worker_concurrency, 4);
        assert_eq!(config.runtime.task_ttl_secs, 0);
    }

    #[test]
    fn test_invalid_number() {
        let err = AppConfig::from_vars(vars(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "PORT", .. }));
    }
}
