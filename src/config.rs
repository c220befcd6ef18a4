use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConstellationResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend_url: String,
    pub poll_interval_ms: u64,
    pub mock_port: u16,
    pub constellation_radius: f64,
    pub query_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8000".to_string(),
            poll_interval_ms: 3000,
            mock_port: 8000,
            constellation_radius: 4.0,
            query_delay_ms: 1000,
        }
    }
}

fn env_parsed<T: FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring unparsable {}={}", key, raw);
            None
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    pub fn from_file(path: impl AsRef<Path>) -> ConstellationResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// File values (if a path is given), then environment overrides.
    pub fn load(path: Option<&Path>) -> ConstellationResult<Self> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(base.with_env_overrides())
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("CONSTELLATION_BACKEND_URL") {
            if !url.trim().is_empty() {
                self.backend_url = url.trim().to_string();
            }
        }
        if let Some(interval) = env_parsed("CONSTELLATION_POLL_INTERVAL_MS") {
            self.poll_interval_ms = interval;
        }
        if let Some(port) = env_parsed("CONSTELLATION_MOCK_PORT") {
            self.mock_port = port;
        }
        if let Some(radius) = env_parsed::<f64>("CONSTELLATION_RADIUS") {
            if radius.is_finite() {
                self.constellation_radius = radius;
            }
        }
        self
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn query_delay(&self) -> Duration {
        Duration::from_millis(self.query_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConstellationError;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.backend_url, "http://localhost:8000");
        assert_eq!(config.poll_interval(), Duration::from_secs(3));
        assert_eq!(config.mock_port, 8000);
        assert_eq!(config.constellation_radius, 4.0);
    }

    #[test]
    fn test_from_file_fills_missing_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("constellation.toml");
        std::fs::write(
            &path,
            "backend_url = \"http://agents:9000\"\npoll_interval_ms = 500\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.backend_url, "http://agents:9000");
        assert_eq!(config.poll_interval_ms, 500);
        assert_eq!(config.mock_port, 8000);
        assert_eq!(config.query_delay_ms, 1000);
    }

    #[test]
    fn test_from_file_rejects_bad_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "poll_interval_ms = \"soon\"").unwrap();

        let result = Config::from_file(&path);
        assert!(matches!(result, Err(ConstellationError::ConfigFormat(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let result = Config::from_file(dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConstellationError::Io(_))));
    }

    #[test]
    fn test_zero_interval_clamped() {
        let config = Config {
            poll_interval_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.poll_interval(), Duration::from_millis(1));
    }
}
