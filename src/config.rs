//! Runtime configuration utilities for fred-macro.

use std::{
    env, fmt,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;

pub const DEFAULT_BASE_URL: &str = "https://api.stlouisfed.org/fred";

/// Application configuration resolved from `.env` and defaults.
#[derive(Clone)]
pub struct Settings {
    /// FRED API key; only commands that hit the network require it.
    pub fred_api_key: Option<String>,
    pub fred_base_url: String,
    /// Upper bound on a single provider request.
    pub fetch_timeout: Duration,
    /// Attempts per series; 1 means no retry.
    pub max_attempts: u32,
    /// Series requested concurrently.
    pub fetch_concurrency: usize,
    /// Root folder for cached raw observations.
    pub data_dir: PathBuf,
    /// Root folder for dashboard artefacts.
    pub outputs_dir: PathBuf,
    /// Optional TOML catalog overriding the built-in indicator set.
    pub catalog_path: Option<PathBuf>,
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let fred_api_key = env::var("FRED_API_KEY").ok().filter(|key| !key.is_empty());
        let fred_base_url =
            env::var("FRED_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let fetch_timeout = Duration::from_secs(parse_env("FRED_TIMEOUT_SECS", 30));
        let max_attempts = parse_env("FRED_MAX_ATTEMPTS", 1u32).max(1);
        let fetch_concurrency = parse_env("FETCH_CONCURRENCY", 2usize).max(1);
        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));
        let outputs_dir = env::var("OUTPUTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./outputs"));
        let catalog_path = env::var("MACRO_CONFIG").ok().map(PathBuf::from);

        std::fs::create_dir_all(&data_dir).context("creating data dir")?;
        std::fs::create_dir_all(&outputs_dir).context("creating outputs dir")?;

        Ok(Self {
            fred_api_key,
            fred_base_url,
            fetch_timeout,
            max_attempts,
            fetch_concurrency,
            data_dir,
            outputs_dir,
            catalog_path,
        })
    }

    /// Convenience helper for derived path segments.
    pub fn join_data<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.data_dir.join(path)
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("fred_api_key", &self.fred_api_key.as_ref().map(|_| "<redacted>"))
            .field("fred_base_url", &self.fred_base_url)
            .field("fetch_timeout", &self.fetch_timeout)
            .field("max_attempts", &self.max_attempts)
            .field("fetch_concurrency", &self.fetch_concurrency)
            .field("data_dir", &self.data_dir)
            .field("outputs_dir", &self.outputs_dir)
            .field("catalog_path", &self.catalog_path)
            .finish()
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_the_key() {
        let settings = Settings {
            fred_api_key: Some("abcdef0123456789".into()),
            fred_base_url: DEFAULT_BASE_URL.into(),
            fetch_timeout: Duration::from_secs(30),
            max_attempts: 1,
            fetch_concurrency: 2,
            data_dir: "./data".into(),
            outputs_dir: "./outputs".into(),
            catalog_path: None,
        };
        let shown = format!("{settings:?}");
        assert!(!shown.contains("abcdef"));
        assert!(shown.contains("<redacted>"));
        assert_eq!(settings.join_data("raw"), PathBuf::from("./data/raw"));
    }
}
