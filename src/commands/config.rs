use crate::Result;
use camino::{Utf8Path, Utf8PathBuf};
use core::time::Duration;
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// Runtime configuration for the collection and analysis pipelines.
///
/// Everything the original scripts held in module-level constants lives here
/// and is passed explicitly into the pipelines.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Base URL of the hosting API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Free-text search query sent to the search endpoint
    #[serde(default = "default_search_query")]
    pub search_query: String,

    /// Maximum number of search result pages to fetch
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Number of repositories requested per search page (1..=100)
    #[serde(default = "default_page_size")]
    pub page_size: u8,

    /// Where the collector writes its output CSV
    #[serde(default = "default_repos_csv")]
    pub repos_csv: Utf8PathBuf,

    /// Timeout for individual API requests
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Timeout for archive downloads
    #[serde(default = "default_download_timeout", with = "humantime_serde")]
    pub download_timeout: Duration,

    /// Fixed delay between release-count probes during enrichment
    #[serde(default = "default_release_probe_delay", with = "humantime_serde")]
    pub release_probe_delay: Duration,

    /// Fixed sleep before the single retry after a rate-limited release probe
    #[serde(default = "default_rate_limit_backoff", with = "humantime_serde")]
    pub rate_limit_backoff: Duration,

    /// Path to the CK jar file
    #[serde(default = "default_ck_jar")]
    pub ck_jar: Utf8PathBuf,

    /// Wall-clock limit for a CK run
    #[serde(default = "default_ck_timeout", with = "humantime_serde")]
    pub ck_timeout: Duration,

    /// Whether CK should look inside dependency jars
    #[serde(default = "default_true")]
    pub ck_use_jars: bool,

    /// CK per-partition file cap (0 lets CK decide)
    #[serde(default)]
    pub ck_max_files_per_partition: u32,

    /// Whether CK should also analyze variables and fields
    #[serde(default)]
    pub ck_variables_and_fields: bool,

    /// Directory names excluded from CK runs and the source-root search
    #[serde(default = "default_ignored_dirs")]
    pub ignored_dirs: Vec<String>,

    /// Where downloaded sources are extracted
    #[serde(default = "default_work_dir")]
    pub work_dir: Utf8PathBuf,

    /// Where CK output CSVs are written, one subdirectory per owner/repo
    #[serde(default = "default_ck_output_dir")]
    pub ck_output_dir: Utf8PathBuf,

    /// Where the running aggregate CSVs are appended
    #[serde(default = "default_aggregate_dir")]
    pub aggregate_dir: Utf8PathBuf,

    /// Remove extracted sources after analysis
    #[serde(default = "default_true")]
    pub cleanup_sources: bool,
}

fn default_api_base_url() -> String {
    "https://api.github.com".to_string()
}

fn default_search_query() -> String {
    "stars:>0".to_string()
}

const fn default_max_pages() -> u32 {
    10
}

const fn default_page_size() -> u8 {
    100
}

fn default_repos_csv() -> Utf8PathBuf {
    Utf8PathBuf::from("repos.csv")
}

const fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

const fn default_download_timeout() -> Duration {
    Duration::from_secs(180)
}

const fn default_release_probe_delay() -> Duration {
    Duration::from_millis(150)
}

const fn default_rate_limit_backoff() -> Duration {
    Duration::from_secs(2)
}

fn default_ck_jar() -> Utf8PathBuf {
    Utf8PathBuf::from("ck.jar")
}

const fn default_ck_timeout() -> Duration {
    Duration::from_secs(1200)
}

const fn default_true() -> bool {
    true
}

fn default_ignored_dirs() -> Vec<String> {
    [
        "build/", "target/", "out/", "bin/", ".git/", ".idea/", ".gradle/", "node_modules/", "vendor/", "dist/", ".mvn/",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

fn default_work_dir() -> Utf8PathBuf {
    Utf8PathBuf::from("work")
}

fn default_ck_output_dir() -> Utf8PathBuf {
    Utf8PathBuf::from("ck_out")
}

fn default_aggregate_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(".")
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str("").expect("empty config must deserialize via field defaults")
    }
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load(config_path: Option<&Utf8PathBuf>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading configuration file '{path}'"))?;
            (path.clone(), text)
        } else {
            // Look for repo-miner.toml in the current directory
            let path = Utf8PathBuf::from("repo-miner.toml");
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    // No config file found, use defaults
                    return Ok(Self::default());
                }
                Err(e) => return Err(e).into_app_err_with(|| format!("reading configuration file '{path}'")),
            }
        };

        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{final_path}'"))?;
        config.validate()?;

        Ok(config)
    }

    /// Save the default configuration to a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        fs::write(output_path, DEFAULT_CONFIG_TOML).into_app_err_with(|| format!("writing default configuration to '{output_path}'"))?;
        Ok(())
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.max_pages == 0 {
            return Err(app_err!("max_pages must be at least 1"));
        }

        if self.page_size == 0 || self.page_size > 100 {
            return Err(app_err!("page_size must be between 1 and 100, got {}", self.page_size));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "https://api.github.com");
        assert_eq!(config.search_query, "stars:>0");
        assert_eq!(config.max_pages, 10);
        assert_eq!(config.page_size, 100);
        assert_eq!(config.repos_csv, Utf8PathBuf::from("repos.csv"));
        assert_eq!(config.release_probe_delay, Duration::from_millis(150));
        assert_eq!(config.rate_limit_backoff, Duration::from_secs(2));
        assert_eq!(config.ck_timeout, Duration::from_secs(1200));
        assert!(config.ck_use_jars);
        assert_eq!(config.ck_max_files_per_partition, 0);
        assert!(!config.ck_variables_and_fields);
        assert!(config.cleanup_sources);
        assert!(config.ignored_dirs.iter().any(|d| d == "node_modules/"));
    }

    #[test]
    fn test_embedded_default_toml_parses() {
        let config: Config = toml::from_str(DEFAULT_CONFIG_TOML).unwrap();
        config.validate().unwrap();
        assert_eq!(config.max_pages, Config::default().max_pages);
    }

    #[test]
    fn test_partial_config() {
        let config: Config = toml::from_str("max_pages = 3\nsearch_query = \"language:java stars:>100\"\n").unwrap();
        assert_eq!(config.max_pages, 3);
        assert_eq!(config.search_query, "language:java stars:>100");
        assert_eq!(config.page_size, 100);
    }

    #[test]
    fn test_humantime_durations() {
        let config: Config = toml::from_str("release_probe_delay = \"150ms\"\nck_timeout = \"20m\"\n").unwrap();
        assert_eq!(config.release_probe_delay, Duration::from_millis(150));
        assert_eq!(config.ck_timeout, Duration::from_secs(1200));
    }

    #[test]
    fn test_validate_rejects_zero_pages() {
        let config: Config = toml::from_str("max_pages = 0\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_oversized_page() {
        let config: Config = toml::from_str("page_size = 101\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: core::result::Result<Config, _> = toml::from_str("no_such_field = 1\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let path = Utf8PathBuf::from("/definitely/not/a/real/repo-miner.toml");
        assert!(Config::load(Some(&path)).is_err());
    }
}
