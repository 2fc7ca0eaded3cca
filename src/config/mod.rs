//! Configuration management.
//!
//! Settings come from built-in defaults, an optional TOML file and environment
//! variables such as `PAPERS_FETCHER_PUBMED__EMAIL` (nested keys separated by `__`):
//!
//! ```toml
//! [pubmed]
//! base_url = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils"
//! api_key = "your-ncbi-key"
//! email = "you@example.com"
//! timeout_secs = 10
//!
//! [output]
//! default_max_results = 10
//! list_separator = "; "
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name searched for by [`find_config_file`]
pub const CONFIG_FILE_NAME: &str = "papers-fetcher.toml";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// PubMed E-utilities settings
    #[serde(default)]
    pub pubmed: PubMedConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// PubMed E-utilities settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PubMedConfig {
    /// Base URL of the E-utilities endpoints (without trailing slash)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// NCBI API key (optional, raises the request quota)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Tool name reported to NCBI
    #[serde(default = "default_tool")]
    pub tool: String,

    /// Contact email reported to NCBI
    #[serde(default)]
    pub email: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for PubMedConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            tool: default_tool(),
            email: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://eutils.ncbi.nlm.nih.gov/entrez/eutils".to_string()
}

fn default_tool() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

fn default_timeout_secs() -> u64 {
    crate::utils::DEFAULT_TIMEOUT_SECS
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Result count used when none is given on the command line
    #[serde(default = "default_max_results")]
    pub default_max_results: usize,

    /// Separator used when joining author and affiliation lists
    #[serde(default = "default_list_separator")]
    pub list_separator: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_max_results: default_max_results(),
            list_separator: default_list_separator(),
        }
    }
}

fn default_max_results() -> usize {
    10
}

fn default_list_separator() -> String {
    "; ".to_string()
}

/// Prefix of environment variables that override configuration values
pub const ENV_PREFIX: &str = "PAPERS_FETCHER";

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

fn build_config(
    path: Option<&Path>,
    env: config::Environment,
) -> Result<Config, config::ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    builder.add_source(env).build()?.try_deserialize()
}

/// Load configuration from a file, with environment overrides
pub fn load_config(path: &Path) -> Result<Config, config::ConfigError> {
    build_config(Some(path), environment())
}

/// Look for a config file in the working directory, then the user config directory
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("papers-fetcher").join(CONFIG_FILE_NAME))
        .filter(|path| path.is_file())
}

/// Get the configuration when no file is present (defaults plus env vars)
pub fn get_config() -> Result<Config, config::ConfigError> {
    build_config(None, environment())
}
