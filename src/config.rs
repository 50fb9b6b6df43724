use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub documents: DocumentsConfig,
    #[serde(default)]
    pub state: StateConfig,
    #[serde(default)]
    pub indexer: IndexerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GithubConfig {
    /// Repository coordinate as `owner/name`.
    #[serde(default = "default_repo")]
    pub repo: String,
    /// Issue numbers to mirror, in sync order.
    #[serde(default = "default_issues")]
    pub issues: Vec<u64>,
    /// Page size: the N most recent comments fetched per issue.
    #[serde(default = "default_comments_per_issue")]
    pub comments_per_issue: u32,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Environment variable holding the bearer token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
    /// Optional dotenv-format secrets file loaded before reading `token_env`.
    #[serde(default)]
    pub env_file: Option<PathBuf>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            repo: default_repo(),
            issues: default_issues(),
            comments_per_issue: default_comments_per_issue(),
            api_base: default_api_base(),
            token_env: default_token_env(),
            env_file: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_repo() -> String {
    "Tenormusica2024/Private".to_string()
}
fn default_issues() -> Vec<u64> {
    vec![1, 2, 3, 4]
}
fn default_comments_per_issue() -> u32 {
    20
}
fn default_api_base() -> String {
    "https://api.github.com".to_string()
}
fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}
fn default_request_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct DocumentsConfig {
    /// Output directory for rendered issue documents.
    #[serde(default = "default_documents_dir")]
    pub dir: PathBuf,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            dir: default_documents_dir(),
        }
    }
}

fn default_documents_dir() -> PathBuf {
    PathBuf::from("./documents/github-issues")
}

#[derive(Debug, Deserialize, Clone)]
pub struct StateConfig {
    /// Path of the JSON file mapping issue number to last-sync timestamp.
    #[serde(default = "default_state_path")]
    pub path: PathBuf,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            path: default_state_path(),
        }
    }
}

fn default_state_path() -> PathBuf {
    PathBuf::from("./state/last_sync_state.json")
}

#[derive(Debug, Deserialize, Clone)]
pub struct IndexerConfig {
    /// Path to the external indexer executable.
    #[serde(default = "default_indexer_executable")]
    pub executable: PathBuf,
    /// Fixed subcommand meaning "rebuild the index".
    #[serde(default = "default_indexer_argument")]
    pub argument: String,
    /// Hard wall-clock cap on one indexer invocation.
    #[serde(default = "default_indexer_timeout_secs")]
    pub timeout_secs: u64,
    /// When false, documents are still written but the indexer is never run.
    #[serde(default = "default_indexer_enabled")]
    pub enabled: bool,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            executable: default_indexer_executable(),
            argument: default_indexer_argument(),
            timeout_secs: default_indexer_timeout_secs(),
            enabled: default_indexer_enabled(),
        }
    }
}

fn default_indexer_executable() -> PathBuf {
    PathBuf::from("./devrag")
}
fn default_indexer_argument() -> String {
    "index".to_string()
}
fn default_indexer_timeout_secs() -> u64 {
    300
}
fn default_indexer_enabled() -> bool {
    true
}

impl GithubConfig {
    /// Splits `repo` into `(owner, name)`. Shape is validated at load time.
    pub fn repo_parts(&self) -> (&str, &str) {
        let mut parts = self.repo.splitn(2, '/');
        let owner = parts.next().unwrap_or_default();
        let name = parts.next().unwrap_or_default();
        (owner, name)
    }
}

/// Load configuration from `path`, falling back to built-in defaults when the
/// file does not exist. A present-but-unreadable or unparseable file is a
/// startup error.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Validate github
    if config.github.issues.is_empty() {
        anyhow::bail!("github.issues must list at least one issue number");
    }

    if config.github.comments_per_issue == 0 || config.github.comments_per_issue > 100 {
        anyhow::bail!("github.comments_per_issue must be in 1..=100");
    }

    let parts: Vec<&str> = config.github.repo.split('/').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        anyhow::bail!(
            "github.repo must be an 'owner/name' coordinate, got '{}'",
            config.github.repo
        );
    }

    if config.github.request_timeout_secs == 0 {
        anyhow::bail!("github.request_timeout_secs must be > 0");
    }

    // Validate indexer
    if config.indexer.timeout_secs == 0 {
        anyhow::bail!("indexer.timeout_secs must be > 0");
    }

    Ok(config)
}
