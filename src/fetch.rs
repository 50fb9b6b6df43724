//! Comment fetching.
//!
//! [`CommentSource`] is the seam between the orchestrator and the remote
//! issue tracker: the production implementation ([`GithubSource`]) talks to
//! the GitHub REST API, while tests drive the pipeline with stub sources.
//!
//! Fetch failures are deliberately non-fatal. A network error, non-2xx
//! status, or malformed payload degrades to an empty comment list with a
//! warning, so one unreachable thread never blocks the rest of the run.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::GithubConfig;
use crate::models::{Comment, RawComment};

/// Produces the most recent comments for one issue thread, newest first.
#[async_trait]
pub trait CommentSource: Send + Sync {
    /// Returns up to the configured page size of comments, or an empty list
    /// when the thread has none or the fetch failed.
    async fn latest_comments(&self, issue: u64) -> Vec<Comment>;
}

/// [`CommentSource`] backed by the GitHub issue-comments endpoint.
pub struct GithubSource {
    client: reqwest::Client,
    api_base: String,
    repo: String,
    per_page: u32,
    token: Option<String>,
}

impl GithubSource {
    /// Build a source from configuration, resolving the bearer token from the
    /// optional secrets file and the configured environment variable.
    ///
    /// A missing token is not an error; requests go out unauthenticated and
    /// the stricter rate limits apply.
    pub fn new(config: &GithubConfig) -> anyhow::Result<Self> {
        if let Some(env_file) = &config.env_file {
            if let Err(e) = dotenvy::from_path(env_file) {
                debug!(path = %env_file.display(), "secrets file not loaded: {}", e);
            }
        }

        let token = std::env::var(&config.token_env).ok().filter(|t| !t.is_empty());
        if token.is_none() {
            warn!(
                var = %config.token_env,
                "no API token found; requests will be unauthenticated"
            );
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("issuesync/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            repo: config.repo.clone(),
            per_page: config.comments_per_issue,
            token,
        })
    }

    async fn fetch_page(&self, issue: u64) -> anyhow::Result<Vec<Comment>> {
        let url = format!(
            "{}/repos/{}/issues/{}/comments",
            self.api_base, self.repo, issue
        );

        let mut request = self
            .client
            .get(&url)
            .query(&[
                ("per_page", self.per_page.to_string()),
                ("sort", "created".to_string()),
                ("direction", "desc".to_string()),
            ])
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");

        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("GitHub API error {}: {}", status, truncate(&body, 200));
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }

        let raw: Vec<RawComment> = response.json().await?;
        Ok(raw.into_iter().map(Comment::from).collect())
    }
}

#[async_trait]
impl CommentSource for GithubSource {
    async fn latest_comments(&self, issue: u64) -> Vec<Comment> {
        match self.fetch_page(issue).await {
            Ok(comments) => {
                debug!(issue, count = comments.len(), "fetched comments");
                comments
            }
            Err(e) => {
                warn!(issue, "comment fetch failed: {:#}", e);
                Vec::new()
            }
        }
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
