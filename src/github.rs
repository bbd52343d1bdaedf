use anyhow::Context;
use reqwest::header;
use serde::Deserialize;
use url::Url;

use crate::config::BranchPolicyOverride;

const GITHUB_API: &str = "https://api.github.com";
/// Repository file the per-repo overrides are read from
const CONFIG_PATH: &str = ".github/pr-herald.yml";
// GitHub rejects requests without a User-Agent
const USER_AGENT: &str = concat!("pr-herald/", env!("CARGO_PKG_VERSION"));
const PER_PAGE: u32 = 100;

#[derive(Debug, Deserialize)]
struct Branch {
    name: String,
}

pub struct GitHubClient {
    http: reqwest::Client,
    token: String,
}

impl GitHubClient {
    pub fn new(token: String) -> Self {
        GitHubClient {
            http: reqwest::Client::new(),
            token,
        }
    }

    /// Branch names of the repository, in API order. Only the first page is
    /// requested: repositories with more than [`PER_PAGE`] branches get a
    /// truncated list.
    pub async fn list_branches(&self, owner: &str, repo: &str) -> anyhow::Result<Vec<String>> {
        let url = Url::parse(&format!("{}/repos/{}/{}/branches", GITHUB_API, owner, repo))?;

        let branches: Vec<Branch> = self
            .http
            .get(url)
            .query(&[("per_page", PER_PAGE)])
            .bearer_auth(&self.token)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::ACCEPT, "application/vnd.github+json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(branches.into_iter().map(|branch| branch.name).collect())
    }

    /// Fetches `.github/pr-herald.yml` from the repository's default branch.
    /// A missing file is `Ok(None)`; any other failure is an error.
    pub async fn repo_config(
        &self,
        owner: &str,
        repo: &str,
    ) -> anyhow::Result<Option<BranchPolicyOverride>> {
        let url = Url::parse(&format!(
            "{}/repos/{}/{}/contents/{}",
            GITHUB_API, owner, repo, CONFIG_PATH
        ))?;

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            // raw content instead of the base64 JSON envelope
            .header(header::ACCEPT, "application/vnd.github.raw+json")
            .header(header::USER_AGENT, USER_AGENT)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body = response.error_for_status()?.text().await?;
        let overrides = serde_yaml::from_str(&body)
            .with_context(|| format!("couldn't parse {} in {}/{}", CONFIG_PATH, owner, repo))?;

        Ok(Some(overrides))
    }
}
