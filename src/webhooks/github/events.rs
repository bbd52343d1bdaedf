use serde::Deserialize;

#[derive(Debug)]
pub enum GitHubEvent {
    Ping(PingEvent),
    PullRequest(PullRequestEvent),
}

/// Sent by GitHub once when the webhook is first configured.
#[derive(Debug, Deserialize)]
pub struct PingEvent {
    pub zen: String,
    // organization-wide hooks ping without a repository
    pub repository: Option<Repository>,
    pub sender: GitHubUser,
}

#[derive(Debug, Deserialize)]
pub struct PullRequestEvent {
    /// Lifecycle action, e.g. `opened`, `closed`, `synchronize`. Only
    /// `opened` is acted upon.
    pub action: String,
    pub pull_request: PullRequest,
    pub repository: Repository,
}

#[derive(Debug, Deserialize)]
pub struct GitHubUser {
    pub login: String,
    /// Platform-wide numeric identity, stable across renames
    pub id: u64,
}

#[derive(Debug, Deserialize)]
pub struct Repository {
    pub name: String,
    pub owner: GitHubUser,
}

#[derive(Debug, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub user: GitHubUser,
    /// Missing from some redelivered payloads, defaults to no assignees
    #[serde(default)]
    pub assignees: Vec<GitHubUser>,
    pub base: PrRef,
    pub head: PrRef,
}

#[derive(Debug, Deserialize)]
pub struct PrRef {
    pub r#ref: String,
    /// `owner:branch` descriptor, e.g. `octocat:feature`
    pub label: String,
}
