use std::collections::HashMap;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct HeraldConfig {
    /// Secret shared with GitHub, used to verify webhook payload signatures
    pub github_secret: String,
    /// Settings applied when a repository doesn't carry its own
    /// `.github/pr-herald.yml`
    pub defaults: BranchPolicy,
    /// GitHub user id → Slack display name, for direct mentions in notices.
    /// Users missing from this map get a channel-wide mention instead.
    #[serde(default)]
    pub users: HashMap<u64, String>,
}

/// Effective per-repository settings, always fully populated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BranchPolicy {
    /// PRs opened against this branch trigger a notification
    pub target_branch: String,
    /// Slack channel the notification is posted to
    pub slack_channel: String,
}

/// Shape of a repository's `.github/pr-herald.yml`. Every field is optional,
/// anything left out keeps its default.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BranchPolicyOverride {
    pub target_branch: Option<String>,
    pub slack_channel: Option<String>,
}

impl BranchPolicy {
    /// Applies a repository override on top of the defaults. The merge is
    /// shallow: the config shape is flat, so there is nothing to recurse into.
    pub fn apply(&self, overrides: Option<BranchPolicyOverride>) -> BranchPolicy {
        let overrides = overrides.unwrap_or_default();

        BranchPolicy {
            target_branch: overrides
                .target_branch
                .unwrap_or_else(|| self.target_branch.clone()),
            slack_channel: overrides
                .slack_channel
                .unwrap_or_else(|| self.slack_channel.clone()),
        }
    }
}
