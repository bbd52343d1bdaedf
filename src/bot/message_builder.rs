use serde::{Deserialize, Serialize};

use crate::config::BranchPolicy;
use crate::webhooks::github::events::PullRequestEvent;

/// Identifies the interactive callback on the Slack side; the callback
/// handler consuming it lives outside this service.
const CALLBACK_ID: &str = "pr_branch";
const ATTACHMENT_COLOR: &str = "#949EA6";

/// Body of a `chat.postMessage` call with a branch-selection attachment.
#[derive(Debug, Serialize)]
pub struct InteractiveMessage {
    pub channel: String,
    pub text: String,
    pub response_type: String,
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Serialize)]
pub struct Attachment {
    pub text: String,
    pub fallback: String,
    pub callback_id: String,
    pub color: String,
    pub attachment_type: String,
    pub actions: Vec<AttachmentAction>,
}

#[derive(Debug, Serialize)]
pub struct AttachmentAction {
    pub name: String,
    pub text: String,
    pub r#type: String,
    pub options: Vec<SelectOption>,
}

#[derive(Debug, Serialize)]
pub struct SelectOption {
    pub text: String,
    pub value: String,
}

/// Everything needed to open the follow-up PR later. Slack echoes the chosen
/// option's `value` back verbatim in the interactive callback, so this
/// capsule is the only state carried across the round trip — there is no
/// session store.
#[derive(Debug, Serialize, Deserialize)]
pub struct ActionCapsule {
    pub owner: String,
    pub repo: String,
    pub head: String,
    pub base: String,
    pub number: u64,
    pub assignees: Vec<String>,
}

/// Builds the notice posted when a PR is opened against the target branch:
/// a mention of the author, and one select option per branch of the
/// repository, each carrying an [`ActionCapsule`] differing only in `base`.
pub(crate) fn branch_prompt(
    policy: &BranchPolicy,
    mention: &str,
    event: &PullRequestEvent,
    branches: &[String],
) -> anyhow::Result<InteractiveMessage> {
    let repo = &event.repository.name;
    let pr = &event.pull_request;
    let assignees: Vec<String> = pr.assignees.iter().map(|a| a.login.clone()).collect();

    let options = branches
        .iter()
        .map(|branch| {
            let capsule = ActionCapsule {
                owner: event.repository.owner.login.clone(),
                repo: repo.clone(),
                head: pr.head.label.clone(),
                base: branch.clone(),
                number: pr.number,
                assignees: assignees.clone(),
            };

            Ok(SelectOption {
                text: branch.clone(),
                value: serde_json::to_string(&capsule)?,
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let text = format!(
        "Hey {}! Looks like you opened a PR merging into {} on {}...",
        mention, policy.target_branch, repo
    );

    Ok(InteractiveMessage {
        channel: policy.slack_channel.clone(),
        text,
        response_type: "in_channel".to_owned(),
        attachments: vec![Attachment {
            text: "Want a follow-up PR that merges another branch?".to_owned(),
            fallback: String::new(),
            callback_id: CALLBACK_ID.to_owned(),
            color: ATTACHMENT_COLOR.to_owned(),
            attachment_type: "default".to_owned(),
            actions: vec![AttachmentAction {
                name: "branch_list".to_owned(),
                text: "Pick a branch...".to_owned(),
                r#type: "select".to_owned(),
                options,
            }],
        }],
    })
}
