use crate::config::BranchPolicy;
use crate::webhooks::github::events::PullRequestEvent;

/// The event gate: only a PR freshly opened against the configured target
/// branch warrants a notice. Everything else is filtered out silently.
pub(crate) fn should_announce(event: &PullRequestEvent, policy: &BranchPolicy) -> bool {
    if event.action != "opened" {
        return false;
    }

    event.pull_request.base.r#ref == policy.target_branch
}

#[cfg(test)]
mod tests {
    use crate::bot::identity::{mention_for, IdentityMap};
    use crate::bot::message_builder::{branch_prompt, ActionCapsule};
    use crate::webhooks::github::events::{GitHubUser, PrRef, PullRequest, Repository};

    use super::*;

    fn policy() -> BranchPolicy {
        BranchPolicy {
            target_branch: "develop".to_owned(),
            slack_channel: "#releases".to_owned(),
        }
    }

    fn event(action: &str, base: &str) -> PullRequestEvent {
        PullRequestEvent {
            action: action.to_owned(),
            pull_request: PullRequest {
                number: 7,
                user: GitHubUser {
                    login: "octocat".to_owned(),
                    id: 42,
                },
                assignees: vec![],
                base: PrRef {
                    r#ref: base.to_owned(),
                    label: format!("acme:{}", base),
                },
                head: PrRef {
                    r#ref: "feature".to_owned(),
                    label: "octocat:feature".to_owned(),
                },
            },
            repository: Repository {
                name: "widgets".to_owned(),
                owner: GitHubUser {
                    login: "acme".to_owned(),
                    id: 1,
                },
            },
        }
    }

    #[test]
    fn gate_rejects_other_actions() {
        for action in ["closed", "edited", "reopened", "synchronize"] {
            assert!(!should_announce(&event(action, "develop"), &policy()));
        }
    }

    #[test]
    fn gate_rejects_other_base_branches() {
        assert!(!should_announce(&event("opened", "main"), &policy()));
    }

    #[test]
    fn gate_passes_opened_pr_against_target() {
        assert!(should_announce(&event("opened", "develop"), &policy()));
    }

    // The full per-event flow against the gate + builder pipeline, with a
    // mapped author.
    #[test]
    fn opened_pr_from_mapped_author_produces_one_notice() {
        let users = IdentityMap::from([(42, "alice".to_owned())]);
        let branches = vec![
            "develop".to_owned(),
            "main".to_owned(),
            "hotfix".to_owned(),
        ];
        let event = event("opened", "develop");
        let policy = policy();

        assert!(should_announce(&event, &policy));

        let mention = mention_for(&users, event.pull_request.user.id);
        let message = branch_prompt(&policy, &mention, &event, &branches).unwrap();

        assert_eq!(message.channel, "#releases");
        assert!(message.text.contains("<@alice>"));
        assert!(!message.text.contains("<!channel>"));

        let capsules: Vec<ActionCapsule> = message.attachments[0].actions[0]
            .options
            .iter()
            .map(|o| serde_json::from_str(&o.value).unwrap())
            .collect();
        let bases: Vec<_> = capsules.iter().map(|c| c.base.as_str()).collect();
        assert_eq!(bases, vec!["develop", "main", "hotfix"]);
        assert!(capsules.iter().all(|c| c.number == 7));
        assert!(capsules.iter().all(|c| c.head == "octocat:feature"));
        assert!(capsules.iter().all(|c| c.owner == "acme" && c.repo == "widgets"));
    }

    #[test]
    fn opened_pr_from_unmapped_author_mentions_the_channel() {
        let users = IdentityMap::from([(7, "bob".to_owned())]);
        let event = event("opened", "develop");

        let mention = mention_for(&users, event.pull_request.user.id);
        let message =
            branch_prompt(&policy(), &mention, &event, &["main".to_owned()]).unwrap();

        assert!(message.text.contains("<!channel>"));
    }

    #[test]
    fn closed_pr_is_filtered_before_any_call() {
        assert!(!should_announce(&event("closed", "develop"), &policy()));
    }
}
