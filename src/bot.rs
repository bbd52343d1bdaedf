use anyhow::Context;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, trace, warn};

use crate::{
    config::HeraldConfig,
    github::GitHubClient,
    slack::SlackClient,
    webhooks::{
        github::events::{GitHubEvent, PullRequestEvent},
        Event,
    },
};

mod github;
use github::should_announce;

mod identity;
use identity::mention_for;

pub(crate) mod message_builder;
use message_builder::branch_prompt;

pub struct Herald {
    config: HeraldConfig,
    github: GitHubClient,
    slack: SlackClient,
}

impl Herald {
    pub fn new(config: HeraldConfig, github_token: String, slack_token: String) -> Self {
        Herald {
            config,
            github: GitHubClient::new(github_token),
            slack: SlackClient::new(slack_token),
        }
    }

    /// Start consuming webhook events. Runs until every sender is dropped.
    pub async fn run(&self, mut events: UnboundedReceiver<Event>) {
        debug!("running...");

        loop {
            let event = match events.recv().await {
                Some(event) => event,
                None => {
                    info!("all channel senders were dropped, exiting receive loop");
                    break;
                }
            };
            debug!("received event: {:?}", event);

            if let Err(e) = self.handle_event(event).await {
                warn!("encountered error while handling event: {:#}", e);
            }
        }
    }

    async fn handle_event(&self, event: Event) -> anyhow::Result<()> {
        match event {
            Event::GitHub(GitHubEvent::Ping(ping)) => {
                info!("webhook configured: {}", ping.zen);
                Ok(())
            }
            Event::GitHub(GitHubEvent::PullRequest(event)) => {
                self.handle_pull_request(event).await
            }
        }
    }

    /// The per-event flow: resolve the effective settings, gate, enumerate
    /// branches, build the notice, post it. Each step depends on the
    /// previous one, so this is a single linear await chain.
    async fn handle_pull_request(&self, event: PullRequestEvent) -> anyhow::Result<()> {
        let owner = &event.repository.owner.login;
        let repo = &event.repository.name;

        // a repository without (or with a broken) override file just gets
        // the defaults
        let overrides = match self.github.repo_config(owner, repo).await {
            Ok(overrides) => overrides,
            Err(e) => {
                warn!(
                    "couldn't load config for {}/{}, using defaults: {:#}",
                    owner, repo, e
                );
                None
            }
        };
        let policy = self.config.defaults.apply(overrides);

        if !should_announce(&event, &policy) {
            trace!("event didn't need to be announced");
            return Ok(());
        }

        let branches = self
            .github
            .list_branches(owner, repo)
            .await
            .with_context(|| format!("couldn't list branches of {}/{}", owner, repo))?;

        let mention = mention_for(&self.config.users, event.pull_request.user.id);
        let message = branch_prompt(&policy, &mention, &event, &branches)?;

        trace!(
            "announcing PR #{} on {} to {}",
            event.pull_request.number,
            repo,
            policy.slack_channel
        );
        self.slack
            .post_message(&message)
            .await
            .context("couldn't post Slack message")?;

        Ok(())
    }
}
