use anyhow::bail;
use serde::Deserialize;

use crate::bot::message_builder::InteractiveMessage;

const POST_MESSAGE_URL: &str = "https://slack.com/api/chat.postMessage";

/// Slack wraps API-level failures in an HTTP 200, so success has to be read
/// from the response envelope.
#[derive(Debug, Deserialize)]
struct SlackResponse {
    ok: bool,
    error: Option<String>,
}

pub struct SlackClient {
    http: reqwest::Client,
    token: String,
}

impl SlackClient {
    pub fn new(token: String) -> Self {
        SlackClient {
            http: reqwest::Client::new(),
            token,
        }
    }

    pub async fn post_message(&self, message: &InteractiveMessage) -> anyhow::Result<()> {
        let response: SlackResponse = self
            .http
            .post(POST_MESSAGE_URL)
            .bearer_auth(&self.token)
            .json(message)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if !response.ok {
            bail!(
                "chat.postMessage failed: {}",
                response.error.unwrap_or_else(|| "unknown error".to_owned())
            );
        }

        Ok(())
    }
}
