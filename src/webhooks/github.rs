use anyhow::anyhow;
use rocket::{
    http::Status,
    request::{FromRequest, Outcome},
    Request, State,
};
use tracing::{debug, trace, warn};

pub mod events;
use events::{GitHubEvent, PingEvent, PullRequestEvent};

mod signing;
use signing::SignedGitHubPayload;

use crate::webhooks::{Event, EventSender};

const X_GITHUB_EVENT: &str = "X-GitHub-Event";

pub struct GitHubSecret(pub String);

#[rocket::post("/api/webhooks/github", data = "<payload>")]
pub fn github_webhook(
    event_type: GitHubEventType,
    payload: SignedGitHubPayload,
    sender: &State<EventSender>,
) -> Result<&'static str, Status> {
    debug!("received GitHub {:?} event", event_type);

    let event = match event_type {
        GitHubEventType::Ping => {
            serde_json::from_str::<PingEvent>(&payload.0).map(GitHubEvent::Ping)
        }
        GitHubEventType::PullRequest => {
            serde_json::from_str::<PullRequestEvent>(&payload.0).map(GitHubEvent::PullRequest)
        }
    };

    let event = match event {
        Ok(event) => event,
        Err(e) => {
            warn!("couldn't deserialize {:?} payload: {}", event_type, e);
            return Err(Status::BadRequest);
        }
    };

    sender
        .0
        .send(Event::GitHub(event))
        .expect("mpsc channel was closed / dropped");

    Ok("OK")
}

#[derive(Clone, Copy, Debug)]
pub enum GitHubEventType {
    Ping,
    PullRequest,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for GitHubEventType {
    type Error = anyhow::Error;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let event_types = request.headers().get(X_GITHUB_EVENT).collect::<Vec<_>>();
        if event_types.len() != 1 {
            return Outcome::Error((
                Status::BadRequest,
                anyhow!("request header needs exactly one event type"),
            ));
        }

        match event_types[0] {
            "ping" => Outcome::Success(Self::Ping),
            "pull_request" => Outcome::Success(Self::PullRequest),
            other => {
                trace!("event type `{}` isn't handled, stopping here...", other);
                Outcome::Error((
                    Status::BadRequest,
                    anyhow!("unhandled event type: {}", other),
                ))
            }
        }
    }
}
