use axum::async_trait;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{FromRequest, Query, Request};
use axum::http::StatusCode;

use crate::github::CommitSha;
use crate::relay::{ChangeRecord, NewChange};

/// The body of a webhook request could not be turned into a pull request event.
#[derive(Debug, thiserror::Error)]
pub enum MalformedPayloadError {
    #[error("Cannot read webhook body")]
    Body(#[from] BytesRejection),
    #[error("Webhook body is not valid JSON")]
    InvalidJson(#[source] serde_json::Error),
    #[error("Webhook body is not a pull request event")]
    MissingField(#[source] serde_json::Error),
}

impl From<serde_json::Error> for MalformedPayloadError {
    fn from(error: serde_json::Error) -> Self {
        if error.is_data() {
            Self::MissingField(error)
        } else {
            Self::InvalidJson(error)
        }
    }
}

#[derive(serde::Deserialize, Debug)]
struct WebhookUser {
    login: String,
}

#[derive(serde::Deserialize, Debug)]
struct WebhookRepository {
    name: String,
    git_url: String,
    #[serde(default)]
    private: Option<bool>,
}

#[derive(serde::Deserialize, Debug)]
struct WebhookHead {
    sha: String,
    #[serde(rename = "ref")]
    ref_name: String,
}

#[derive(serde::Deserialize, Debug)]
struct WebhookPullRequest {
    head: WebhookHead,
    html_url: String,
    user: WebhookUser,
}

#[derive(serde::Deserialize, Debug)]
struct WebhookPullRequestEvent {
    action: String,
    sender: WebhookUser,
    repository: WebhookRepository,
    pull_request: WebhookPullRequest,
}

#[derive(serde::Deserialize, Debug)]
struct WebhookQuery {
    project: Option<String>,
}

/// axum extractor for pull request webhooks that should be relayed.
///
/// Requests without anything to relay are rejected with `200 OK`: the webhook sender must never
/// see a failure, otherwise it would retry the delivery or disable the hook. Parsing problems are
/// only reported in the log.
#[derive(Debug)]
pub struct GitHubWebhook(pub Vec<ChangeRecord>);

#[async_trait]
impl<S> FromRequest<S> for GitHubWebhook
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let project = Query::<WebhookQuery>::try_from_uri(request.uri())
            .map(|Query(query)| query.project)
            .unwrap_or_default();

        let changes = match Bytes::from_request(request, state).await {
            Ok(body) => parse_webhook_event(&body, project),
            Err(rejection) => Err(MalformedPayloadError::from(rejection)),
        };

        match changes {
            Ok(changes) if changes.is_empty() => Err(StatusCode::OK),
            Ok(changes) => Ok(GitHubWebhook(changes)),
            Err(error) => {
                tracing::error!(
                    "Encountered an exception: {:?}",
                    anyhow::Error::from(error)
                );
                Err(StatusCode::OK)
            }
        }
    }
}

/// Builds the batch of changes described by a pull request webhook body.
/// Only `opened` and `synchronize` actions produce a change.
fn parse_webhook_event(
    body: &[u8],
    project: Option<String>,
) -> Result<Vec<ChangeRecord>, MalformedPayloadError> {
    tracing::trace!("Payload: {}", String::from_utf8_lossy(body));
    let payload: WebhookPullRequestEvent = serde_json::from_slice(body)?;

    let repository = &payload.repository;
    tracing::debug!(
        "Pull request event `{}` on {} from {}",
        payload.action,
        repository.name,
        payload.sender.login
    );
    if repository.private == Some(true) {
        tracing::debug!(
            "Repository {} is private, builders need an SSH key to fetch {}",
            repository.name,
            repository.git_url
        );
    }

    match payload.action.as_str() {
        "opened" | "synchronize" => Ok(vec![pull_request_change(payload, project)]),
        action => {
            tracing::debug!("Ignoring pull request action `{action}`");
            Ok(vec![])
        }
    }
}

fn pull_request_change(event: WebhookPullRequestEvent, project: Option<String>) -> ChangeRecord {
    let WebhookPullRequestEvent {
        action,
        repository,
        pull_request,
        ..
    } = event;

    NewChange {
        revision: CommitSha(pull_request.head.sha),
        revlink: pull_request.html_url,
        comments: format!("PR {action}"),
        who: pull_request.user.login,
        repository: repository.git_url,
        branch: pull_request.head.ref_name,
        project,
    }
    .into()
}
