//! Local stand-in for the Akismet REST API.
//!
//! Serves the four `/1.1/*` endpoints with the same plain-text bodies the
//! real service uses, plus `GET /reports` to inspect spam/ham feedback that
//! has been submitted. Classification follows Akismet's documented test
//! values: the author `viagra-test-123` or the email
//! `akismet-guaranteed-spam@example.com` is spam, the `administrator` role
//! never is.

use std::{
    collections::{BTreeMap, HashSet},
    sync::Arc,
};

use axum::{
    extract::{Form, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

/// The key accepted by `app()`.
pub const DEFAULT_KEY: &str = "foo";

pub const THANKS: &str = "Thanks for making the web a better place.";

const SPAM_AUTHOR: &str = "viagra-test-123";
const SPAM_EMAIL: &str = "akismet-guaranteed-spam@example.com";
const DEBUG_HELP: &str = "X-akismet-debug-help";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    Spam,
    Ham,
}

/// A `submit-spam` or `submit-ham` call as received.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub kind: Feedback,
    pub params: BTreeMap<String, String>,
}

#[derive(Clone)]
pub struct MockState {
    keys: Arc<HashSet<String>>,
    reports: Arc<RwLock<Vec<Report>>>,
}

type Params = BTreeMap<String, String>;

pub fn app() -> Router {
    app_with_keys([DEFAULT_KEY.to_string()])
}

pub fn app_with_keys(keys: impl IntoIterator<Item = String>) -> Router {
    let state = MockState {
        keys: Arc::new(keys.into_iter().collect()),
        reports: Arc::new(RwLock::new(Vec::new())),
    };
    Router::new()
        .route("/1.1/verify-key", post(verify_key))
        .route("/1.1/comment-check", post(comment_check))
        .route("/1.1/submit-spam", post(submit_spam))
        .route("/1.1/submit-ham", post(submit_ham))
        .route("/reports", get(list_reports))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Spam verdict for a comment-check body.
pub fn classify(params: &Params) -> bool {
    let field = |name: &str| params.get(name).map(String::as_str);
    if field("user_role") == Some("administrator") {
        return false;
    }
    field("comment_author") == Some(SPAM_AUTHOR)
        || field("comment_author_email") == Some(SPAM_EMAIL)
}

async fn verify_key(State(state): State<MockState>, Form(params): Form<Params>) -> Response {
    let key = params.get("key").map(String::as_str).unwrap_or_default();
    let blog = params.get("blog").map(String::as_str).unwrap_or_default();
    if key.is_empty() {
        return invalid("Empty \"key\" value");
    }
    if blog.is_empty() {
        return invalid("Empty \"blog\" value");
    }
    if !state.keys.contains(key) {
        tracing::debug!(%blog, "rejected key");
        return invalid("We were unable to find the key you provided");
    }
    "valid".into_response()
}

async fn comment_check(Form(params): Form<Params>) -> Response {
    if let Some(missing) = missing_blog(&params) {
        return missing;
    }
    let spam = classify(&params);
    tracing::debug!(spam, fields = params.len(), "comment-check");
    let verdict = if spam { "true" } else { "false" };
    verdict.into_response()
}

async fn submit_spam(State(state): State<MockState>, Form(params): Form<Params>) -> Response {
    submit(state, Feedback::Spam, params).await
}

async fn submit_ham(State(state): State<MockState>, Form(params): Form<Params>) -> Response {
    submit(state, Feedback::Ham, params).await
}

async fn submit(state: MockState, kind: Feedback, params: Params) -> Response {
    if let Some(missing) = missing_blog(&params) {
        return missing;
    }
    tracing::debug!(?kind, fields = params.len(), "feedback received");
    state.reports.write().await.push(Report { kind, params });
    THANKS.into_response()
}

async fn list_reports(State(state): State<MockState>) -> Json<Vec<Report>> {
    Json(state.reports.read().await.clone())
}

fn missing_blog(params: &Params) -> Option<Response> {
    match params.get("blog") {
        Some(blog) if !blog.is_empty() => None,
        _ => Some(
            ([(DEBUG_HELP, "Empty \"blog\" value")], "Missing required field: blog.").into_response(),
        ),
    }
}

fn invalid(help: &'static str) -> Response {
    ([(DEBUG_HELP, help)], "invalid").into_response()
}
