//! HTTP calls against the activities backend.
//!
//! Endpoints:
//! - `GET /activities`
//! - `POST /activities/{name}/signup?email={email}`
//! - `DELETE /activities/{name}/participants?email={email}`
//!
//! 2xx bodies carry `{ "message": ... }`, error bodies `{ "detail": ... }`;
//! both fields are optional and fall back to per-endpoint text.

use gloo_net::http::{Request, Response};
use serde::Deserialize;
use urlencoding::encode;

use crate::model::Roster;

#[derive(Debug, Clone)]
pub enum ApiError {
    /// The fetch itself rejected, or the body could not be decoded.
    Network(String),
    /// Non-2xx status; `detail` comes from the response body when present.
    Request { status: u16, detail: String },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Network(e) => write!(f, "network error: {e}"),
            ApiError::Request { status, detail } => write!(f, "HTTP {status}: {detail}"),
        }
    }
}

#[derive(Deserialize)]
struct OkBody {
    message: Option<String>,
}

#[derive(Deserialize)]
struct ErrBody {
    detail: Option<String>,
}

pub fn signup_url(activity: &str, email: &str) -> String {
    format!(
        "/activities/{}/signup?email={}",
        encode(activity),
        encode(email)
    )
}

pub fn removal_url(activity: &str, email: &str) -> String {
    format!(
        "/activities/{}/participants?email={}",
        encode(activity),
        encode(email)
    )
}

pub async fn fetch_activities() -> Result<Roster, ApiError> {
    let resp = Request::get("/activities").send().await.map_err(network)?;
    if !resp.ok() {
        return Err(request_error(resp, "Could not load activities.").await);
    }
    resp.json::<Roster>().await.map_err(network)
}

pub async fn sign_up(activity: &str, email: &str) -> Result<String, ApiError> {
    let resp = Request::post(&signup_url(activity, email))
        .send()
        .await
        .map_err(network)?;
    if !resp.ok() {
        return Err(request_error(resp, "Sign up failed.").await);
    }
    Ok(success_message(resp, "Signed up successfully.").await)
}

pub async fn remove_participant(activity: &str, email: &str) -> Result<String, ApiError> {
    let resp = Request::delete(&removal_url(activity, email))
        .send()
        .await
        .map_err(network)?;
    if !resp.ok() {
        return Err(request_error(resp, "Failed to remove participant.").await);
    }
    Ok(success_message(resp, "Removed participant.").await)
}

fn network(e: gloo_net::Error) -> ApiError {
    ApiError::Network(e.to_string())
}

async fn success_message(resp: Response, fallback: &str) -> String {
    resp.json::<OkBody>()
        .await
        .ok()
        .and_then(|body| body.message)
        .unwrap_or_else(|| fallback.to_string())
}

async fn request_error(resp: Response, fallback: &str) -> ApiError {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    ApiError::Request {
        status,
        detail: extract_detail(&body, fallback),
    }
}

/// `detail` from an error body, or the endpoint's fallback text when absent
/// or unparsable.
fn extract_detail(body: &str, fallback: &str) -> String {
    serde_json::from_str::<ErrBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .unwrap_or_else(|| fallback.to_string())
}
