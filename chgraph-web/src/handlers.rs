//! Route handlers.

use crate::AppState;
use crate::error::ApiError;
use axum::{
    Form, Json,
    extract::{Query, State, rejection::FormRejection},
    http::header,
    response::{Html, IntoResponse},
};
use chgraph_core::{GraphSnapshot, PageFetcher};
use serde::Deserialize;
use tracing::info;

const INDEX_HTML: &str = include_str!("../assets/index.html");
const APP_JS: &str = include_str!("../assets/app.js");

/// Parameters accepted by the submit routes.
#[derive(Debug, Default, Deserialize)]
pub struct SubmitParams {
    #[serde(rename = "company-url")]
    pub company_url: Option<String>,
    pub name: Option<String>,
}

impl SubmitParams {
    /// Values from the query string win; a form body fills the gaps.
    fn or(self, other: SubmitParams) -> SubmitParams {
        SubmitParams {
            company_url: non_empty(self.company_url).or(non_empty(other.company_url)),
            name: non_empty(self.name).or(non_empty(other.name)),
        }
    }
}

/// Parameters may arrive in the query string or, for POST, as a
/// form-encoded body. A missing or non-form body is not an error.
fn submit_params(
    query: SubmitParams,
    form: Result<Form<SubmitParams>, FormRejection>,
) -> SubmitParams {
    match form {
        Ok(Form(body)) => query.or(body),
        Err(_) => query.or(SubmitParams::default()),
    }
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn app_js() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/javascript")], APP_JS)
}

pub async fn new_url_submit<F: PageFetcher>(
    State(state): State<AppState<F>>,
    Query(query): Query<SubmitParams>,
    form: Result<Form<SubmitParams>, FormRejection>,
) -> Result<Json<GraphSnapshot>, ApiError> {
    let params = submit_params(query, form);
    let url = params
        .company_url
        .ok_or_else(|| ApiError::BadRequest("missing company-url parameter".to_string()))?;
    info!("New URL submitted: {}", url);
    Ok(Json(state.explorer.submit(&url).await?))
}

/// A clicked node is identified by `name`; a raw `company-url` is also
/// accepted so older clients that sent the node's URL keep working.
pub async fn node_click_submit<F: PageFetcher>(
    State(state): State<AppState<F>>,
    Query(query): Query<SubmitParams>,
    form: Result<Form<SubmitParams>, FormRejection>,
) -> Result<Json<GraphSnapshot>, ApiError> {
    let params = submit_params(query, form);
    if let Some(name) = params.name {
        info!("Node clicked: {}", name);
        return Ok(Json(state.explorer.expand(&name).await?));
    }
    if let Some(url) = params.company_url {
        info!("Node URL submitted: {}", url);
        return Ok(Json(state.explorer.submit(&url).await?));
    }
    Err(ApiError::BadRequest(
        "expected a name or company-url parameter".to_string(),
    ))
}

pub async fn graph<F: PageFetcher>(State(state): State<AppState<F>>) -> Json<GraphSnapshot> {
    Json(state.explorer.snapshot().await)
}

pub async fn close<F: PageFetcher>(State(state): State<AppState<F>>) -> &'static str {
    info!("Shutdown requested");
    state.shutdown.notify_one();
    "Server closing\n"
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
