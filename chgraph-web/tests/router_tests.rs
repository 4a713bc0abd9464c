// Tests for the HTTP routes

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use chgraph_core::{EntityKind, Explorer, PageFetcher, PageRecords, Record, RelationStatus, SearchState};
use chgraph_scanner::ScanError;
use chgraph_web::{AppState, router};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tower::ServiceExt;

const ACME: &str = "https://beta.companieshouse.gov.uk/company/01234567";
const JANE: &str = "https://beta.companieshouse.gov.uk/officers/jane/appointments";

struct CannedFetcher {
    pages: HashMap<String, PageRecords>,
}

impl PageFetcher for CannedFetcher {
    async fn fetch(&self, url: &str) -> Result<PageRecords, ScanError> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ScanError::ParseError(format!("no page at {}", url)))
    }
}

fn state() -> AppState<CannedFetcher> {
    let mut pages = HashMap::new();
    pages.insert(
        ACME.to_string(),
        PageRecords {
            head: Record::new("ACME LTD", EntityKind::Company)
                .with_search_state(SearchState::Complete)
                .with_primary_url(ACME)
                .with_secondary_url(format!("{}/officers", ACME)),
            related: vec![
                Record::new("SMITH, Jane", EntityKind::Officer)
                    .with_secondary_url(JANE)
                    .with_status(RelationStatus::Active),
            ],
        },
    );
    pages.insert(
        JANE.to_string(),
        PageRecords {
            head: Record::new("Jane SMITH", EntityKind::Person)
                .with_search_state(SearchState::Complete)
                .with_secondary_url(JANE),
            related: vec![
                Record::new("ACME LTD", EntityKind::Company)
                    .with_primary_url(ACME)
                    .with_status(RelationStatus::Active),
            ],
        },
    );
    AppState::new(Explorer::new(CannedFetcher { pages }))
}

async fn get(state: &AppState<CannedFetcher>, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = router(state.clone())
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn get_json(state: &AppState<CannedFetcher>, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get(state, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

// ============================================================================
// Static front-end
// ============================================================================

#[tokio::test]
async fn test_index_and_script_served() {
    let state = state();

    let (status, body) = get(&state, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body).unwrap().contains("new-url-form"));

    let (status, body) = get(&state, "/app.js").await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body).unwrap().contains("/node-click-submit/"));
}

// ============================================================================
// Submission and clicks
// ============================================================================

#[tokio::test]
async fn test_new_url_submit_returns_graph() {
    let state = state();
    let (status, json) = get_json(
        &state,
        "/new-url-submit/?company-url=https%3A%2F%2Fbeta.companieshouse.gov.uk%2Fcompany%2F01234567",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["nodes"].as_array().unwrap().len(), 2);
    assert_eq!(json["nodes"][0]["searchState"], "complete");
    assert_eq!(json["edges"][0]["source"], "ACME LTD");
    assert_eq!(json["edges"][0]["target"], "SMITH, Jane");
    assert_eq!(json["edges"][0]["status"], "Active");
}

#[tokio::test]
async fn test_new_url_submit_accepts_post() {
    let state = state();
    let response = router(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/new-url-submit/?company-url=beta.companieshouse.gov.uk/company/01234567")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_post_form_body_is_read() {
    let state = state();
    let response = router(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/new-url-submit/")
                .header("content-type", "application/x-www-form-urlencoded")
                .body(Body::from(
                    "company-url=https%3A%2F%2Fbeta.companieshouse.gov.uk%2Fcompany%2F01234567",
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/node-click-submit/")
                .header("content-type", "application/x-www-form-urlencoded")
                .body(Body::from("name=SMITH%2C+Jane"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (_, graph) = get_json(&state, "/graph").await;
    let jane = graph["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .find(|n| n["name"] == "SMITH, Jane")
        .unwrap();
    assert_eq!(jane["kind"], "person");
}

#[tokio::test]
async fn test_unrecognized_url_is_bad_request() {
    let state = state();
    let (status, json) =
        get_json(&state, "/new-url-submit/?company-url=https%3A%2F%2Fexample.com%2F").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["kind"], "unrecognized-url");

    let (_, graph) = get_json(&state, "/graph").await;
    assert!(graph["nodes"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_parameter_is_bad_request() {
    let state = state();
    let (status, json) = get_json(&state, "/new-url-submit/").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["kind"], "bad-request");

    let (status, _) = get_json(&state, "/node-click-submit/?name=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_node_click_expands_by_name() {
    let state = state();
    get_json(&state, "/new-url-submit/?company-url=beta.companieshouse.gov.uk/company/01234567")
        .await;

    let (status, json) = get_json(&state, "/node-click-submit/?name=SMITH%2C%20Jane").await;
    assert_eq!(status, StatusCode::OK);
    let jane = json["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .find(|n| n["name"] == "SMITH, Jane")
        .unwrap();
    assert_eq!(jane["kind"], "person");
    assert_eq!(jane["searchState"], "complete");

    // A person cannot be searched, and the server keeps answering.
    let (status, json) = get_json(&state, "/node-click-submit/?name=SMITH%2C%20Jane").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["kind"], "not-searchable");

    let (status, _) = get_json(&state, "/graph").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_node_click_unknown_name() {
    let state = state();
    let (status, json) = get_json(&state, "/node-click-submit/?name=NOBODY").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["kind"], "unknown-entity");
}

#[tokio::test]
async fn test_node_click_accepts_company_url() {
    let state = state();
    let (status, json) = get_json(
        &state,
        "/node-click-submit/?company-url=https%3A%2F%2Fbeta.companieshouse.gov.uk%2Fofficers%2Fjane%2Fappointments",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    // Submitted directly, the page's own spelling names the node.
    assert_eq!(json["nodes"][0]["name"], "Jane SMITH");
}

#[tokio::test]
async fn test_failed_fetch_is_bad_gateway() {
    let state = state();
    let (status, json) = get_json(
        &state,
        "/new-url-submit/?company-url=beta.companieshouse.gov.uk/company/99999999",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["kind"], "parse-error");
}

// ============================================================================
// Shutdown
// ============================================================================

#[tokio::test]
async fn test_close_signals_shutdown() {
    let state = state();
    let shutdown = state.shutdown.clone();

    let (status, _) = get(&state, "/close").await;
    assert_eq!(status, StatusCode::OK);

    tokio::time::timeout(Duration::from_secs(1), shutdown.notified())
        .await
        .expect("shutdown was not signalled");
}
