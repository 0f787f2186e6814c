//! In-process stand-in for the NED NL API.
//!
//! Serves the JSON-LD fixtures from `test-vectors/` under `/v1`, enforces the
//! `X-AUTH-TOKEN` header and records every request so tests can inspect what
//! a client actually sent. A few extra routes produce the failure modes a
//! client has to classify: slow answers, plain-text bodies and arbitrary
//! status codes.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use tokio::{net::TcpListener, sync::RwLock};

pub const DEFAULT_TOKEN: &str = "TEST";

pub const JSON_LD: &str = "application/ld+json; charset=utf-8";

/// Page size the real service applies when `itemsPerPage` is absent.
pub const DEFAULT_PAGE_SIZE: usize = 30;

/// Delay of the `/v1/slow` route.
pub const SLOW_DELAY: Duration = Duration::from_millis(500);

const ACTIVITIES: &str = include_str!("../../test-vectors/activities.json");
const CLASSIFICATIONS: &str = include_str!("../../test-vectors/classifications.json");
const GRANULARITIES: &str = include_str!("../../test-vectors/granularities.json");
const GRANULARITY_TIME_ZONES: &str =
    include_str!("../../test-vectors/granularity_time_zones.json");
const POINTS: &str = include_str!("../../test-vectors/points.json");
const TYPES: &str = include_str!("../../test-vectors/types.json");
const UTILIZATIONS: &str = include_str!("../../test-vectors/utilizations.json");

/// What the server saw for one request that passed authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub path: String,
    pub query: Vec<(String, String)>,
    pub accept: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug)]
pub struct MockState {
    token: String,
    requests: RwLock<Vec<RecordedRequest>>,
}

impl MockState {
    pub fn new(token: &str) -> Arc<Self> {
        Arc::new(Self {
            token: token.to_string(),
            requests: RwLock::new(Vec::new()),
        })
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.read().await.clone()
    }

    pub async fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.read().await.last().cloned()
    }
}

/// Query accepted by `/v1/types`.
#[derive(Debug, Deserialize)]
pub struct TypesQuery {
    #[serde(rename = "itemsPerPage")]
    pub items_per_page: Option<usize>,
}

/// Query required by `/v1/utilizations`. A missing field is rejected with 400.
#[derive(Debug, Deserialize)]
pub struct UtilizationQuery {
    pub point: i64,
    #[serde(rename = "type")]
    pub type_id: i64,
    pub granularity: i64,
    pub granularitytimezone: i64,
    pub classification: i64,
    pub activity: i64,
    pub start: String,
    pub end: String,
}

pub fn app() -> Router {
    app_with_state(MockState::new(DEFAULT_TOKEN))
}

pub fn app_with_state(state: Arc<MockState>) -> Router {
    Router::new()
        .route("/v1/activities", get(|| async { json_ld(ACTIVITIES) }))
        .route("/v1/classifications", get(|| async { json_ld(CLASSIFICATIONS) }))
        .route("/v1/granularities", get(|| async { json_ld(GRANULARITIES) }))
        .route(
            "/v1/granularity_time_zones",
            get(|| async { json_ld(GRANULARITY_TIME_ZONES) }),
        )
        .route("/v1/points", get(|| async { json_ld(POINTS) }))
        .route("/v1/types", get(list_types))
        .route("/v1/utilizations", get(list_utilizations))
        .route("/v1/slow", get(slow))
        .route("/v1/plain", get(plain))
        .route("/v1/status/{code}", get(status))
        .layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, MockState::new(DEFAULT_TOKEN)).await
}

pub async fn serve(listener: TcpListener, state: Arc<MockState>) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(state)).await
}

async fn authenticate(
    State(state): State<Arc<MockState>>,
    request: Request,
    next: Next,
) -> Response {
    // Borrows of `request` must end before the first await.
    let recorded = {
        let header_value = |name: &str| {
            request
                .headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        };
        if header_value("x-auth-token").as_deref() != Some(state.token.as_str()) {
            None
        } else {
            let query = Query::<Vec<(String, String)>>::try_from_uri(request.uri())
                .map(|Query(pairs)| pairs)
                .unwrap_or_default();
            Some(RecordedRequest {
                path: request.uri().path().to_string(),
                query,
                accept: header_value(header::ACCEPT.as_str()),
                user_agent: header_value(header::USER_AGENT.as_str()),
            })
        }
    };

    let Some(recorded) = recorded else {
        return StatusCode::FORBIDDEN.into_response();
    };
    state.requests.write().await.push(recorded);

    next.run(request).await
}

fn json_ld(body: impl Into<String>) -> Response {
    let mut response = body.into().into_response();
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(JSON_LD));
    response
}

async fn list_types(Query(query): Query<TypesQuery>) -> Result<Response, StatusCode> {
    let page_size = query.items_per_page.unwrap_or(DEFAULT_PAGE_SIZE);
    let mut collection: serde_json::Value =
        serde_json::from_str(TYPES).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    if let Some(members) = collection
        .get_mut("hydra:member")
        .and_then(serde_json::Value::as_array_mut)
    {
        members.truncate(page_size);
    }
    Ok(json_ld(collection.to_string()))
}

async fn list_utilizations(Query(query): Query<UtilizationQuery>) -> Response {
    if query.start > query.end {
        return json_ld(r#"{"hydra:member":[],"hydra:totalItems":0}"#);
    }
    json_ld(UTILIZATIONS)
}

async fn slow() -> Response {
    tokio::time::sleep(SLOW_DELAY).await;
    json_ld(r#"{"hydra:member":[],"hydra:totalItems":0}"#)
}

async fn plain() -> Response {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        "Goodmorning!",
    )
        .into_response()
}

async fn status(Path(code): Path<u16>) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST)
}
