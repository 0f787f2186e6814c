use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with_state, MockState, DEFAULT_TOKEN};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn ned_request(uri: &str) -> Request<String> {
    Request::builder()
        .uri(uri)
        .header(header::ACCEPT, "application/ld+json")
        .header(header::USER_AGENT, "nednl-test/0")
        .header("X-AUTH-TOKEN", DEFAULT_TOKEN)
        .body(String::new())
        .unwrap()
}

fn content_type(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
}

// --- authentication ---

#[tokio::test]
async fn missing_token_returns_403() {
    let resp = app()
        .oneshot(Request::builder().uri("/v1/points").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn wrong_token_returns_403() {
    let resp = app_with_state(MockState::new("other"))
        .oneshot(ned_request("/v1/points"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

// --- collections ---

#[tokio::test]
async fn activities_are_served_as_json_ld() {
    let resp = app().oneshot(ned_request("/v1/activities")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(content_type(&resp).contains("application/ld+json"));
    let json = body_json(resp).await;
    assert_eq!(json["hydra:totalItems"], 3);
    assert_eq!(json["hydra:member"][0]["name"], "Providing");
}

#[tokio::test]
async fn every_list_endpoint_answers() {
    for path in [
        "/v1/activities",
        "/v1/classifications",
        "/v1/granularities",
        "/v1/granularity_time_zones",
        "/v1/points",
        "/v1/types",
    ] {
        let resp = app().oneshot(ned_request(path)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "{path}");
        let json = body_json(resp).await;
        assert!(json["hydra:member"].is_array(), "{path}");
    }
}

#[tokio::test]
async fn types_honour_items_per_page() {
    let resp = app()
        .oneshot(ned_request("/v1/types?itemsPerPage=2"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["hydra:member"].as_array().unwrap().len(), 2);
    assert_eq!(json["hydra:totalItems"], 3);
}

#[tokio::test]
async fn unknown_path_returns_404() {
    let resp = app().oneshot(ned_request("/v1/nope")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- utilizations ---

#[tokio::test]
async fn utilizations_with_all_filters() {
    let resp = app()
        .oneshot(ned_request(concat!(
            "/v1/utilizations?point=0&type=2&granularity=3&granularitytimezone=1",
            "&classification=2&activity=1&start=2024-03-29&end=2024-03-30",
        )))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["hydra:member"][1]["capacity"], 1382045);
}

#[tokio::test]
async fn utilizations_missing_filter_returns_400() {
    let resp = app()
        .oneshot(ned_request("/v1/utilizations?point=0&type=2"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- failure routes ---

#[tokio::test]
async fn plain_route_is_text() {
    let resp = app().oneshot(ned_request("/v1/plain")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(content_type(&resp).starts_with("text/plain"));
    assert_eq!(body_bytes(resp).await, "Goodmorning!");
}

#[tokio::test]
async fn status_route_echoes_code() {
    let resp = app().oneshot(ned_request("/v1/status/503")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let resp = app().oneshot(ned_request("/v1/status/teapot")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- recording ---

#[tokio::test]
async fn authenticated_requests_are_recorded() {
    let state = MockState::new(DEFAULT_TOKEN);

    let resp = app_with_state(state.clone())
        .oneshot(ned_request("/v1/types?itemsPerPage=100"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app_with_state(state.clone())
        .oneshot(Request::builder().uri("/v1/points").body(String::new()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let requests = state.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/v1/types");
    assert_eq!(
        requests[0].query,
        vec![("itemsPerPage".to_string(), "100".to_string())]
    );
    assert_eq!(requests[0].accept.as_deref(), Some("application/ld+json"));
    assert_eq!(requests[0].user_agent.as_deref(), Some("nednl-test/0"));
}

// --- over tcp ---

#[tokio::test]
async fn served_router_authenticates_over_tcp() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = MockState::new(DEFAULT_TOKEN);
    tokio::spawn(mock_server::serve(listener, state.clone()));

    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "GET /v1/activities HTTP/1.1\r\nHost: {addr}\r\nX-AUTH-TOKEN: {DEFAULT_TOKEN}\r\n\
         Accept: application/ld+json\r\nConnection: close\r\n\r\n"
    );
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut raw = String::new();
    stream.read_to_string(&mut raw).await.unwrap();

    assert!(raw.starts_with("HTTP/1.1 200 OK"), "{raw}");
    assert!(raw.contains("Providing"));
    let recorded = state.last_request().await.unwrap();
    assert_eq!(recorded.path, "/v1/activities");
    assert_eq!(recorded.accept.as_deref(), Some("application/ld+json"));
}

#[tokio::test]
async fn served_router_rejects_missing_token_over_tcp() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = MockState::new(DEFAULT_TOKEN);
    tokio::spawn(mock_server::serve(listener, state.clone()));

    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    let request = format!("GET /v1/points HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut raw = String::new();
    stream.read_to_string(&mut raw).await.unwrap();

    assert!(raw.starts_with("HTTP/1.1 403"), "{raw}");
    assert!(state.requests().await.is_empty());
}
