mod common;

// std
use std::sync::Arc;
// crates.io
use axum::{
	Router,
	body::{self, Body},
	http::{HeaderValue, Request, StatusCode, header},
	response::Response,
};
use color_eyre::Result;
use httpmock::prelude::*;
use kis_quote_proxy::{
	api::{self, AccessTokenBody},
	upstream::{DAILY_PRICE_PATH, TOKEN_PATH},
};
use tower::ServiceExt;
// self
use common::*;

fn app(server: &MockServer) -> Router {
	let (proxy, _) = build_test_proxy(server);

	api::router(Arc::new(proxy)).layer(api::cors_layer(None))
}

async fn send(app: &Router, request: Request<Body>) -> Result<Response> {
	Ok(app.clone().oneshot(request).await?)
}

async fn text(response: Response) -> Result<String> {
	let bytes = body::to_bytes(response.into_body(), usize::MAX).await?;

	Ok(String::from_utf8(bytes.to_vec())?)
}

#[tokio::test]
async fn issued_token_is_served_until_replaced() -> Result<()> {
	let server = MockServer::start_async().await;
	let app = app(&server);

	server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"abc\",\"expires_in\":86400}");
		})
		.await;

	let issued = send(
		&app,
		Request::builder().method("POST").uri("/api/access-token").body(Body::empty())?,
	)
	.await?;

	assert_eq!(issued.status(), StatusCode::OK);

	let issued: AccessTokenBody = serde_json::from_str(&text(issued).await?)?;

	assert_eq!(issued.access_token, "abc");

	let current = send(&app, Request::builder().uri("/api/token").body(Body::empty())?).await?;

	assert_eq!(current.status(), StatusCode::OK);
	assert_eq!(text(current).await?, "{\"accessToken\":\"abc\"}");

	Ok(())
}

#[tokio::test]
async fn failed_issuance_returns_generic_message() -> Result<()> {
	let server = MockServer::start_async().await;
	let app = app(&server);

	server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(500).body("upstream exploded with appsecret=leak");
		})
		.await;

	let response = send(
		&app,
		Request::builder().method("POST").uri("/api/access-token").body(Body::empty())?,
	)
	.await?;

	assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(text(response).await?, "Failed to generate access token");

	let current = send(&app, Request::builder().uri("/api/token").body(Body::empty())?).await?;

	assert_eq!(current.status(), StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(text(current).await?, "Access token not available");

	Ok(())
}

#[tokio::test]
async fn daily_quote_relays_payload_and_caller_token() -> Result<()> {
	let server = MockServer::start_async().await;
	let app = app(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path(DAILY_PRICE_PATH)
				.query_param("FID_INPUT_ISCD", "005930")
				.header("authorization", "Bearer abc");
			then.status(200).header("content-type", "application/json").body("{\"price\":10000}");
		})
		.await;
	let response = send(
		&app,
		Request::builder()
			.uri("/api/stock/daily?stockCode=005930")
			.header(header::AUTHORIZATION, "Bearer abc")
			.body(Body::empty())?,
	)
	.await?;

	mock.assert_async().await;

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
	assert_eq!(text(response).await?, "{\"price\":10000}");

	Ok(())
}

#[tokio::test]
async fn daily_quote_rejection_relays_upstream_body() -> Result<()> {
	let server = MockServer::start_async().await;
	let app = app(&server);

	server
		.mock_async(|when, then| {
			when.method(GET).path(DAILY_PRICE_PATH);
			then.status(401)
				.header("content-type", "application/json")
				.body("{\"msg\":\"bad token\"}");
		})
		.await;

	let response = send(
		&app,
		Request::builder().uri("/api/stock/daily?stockCode=005930").body(Body::empty())?,
	)
	.await?;

	assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(text(response).await?, "{\"msg\":\"bad token\"}");

	Ok(())
}

#[tokio::test]
async fn opaque_caller_token_reaches_upstream_unchanged() -> Result<()> {
	let client = Arc::new(RecordingHttpClient::new(200, b"{\"price\":10000}"));
	let app = api::router(Arc::new(build_recording_proxy(client.clone())));
	let response = send(
		&app,
		Request::builder()
			.uri("/api/stock/daily?stockCode=005930")
			.header(header::AUTHORIZATION, HeaderValue::from_bytes(b"Bearer tok\xe9n")?)
			.body(Body::empty())?,
	)
	.await?;

	assert_eq!(response.status(), StatusCode::OK);

	let request = client.last_request().expect("A request should have been recorded.");

	assert_eq!(request.headers[header::AUTHORIZATION].as_bytes(), b"Bearer tok\xe9n");

	Ok(())
}

#[tokio::test]
async fn whitespace_stock_code_is_forwarded_upstream() -> Result<()> {
	let server = MockServer::start_async().await;
	let app = app(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path(DAILY_PRICE_PATH).query_param("FID_INPUT_ISCD", " ");
			then.status(200).header("content-type", "application/json").body("{\"output\":[]}");
		})
		.await;
	let response =
		send(&app, Request::builder().uri("/api/stock/daily?stockCode=%20").body(Body::empty())?)
			.await?;

	mock.assert_async().await;

	assert_eq!(response.status(), StatusCode::OK);

	Ok(())
}

#[tokio::test]
async fn missing_stock_code_is_rejected_locally() -> Result<()> {
	let server = MockServer::start_async().await;
	let app = app(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path(DAILY_PRICE_PATH);
			then.status(200).body("{}");
		})
		.await;
	let response =
		send(&app, Request::builder().uri("/api/stock/daily").body(Body::empty())?).await?;

	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	assert_eq!(text(response).await?, "stockCode query parameter is required");

	mock.assert_calls_async(0).await;

	Ok(())
}

#[tokio::test]
async fn preflight_allows_any_origin_by_default() -> Result<()> {
	let server = MockServer::start_async().await;
	let app = app(&server);
	let response = send(
		&app,
		Request::builder()
			.method("OPTIONS")
			.uri("/api/stock/daily")
			.header(header::ORIGIN, "http://localhost:3000")
			.header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
			.header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization")
			.body(Body::empty())?,
	)
	.await?;

	assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

	Ok(())
}

#[tokio::test]
async fn configured_origins_restrict_cors() -> Result<()> {
	let server = MockServer::start_async().await;
	let (proxy, _) = build_test_proxy(&server);
	let origins = vec!["https://dashboard.example".to_owned()];
	let app = api::router(Arc::new(proxy)).layer(api::cors_layer(Some(origins.as_slice())));
	let allowed = send(
		&app,
		Request::builder()
			.uri("/api/token")
			.header(header::ORIGIN, "https://dashboard.example")
			.body(Body::empty())?,
	)
	.await?;

	assert_eq!(
		allowed.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
		"https://dashboard.example"
	);

	let denied = send(
		&app,
		Request::builder()
			.uri("/api/token")
			.header(header::ORIGIN, "https://evil.example")
			.body(Body::empty())?,
	)
	.await?;

	assert!(denied.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());

	Ok(())
}
