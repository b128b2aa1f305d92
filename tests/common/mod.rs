//! Helpers shared by the integration tests.

#![allow(dead_code)]

// std
use std::sync::Arc;
// crates.io
use axum::http::{HeaderMap, StatusCode};
use httpmock::MockServer;
use kis_quote_proxy::{
	auth::Credentials,
	flows::{Proxy, ReqwestProxy},
	http::{HttpFuture, HttpRequest, HttpResponse, ReqwestHttpClient, UpstreamHttpClient},
	reqwest::Client as ReqwestClient,
	store::{MemoryStore, TokenStore},
	upstream::UpstreamDescriptor,
};
use parking_lot::Mutex;

pub const APP_KEY: &str = "test-app-key";
pub const APP_SECRET: &str = "test-app-secret";

/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by `httpmock`.
pub fn test_reqwest_http_client() -> ReqwestHttpClient {
	let client = ReqwestClient::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.build()
		.expect("Failed to build insecure Reqwest client for tests.");

	ReqwestHttpClient::with_client(client)
}

pub fn test_credentials() -> Credentials {
	Credentials::new(APP_KEY, APP_SECRET).expect("Credential fixture should be valid.")
}

pub fn descriptor_for(server: &MockServer) -> UpstreamDescriptor {
	UpstreamDescriptor::from_base_url(&server.base_url())
		.expect("Mock server descriptor should build.")
}

/// Constructs a proxy against `server`, returning the backing store for inspection.
pub fn build_test_proxy(server: &MockServer) -> (ReqwestProxy, Arc<MemoryStore>) {
	let store_backend = Arc::new(MemoryStore::default());
	let store: Arc<dyn TokenStore> = store_backend.clone();
	let proxy = ReqwestProxy::with_http_client(
		store,
		descriptor_for(server),
		test_credentials(),
		test_reqwest_http_client(),
	);

	(proxy, store_backend)
}

/// Request line and headers captured by [`RecordingHttpClient`].
#[derive(Clone, Debug)]
pub struct RecordedRequest {
	pub uri: String,
	pub headers: HeaderMap,
}

/// Transport that records every request and answers with a canned response.
#[derive(Debug)]
pub struct RecordingHttpClient {
	status: StatusCode,
	body: Vec<u8>,
	requests: Mutex<Vec<RecordedRequest>>,
}
impl RecordingHttpClient {
	pub fn new(status: u16, body: &[u8]) -> Self {
		let status = StatusCode::from_u16(status).expect("Canned status should be valid.");

		Self { status, body: body.to_vec(), requests: Mutex::new(Vec::new()) }
	}

	pub fn calls(&self) -> usize {
		self.requests.lock().len()
	}

	pub fn last_request(&self) -> Option<RecordedRequest> {
		self.requests.lock().last().cloned()
	}
}
impl UpstreamHttpClient for RecordingHttpClient {
	fn execute(&self, request: HttpRequest) -> HttpFuture<'_> {
		self.requests.lock().push(RecordedRequest {
			uri: request.uri().to_string(),
			headers: request.headers().clone(),
		});

		let mut response = HttpResponse::new(self.body.clone());

		*response.status_mut() = self.status;

		Box::pin(async move { Ok(response) })
	}
}

/// Proxy driven by a [`RecordingHttpClient`] against a loopback descriptor nothing listens on.
pub fn build_recording_proxy(client: Arc<RecordingHttpClient>) -> Proxy<RecordingHttpClient> {
	let descriptor = UpstreamDescriptor::from_base_url("http://127.0.0.1:1")
		.expect("Loopback descriptor should build.");

	Proxy::with_http_client(
		Arc::new(MemoryStore::default()),
		descriptor,
		test_credentials(),
		client,
	)
}
