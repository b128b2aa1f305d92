//! Transport primitives for calls to the upstream API.
//!
//! The module exposes [`UpstreamHttpClient`] alongside [`UpstreamPayload`] so the proxy can be
//! driven by any HTTP stack. Requests and responses use the `http` types re-exported by
//! `oauth2` ([`HttpRequest`] / [`HttpResponse`]); the proxy builds requests itself and only asks
//! the transport to execute them.

// std
use std::time::Duration as StdDuration;
// crates.io
pub use oauth2::{HttpRequest, HttpResponse};
use reqwest::{header::CONTENT_TYPE, redirect::Policy};
// self
use crate::{_prelude::*, error::TransportError};

/// Boxed future returned by [`UpstreamHttpClient::execute`].
pub type HttpFuture<'a> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing upstream requests.
///
/// Implementations must be `Send + Sync + 'static` so one transport can be shared by every
/// request handler, and the futures they return must be `Send` so handlers can run on a
/// multi-threaded runtime. A non-2xx status is a successful execution; only failures that
/// prevent a response from arriving are reported as [`TransportError`].
pub trait UpstreamHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and resolves to the full upstream response.
	fn execute(&self, request: HttpRequest) -> HttpFuture<'_>;
}

/// Response body received from upstream together with its declared content type.
#[derive(Clone, PartialEq, Eq)]
pub struct UpstreamPayload {
	content_type: Option<String>,
	body: Vec<u8>,
}
impl UpstreamPayload {
	/// Wraps a raw body and optional content type.
	pub fn new(content_type: Option<String>, body: Vec<u8>) -> Self {
		Self { content_type, body }
	}

	/// Splits an upstream response into its payload.
	pub fn from_response(response: HttpResponse) -> Self {
		let content_type = response
			.headers()
			.get(CONTENT_TYPE.as_str())
			.and_then(|value| value.to_str().ok())
			.map(str::to_owned);

		Self::new(content_type, response.into_body())
	}

	/// Content type declared upstream, if any.
	pub fn content_type(&self) -> Option<&str> {
		self.content_type.as_deref()
	}

	/// Raw body bytes, exactly as received.
	pub fn body(&self) -> &[u8] {
		&self.body
	}

	/// Returns `true` when upstream sent no body.
	pub fn is_empty(&self) -> bool {
		self.body.is_empty()
	}

	/// Deserializes the body, reporting the JSON path of the first mismatch.
	pub fn json<T>(&self) -> Result<T, serde_path_to_error::Error<serde_json::Error>>
	where
		T: for<'de> Deserialize<'de>,
	{
		let mut de = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut de)
	}

	/// Consumes the payload, returning the content type and body.
	pub fn into_parts(self) -> (Option<String>, Vec<u8>) {
		(self.content_type, self.body)
	}
}
impl Debug for UpstreamPayload {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("UpstreamPayload")
			.field("content_type", &self.content_type)
			.field("body", &String::from_utf8_lossy(&self.body))
			.finish()
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Upstream calls should not follow redirects; the proxy relays exactly what the configured
/// endpoint answers. Configure any custom [`ReqwestClient`] the same way before handing it to
/// [`ReqwestHttpClient::with_client`].
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client with the given request timeout and redirects disabled.
	pub fn with_timeout(timeout: StdDuration) -> Result<Self, crate::error::ConfigError> {
		let client = ReqwestClient::builder().timeout(timeout).redirect(Policy::none()).build()?;

		Ok(Self(client))
	}
}
impl UpstreamHttpClient for ReqwestHttpClient {
	fn execute(&self, request: HttpRequest) -> HttpFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let request = reqwest::Request::try_from(request)?;
			let response = client.execute(request).await?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut response_new = HttpResponse::new(response.bytes().await?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}
