//! Proxy-level error types shared across flows, the token store, and the HTTP surface.

// self
use crate::{_prelude::*, http::UpstreamPayload};

/// Proxy-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical proxy error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Token exchange with the upstream OAuth endpoint failed.
	#[error(transparent)]
	UpstreamAuth(#[from] UpstreamAuthError),
	/// Daily quote request to the upstream market-data endpoint failed.
	#[error(transparent)]
	UpstreamQuote(#[from] UpstreamQuoteError),
	/// Listener could not be bound or the server loop failed.
	#[error("HTTP server failed.")]
	Serve(#[source] std::io::Error),

	/// Required request input is absent; detected before any upstream call.
	#[error("Required parameter `{name}` is missing.")]
	MissingParameter {
		/// Name of the missing parameter as the caller spells it.
		name: &'static str,
	},
	/// No access token has been issued yet.
	#[error("Access token is not available.")]
	TokenUnavailable,
}

/// Configuration and request-construction failures raised locally.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Token request body could not be serialized.
	#[error("Token request body could not be serialized.")]
	RequestBody(#[source] serde_json::Error),
	/// Required environment variable is absent or blank.
	#[error("Environment variable `{name}` must be set to a non-empty value.")]
	MissingEnv {
		/// Variable name.
		name: &'static str,
	},
	/// Environment variable is present but cannot be parsed.
	#[error("Environment variable `{name}` is invalid: {reason}.")]
	InvalidEnv {
		/// Variable name.
		name: &'static str,
		/// Parser-supplied reason string.
		reason: String,
	},
	/// Upstream descriptor contains an unusable URL.
	#[error(transparent)]
	Upstream(#[from] crate::upstream::UpstreamDescriptorError),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Failure variants of the client-credentials token exchange.
#[derive(Debug, ThisError)]
pub enum UpstreamAuthError {
	/// Network-level failure before a response arrived.
	#[error("Token endpoint could not be reached.")]
	Transport(#[source] TransportError),
	/// Upstream answered with a non-success status.
	#[error("Token endpoint rejected the request with HTTP {status}: {body}.")]
	Rejected {
		/// HTTP status code returned upstream.
		status: u16,
		/// Lossy UTF-8 rendering of the upstream body, kept for diagnostics.
		body: String,
	},
	/// Upstream answered 2xx but the body is not the expected JSON shape.
	#[error("Token endpoint returned malformed JSON.")]
	Malformed {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Upstream answered 2xx without a usable `access_token`.
	#[error("Token endpoint response did not include an access token.")]
	MissingToken,
}

/// Failure variants of the daily quote relay.
#[derive(Debug, ThisError)]
pub enum UpstreamQuoteError {
	/// Network-level failure before a response arrived.
	#[error("Daily price endpoint could not be reached.")]
	Transport(#[source] TransportError),
	/// Upstream answered with a non-success status; the payload is relayed to the caller.
	#[error("Daily price endpoint rejected the request with HTTP {status}.")]
	Rejected {
		/// HTTP status code returned upstream.
		status: u16,
		/// Upstream error body, untouched.
		payload: UpstreamPayload,
	},
}
impl UpstreamQuoteError {
	/// Returns the upstream error body when one was received and is non-empty.
	pub fn payload(&self) -> Option<&UpstreamPayload> {
		match self {
			Self::Rejected { payload, .. } if !payload.is_empty() => Some(payload),
			_ => None,
		}
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the upstream API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Request timed out under the configured upstream timeout.
	#[error("Request timed out while calling the upstream API.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the upstream API.")]
	Io(#[from] std::io::Error),
	/// Request could not be converted into the transport's request type.
	#[error("Request could not be handed to the HTTP client.")]
	Request(#[source] BoxError),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() {
			Self::Timeout { source: Box::new(e) }
		} else if e.is_builder() {
			Self::Request(Box::new(e))
		} else {
			Self::network(e)
		}
	}
}
