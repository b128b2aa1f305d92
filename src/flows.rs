//! Proxy operations: token issuance, token retrieval, and the daily quote relay.

mod daily_quote;
mod issue_token;

pub use daily_quote::*;
pub use issue_token::*;

// self
use crate::{
	_prelude::*,
	auth::Credentials,
	http::{ReqwestHttpClient, UpstreamHttpClient},
	store::TokenStore,
	upstream::UpstreamDescriptor,
};

/// Proxy specialized for the crate's default reqwest transport.
pub type ReqwestProxy = Proxy<ReqwestHttpClient>;

/// Injects server-held credentials into calls against a single upstream descriptor.
///
/// The proxy owns the HTTP client, token store, descriptor, and credentials so each operation
/// only carries its own request logic. It is shared across request handlers behind an [`Arc`];
/// every field is read-only except the store, which synchronizes itself.
pub struct Proxy<C>
where
	C: ?Sized + UpstreamHttpClient,
{
	/// HTTP client used for every outbound upstream request.
	pub http_client: Arc<C>,
	/// Store holding the most recently issued access token.
	pub store: Arc<dyn TokenStore>,
	/// Upstream endpoint descriptor.
	pub descriptor: UpstreamDescriptor,
	/// App key + secret injected into upstream requests.
	pub credentials: Credentials,
}
impl<C> Proxy<C>
where
	C: ?Sized + UpstreamHttpClient,
{
	/// Creates a proxy that reuses the caller-provided transport.
	pub fn with_http_client(
		store: Arc<dyn TokenStore>,
		descriptor: UpstreamDescriptor,
		credentials: Credentials,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self { http_client: http_client.into(), store, descriptor, credentials }
	}
}
impl Proxy<ReqwestHttpClient> {
	/// Creates a proxy backed by a default reqwest transport.
	///
	/// The default client has no request timeout; use [`Proxy::with_http_client`] with
	/// [`ReqwestHttpClient::with_timeout`] to bound upstream calls.
	pub fn new(
		store: Arc<dyn TokenStore>,
		descriptor: UpstreamDescriptor,
		credentials: Credentials,
	) -> Self {
		Self::with_http_client(store, descriptor, credentials, ReqwestHttpClient::default())
	}
}
impl<C> Clone for Proxy<C>
where
	C: ?Sized + UpstreamHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			store: self.store.clone(),
			descriptor: self.descriptor.clone(),
			credentials: self.credentials.clone(),
		}
	}
}
impl<C> Debug for Proxy<C>
where
	C: ?Sized + UpstreamHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Proxy")
			.field("descriptor", &self.descriptor)
			.field("credentials", &self.credentials)
			.finish()
	}
}
