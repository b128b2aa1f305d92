//! Client-credentials token issuance and retrieval of the stored token.
//!
//! [`Proxy::issue_token`] posts the server-held app key and secret to the upstream token
//! endpoint as a JSON body (the upstream does not accept form encoding) and stores the
//! returned token only when it is present and non-empty. Failed exchanges leave the store
//! untouched, so a previously issued token stays readable through [`Proxy::token`].

// crates.io
use oauth2::http::{
	Method, Request,
	header::{ACCEPT, CONTENT_TYPE},
};
use tracing::{info, warn};
// self
use crate::{
	_prelude::*,
	auth::TokenRecord,
	error::{ConfigError, UpstreamAuthError},
	flows::Proxy,
	http::{HttpRequest, UpstreamHttpClient, UpstreamPayload},
	obs::{self, Operation, OperationSpan, Outcome},
	store::TokenStore,
};

/// `grant_type` value sent to the token endpoint.
pub const CLIENT_CREDENTIALS_GRANT: &str = "client_credentials";

#[derive(Debug, Serialize)]
struct TokenRequestBody<'a> {
	grant_type: &'a str,
	appkey: &'a str,
	appsecret: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponseBody {
	#[serde(default)]
	access_token: Option<String>,
	#[serde(default)]
	token_type: Option<String>,
	#[serde(default)]
	expires_in: Option<i64>,
	#[serde(default)]
	access_token_token_expired: Option<String>,
}
impl TokenResponseBody {
	fn into_record(self) -> Result<TokenRecord, UpstreamAuthError> {
		let access_token = self
			.access_token
			.filter(|token| !token.trim().is_empty())
			.ok_or(UpstreamAuthError::MissingToken)?;
		let mut record = TokenRecord::new(access_token);

		if let Some(token_type) = self.token_type {
			record = record.with_token_type(token_type);
		}
		if let Some(seconds) = self.expires_in {
			record = record.with_expires_in(seconds);
		}
		if let Some(raw) = self.access_token_token_expired.as_deref() {
			record = record.with_upstream_expiry(raw);
		}

		Ok(record)
	}
}

impl<C> Proxy<C>
where
	C: ?Sized + UpstreamHttpClient,
{
	/// Exchanges the app credentials for a new access token and stores it.
	///
	/// Concurrent calls are not serialized; each successful exchange overwrites the store and
	/// the last write wins.
	pub async fn issue_token(&self) -> Result<TokenRecord> {
		const OPERATION: Operation = Operation::IssueToken;

		let span = OperationSpan::new(OPERATION, "issue_token");

		obs::record_outcome(OPERATION, Outcome::Attempt);

		let result: Result<TokenRecord> = span
			.instrument(async move {
				let request = self.token_request()?;
				let response =
					self.http_client.execute(request).await.map_err(UpstreamAuthError::Transport)?;
				let status = response.status();
				let payload = UpstreamPayload::from_response(response);

				if !status.is_success() {
					return Err(UpstreamAuthError::Rejected {
						status: status.as_u16(),
						body: String::from_utf8_lossy(payload.body()).into_owned(),
					}
					.into());
				}

				let record = payload
					.json::<TokenResponseBody>()
					.map_err(|source| UpstreamAuthError::Malformed { source })?
					.into_record()?;

				<dyn TokenStore>::save(self.store.as_ref(), record.clone()).await?;

				info!(
					token_type = ?record.token_type,
					expires_in = ?record.expires_in,
					upstream_expires_at = ?record.upstream_expires_at,
					"Access token issued."
				);

				Ok(record)
			})
			.await;

		if let Err(err) = &result {
			warn!(error = %err, "Access token issuance failed.");
		}

		obs::record_result(OPERATION, &result);

		result
	}

	/// Returns the most recently issued token.
	///
	/// Fails with [`Error::TokenUnavailable`] until the first successful [`Proxy::issue_token`].
	pub async fn token(&self) -> Result<TokenRecord> {
		const OPERATION: Operation = Operation::GetToken;

		let span = OperationSpan::new(OPERATION, "token");

		obs::record_outcome(OPERATION, Outcome::Attempt);

		let result: Result<TokenRecord> = span
			.instrument(async move {
				<dyn TokenStore>::fetch(self.store.as_ref()).await?.ok_or(Error::TokenUnavailable)
			})
			.await;

		if let Err(err) = &result {
			warn!(error = %err, "Access token requested but unavailable.");
		}

		obs::record_result(OPERATION, &result);

		result
	}

	fn token_request(&self) -> Result<HttpRequest> {
		let body = TokenRequestBody {
			grant_type: CLIENT_CREDENTIALS_GRANT,
			appkey: self.credentials.app_key(),
			appsecret: self.credentials.app_secret(),
		};
		let body = serde_json::to_vec(&body).map_err(ConfigError::RequestBody)?;
		let request = Request::builder()
			.method(Method::POST)
			.uri(self.descriptor.token_endpoint.as_str())
			.header(CONTENT_TYPE, "application/json; charset=UTF-8")
			.header(ACCEPT, "application/json")
			.body(body)
			.map_err(ConfigError::from)?;

		Ok(request)
	}
}
