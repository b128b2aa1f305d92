//! Daily price relay with server-held credential injection.

// crates.io
use oauth2::http::{
	HeaderValue, Method, Request,
	header::{AUTHORIZATION, CONTENT_TYPE},
};
use tracing::{debug, warn};
// self
use crate::{
	_prelude::*,
	error::{ConfigError, UpstreamQuoteError},
	flows::Proxy,
	http::{HttpRequest, UpstreamHttpClient, UpstreamPayload},
	obs::{self, Operation, OperationSpan, Outcome},
};

/// Query parameter carrying the instrument code on the proxy's own surface.
pub const STOCK_CODE_PARAM: &str = "stockCode";
/// `FID_COND_MRKT_DIV_CODE`: stock market.
pub const MARKET_DIV_CODE: &str = "J";
/// `FID_PERIOD_DIV_CODE`: daily granularity.
pub const PERIOD_DIV_CODE: &str = "D";
/// `FID_ORG_ADJ_PRC`: `0` includes adjusted prices, `1` uses raw prices.
pub const ADJUSTED_PRICE_FLAG: &str = "0";

impl<C> Proxy<C>
where
	C: ?Sized + UpstreamHttpClient,
{
	/// Relays a daily price inquiry for `stock_code`, authorized by the caller's token.
	///
	/// `bearer_token` is forwarded byte-for-byte in the `authorization` header and is not
	/// compared with the token held in the store: clients fetch a token once and resend it, and
	/// the upstream is the only party that decides whether it is valid. When the caller sent no
	/// token, no `authorization` header is forwarded.
	///
	/// An empty `stock_code` fails with [`Error::MissingParameter`] before any network access;
	/// any other value is forwarded exactly as supplied. A non-success upstream status fails with
	/// [`UpstreamQuoteError::Rejected`], which keeps the upstream body for relaying. The success
	/// payload is returned byte-for-byte.
	pub async fn fetch_daily_quote(
		&self,
		stock_code: &str,
		bearer_token: Option<&HeaderValue>,
	) -> Result<UpstreamPayload> {
		const OPERATION: Operation = Operation::FetchDailyQuote;

		let span = OperationSpan::new(OPERATION, "fetch_daily_quote");

		obs::record_outcome(OPERATION, Outcome::Attempt);

		let result: Result<UpstreamPayload> = span
			.instrument(async move {
				if stock_code.is_empty() {
					return Err(Error::MissingParameter { name: STOCK_CODE_PARAM });
				}

				let request = self.daily_quote_request(stock_code, bearer_token)?;
				let response =
					self.http_client.execute(request).await.map_err(UpstreamQuoteError::Transport)?;
				let status = response.status();
				let payload = UpstreamPayload::from_response(response);

				if !status.is_success() {
					return Err(
						UpstreamQuoteError::Rejected { status: status.as_u16(), payload }.into()
					);
				}

				debug!(stock_code, bytes = payload.body().len(), "Daily price relayed.");

				Ok(payload)
			})
			.await;

		if let Err(err) = &result {
			match err {
				Error::UpstreamQuote(UpstreamQuoteError::Rejected { status, payload }) => warn!(
					stock_code,
					status,
					body = %String::from_utf8_lossy(payload.body()),
					"Daily price request rejected upstream."
				),
				_ => warn!(stock_code, error = %err, "Daily price request failed."),
			}
		}

		obs::record_result(OPERATION, &result);

		result
	}

	fn daily_quote_request(
		&self,
		stock_code: &str,
		bearer_token: Option<&HeaderValue>,
	) -> Result<HttpRequest> {
		let mut url = self.descriptor.daily_price_endpoint.clone();

		url.query_pairs_mut()
			.append_pair("FID_COND_MRKT_DIV_CODE", MARKET_DIV_CODE)
			.append_pair("FID_INPUT_ISCD", stock_code)
			.append_pair("FID_PERIOD_DIV_CODE", PERIOD_DIV_CODE)
			.append_pair("FID_ORG_ADJ_PRC", ADJUSTED_PRICE_FLAG);

		let mut builder = Request::builder()
			.method(Method::GET)
			.uri(url.as_str())
			.header(CONTENT_TYPE, "application/json; charset=utf-8")
			.header("appkey", self.credentials.app_key())
			.header("appsecret", self.credentials.app_secret())
			.header("tr_id", self.descriptor.daily_price_tr_id.as_str());

		if let Some(token) = bearer_token {
			let mut token = token.clone();

			token.set_sensitive(true);

			builder = builder.header(AUTHORIZATION, token);
		}

		let request = builder.body(Vec::new()).map_err(ConfigError::from)?;

		Ok(request)
	}
}
