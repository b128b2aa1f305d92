//! HTTP surface exposing the proxy operations to browser clients.
//!
//! | Method & Path | Operation |
//! |---|---|
//! | `POST /api/access-token` | [`Proxy::issue_token`] |
//! | `GET /api/token` | [`Proxy::token`] |
//! | `GET /api/stock/daily?stockCode=<code>` | [`Proxy::fetch_daily_quote`] |

// crates.io
use axum::{
	Json, Router,
	body::Body,
	extract::{Query, State},
	http::{
		HeaderMap, HeaderValue, Method, StatusCode,
		header::{AUTHORIZATION, CONTENT_TYPE},
	},
	response::{IntoResponse, Response},
	routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::{
	cors::{AllowOrigin, CorsLayer},
	trace::TraceLayer,
};
use tracing::{error, info, warn};
// self
use crate::{
	_prelude::*,
	auth::TokenRecord,
	config::ProxyConfig,
	error::UpstreamQuoteError,
	flows::{Proxy, ReqwestProxy},
	http::{ReqwestHttpClient, UpstreamHttpClient, UpstreamPayload},
	store::MemoryStore,
};

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Body returned by both token routes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenBody {
	/// Raw access token value.
	#[serde(rename = "accessToken")]
	pub access_token: String,
}
impl From<&TokenRecord> for AccessTokenBody {
	fn from(record: &TokenRecord) -> Self {
		Self { access_token: record.access_token.expose().to_owned() }
	}
}

#[derive(Debug, Deserialize)]
struct DailyQuoteParams {
	#[serde(rename = "stockCode", default)]
	stock_code: Option<String>,
}

/// Builds the routes backed by `proxy`.
///
/// No middleware is attached; [`serve`] adds CORS and request tracing.
pub fn router<C>(proxy: Arc<Proxy<C>>) -> Router
where
	C: UpstreamHttpClient,
{
	Router::new()
		.route("/api/access-token", post(issue_token::<C>))
		.route("/api/token", get(token::<C>))
		.route("/api/stock/daily", get(daily_quote::<C>))
		.with_state(proxy)
}

/// CORS policy for the routes.
///
/// `None` or a list without a single valid origin allows any origin.
pub fn cors_layer(origins: Option<&[String]>) -> CorsLayer {
	let allow_origin = match origins {
		Some(origins) => {
			let origins = origins
				.iter()
				.filter_map(|origin| HeaderValue::from_str(origin).ok())
				.collect::<Vec<_>>();

			if origins.is_empty() {
				warn!("CORS_ORIGINS contains no valid origin; allowing any origin.");

				AllowOrigin::any()
			} else {
				info!(count = origins.len(), "CORS restricted to configured origins.");

				AllowOrigin::list(origins)
			}
		},
		None => AllowOrigin::any(),
	};

	CorsLayer::new()
		.allow_origin(allow_origin)
		.allow_methods([Method::GET, Method::POST, Method::OPTIONS])
		.allow_headers([CONTENT_TYPE, AUTHORIZATION])
}

/// Binds the configured address and serves until Ctrl+C.
pub async fn serve(config: ProxyConfig) -> Result<()> {
	let http_client = ReqwestHttpClient::with_timeout(config.upstream_timeout)?;
	let proxy = ReqwestProxy::with_http_client(
		Arc::new(MemoryStore::default()),
		config.descriptor,
		config.credentials,
		http_client,
	);
	let app = router(Arc::new(proxy))
		.layer(cors_layer(config.cors_origins.as_deref()))
		.layer(TraceLayer::new_for_http());
	let listener = TcpListener::bind(config.listen_addr).await.map_err(Error::Serve)?;

	info!(addr = %config.listen_addr, "Server running.");

	axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await.map_err(Error::Serve)
}

async fn shutdown_signal() {
	if let Err(e) = tokio::signal::ctrl_c().await {
		warn!(error = %e, "Ctrl+C handler could not be installed; running until killed.");

		std::future::pending::<()>().await;
	}

	info!("Shutdown signal received.");
}

async fn issue_token<C>(State(proxy): State<Arc<Proxy<C>>>) -> Result<Json<AccessTokenBody>>
where
	C: UpstreamHttpClient,
{
	let record = proxy.issue_token().await?;

	Ok(Json(AccessTokenBody::from(&record)))
}

async fn token<C>(State(proxy): State<Arc<Proxy<C>>>) -> Result<Json<AccessTokenBody>>
where
	C: UpstreamHttpClient,
{
	let record = proxy.token().await?;

	Ok(Json(AccessTokenBody::from(&record)))
}

async fn daily_quote<C>(
	State(proxy): State<Arc<Proxy<C>>>,
	headers: HeaderMap,
	Query(params): Query<DailyQuoteParams>,
) -> Result<Response>
where
	C: UpstreamHttpClient,
{
	let stock_code = params.stock_code.unwrap_or_default();
	let payload = proxy.fetch_daily_quote(&stock_code, headers.get(AUTHORIZATION)).await?;

	Ok(relay(StatusCode::OK, payload))
}

fn relay(status: StatusCode, payload: UpstreamPayload) -> Response {
	let (content_type, body) = payload.into_parts();
	let content_type = content_type.unwrap_or_else(|| JSON_CONTENT_TYPE.into());

	(status, [(CONTENT_TYPE, content_type)], Body::from(body)).into_response()
}

impl IntoResponse for Error {
	fn into_response(self) -> Response {
		const INTERNAL: StatusCode = StatusCode::INTERNAL_SERVER_ERROR;

		match self {
			Error::MissingParameter { name } =>
				(StatusCode::BAD_REQUEST, format!("{name} query parameter is required"))
					.into_response(),
			Error::TokenUnavailable => (INTERNAL, "Access token not available").into_response(),
			Error::UpstreamAuth(_) => (INTERNAL, "Failed to generate access token").into_response(),
			Error::UpstreamQuote(UpstreamQuoteError::Rejected { payload, .. })
				if !payload.is_empty() =>
				relay(INTERNAL, payload),
			Error::UpstreamQuote(_) =>
				(INTERNAL, "Failed to retrieve daily stock data").into_response(),
			err @ (Error::Config(_) | Error::Storage(_) | Error::Serve(_)) => {
				error!(error = %err, "Request failed on the proxy side.");

				(INTERNAL, "Internal server error").into_response()
			},
		}
	}
}
