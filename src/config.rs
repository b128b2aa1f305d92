//! Process configuration loaded once at startup.
//!
//! | Variable | Default |
//! |---|---|
//! | `APP_KEY` | required |
//! | `APP_SECRET` | required |
//! | `KIS_BASE_URL` | [`DEFAULT_BASE_URL`] |
//! | `HOST` | `0.0.0.0` |
//! | `PORT` | `5000` |
//! | `UPSTREAM_TIMEOUT_SECS` | `10` |
//! | `CORS_ORIGINS` | any origin |

// std
use std::{
	net::{IpAddr, Ipv4Addr, SocketAddr},
	time::Duration as StdDuration,
};
// self
use crate::{
	_prelude::*,
	auth::{APP_KEY_ENV, APP_SECRET_ENV, Credentials},
	error::ConfigError,
	upstream::{DEFAULT_BASE_URL, UpstreamDescriptor},
};

/// Default listen port.
pub const DEFAULT_PORT: u16 = 5000;
/// Default upstream request timeout.
pub const DEFAULT_UPSTREAM_TIMEOUT: StdDuration = StdDuration::from_secs(10);

const BASE_URL_ENV: &str = "KIS_BASE_URL";
const HOST_ENV: &str = "HOST";
const PORT_ENV: &str = "PORT";
const TIMEOUT_ENV: &str = "UPSTREAM_TIMEOUT_SECS";
const CORS_ORIGINS_ENV: &str = "CORS_ORIGINS";

/// Validated configuration for the proxy process.
#[derive(Clone, Debug)]
pub struct ProxyConfig {
	/// Server-held app credentials.
	pub credentials: Credentials,
	/// Upstream endpoints.
	pub descriptor: UpstreamDescriptor,
	/// Address the HTTP server binds to.
	pub listen_addr: SocketAddr,
	/// Timeout applied to every upstream request.
	pub upstream_timeout: StdDuration,
	/// Allowed CORS origins; `None` allows any origin.
	pub cors_origins: Option<Vec<String>>,
}
impl ProxyConfig {
	/// Loads configuration from the process environment, reading `.env` first when present.
	pub fn from_env() -> Result<Self, ConfigError> {
		let _ = dotenvy::dotenv();

		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Builds configuration from an arbitrary variable source.
	///
	/// Blank values count as unset. Missing credentials fail immediately instead of letting
	/// empty values reach upstream requests.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
		let app_key = var(APP_KEY_ENV).ok_or(ConfigError::MissingEnv { name: APP_KEY_ENV })?;
		let app_secret =
			var(APP_SECRET_ENV).ok_or(ConfigError::MissingEnv { name: APP_SECRET_ENV })?;
		let credentials = Credentials::new(app_key, app_secret)?;
		let base_url = var(BASE_URL_ENV).unwrap_or_else(|| DEFAULT_BASE_URL.into());
		let descriptor = UpstreamDescriptor::from_base_url(&base_url)?;
		let host = match var(HOST_ENV) {
			Some(raw) => parse_env::<IpAddr>(HOST_ENV, &raw)?,
			None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
		};
		let port = match var(PORT_ENV) {
			Some(raw) => parse_env::<u16>(PORT_ENV, &raw)?,
			None => DEFAULT_PORT,
		};
		let upstream_timeout = match var(TIMEOUT_ENV) {
			Some(raw) => match parse_env::<u64>(TIMEOUT_ENV, &raw)? {
				0 =>
					return Err(ConfigError::InvalidEnv {
						name: TIMEOUT_ENV,
						reason: "timeout must be at least one second".into(),
					}),
				secs => StdDuration::from_secs(secs),
			},
			None => DEFAULT_UPSTREAM_TIMEOUT,
		};
		let cors_origins = var(CORS_ORIGINS_ENV).map(|raw| {
			raw.split(',')
				.map(str::trim)
				.filter(|origin| !origin.is_empty())
				.map(str::to_owned)
				.collect::<Vec<_>>()
		});

		Ok(Self {
			credentials,
			descriptor,
			listen_addr: SocketAddr::new(host, port),
			upstream_timeout,
			cors_origins,
		})
	}
}

fn parse_env<T>(name: &'static str, raw: &str) -> Result<T, ConfigError>
where
	T: std::str::FromStr,
	T::Err: Display,
{
	raw.trim()
		.parse()
		.map_err(|e: T::Err| ConfigError::InvalidEnv { name, reason: e.to_string() })
}
