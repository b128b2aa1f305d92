//! Upstream endpoint descriptor for the KIS Open API.
//!
//! Both endpoints live on one host. [`UpstreamDescriptor::from_base_url`] derives them from that
//! host so the production server, the paper-trading server, and local mocks differ only in
//! their base URL.

// crates.io
use url::Host;
// self
use crate::_prelude::*;

/// Production REST host.
pub const DEFAULT_BASE_URL: &str = "https://openapi.koreainvestment.com:9443";
/// Client-credentials token endpoint path.
pub const TOKEN_PATH: &str = "/oauth2/tokenP";
/// Domestic daily price inquiry path.
pub const DAILY_PRICE_PATH: &str = "/uapi/domestic-stock/v1/quotations/inquire-daily-price";
/// Transaction identifier selecting the domestic daily price inquiry.
pub const DAILY_PRICE_TR_ID: &str = "FHKST01010400";

/// Errors raised while constructing or validating descriptors.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum UpstreamDescriptorError {
	/// Base URL or endpoint could not be parsed or joined.
	#[error("Upstream URL `{url}` is invalid: {source}.")]
	InvalidUrl {
		/// Offending input.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Endpoints must use HTTPS unless they point at a loopback host.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Transaction identifier is blank.
	#[error("Daily price transaction identifier must not be empty.")]
	EmptyTrId,
}

/// Immutable upstream descriptor consumed by flows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpstreamDescriptor {
	/// OAuth client-credentials endpoint.
	pub token_endpoint: Url,
	/// Daily price inquiry endpoint.
	pub daily_price_endpoint: Url,
	/// `tr_id` header value sent with daily price inquiries.
	pub daily_price_tr_id: String,
}
impl UpstreamDescriptor {
	/// Creates a new builder.
	pub fn builder() -> UpstreamDescriptorBuilder {
		UpstreamDescriptorBuilder::default()
	}

	/// Derives both endpoints from a base URL such as [`DEFAULT_BASE_URL`].
	pub fn from_base_url(base: &str) -> Result<Self, UpstreamDescriptorError> {
		let base = parse_url(base)?;
		let token = join(&base, TOKEN_PATH)?;
		let daily_price = join(&base, DAILY_PRICE_PATH)?;

		Self::builder().token_endpoint(token).daily_price_endpoint(daily_price).build()
	}

	fn validate(&self) -> Result<(), UpstreamDescriptorError> {
		validate_endpoint("token", &self.token_endpoint)?;
		validate_endpoint("daily price", &self.daily_price_endpoint)?;

		if self.daily_price_tr_id.trim().is_empty() {
			return Err(UpstreamDescriptorError::EmptyTrId);
		}

		Ok(())
	}
}

/// Builder for [`UpstreamDescriptor`] values.
#[derive(Debug, Default)]
pub struct UpstreamDescriptorBuilder {
	/// Token endpoint.
	pub token_endpoint: Option<Url>,
	/// Daily price endpoint.
	pub daily_price_endpoint: Option<Url>,
	/// Overrides [`DAILY_PRICE_TR_ID`].
	pub daily_price_tr_id: Option<String>,
}
impl UpstreamDescriptorBuilder {
	/// Sets the token endpoint.
	pub fn token_endpoint(mut self, url: Url) -> Self {
		self.token_endpoint = Some(url);

		self
	}

	/// Sets the daily price endpoint.
	pub fn daily_price_endpoint(mut self, url: Url) -> Self {
		self.daily_price_endpoint = Some(url);

		self
	}

	/// Overrides the daily price `tr_id`.
	pub fn daily_price_tr_id(mut self, tr_id: impl Into<String>) -> Self {
		self.daily_price_tr_id = Some(tr_id.into());

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	///
	/// Missing endpoints fall back to the production host.
	pub fn build(self) -> Result<UpstreamDescriptor, UpstreamDescriptorError> {
		let base = parse_url(DEFAULT_BASE_URL)?;
		let token_endpoint = match self.token_endpoint {
			Some(url) => url,
			None => join(&base, TOKEN_PATH)?,
		};
		let daily_price_endpoint = match self.daily_price_endpoint {
			Some(url) => url,
			None => join(&base, DAILY_PRICE_PATH)?,
		};
		let descriptor = UpstreamDescriptor {
			token_endpoint,
			daily_price_endpoint,
			daily_price_tr_id: self.daily_price_tr_id.unwrap_or_else(|| DAILY_PRICE_TR_ID.into()),
		};

		descriptor.validate()?;

		Ok(descriptor)
	}
}

fn parse_url(raw: &str) -> Result<Url, UpstreamDescriptorError> {
	Url::parse(raw.trim())
		.map_err(|source| UpstreamDescriptorError::InvalidUrl { url: raw.to_owned(), source })
}

fn join(base: &Url, path: &str) -> Result<Url, UpstreamDescriptorError> {
	base.join(path)
		.map_err(|source| UpstreamDescriptorError::InvalidUrl { url: base.to_string(), source })
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), UpstreamDescriptorError> {
	let secure = match url.scheme() {
		"https" => true,
		"http" => is_loopback(url),
		_ => false,
	};

	if secure {
		Ok(())
	} else {
		Err(UpstreamDescriptorError::InsecureEndpoint { endpoint: name, url: url.to_string() })
	}
}

fn is_loopback(url: &Url) -> bool {
	match url.host() {
		Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
		Some(Host::Ipv4(ip)) => ip.is_loopback(),
		Some(Host::Ipv6(ip)) => ip.is_loopback(),
		None => false,
	}
}
