//! Issued access token record and the advisory metadata upstream reports alongside it.

// crates.io
use time::{PrimitiveDateTime, macros::format_description};
// self
use crate::{_prelude::*, auth::token::secret::Secret};

/// Access token issued by the upstream OAuth endpoint.
///
/// Expiry data is informational only. The proxy never refreshes or invalidates a record; a new
/// successful issuance simply replaces it in the store.
#[derive(Clone)]
pub struct TokenRecord {
	/// Access token secret; callers must avoid logging it.
	pub access_token: Secret,
	/// Token type reported upstream (`Bearer`), when present.
	pub token_type: Option<String>,
	/// Instant the proxy received the token.
	pub issued_at: OffsetDateTime,
	/// Lifetime reported upstream via `expires_in`.
	pub expires_in: Option<Duration>,
	/// Upstream wall-clock expiry (`access_token_token_expired`, KST, no offset).
	pub upstream_expires_at: Option<PrimitiveDateTime>,
}
impl TokenRecord {
	/// Creates a record issued now with no upstream metadata.
	pub fn new(access_token: impl Into<String>) -> Self {
		Self {
			access_token: Secret::new(access_token),
			token_type: None,
			issued_at: OffsetDateTime::now_utc(),
			expires_in: None,
			upstream_expires_at: None,
		}
	}

	/// Sets the token type.
	pub fn with_token_type(mut self, token_type: impl Into<String>) -> Self {
		self.token_type = Some(token_type.into());

		self
	}

	/// Sets the reported lifetime; non-positive values are ignored.
	pub fn with_expires_in(mut self, seconds: i64) -> Self {
		self.expires_in = (seconds > 0).then_some(Duration::seconds(seconds));

		self
	}

	/// Parses the upstream `YYYY-MM-DD HH:MM:SS` expiry; unparsable values are dropped.
	pub fn with_upstream_expiry(mut self, raw: &str) -> Self {
		self.upstream_expires_at = parse_upstream_datetime(raw);

		self
	}

	/// Overrides the issued-at instant.
	pub fn with_issued_at(mut self, instant: OffsetDateTime) -> Self {
		self.issued_at = instant;

		self
	}
}
impl Debug for TokenRecord {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenRecord")
			.field("access_token", &self.access_token)
			.field("token_type", &self.token_type)
			.field("issued_at", &self.issued_at)
			.field("expires_in", &self.expires_in)
			.field("upstream_expires_at", &self.upstream_expires_at)
			.finish()
	}
}

fn parse_upstream_datetime(raw: &str) -> Option<PrimitiveDateTime> {
	let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

	PrimitiveDateTime::parse(raw.trim(), format).ok()
}
