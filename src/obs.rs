//! Observability helpers for proxy operations.
//!
//! - Spans named `kis_quote_proxy.operation` carry the `operation` and `stage` fields.
//! - With the `metrics` feature, the `kis_quote_proxy_operation_total` counter is incremented for
//!   every attempt/success/failure, labeled by `operation` + `outcome`.
//! - [`init_tracing`] installs the `fmt` subscriber used by the binary.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operations observed by the proxy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
	/// Client-credentials exchange against the upstream token endpoint.
	IssueToken,
	/// Read of the currently stored token.
	GetToken,
	/// Daily price relay.
	FetchDailyQuote,
}
impl Operation {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Operation::IssueToken => "issue_token",
			Operation::GetToken => "get_token",
			Operation::FetchDailyQuote => "fetch_daily_quote",
		}
	}
}
impl Display for Operation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
	/// Entry to an operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl Outcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Outcome::Attempt => "attempt",
			Outcome::Success => "success",
			Outcome::Failure => "failure",
		}
	}
}
impl Display for Outcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
