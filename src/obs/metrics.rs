// self
use crate::obs::{Operation, Outcome};

/// Records an operation outcome via the global metrics recorder (when enabled).
pub fn record_outcome(operation: Operation, outcome: Outcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"kis_quote_proxy_operation_total",
			"operation" => operation.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (operation, outcome);
	}
}

/// Records [`Outcome::Success`] or [`Outcome::Failure`] based on `result`.
pub fn record_result<T, E>(operation: Operation, result: &Result<T, E>) {
	let outcome = if result.is_ok() { Outcome::Success } else { Outcome::Failure };

	record_outcome(operation, outcome);
}
