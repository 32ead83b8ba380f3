//! Optional observability helpers for client flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `stravakit.flow` with the `flow` (operation)
//!   and `stage` (call site) fields. Spans also carry an `http.status` field that is filled in once
//!   a response arrives.
//! - Enable `metrics` to increment the `stravakit_flow_total` counter for every
//!   attempt/success/failure, labeled by `flow` + `outcome`, and the
//!   `stravakit_http_responses_total` counter for every response, labeled by `endpoint` + `class`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Client operations observed by the instrumentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Interactive authorization, from URL construction to the stored token.
	Authorize,
	/// Authorization code exchange against the token endpoint.
	ExchangeCode,
	/// Refresh token exchange.
	Refresh,
	/// Token revocation.
	Deauthorize,
	/// Bearer-authenticated resource request.
	Resource,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::Authorize => "authorize",
			FlowKind::ExchangeCode => "exchange_code",
			FlowKind::Refresh => "refresh",
			FlowKind::Deauthorize => "deauthorize",
			FlowKind::Resource => "resource",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a client helper.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Records the terminal outcome of `result` for `kind` and passes the result through.
pub(crate) fn record_result<T, E>(
	kind: FlowKind,
	result: std::result::Result<T, E>,
) -> std::result::Result<T, E> {
	let outcome = if result.is_ok() { FlowOutcome::Success } else { FlowOutcome::Failure };

	record_flow_outcome(kind, outcome);

	result
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn labels_are_stable() {
		assert_eq!(FlowKind::ExchangeCode.to_string(), "exchange_code");
		assert_eq!(FlowKind::Resource.as_str(), "resource");
		assert_eq!(FlowOutcome::Failure.to_string(), "failure");
	}

	#[test]
	fn record_result_passes_values_through() {
		let ok: std::result::Result<u8, ()> = record_result(FlowKind::Refresh, Ok(7));
		let err: std::result::Result<u8, &str> = record_result(FlowKind::Refresh, Err("boom"));

		assert_eq!(ok, Ok(7));
		assert_eq!(err, Err("boom"));
	}
}
