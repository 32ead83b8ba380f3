// self
use crate::obs::{FlowKind, FlowOutcome};

/// Counts one flow outcome on `stravakit_flow_total` (when `metrics` is enabled).
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	metrics::counter!(
		"stravakit_flow_total",
		"flow" => kind.as_str(),
		"outcome" => outcome.as_str()
	)
	.increment(1);

	#[cfg(not(feature = "metrics"))]
	let _ = (kind, outcome);
}

/// Counts one HTTP response on `stravakit_http_responses_total`, labeled by endpoint and
/// status class (when `metrics` is enabled).
pub fn record_response(endpoint: &'static str, status: u16) {
	#[cfg(feature = "metrics")]
	metrics::counter!(
		"stravakit_http_responses_total",
		"endpoint" => endpoint,
		"class" => status_class(status)
	)
	.increment(1);

	#[cfg(not(feature = "metrics"))]
	let _ = (endpoint, status);
}

/// Buckets a status code into the label used by [`record_response`].
pub const fn status_class(status: u16) -> &'static str {
	match status {
		100..=199 => "1xx",
		200..=299 => "2xx",
		300..=399 => "3xx",
		429 => "rate_limited",
		400..=499 => "4xx",
		500..=599 => "5xx",
		_ => "other",
	}
}
