//! Client-level error types shared across flows, the request executor, decoders, and stores.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure or non-2xx response.
	#[error(transparent)]
	Network(#[from] NetworkError),
	/// Response payload did not match the expected shape.
	#[error(transparent)]
	Decode(#[from] DecodeError),
	/// Host-supplied authorization handoff failed or was cancelled.
	#[error(transparent)]
	Handoff(#[from] crate::auth::HandoffError),

	/// No token has been persisted yet.
	#[error("No stored token is available; authorize first.")]
	NoToken,
	/// Token carries no usable access token, so no request was attempted.
	#[error("Token carries an empty or missing access token.")]
	InvalidAccessToken,
	/// Authorization redirect did not carry a `code` query parameter.
	#[error("Authorization redirect is missing the code parameter.")]
	AuthCodeMissing,
	/// Authorization redirect echoed a `state` that does not match the pending request.
	#[error("Authorization state mismatch.")]
	StateMismatch,
	/// Stored token expired and cannot be refreshed without a refresh token.
	#[error("Stored token is missing a refresh token.")]
	MissingRefreshToken,
}
impl Error {
	/// HTTP status carried by the error, when the failure came from a response.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Network(NetworkError::Status { status, .. }) => Some(*status),
			Self::Decode(DecodeError::Json { status, .. }) => Some(*status),
			_ => None,
		}
	}
}

/// Configuration and request-construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Request body could not be serialized.
	#[error("Request body for {endpoint} could not be serialized.")]
	RequestBody {
		/// Endpoint label.
		endpoint: &'static str,
		/// Serialization failure.
		#[source]
		source: serde_json::Error,
	},
	/// Endpoint base address plus path does not form a valid URL.
	#[error("Endpoint {endpoint} resolves to an invalid URL.")]
	InvalidEndpoint {
		/// Endpoint label.
		endpoint: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Endpoint base uses a scheme the transport cannot reach.
	#[error("The {endpoint} endpoint must use http or https: {url}.")]
	UnsupportedScheme {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Client identifier is blank.
	#[error("Client identifier must not be empty.")]
	MissingClientId,
	/// Client secret is blank.
	#[error("Client secret must not be empty.")]
	MissingClientSecret,
	/// Redirect URI was not configured.
	#[error("Redirect URI is required.")]
	MissingRedirectUri,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures and non-2xx responses.
#[derive(Debug, ThisError)]
pub enum NetworkError {
	/// Upstream answered with a status outside 200-299.
	#[error("{endpoint} returned HTTP {status}: {body}")]
	Status {
		/// Endpoint label.
		endpoint: &'static str,
		/// HTTP status code.
		status: u16,
		/// Raw response body, kept for diagnosis.
		body: String,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Request did not complete before the configured timeout.
	#[error("Request to {endpoint} timed out.")]
	Timeout {
		/// Endpoint label.
		endpoint: &'static str,
	},
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling {endpoint}.")]
	Transport {
		/// Endpoint label.
		endpoint: &'static str,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the Strava API.")]
	Io(#[from] std::io::Error),
}
impl NetworkError {
	/// Wraps a transport-specific network error.
	pub fn transport(
		endpoint: &'static str,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Transport { endpoint, source: Box::new(src) }
	}
}

/// Payload shape mismatches.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Response body could not be decoded into the requested type.
	#[error("Response from {endpoint} could not be decoded at `{}`: {}.", .source.path(), .source.inner())]
	Json {
		/// Endpoint label.
		endpoint: &'static str,
		/// HTTP status of the decoded response.
		status: u16,
		/// Structured parsing failure including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Encoded polyline geometry is malformed.
	#[error(transparent)]
	Polyline(#[from] crate::polyline::PolylineError),
}
