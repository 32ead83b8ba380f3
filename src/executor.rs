//! Authenticated request pipeline: request construction, transport call, status classification,
//! and typed decoding.

pub use oauth2;

// crates.io
use oauth2::{
	AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse,
	http::{
		HeaderMap, Method, Request,
		header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER},
	},
};
use time::format_description::well_known::Rfc2822;
// self
use crate::{
	_prelude::*,
	auth::Token,
	config::StravaEndpoints,
	endpoint::{Endpoint, HttpMethod},
	error::{ConfigError, DecodeError, NetworkError},
	http::StravaHttpClient,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

const JSON: &str = "application/json";

/// Maps HTTP transport failures into client [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted while calling `endpoint` into a client error.
	fn map_transport_error(&self, endpoint: &'static str, error: HttpClientError<E>) -> Error;
}

/// Mapping shared by every transport for the variants that do not depend on the HTTP stack.
///
/// Custom mappers can delegate here after handling their own transport error.
pub fn map_common_transport_error<E>(endpoint: &'static str, error: HttpClientError<E>) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	match error {
		HttpClientError::Reqwest(inner) =>
			NetworkError::Transport { endpoint, source: inner }.into(),
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => NetworkError::Io(inner).into(),
		HttpClientError::Other(message) =>
			NetworkError::transport(endpoint, std::io::Error::other(message)).into(),
		_ => NetworkError::transport(
			endpoint,
			std::io::Error::other("HTTP client reported an unknown failure"),
		)
		.into(),
	}
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		endpoint: &'static str,
		error: HttpClientError<ReqwestError>,
	) -> Error {
		match error {
			HttpClientError::Reqwest(inner) => map_reqwest_error(endpoint, *inner),
			other => map_common_transport_error(endpoint, other),
		}
	}
}

/// Sends [`Endpoint`] requests through a [`StravaHttpClient`] and decodes the responses.
pub struct RequestExecutor<C, M>
where
	C: ?Sized + StravaHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// HTTP client wrapper used for every outbound request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
	/// Remote addresses requests are resolved against.
	pub endpoints: StravaEndpoints,
}
impl<C, M> RequestExecutor<C, M>
where
	C: ?Sized + StravaHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates an executor over the provided transport + mapper pair.
	pub fn new(
		http_client: impl Into<Arc<C>>,
		transport_mapper: impl Into<Arc<M>>,
		endpoints: StravaEndpoints,
	) -> Self {
		Self {
			http_client: http_client.into(),
			transport_mapper: transport_mapper.into(),
			endpoints,
		}
	}

	/// Performs a bearer-authenticated request and decodes the JSON response into `T`.
	///
	/// A token without a usable access token fails with [`Error::InvalidAccessToken`] before
	/// anything is sent. Every non-2xx status surfaces as [`NetworkError::Status`]; nothing is
	/// retried.
	pub async fn perform<T>(&self, endpoint: &Endpoint, token: &Token) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let bearer = token.bearer().ok_or(Error::InvalidAccessToken)?;
		let span = FlowSpan::new(FlowKind::Resource, endpoint.name());

		obs::record_flow_outcome(FlowKind::Resource, FlowOutcome::Attempt);

		let result = span
			.instrument(async {
				let response = self.execute(endpoint, Some(bearer), &span).await?;

				decode(endpoint.name(), &response)
			})
			.await;

		obs::record_result(FlowKind::Resource, result)
	}

	/// Sends an unauthenticated request (token endpoints) and decodes the response.
	pub(crate) async fn exchange<T>(&self, endpoint: &Endpoint, span: &FlowSpan) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let response = self.execute(endpoint, None, span).await?;

		decode(endpoint.name(), &response)
	}

	/// Sends an unauthenticated request and only checks its status.
	pub(crate) async fn send(&self, endpoint: &Endpoint, span: &FlowSpan) -> Result<()> {
		self.execute(endpoint, None, span).await.map(|_| ())
	}

	async fn execute(
		&self,
		endpoint: &Endpoint,
		bearer: Option<&str>,
		span: &FlowSpan,
	) -> Result<HttpResponse> {
		let name = endpoint.name();
		let request = self.build_request(endpoint, bearer)?;
		let handle = self.http_client.handle();
		let response = handle
			.call(request)
			.await
			.map_err(|e| self.transport_mapper.map_transport_error(name, e))?;
		let status = response.status();

		span.record_status(status.as_u16());
		obs::record_response(name, status.as_u16());

		if !status.is_success() {
			return Err(NetworkError::Status {
				endpoint: name,
				status: status.as_u16(),
				body: String::from_utf8_lossy(response.body()).into_owned(),
				retry_after: parse_retry_after(response.headers()),
			}
			.into());
		}

		Ok(response)
	}

	fn build_request(&self, endpoint: &Endpoint, bearer: Option<&str>) -> Result<HttpRequest> {
		let name = endpoint.name();
		let shape = endpoint.request_shape(&self.endpoints);
		let url = shape
			.url()
			.map_err(|source| ConfigError::InvalidEndpoint { endpoint: name, source })?;
		let method = match shape.method() {
			HttpMethod::Get => Method::GET,
			HttpMethod::Post => Method::POST,
		};
		let mut builder = Request::builder().method(method).uri(url.as_str()).header(ACCEPT, JSON);

		if let Some(bearer) = bearer {
			builder = builder.header(AUTHORIZATION, format!("Bearer {bearer}"));
		}

		let body = match shape.body() {
			Some(body) => {
				builder = builder.header(CONTENT_TYPE, JSON);

				serde_json::to_vec(body)
					.map_err(|source| ConfigError::RequestBody { endpoint: name, source })?
			},
			None => Vec::new(),
		};

		builder.body(body).map_err(|e| ConfigError::from(e).into())
	}
}
impl<C, M> Clone for RequestExecutor<C, M>
where
	C: ?Sized + StravaHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			transport_mapper: self.transport_mapper.clone(),
			endpoints: self.endpoints.clone(),
		}
	}
}
impl<C, M> Debug for RequestExecutor<C, M>
where
	C: ?Sized + StravaHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RequestExecutor").field("endpoints", &self.endpoints).finish()
	}
}

fn decode<T>(endpoint: &'static str, response: &HttpResponse) -> Result<T>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(response.body());

	serde_path_to_error::deserialize(&mut deserializer).map_err(|source| {
		DecodeError::Json { endpoint, status: response.status().as_u16(), source }.into()
	})
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(endpoint: &'static str, err: ReqwestError) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}
	if err.is_timeout() {
		return NetworkError::Timeout { endpoint }.into();
	}

	NetworkError::transport(endpoint, err).into()
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u64>() {
		return Some(Duration::seconds(secs as i64));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}
