//! Token lifecycle manager: authorization, refresh, revocation, and authenticated calls.

pub mod authorize;
pub mod deauthorize;
pub mod refresh;

pub use authorize::*;
pub use refresh::*;

// self
use crate::{
	_prelude::*,
	auth::Token,
	config::StravaConfig,
	endpoint::Endpoint,
	executor::{RequestExecutor, TransportErrorMapper},
	http::StravaHttpClient,
	store::TokenStore,
};
#[cfg(feature = "reqwest")]
use crate::{executor::ReqwestTransportErrorMapper, http::ReqwestHttpClient};

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport stack.
pub type ReqwestStravaClient = StravaClient<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Last observed phase of the token lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AuthState {
	/// No usable token is known.
	Unauthenticated,
	/// An authorization request is waiting for its redirect.
	Authorizing,
	/// A valid token was stored or returned.
	Authorized,
	/// A refresh call is in flight.
	Refreshing,
}

/// Strava API client owning the token lifecycle for a single athlete.
///
/// The client owns the request executor, the token store, and the validated configuration. All
/// clones share the same store, refresh guard, lifecycle state, and metrics, so refreshes stay
/// single-flight across clones.
pub struct StravaClient<C, M>
where
	C: ?Sized + StravaHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Executor that sends every request.
	pub executor: RequestExecutor<C, M>,
	/// Store holding the persisted token.
	pub store: Arc<dyn TokenStore>,
	/// Validated client configuration.
	pub config: StravaConfig,
	/// Shared metrics recorder for refresh flow outcomes.
	pub refresh_metrics: Arc<RefreshMetrics>,
	refresh_guard: Arc<AsyncMutex<()>>,
	state: Arc<RwLock<AuthState>>,
	pending_state: Arc<Mutex<Option<String>>>,
}
impl<C, M> StravaClient<C, M>
where
	C: ?Sized + StravaHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a client that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		store: Arc<dyn TokenStore>,
		config: StravaConfig,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		let executor = RequestExecutor::new(http_client, mapper, config.endpoints.clone());

		Self {
			executor,
			store,
			config,
			refresh_metrics: Default::default(),
			refresh_guard: Default::default(),
			state: Arc::new(RwLock::new(AuthState::Unauthenticated)),
			pending_state: Default::default(),
		}
	}

	/// Last observed lifecycle phase.
	pub fn auth_state(&self) -> AuthState {
		*self.state.read()
	}

	/// Returns a token that is valid now, refreshing the stored one when it has expired.
	pub async fn get_valid_token(&self) -> Result<Token> {
		let Some(token) = self.store.get().await? else {
			self.set_state(AuthState::Unauthenticated);

			return Err(Error::NoToken);
		};

		self.refresh_if_needed(token).await
	}

	/// Whether a valid token is available, refreshing if needed. Never fails.
	pub async fn is_authenticated(&self) -> bool {
		self.get_valid_token().await.is_ok()
	}

	/// Performs an authenticated request with a valid token and decodes the response into `T`.
	pub async fn perform<T>(&self, endpoint: &Endpoint) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let token = self.get_valid_token().await?;

		self.executor.perform(endpoint, &token).await
	}

	fn set_state(&self, state: AuthState) {
		*self.state.write() = state;
	}
}
#[cfg(feature = "reqwest")]
impl StravaClient<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a client backed by its own reqwest transport.
	///
	/// The transport applies [`StravaConfig::request_timeout`] and never follows redirects.
	pub fn new(store: Arc<dyn TokenStore>, config: StravaConfig) -> Result<Self> {
		let http_client = ReqwestHttpClient::from_config(&config)?;

		let mapper = Arc::new(ReqwestTransportErrorMapper);

		Ok(Self::with_http_client(store, config, http_client, mapper))
	}
}
impl<C, M> Clone for StravaClient<C, M>
where
	C: ?Sized + StravaHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self {
			executor: self.executor.clone(),
			store: self.store.clone(),
			config: self.config.clone(),
			refresh_metrics: self.refresh_metrics.clone(),
			refresh_guard: self.refresh_guard.clone(),
			state: self.state.clone(),
			pending_state: self.pending_state.clone(),
		}
	}
}
impl<C, M> Debug for StravaClient<C, M>
where
	C: ?Sized + StravaHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("StravaClient")
			.field("config", &self.config)
			.field("auth_state", &self.auth_state())
			.finish()
	}
}
