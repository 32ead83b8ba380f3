//! Single-flight refresh of the stored token.
//!
//! Refreshes are serialized behind one guard per client. A caller that acquires the guard first
//! re-reads the store: if another caller already replaced the expired token, the stored token is
//! returned without a network call. Otherwise a `grant_type=refresh_token` exchange runs and its
//! result replaces the stored token before the guard is released.

mod metrics;

pub use metrics::{RefreshMetrics, RefreshSnapshot};

// self
use crate::{
	_prelude::*,
	auth::Token,
	endpoint::Endpoint,
	executor::TransportErrorMapper,
	flows::{AuthState, StravaClient},
	http::StravaHttpClient,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

impl<C, M> StravaClient<C, M>
where
	C: ?Sized + StravaHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Returns `token` untouched while it is valid; otherwise refreshes the stored token.
	///
	/// The refreshed token is persisted before it is returned. A response without a new refresh
	/// token keeps the previous one. Fails with [`Error::NoToken`] when the store was cleared in
	/// the meantime, and with [`Error::MissingRefreshToken`] (without sending anything) when the
	/// stored token cannot be refreshed.
	pub async fn refresh_if_needed(&self, token: Token) -> Result<Token> {
		const KIND: FlowKind = FlowKind::Refresh;

		if !token.is_expired() {
			self.set_state(AuthState::Authorized);

			return Ok(token);
		}

		let span = FlowSpan::new(KIND, "refresh_if_needed");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);
		self.refresh_metrics.record_attempt();

		let result = span.instrument(self.refresh_stored(&span)).await;

		match &result {
			Ok(_) => {
				self.refresh_metrics.record_success();
				self.set_state(AuthState::Authorized);
			},
			// The stored token is still expired, so nothing usable is held.
			Err(_) => {
				self.refresh_metrics.record_failure();
				self.set_state(AuthState::Unauthenticated);
			},
		}

		obs::record_result(KIND, result)
	}

	async fn refresh_stored(&self, span: &FlowSpan) -> Result<Token> {
		let _singleflight = self.refresh_guard.lock().await;
		let stored = self.store.get().await?.ok_or(Error::NoToken)?;

		if !stored.is_expired() {
			return Ok(stored);
		}

		let refresh_token = stored
			.refresh_token
			.clone()
			.filter(|secret| !secret.is_blank())
			.ok_or(Error::MissingRefreshToken)?;
		let endpoint = Endpoint::RefreshToken {
			client_id: self.config.client_id.clone(),
			client_secret: self.config.client_secret.clone(),
			refresh_token: refresh_token.clone(),
		};

		self.set_state(AuthState::Refreshing);
		self.refresh_metrics.record_network_refresh();

		let mut fresh: Token = self.executor.exchange(&endpoint, span).await?;

		if fresh.refresh_token.is_none() {
			fresh.refresh_token = Some(refresh_token);
		}
		if fresh.owner_profile.is_none() {
			fresh.owner_profile = stored.owner_profile;
		}

		self.store.save(fresh.clone()).await?;

		Ok(fresh)
	}
}
