//! Token revocation.

// self
use crate::{
	_prelude::*,
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
	/// Clears the stored token and revokes it upstream when it was still valid.
	///
	/// The store is emptied before the revoke call, so it stays empty even when revocation fails.
	/// An expired or missing token is deleted locally without any network call.
	pub async fn deauthorize(&self) -> Result<()> {
		const KIND: FlowKind = FlowKind::Deauthorize;

		let span = FlowSpan::new(KIND, "deauthorize");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async {
				let _singleflight = self.refresh_guard.lock().await;
				let stored = self.store.get().await;

				self.store.delete().await?;
				self.pending_state.lock().take();
				self.set_state(AuthState::Unauthenticated);

				let Some(token) = stored?.filter(|token| !token.is_expired()) else {
					return Ok(());
				};
				let access_token = token
					.access_token
					.filter(|secret| !secret.is_blank())
					.ok_or(Error::InvalidAccessToken)?;

				self.executor.send(&Endpoint::Deauthorize { access_token }, &span).await
			})
			.await;

		obs::record_result(KIND, result)
	}
}
