//! Interactive authorization: consent URLs, host handoff, redirect handling, and code exchange.

// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::{
	_prelude::*,
	auth::{AuthorizationHandoff, Token},
	endpoint::{AuthorizeTarget, Endpoint},
	error::ConfigError,
	executor::TransportErrorMapper,
	flows::{AuthState, StravaClient},
	http::StravaHttpClient,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

const STATE_LEN: usize = 32;

/// Result of [`StravaClient::authorize`].
#[derive(Clone, Debug, PartialEq)]
pub enum AuthorizeOutcome {
	/// The web flow completed and the exchanged token was stored.
	Authorized(Token),
	/// The native app accepted the request; deliver its redirect to
	/// [`StravaClient::handle_redirect`].
	AwaitingRedirect,
}

/// Consent URLs for one authorization attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationRequest {
	/// Anti-forgery value the redirect must echo back.
	pub state: String,
	/// Native app consent URL.
	pub app_url: Url,
	/// Web consent URL.
	pub web_url: Url,
}

impl<C, M> StravaClient<C, M>
where
	C: ?Sized + StravaHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Builds the consent URLs with a fresh `state` and remembers that state for the redirect.
	///
	/// Hosts that drive the consent UI themselves can use this instead of
	/// [`authorize`](Self::authorize).
	pub fn authorization_request(&self) -> Result<AuthorizationRequest> {
		let state = random_string(STATE_LEN);
		let app_url = self.authorize_url(AuthorizeTarget::App, &state)?;
		let web_url = self.authorize_url(AuthorizeTarget::Web, &state)?;

		*self.pending_state.lock() = Some(state.clone());
		self.set_state(AuthState::Authorizing);

		Ok(AuthorizationRequest { state, app_url, web_url })
	}

	/// Runs the consent flow through `handoff`.
	///
	/// The native app URL is offered first. When the host opens it the outcome is
	/// [`AuthorizeOutcome::AwaitingRedirect`]; otherwise the web flow is presented and its redirect
	/// is exchanged for a token right away.
	pub async fn authorize(&self, handoff: &dyn AuthorizationHandoff) -> Result<AuthorizeOutcome> {
		const KIND: FlowKind = FlowKind::Authorize;

		let span = FlowSpan::new(KIND, "authorize");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let previous = self.auth_state();
		let result = span
			.instrument(async {
				let request = self.authorization_request()?;

				if handoff.attempt_native_handoff(&request.app_url).await {
					return Ok(AuthorizeOutcome::AwaitingRedirect);
				}

				let redirect = handoff
					.present_interactive_flow(&request.web_url, self.config.callback_scheme())
					.await?;

				self.handle_redirect(&redirect).await.map(AuthorizeOutcome::Authorized)
			})
			.await;

		if result.is_err() {
			self.pending_state.lock().take();
			self.set_state(previous);
		}

		obs::record_result(KIND, result)
	}

	/// Exchanges the authorization code carried by `redirect` and stores the resulting token.
	///
	/// When an authorization request is pending, the redirect's `state` must match it.
	pub async fn handle_redirect(&self, redirect: &Url) -> Result<Token> {
		const KIND: FlowKind = FlowKind::ExchangeCode;

		let span = FlowSpan::new(KIND, "handle_redirect");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(self.exchange_redirect(redirect, &span)).await;

		match &result {
			Ok(_) => self.set_state(AuthState::Authorized),
			Err(_) if self.auth_state() == AuthState::Authorizing =>
				self.set_state(AuthState::Unauthenticated),
			Err(_) => {},
		}

		obs::record_result(KIND, result)
	}

	async fn exchange_redirect(&self, redirect: &Url, span: &FlowSpan) -> Result<Token> {
		let params = redirect.query_pairs().into_owned().collect::<HashMap<_, _>>();
		let code = params
			.get("code")
			.filter(|code| !code.is_empty())
			.cloned()
			.ok_or(Error::AuthCodeMissing)?;

		{
			let mut pending = self.pending_state.lock();

			if pending.as_deref().is_some_and(|expected| {
				params.get("state").map(String::as_str) != Some(expected)
			}) {
				return Err(Error::StateMismatch);
			}

			pending.take();
		}

		let endpoint = Endpoint::ExchangeCode {
			client_id: self.config.client_id.clone(),
			client_secret: self.config.client_secret.clone(),
			code,
		};
		let token: Token = self.executor.exchange(&endpoint, span).await?;
		let _singleflight = self.refresh_guard.lock().await;

		self.store.save(token.clone()).await?;

		Ok(token)
	}

	fn authorize_url(&self, target: AuthorizeTarget, state: &str) -> Result<Url> {
		let endpoint = Endpoint::Authorize {
			client_id: self.config.client_id.clone(),
			redirect_uri: self.config.redirect_uri.clone(),
			scope: self.config.scope_param(),
			approval_prompt: self.config.approval_prompt(),
			state: Some(state.to_owned()),
			target,
		};

		endpoint.request_shape(&self.config.endpoints).url().map_err(|source| {
			ConfigError::InvalidEndpoint { endpoint: endpoint.name(), source }.into()
		})
	}
}

fn random_string(len: usize) -> String {
	rand::rng().sample_iter(Alphanumeric).take(len).map(char::from).collect()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn random_state_is_alphanumeric() {
		let state = random_string(STATE_LEN);

		assert_eq!(state.len(), STATE_LEN);
		assert!(state.chars().all(|c| c.is_ascii_alphanumeric()));
		assert_ne!(state, random_string(STATE_LEN));
	}
}
