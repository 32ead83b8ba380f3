//! Host-supplied capability that drives the interactive part of authorization.

// self
use crate::_prelude::*;

/// Boxed future returned by [`AuthorizationHandoff`] methods.
pub type HandoffFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a + Send>>;

/// Bridges the client to whatever UI can show the Strava consent screen.
///
/// The client first offers the native app URL. If the host cannot open it, the web authorize URL
/// is handed to [`present_interactive_flow`](AuthorizationHandoff::present_interactive_flow),
/// which must resolve with the redirect URL that carries the authorization code.
pub trait AuthorizationHandoff
where
	Self: Send + Sync,
{
	/// Tries to open the native Strava app; returns `true` when the app accepted the request.
	///
	/// When accepted, the host later delivers the redirect through
	/// [`StravaClient::handle_redirect`](crate::flows::StravaClient::handle_redirect).
	fn attempt_native_handoff<'a>(&'a self, app_url: &'a Url) -> HandoffFuture<'a, bool>;

	/// Presents the web consent flow and resolves with the final redirect URL.
	fn present_interactive_flow<'a>(
		&'a self,
		web_url: &'a Url,
		callback_scheme: &'a str,
	) -> HandoffFuture<'a, Result<Url, HandoffError>>;
}

/// Failures reported by an [`AuthorizationHandoff`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum HandoffError {
	/// The user dismissed the consent screen.
	#[error("Authorization was cancelled by the user.")]
	Cancelled,
	/// The host could not present the consent screen.
	#[error("Authorization handoff failed: {message}.")]
	Failed {
		/// Human-readable reason from the host.
		message: String,
	},
}
