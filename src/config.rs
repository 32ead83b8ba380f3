//! Client configuration: application credentials, redirect, scopes, and endpoint addresses.

// std
use std::time::Duration as StdDuration;
// self
use crate::{_prelude::*, auth::Secret, error::ConfigError};

const DEFAULT_OAUTH_BASE: &str = "https://www.strava.com/oauth";
const DEFAULT_API_BASE: &str = "https://www.strava.com/api/v3";
const DEFAULT_WEB_AUTHORIZE: &str = "https://www.strava.com/oauth/mobile/authorize";
const DEFAULT_APP_AUTHORIZE: &str = "strava://oauth/mobile/authorize";
const DEFAULT_REQUEST_TIMEOUT: StdDuration = StdDuration::from_secs(30);

/// Base addresses for every remote surface the client talks to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StravaEndpoints {
	/// OAuth base; the token and deauthorize endpoints hang off it.
	pub oauth_base: Url,
	/// REST API base for resource requests.
	pub api_base: Url,
	/// Web consent page used by the interactive flow.
	pub web_authorize: Url,
	/// Native app consent URL offered to the host first.
	pub app_authorize: Url,
}
impl StravaEndpoints {
	/// Production Strava addresses.
	pub fn strava() -> Result<Self, ConfigError> {
		Ok(Self {
			oauth_base: parse_endpoint("oauth", DEFAULT_OAUTH_BASE)?,
			api_base: parse_endpoint("api", DEFAULT_API_BASE)?,
			web_authorize: parse_endpoint("web_authorize", DEFAULT_WEB_AUTHORIZE)?,
			app_authorize: parse_endpoint("app_authorize", DEFAULT_APP_AUTHORIZE)?,
		})
	}

	/// Validates that every network-facing base uses `http` or `https`.
	///
	/// The app authorize URL is exempt because it targets a custom scheme by nature.
	pub fn validate(&self) -> Result<(), ConfigError> {
		for (endpoint, url) in [
			("oauth", &self.oauth_base),
			("api", &self.api_base),
			("web_authorize", &self.web_authorize),
		] {
			if !matches!(url.scheme(), "http" | "https") {
				return Err(ConfigError::UnsupportedScheme { endpoint, url: url.to_string() });
			}
		}

		Ok(())
	}
}

/// Validated client configuration.
///
/// Built through [`StravaConfig::builder`]. The struct is serde-friendly so hosts can keep it in
/// a config file; `Debug` never prints the client secret.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StravaConfig {
	/// Application client identifier.
	pub client_id: String,
	/// Application client secret.
	pub client_secret: Secret,
	/// Redirect URI registered for the application.
	pub redirect_uri: Url,
	/// Requested scopes, sent comma-joined.
	pub scopes: Vec<String>,
	/// Whether the consent screen is always shown (`approval_prompt=force`).
	pub force_prompt: bool,
	/// Remote addresses.
	pub endpoints: StravaEndpoints,
	/// Per-request timeout applied to the default transport.
	#[serde(default = "default_request_timeout")]
	pub request_timeout: StdDuration,
}
impl StravaConfig {
	/// Starts a builder seeded with the application credentials.
	pub fn builder(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
	) -> StravaConfigBuilder {
		StravaConfigBuilder::new(client_id, client_secret)
	}

	/// Re-runs the checks performed by [`StravaConfigBuilder::build`].
	///
	/// Useful after deserializing a configuration from disk.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.client_id.trim().is_empty() {
			return Err(ConfigError::MissingClientId);
		}
		if self.client_secret.is_blank() {
			return Err(ConfigError::MissingClientSecret);
		}

		self.endpoints.validate()
	}

	/// Scope list as sent on the wire.
	pub fn scope_param(&self) -> String {
		self.scopes.join(",")
	}

	/// `approval_prompt` value derived from [`force_prompt`](Self::force_prompt).
	pub fn approval_prompt(&self) -> &'static str {
		if self.force_prompt { "force" } else { "auto" }
	}

	/// Scheme the interactive flow watches for; taken from the redirect URI.
	pub fn callback_scheme(&self) -> &str {
		self.redirect_uri.scheme()
	}
}

/// Builder for [`StravaConfig`].
#[derive(Clone, Debug)]
pub struct StravaConfigBuilder {
	client_id: String,
	client_secret: Secret,
	redirect_uri: Option<Url>,
	scopes: Vec<String>,
	force_prompt: bool,
	endpoints: Option<StravaEndpoints>,
	request_timeout: StdDuration,
}
impl StravaConfigBuilder {
	fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: Secret::new(client_secret),
			redirect_uri: None,
			scopes: vec!["read".into()],
			force_prompt: true,
			endpoints: None,
			request_timeout: DEFAULT_REQUEST_TIMEOUT,
		}
	}

	/// Sets the redirect URI registered for the application.
	pub fn redirect_uri(mut self, uri: Url) -> Self {
		self.redirect_uri = Some(uri);

		self
	}

	/// Replaces the requested scopes.
	pub fn scopes<I, S>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scopes = scopes.into_iter().map(Into::into).collect();

		self
	}

	/// Chooses between `approval_prompt=force` (`true`) and `approval_prompt=auto`.
	pub fn force_prompt(mut self, force: bool) -> Self {
		self.force_prompt = force;

		self
	}

	/// Overrides the remote addresses.
	pub fn endpoints(mut self, endpoints: StravaEndpoints) -> Self {
		self.endpoints = Some(endpoints);

		self
	}

	/// Sets the per-request timeout for the default transport.
	pub fn request_timeout(mut self, timeout: StdDuration) -> Self {
		self.request_timeout = timeout;

		self
	}

	/// Validates the inputs and produces a [`StravaConfig`].
	///
	/// Endpoints default to [`StravaEndpoints::strava`] when none were supplied.
	pub fn build(self) -> Result<StravaConfig, ConfigError> {
		let redirect_uri = self.redirect_uri.ok_or(ConfigError::MissingRedirectUri)?;
		let endpoints = match self.endpoints {
			Some(endpoints) => endpoints,
			None => StravaEndpoints::strava()?,
		};
		let config = StravaConfig {
			client_id: self.client_id,
			client_secret: self.client_secret,
			redirect_uri,
			scopes: self.scopes,
			force_prompt: self.force_prompt,
			endpoints,
			request_timeout: self.request_timeout,
		};

		config.validate()?;

		Ok(config)
	}
}

fn default_request_timeout() -> StdDuration {
	DEFAULT_REQUEST_TIMEOUT
}

fn parse_endpoint(endpoint: &'static str, raw: &str) -> Result<Url, ConfigError> {
	Url::parse(raw).map_err(|source| ConfigError::InvalidEndpoint { endpoint, source })
}
