//! Closed set of remote operations and their pure mapping to request shapes.
//!
//! Every [`Endpoint`] resolves to a [`RequestShape`] without touching the network. Shapes are only
//! built through [`RequestShape::get`] and [`RequestShape::post_json`], so a GET never carries a
//! body and a POST never carries query parameters.

// crates.io
use serde_json::{Value, json};
// self
use crate::{_prelude::*, auth::Secret, config::StravaEndpoints, obs::FlowKind, stream::StreamType};

/// HTTP verbs used by the Strava API surface this crate covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
	/// `GET`
	Get,
	/// `POST`
	Post,
}
impl HttpMethod {
	/// Method name as sent on the wire.
	pub const fn as_str(self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Post => "POST",
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Page selection for list endpoints. Values are passed through as given.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pagination {
	/// One-based page number.
	pub page: i64,
	/// Items per page.
	pub per_page: i64,
}
impl Pagination {
	/// Selects `page` with `per_page` items.
	pub const fn new(page: i64, per_page: i64) -> Self {
		Self { page, per_page }
	}

	fn query(self) -> Vec<(String, String)> {
		vec![("page".into(), self.page.to_string()), ("per_page".into(), self.per_page.to_string())]
	}
}
impl Default for Pagination {
	fn default() -> Self {
		Self::new(1, 30)
	}
}

/// Which consent surface an authorize URL targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AuthorizeTarget {
	/// Native Strava app (`strava://` scheme).
	App,
	/// Web consent page.
	Web,
}

/// Remote operations supported by the client.
#[derive(Clone, Debug, PartialEq)]
pub enum Endpoint {
	/// Consent page URL; never sent by the executor, only handed to the host.
	Authorize {
		/// Application client identifier.
		client_id: String,
		/// Registered redirect URI.
		redirect_uri: Url,
		/// Comma-joined scopes.
		scope: String,
		/// `force` or `auto`.
		approval_prompt: &'static str,
		/// Anti-forgery value echoed back on the redirect.
		state: Option<String>,
		/// Consent surface.
		target: AuthorizeTarget,
	},
	/// Authorization code exchange.
	ExchangeCode {
		/// Application client identifier.
		client_id: String,
		/// Application client secret.
		client_secret: Secret,
		/// Code taken from the redirect.
		code: String,
	},
	/// Refresh token exchange.
	RefreshToken {
		/// Application client identifier.
		client_id: String,
		/// Application client secret.
		client_secret: Secret,
		/// Refresh token being redeemed.
		refresh_token: Secret,
	},
	/// Access token revocation.
	Deauthorize {
		/// Access token being revoked.
		access_token: Secret,
	},
	/// Activities of the authenticated athlete.
	ListActivities(Pagination),
	/// Routes of the authenticated athlete.
	ListRoutes(Pagination),
	/// Single route by id.
	GetRoute(u64),
	/// Requested stream channels of an activity.
	GetActivityStreams {
		/// Activity id.
		id: u64,
		/// Channels to fetch.
		types: Vec<StreamType>,
	},
	/// All stream channels of a route.
	GetRouteStreams(u64),
	/// Single activity by id.
	GetActivity(u64),
	/// Profile of the authenticated athlete.
	GetAthlete,
}
impl Endpoint {
	/// Stable label used in errors, spans, and metrics.
	pub const fn name(&self) -> &'static str {
		match self {
			Endpoint::Authorize { .. } => "authorize",
			Endpoint::ExchangeCode { .. } => "exchange_code",
			Endpoint::RefreshToken { .. } => "refresh_token",
			Endpoint::Deauthorize { .. } => "deauthorize",
			Endpoint::ListActivities(_) => "list_activities",
			Endpoint::ListRoutes(_) => "list_routes",
			Endpoint::GetRoute(_) => "get_route",
			Endpoint::GetActivityStreams { .. } => "get_activity_streams",
			Endpoint::GetRouteStreams(_) => "get_route_streams",
			Endpoint::GetActivity(_) => "get_activity",
			Endpoint::GetAthlete => "get_athlete",
		}
	}

	/// Flow label the endpoint is observed under.
	pub const fn flow_kind(&self) -> FlowKind {
		match self {
			Endpoint::Authorize { .. } => FlowKind::Authorize,
			Endpoint::ExchangeCode { .. } => FlowKind::ExchangeCode,
			Endpoint::RefreshToken { .. } => FlowKind::Refresh,
			Endpoint::Deauthorize { .. } => FlowKind::Deauthorize,
			_ => FlowKind::Resource,
		}
	}

	/// Maps the endpoint to its request shape against `endpoints`.
	pub fn request_shape(&self, endpoints: &StravaEndpoints) -> RequestShape {
		let api = &endpoints.api_base;
		let oauth = &endpoints.oauth_base;

		match self {
			Endpoint::Authorize {
				client_id,
				redirect_uri,
				scope,
				approval_prompt,
				state,
				target,
			} => {
				let base = match target {
					AuthorizeTarget::App => &endpoints.app_authorize,
					AuthorizeTarget::Web => &endpoints.web_authorize,
				};
				let mut query = vec![
					("client_id".into(), client_id.clone()),
					("redirect_uri".into(), redirect_uri.to_string()),
					("response_type".into(), "code".into()),
					("approval_prompt".into(), (*approval_prompt).into()),
					("scope".into(), scope.clone()),
				];

				if let Some(state) = state {
					query.push(("state".into(), state.clone()));
				}

				RequestShape::get(base, "", query)
			},
			Endpoint::ExchangeCode { client_id, client_secret, code } => RequestShape::post_json(
				oauth,
				"/token",
				json!({
					"client_id": client_id,
					"client_secret": client_secret.expose(),
					"code": code,
					"grant_type": "authorization_code",
				}),
			),
			Endpoint::RefreshToken { client_id, client_secret, refresh_token } =>
				RequestShape::post_json(
					oauth,
					"/token",
					json!({
						"client_id": client_id,
						"client_secret": client_secret.expose(),
						"refresh_token": refresh_token.expose(),
						"grant_type": "refresh_token",
					}),
				),
			Endpoint::Deauthorize { access_token } => RequestShape::post_json(
				oauth,
				"/deauthorize",
				json!({ "access_token": access_token.expose() }),
			),
			Endpoint::ListActivities(pagination) =>
				RequestShape::get(api, "/athlete/activities", pagination.query()),
			Endpoint::ListRoutes(pagination) =>
				RequestShape::get(api, "/athlete/routes", pagination.query()),
			Endpoint::GetRoute(id) => RequestShape::get(api, format!("/routes/{id}"), Vec::new()),
			Endpoint::GetActivityStreams { id, types } => {
				let keys = types.iter().map(|kind| kind.as_str()).collect::<Vec<_>>().join(",");

				RequestShape::get(
					api,
					format!("/activities/{id}/streams"),
					vec![("keys".into(), keys), ("key_by_type".into(), "true".into())],
				)
			},
			Endpoint::GetRouteStreams(id) =>
				RequestShape::get(api, format!("/routes/{id}/streams"), Vec::new()),
			Endpoint::GetActivity(id) =>
				RequestShape::get(api, format!("/activities/{id}"), Vec::new()),
			Endpoint::GetAthlete => RequestShape::get(api, "/athlete", Vec::new()),
		}
	}
}

/// Transport-independent description of a single HTTP request.
#[derive(Clone, PartialEq)]
pub struct RequestShape {
	base_address: Url,
	path: String,
	method: HttpMethod,
	query: Vec<(String, String)>,
	body: Option<Value>,
}
impl RequestShape {
	/// GET request with query parameters and no body.
	pub fn get(base_address: &Url, path: impl Into<String>, query: Vec<(String, String)>) -> Self {
		Self {
			base_address: base_address.clone(),
			path: path.into(),
			method: HttpMethod::Get,
			query,
			body: None,
		}
	}

	/// POST request whose parameters travel as a JSON object body.
	pub fn post_json(base_address: &Url, path: impl Into<String>, body: Value) -> Self {
		Self {
			base_address: base_address.clone(),
			path: path.into(),
			method: HttpMethod::Post,
			query: Vec::new(),
			body: Some(body),
		}
	}

	/// Base address the path is appended to.
	pub fn base_address(&self) -> &Url {
		&self.base_address
	}

	/// Path relative to the base address; empty for the authorize URLs.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// HTTP method.
	pub fn method(&self) -> HttpMethod {
		self.method
	}

	/// Query parameters in insertion order.
	pub fn query(&self) -> &[(String, String)] {
		&self.query
	}

	/// JSON body for POST shapes.
	pub fn body(&self) -> Option<&Value> {
		self.body.as_ref()
	}

	/// Resolves the absolute URL: base, then path, then query.
	pub fn url(&self) -> Result<Url, url::ParseError> {
		let mut url = Url::parse(&format!(
			"{}{}",
			self.base_address.as_str().trim_end_matches('/'),
			self.path
		))?;

		if !self.query.is_empty() {
			url.query_pairs_mut().extend_pairs(self.query.iter());
		}

		Ok(url)
	}
}
impl Debug for RequestShape {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RequestShape")
			.field("base_address", &self.base_address.as_str())
			.field("path", &self.path)
			.field("method", &self.method)
			.field("query", &self.query.iter().map(|(key, _)| key).collect::<Vec<_>>())
			.field("body", &self.body.as_ref().map(|_| "<json>"))
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn endpoints() -> StravaEndpoints {
		StravaEndpoints::strava().expect("Default endpoints should parse.")
	}

	fn query_map(shape: &RequestShape) -> HashMap<&str, &str> {
		shape.query().iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
	}

	#[test]
	fn list_activities_passes_pagination_through() {
		let shape = Endpoint::ListActivities(Pagination::new(2, 50)).request_shape(&endpoints());

		assert_eq!(shape.method(), HttpMethod::Get);
		assert!(shape.body().is_none());
		assert_eq!(
			shape.url().expect("URL should resolve.").as_str(),
			"https://www.strava.com/api/v3/athlete/activities?page=2&per_page=50"
		);

		let odd = Endpoint::ListActivities(Pagination::new(-1, 0)).request_shape(&endpoints());

		assert_eq!(query_map(&odd).get("page"), Some(&"-1"));
	}

	#[test]
	fn list_routes_targets_athlete_routes() {
		let shape = Endpoint::ListRoutes(Pagination::default()).request_shape(&endpoints());

		assert_eq!(
			shape.url().expect("URL should resolve.").as_str(),
			"https://www.strava.com/api/v3/athlete/routes?page=1&per_page=30"
		);
	}

	#[test]
	fn id_endpoints_build_paths_without_query() {
		let cases = [
			(Endpoint::GetRoute(7), "https://www.strava.com/api/v3/routes/7"),
			(Endpoint::GetRouteStreams(7), "https://www.strava.com/api/v3/routes/7/streams"),
			(Endpoint::GetActivity(99), "https://www.strava.com/api/v3/activities/99"),
			(Endpoint::GetAthlete, "https://www.strava.com/api/v3/athlete"),
		];

		for (endpoint, expected) in cases {
			let shape = endpoint.request_shape(&endpoints());

			assert_eq!(shape.method(), HttpMethod::Get, "{}", endpoint.name());
			assert!(shape.query().is_empty());
			assert!(shape.body().is_none());
			assert_eq!(shape.url().expect("URL should resolve.").as_str(), expected);
		}
	}

	#[test]
	fn activity_streams_join_keys() {
		let shape = Endpoint::GetActivityStreams {
			id: 12,
			types: vec![StreamType::Time, StreamType::Latlng, StreamType::Heartrate],
		}
		.request_shape(&endpoints());
		let query = query_map(&shape);

		assert_eq!(shape.path(), "/activities/12/streams");
		assert_eq!(query.get("keys"), Some(&"time,latlng,heartrate"));
		assert_eq!(query.get("key_by_type"), Some(&"true"));
	}

	#[test]
	fn token_endpoints_post_json_bodies() {
		let exchange = Endpoint::ExchangeCode {
			client_id: "123".into(),
			client_secret: Secret::new("shh"),
			code: "abc".into(),
		}
		.request_shape(&endpoints());

		assert_eq!(exchange.method(), HttpMethod::Post);
		assert!(exchange.query().is_empty());
		assert_eq!(
			exchange.url().expect("URL should resolve.").as_str(),
			"https://www.strava.com/oauth/token"
		);
		assert_eq!(
			exchange.body(),
			Some(&json!({
				"client_id": "123",
				"client_secret": "shh",
				"code": "abc",
				"grant_type": "authorization_code",
			}))
		);

		let refresh = Endpoint::RefreshToken {
			client_id: "123".into(),
			client_secret: Secret::new("shh"),
			refresh_token: Secret::new("r-1"),
		}
		.request_shape(&endpoints());

		assert_eq!(refresh.path(), "/token");
		assert_eq!(
			refresh.body().and_then(|body| body.get("grant_type")),
			Some(&json!("refresh_token"))
		);
		assert_eq!(refresh.body().and_then(|body| body.get("refresh_token")), Some(&json!("r-1")));

		let revoke =
			Endpoint::Deauthorize { access_token: Secret::new("a-1") }.request_shape(&endpoints());

		assert_eq!(
			revoke.url().expect("URL should resolve.").as_str(),
			"https://www.strava.com/oauth/deauthorize"
		);
		assert_eq!(revoke.body(), Some(&json!({ "access_token": "a-1" })));
	}

	#[test]
	fn authorize_urls_carry_consent_parameters() {
		let redirect = Url::parse("myapp://localhost/callback").expect("Fixture should parse.");
		let build = |target| Endpoint::Authorize {
			client_id: "123".into(),
			redirect_uri: redirect.clone(),
			scope: "read,activity:read_all".into(),
			approval_prompt: "force",
			state: Some("xyz".into()),
			target,
		};
		let app = build(AuthorizeTarget::App).request_shape(&endpoints());
		let web = build(AuthorizeTarget::Web).request_shape(&endpoints());
		let web_url = web.url().expect("URL should resolve.");

		assert_eq!(app.url().expect("URL should resolve.").scheme(), "strava");
		assert_eq!(web_url.host_str(), Some("www.strava.com"));
		assert_eq!(web_url.path(), "/oauth/mobile/authorize");

		let query = query_map(&web);

		assert_eq!(query.get("client_id"), Some(&"123"));
		assert_eq!(query.get("redirect_uri"), Some(&"myapp://localhost/callback"));
		assert_eq!(query.get("response_type"), Some(&"code"));
		assert_eq!(query.get("approval_prompt"), Some(&"force"));
		assert_eq!(query.get("scope"), Some(&"read,activity:read_all"));
		assert_eq!(query.get("state"), Some(&"xyz"));
	}

	#[test]
	fn debug_output_hides_body_values() {
		let shape =
			Endpoint::Deauthorize { access_token: Secret::new("a-1") }.request_shape(&endpoints());

		assert!(!format!("{shape:?}").contains("a-1"));
	}
}
