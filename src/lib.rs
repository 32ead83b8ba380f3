//! Strava API client with a token lifecycle manager, a bearer-authenticated request pipeline,
//! and typed decoders for tag-discriminated stream payloads and polyline geometry.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod executor;
pub mod flows;
pub mod http;
pub mod models;
pub mod obs;
pub mod polyline;
pub mod resources;
pub mod store;
pub mod stream;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::Token,
		config::{StravaConfig, StravaEndpoints},
		executor::ReqwestTransportErrorMapper,
		flows::StravaClient,
		http::ReqwestHttpClient,
		store::{MemoryStore, TokenStore},
	};

	/// Client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestClient = StravaClient<ReqwestHttpClient, ReqwestTransportErrorMapper>;

	/// Client identifier used by [`test_config`].
	pub const TEST_CLIENT_ID: &str = "client-test";
	/// Client secret used by [`test_config`].
	pub const TEST_CLIENT_SECRET: &str = "secret-test";

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Points every endpoint at a mock server rooted at `base`.
	///
	/// OAuth calls land under `/oauth`, resource calls under `/api/v3`.
	pub fn test_endpoints(base: &str) -> StravaEndpoints {
		let base = base.trim_end_matches('/');

		StravaEndpoints {
			oauth_base: Url::parse(&format!("{base}/oauth"))
				.expect("Mock OAuth base should parse successfully."),
			api_base: Url::parse(&format!("{base}/api/v3"))
				.expect("Mock API base should parse successfully."),
			web_authorize: Url::parse(&format!("{base}/oauth/mobile/authorize"))
				.expect("Mock web authorize URL should parse successfully."),
			app_authorize: Url::parse("strava://oauth/mobile/authorize")
				.expect("App authorize URL should parse successfully."),
		}
	}

	/// Builds a validated configuration whose endpoints target the mock server at `base`.
	pub fn test_config(base: &str) -> StravaConfig {
		StravaConfig::builder(TEST_CLIENT_ID, TEST_CLIENT_SECRET)
			.redirect_uri(
				Url::parse("stravakit-test://localhost/callback")
					.expect("Redirect URI fixture should parse successfully."),
			)
			.scopes(["read", "activity:read_all"])
			.endpoints(test_endpoints(base))
			.build()
			.expect("Test configuration should build successfully.")
	}

	/// Constructs a [`StravaClient`] backed by an in-memory store and the reqwest transport used
	/// across integration tests.
	pub fn build_reqwest_test_client(base: &str) -> (ReqwestTestClient, Arc<MemoryStore>) {
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn TokenStore> = store_backend.clone();
		let client = StravaClient::with_http_client(
			store,
			test_config(base),
			test_reqwest_http_client(),
			Arc::new(ReqwestTransportErrorMapper),
		);

		(client, store_backend)
	}

	/// Builds a token that expires `expires_in` from now (negative values produce an expired
	/// token).
	pub fn token_expiring_in(access: &str, refresh: &str, expires_in: Duration) -> Token {
		let expires_at = OffsetDateTime::now_utc() + expires_in;

		Token::builder()
			.access_token(access)
			.refresh_token(refresh)
			.token_type("Bearer")
			.expires_at(expires_at.unix_timestamp())
			.build()
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
