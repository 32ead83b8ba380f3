//! Immutable token value, expiry predicates, and builder.

// self
use crate::{_prelude::*, auth::token::secret::Secret, models::Athlete};

/// Current lifecycle status for a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenStatus {
	/// Token is currently valid.
	Active,
	/// Token reached its expiry instant, or carries no expiry at all.
	Expired,
}

/// OAuth access/refresh pair as returned by the token endpoint.
///
/// The same shape is used on the wire and in the [`TokenStore`](crate::store::TokenStore).
/// A refresh never mutates a token; it produces a new value that replaces the stored one.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
	/// Access token used as the bearer credential.
	#[serde(default)]
	pub access_token: Option<Secret>,
	/// Refresh token used to mint the next access token.
	#[serde(default)]
	pub refresh_token: Option<Secret>,
	/// Token type label (`Bearer`).
	#[serde(default)]
	pub token_type: Option<String>,
	/// Expiry instant in epoch seconds.
	#[serde(default)]
	pub expires_at: Option<i64>,
	/// Lifetime in seconds at issue time.
	#[serde(default)]
	pub expires_in: Option<i64>,
	/// Summary profile of the athlete who owns the token.
	#[serde(default, rename = "athlete")]
	pub owner_profile: Option<Athlete>,
}
impl Token {
	/// Returns a builder for assembling tokens in tests and custom stores.
	pub fn builder() -> TokenBuilder {
		TokenBuilder::default()
	}

	/// Computes the lifecycle status at a given instant.
	///
	/// A token without `expires_at` is always [`TokenStatus::Expired`].
	pub fn status_at(&self, instant: OffsetDateTime) -> TokenStatus {
		match self.expires_at {
			Some(expires_at) if instant.unix_timestamp() < expires_at => TokenStatus::Active,
			_ => TokenStatus::Expired,
		}
	}

	/// Convenience helper that checks the status using the current UTC instant.
	pub fn status(&self) -> TokenStatus {
		self.status_at(OffsetDateTime::now_utc())
	}

	/// Returns `true` if the token has expired at the provided instant.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		matches!(self.status_at(instant), TokenStatus::Expired)
	}

	/// Returns `true` if the token is expired relative to the current clock.
	pub fn is_expired(&self) -> bool {
		self.is_expired_at(OffsetDateTime::now_utc())
	}

	/// Seconds left before expiry at `instant`, clamped at zero.
	pub fn time_until_expiration_at(&self, instant: OffsetDateTime) -> Option<i64> {
		self.expires_at.map(|expires_at| (expires_at - instant.unix_timestamp()).max(0))
	}

	/// Seconds left before expiry, clamped at zero; `None` when no expiry is known.
	pub fn time_until_expiration(&self) -> Option<i64> {
		self.time_until_expiration_at(OffsetDateTime::now_utc())
	}

	/// Expiry instant as a date-time, when present and representable.
	pub fn expires_at_datetime(&self) -> Option<OffsetDateTime> {
		self.expires_at.and_then(|secs| OffsetDateTime::from_unix_timestamp(secs).ok())
	}

	/// Access token value when present and non-blank.
	pub fn bearer(&self) -> Option<&str> {
		self.access_token.as_ref().filter(|secret| !secret.is_blank()).map(Secret::expose)
	}
}
impl Debug for Token {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Token")
			.field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("token_type", &self.token_type)
			.field("expires_at", &self.expires_at)
			.field("expires_in", &self.expires_in)
			.field("owner_profile", &self.owner_profile.as_ref().and_then(|athlete| athlete.id))
			.finish()
	}
}

/// Builder for [`Token`].
#[derive(Clone, Debug, Default)]
pub struct TokenBuilder {
	access_token: Option<Secret>,
	refresh_token: Option<Secret>,
	token_type: Option<String>,
	expires_at: Option<i64>,
	expires_in: Option<i64>,
	owner_profile: Option<Athlete>,
}
impl TokenBuilder {
	/// Provides the access token value.
	pub fn access_token(mut self, token: impl Into<String>) -> Self {
		self.access_token = Some(Secret::new(token));

		self
	}

	/// Provides the refresh token value.
	pub fn refresh_token(mut self, token: impl Into<String>) -> Self {
		self.refresh_token = Some(Secret::new(token));

		self
	}

	/// Sets the token type label.
	pub fn token_type(mut self, token_type: impl Into<String>) -> Self {
		self.token_type = Some(token_type.into());

		self
	}

	/// Sets the absolute expiry in epoch seconds.
	pub fn expires_at(mut self, epoch_seconds: i64) -> Self {
		self.expires_at = Some(epoch_seconds);

		self
	}

	/// Sets the relative lifetime in seconds.
	pub fn expires_in(mut self, seconds: i64) -> Self {
		self.expires_in = Some(seconds);

		self
	}

	/// Attaches the owner's athlete profile.
	pub fn owner_profile(mut self, athlete: Athlete) -> Self {
		self.owner_profile = Some(athlete);

		self
	}

	/// Consumes the builder and produces a [`Token`].
	pub fn build(self) -> Token {
		Token {
			access_token: self.access_token,
			refresh_token: self.refresh_token,
			token_type: self.token_type,
			expires_at: self.expires_at,
			expires_in: self.expires_in,
			owner_profile: self.owner_profile,
		}
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn expiry_boundary_counts_as_expired() {
		let expires = macros::datetime!(2025-01-01 01:00 UTC);
		let token = Token::builder()
			.access_token("access")
			.refresh_token("refresh")
			.expires_at(expires.unix_timestamp())
			.build();

		assert_eq!(
			token.status_at(macros::datetime!(2025-01-01 00:59:59 UTC)),
			TokenStatus::Active
		);
		assert_eq!(token.status_at(expires), TokenStatus::Expired);
		assert!(token.is_expired_at(expires));
		assert!(token.is_expired_at(macros::datetime!(2025-01-01 01:00:01 UTC)));
	}

	#[test]
	fn missing_expiry_is_always_expired() {
		let token = Token::builder().access_token("access").build();

		assert!(token.is_expired_at(macros::datetime!(1970-01-01 00:00 UTC)));
		assert!(token.is_expired());
		assert_eq!(token.time_until_expiration(), None);
	}

	#[test]
	fn time_until_expiration_clamps_at_zero() {
		let now = macros::datetime!(2025-01-01 00:00 UTC);
		let token = Token::builder().expires_at(now.unix_timestamp() + 90).build();

		assert_eq!(token.time_until_expiration_at(now), Some(90));
		assert_eq!(token.time_until_expiration_at(now + Duration::hours(1)), Some(0));
		assert_eq!(token.expires_at_datetime(), Some(now + Duration::seconds(90)));
	}

	#[test]
	fn decodes_token_endpoint_payload() {
		let payload = r#"{
			"token_type": "Bearer",
			"expires_at": 1735693200,
			"expires_in": 21600,
			"refresh_token": "refresh-1",
			"access_token": "access-1",
			"athlete": { "id": 42, "username": "rider", "firstname": "Ada" }
		}"#;
		let token: Token =
			serde_json::from_str(payload).expect("Token payload fixture should decode.");

		assert_eq!(token.bearer(), Some("access-1"));
		assert_eq!(token.refresh_token.as_ref().map(Secret::expose), Some("refresh-1"));
		assert_eq!(token.expires_at, Some(1_735_693_200));
		assert_eq!(token.expires_in, Some(21_600));
		assert_eq!(token.owner_profile.as_ref().and_then(|athlete| athlete.id), Some(42));
	}

	#[test]
	fn bearer_ignores_blank_access_tokens() {
		let token = Token::builder().access_token("   ").build();

		assert_eq!(token.bearer(), None);

		let debug = format!("{:?}", Token::builder().access_token("secret-value").build());

		assert!(!debug.contains("secret-value"));
	}
}
