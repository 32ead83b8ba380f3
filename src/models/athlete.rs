//! Athlete profiles.

// self
use crate::_prelude::*;

/// Athlete profile, summary or detailed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Athlete {
	/// Athlete id.
	pub id: Option<u64>,
	/// Username.
	pub username: Option<String>,
	/// Detail level of the representation.
	pub resource_state: Option<i64>,
	/// First name.
	pub firstname: Option<String>,
	/// Last name.
	pub lastname: Option<String>,
	/// Medium avatar; may be a relative placeholder path.
	pub profile_medium: Option<String>,
	/// Large avatar; may be a relative placeholder path.
	pub profile: Option<String>,
	/// City.
	pub city: Option<String>,
	/// State or region.
	pub state: Option<String>,
	/// Country.
	pub country: Option<String>,
	/// `M`, `F`, or absent.
	pub sex: Option<String>,
	/// Follow status from the authenticated athlete.
	pub friend: Option<String>,
	/// Follow status towards the authenticated athlete.
	pub follower: Option<String>,
	/// Legacy subscription flag.
	pub premium: Option<bool>,
	/// Subscription flag.
	pub summit: Option<bool>,
	/// Profile bio.
	pub bio: Option<String>,
	/// Weight in kilograms.
	pub weight: Option<f64>,
	/// Badge type code.
	pub badge_type_id: Option<i64>,
	/// Creation instant.
	pub created_at: Option<String>,
	/// Last update instant.
	pub updated_at: Option<String>,
}
impl Athlete {
	/// First and last name joined by a space, skipping missing parts.
	pub fn display_name(&self) -> Option<String> {
		let parts = [self.firstname.as_deref(), self.lastname.as_deref()]
			.into_iter()
			.flatten()
			.filter(|part| !part.trim().is_empty())
			.collect::<Vec<_>>();

		if parts.is_empty() { self.username.clone() } else { Some(parts.join(" ")) }
	}
}
