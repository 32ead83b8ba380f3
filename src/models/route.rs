//! Saved routes.

// self
use crate::{
	_prelude::*,
	models::item::{self, StravaItem},
};

/// Route created by or starred by the athlete.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
	/// Route id.
	pub id: u64,
	/// String form of the id; safe for clients that parse JSON numbers as doubles.
	pub id_str: Option<String>,
	/// Title.
	pub name: Option<String>,
	/// Free-form description.
	pub description: Option<String>,
	/// Distance in meters.
	pub distance: Option<f64>,
	/// Elevation gain in meters.
	pub elevation_gain: Option<f64>,
	/// Route type code: 1 ride, 2 run, 4 hike.
	#[serde(rename = "type")]
	pub kind: Option<i64>,
	/// Route sub-type code.
	pub sub_type: Option<i64>,
	/// Geometry.
	pub map: Option<RouteMap>,
}
impl StravaItem for Route {
	fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	fn type_icon_name(&self) -> &'static str {
		match self.kind {
			Some(1) => "figure.outdoor.cycle",
			Some(2) => "figure.run",
			Some(4) => "figure.hiking",
			_ => "figure.wave",
		}
	}

	fn formatted_distance(&self) -> String {
		item::kilometres(self.distance.unwrap_or_default(), 2)
	}

	fn formatted_elevation(&self) -> String {
		item::metres(self.elevation_gain.unwrap_or_default())
	}

	fn encoded_polyline(&self) -> Option<&str> {
		let map = self.map.as_ref()?;

		item::first_polyline(map.polyline.as_deref(), map.summary_polyline.as_deref())
	}
}

/// Encoded geometry attached to a route.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteMap {
	/// Map id.
	pub id: Option<String>,
	/// Full-resolution polyline.
	pub polyline: Option<String>,
	/// Reduced polyline.
	pub summary_polyline: Option<String>,
}
