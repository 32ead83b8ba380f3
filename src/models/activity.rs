//! Activity records and their map geometry.

// crates.io
use time::format_description::well_known::Rfc3339;
// self
use crate::{
	_prelude::*,
	models::item::{self, StravaItem},
};

/// Summary or detailed activity.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Activity {
	/// Activity id.
	pub id: u64,
	/// Title.
	pub name: Option<String>,
	/// Free-form description.
	pub description: Option<String>,
	/// Distance in meters.
	pub distance: Option<f64>,
	/// Moving time in seconds.
	pub moving_time: Option<i64>,
	/// Elapsed time in seconds.
	pub elapsed_time: Option<i64>,
	/// Elevation gain in meters.
	pub total_elevation_gain: Option<f64>,
	/// Sport label such as `Ride` or `Run`.
	#[serde(rename = "type")]
	pub kind: Option<String>,
	/// Start instant (RFC 3339, UTC).
	pub start_date: Option<String>,
	/// Start instant in the athlete's local time.
	pub start_date_local: Option<String>,
	/// Timezone label.
	pub timezone: Option<String>,
	/// Start coordinate.
	pub start_latlng: Option<Vec<f64>>,
	/// End coordinate.
	pub end_latlng: Option<Vec<f64>>,
	/// Kudos received.
	pub kudos_count: Option<i64>,
	/// Comments received.
	pub comment_count: Option<i64>,
	/// Athletes who took part.
	pub athlete_count: Option<i64>,
	/// Photos attached.
	pub photo_count: Option<i64>,
	/// Geometry.
	pub map: Option<Map>,
	/// Recorded on a trainer.
	pub trainer: Option<bool>,
	/// Tagged as commute.
	pub commute: Option<bool>,
	/// Entered manually.
	pub manual: Option<bool>,
	/// Hidden from other athletes.
	pub private: Option<bool>,
	/// Flagged by moderation.
	pub flagged: Option<bool>,
	/// Workout type code.
	pub workout_type: Option<i64>,
	/// Average speed in meters per second.
	pub average_speed: Option<f64>,
	/// Max speed in meters per second.
	pub max_speed: Option<f64>,
	/// Kilocalories.
	pub calories: Option<f64>,
	/// Whether the authenticated athlete gave kudos.
	pub has_kudoed: Option<bool>,
	/// Average heart rate in BPM.
	pub average_heartrate: Option<f64>,
	/// Max heart rate in BPM.
	pub max_heartrate: Option<f64>,
}
impl Activity {
	/// Parses [`start_date`](Self::start_date) when it holds a valid RFC 3339 timestamp.
	pub fn start_date_utc(&self) -> Option<OffsetDateTime> {
		self.start_date.as_deref().and_then(|raw| OffsetDateTime::parse(raw, &Rfc3339).ok())
	}
}
impl StravaItem for Activity {
	fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	fn type_icon_name(&self) -> &'static str {
		match self.kind.as_deref().map(str::to_lowercase).as_deref() {
			Some("ride") => "figure.outdoor.cycle",
			Some("run") => "figure.run",
			Some("trail") => "figure.hiking",
			_ => "figure.wave",
		}
	}

	fn formatted_distance(&self) -> String {
		item::kilometres(self.distance.unwrap_or_default(), 0)
	}

	fn formatted_elevation(&self) -> String {
		item::metres(self.total_elevation_gain.unwrap_or_default())
	}

	// List responses only fill the summary polyline.
	fn encoded_polyline(&self) -> Option<&str> {
		let map = self.map.as_ref()?;

		item::first_polyline(map.summary_polyline.as_deref(), map.polyline.as_deref())
	}
}

/// Activity identifier without any other detail.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaActivity {
	/// Activity id.
	pub id: Option<u64>,
}

/// Encoded geometry attached to an activity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Map {
	/// Map id.
	pub id: Option<String>,
	/// Detail level of the representation.
	pub resource_state: Option<i64>,
	/// Full-resolution polyline; only on detailed representations.
	pub polyline: Option<String>,
	/// Reduced polyline.
	pub summary_polyline: Option<String>,
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	fn activity(kind: &str) -> Activity {
		serde_json::from_value(json!({
			"id": 1,
			"name": "Morning Ride",
			"type": kind,
			"distance": 42195.0,
			"total_elevation_gain": 312.4,
			"start_date": "2024-11-28T07:15:00Z",
			"map": { "id": "a1", "summary_polyline": "_p~iF~ps|U_ulLnnqC_mqNvxq`@", "resource_state": 2 },
			"some_future_field": true
		}))
		.expect("Activity fixture should decode.")
	}

	#[test]
	fn display_helpers_follow_sport_and_units() {
		let ride = activity("Ride");

		assert_eq!(ride.name(), Some("Morning Ride"));
		assert_eq!(ride.type_icon_name(), "figure.outdoor.cycle");
		assert_eq!(ride.formatted_distance(), "42 km");
		assert_eq!(ride.formatted_elevation(), "312 m");
		assert_eq!(activity("run").type_icon_name(), "figure.run");
		assert_eq!(activity("Trail").type_icon_name(), "figure.hiking");
		assert_eq!(activity("Swim").type_icon_name(), "figure.wave");
		assert_eq!(Activity::default().formatted_distance(), "0 km");
	}

	#[test]
	fn decodes_summary_polyline() {
		let ride = activity("Ride");
		let points = ride
			.decode_polyline()
			.expect("Fixture polyline should decode.")
			.expect("Fixture polyline should be present.");

		assert_eq!(points.len(), 3);
		assert_eq!(
			ride.start_date_utc().map(OffsetDateTime::unix_timestamp),
			Some(1_732_778_100)
		);
		assert_eq!(Activity::default().decode_polyline(), Ok(None));
	}

	#[test]
	fn empty_summary_polyline_falls_through_to_detailed() {
		let activity = Activity {
			map: Some(Map {
				summary_polyline: Some(String::new()),
				polyline: Some("_p~iF~ps|U".into()),
				..Map::default()
			}),
			..Activity::default()
		};

		assert_eq!(activity.encoded_polyline(), Some("_p~iF~ps|U"));
	}
}
