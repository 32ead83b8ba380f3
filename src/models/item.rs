//! Display capability shared by activities and routes.

// self
use crate::polyline::{self, Coordinate, PolylineError};

/// Summary view over an item that can be listed and drawn on a map.
pub trait StravaItem {
	/// Display name.
	fn name(&self) -> Option<&str>;

	/// SF Symbols-style icon name for the item's sport.
	fn type_icon_name(&self) -> &'static str;

	/// Distance in kilometres, formatted for display.
	fn formatted_distance(&self) -> String;

	/// Elevation gain in metres, formatted for display.
	fn formatted_elevation(&self) -> String;

	/// Encoded geometry this item prefers for drawing.
	fn encoded_polyline(&self) -> Option<&str>;

	/// Decodes [`encoded_polyline`](Self::encoded_polyline); absent or empty input gives `None`.
	fn decode_polyline(&self) -> Result<Option<Vec<Coordinate>>, PolylineError> {
		polyline::decode_polyline(self.encoded_polyline())
	}
}

// Strava sends an empty string for items recorded without GPS.
pub(crate) fn first_polyline<'a>(
	preferred: Option<&'a str>,
	fallback: Option<&'a str>,
) -> Option<&'a str> {
	let present = |encoded: &&str| !encoded.is_empty();

	preferred.filter(present).or(fallback.filter(present))
}

pub(crate) fn kilometres(meters: f64, decimals: usize) -> String {
	format!("{:.*} km", decimals, meters / 1000.)
}

pub(crate) fn metres(meters: f64) -> String {
	format!("{meters:.0} m")
}
