//! Google encoded polyline codec at 1e5 precision.
//!
//! Each coordinate is stored as a pair of deltas (latitude first) from the previous point. A delta
//! is zig-zag encoded, split into 5-bit chunks with `0x20` as the continuation bit, and offset by
//! 63 into the printable range `?`..`~`.

// self
use crate::_prelude::*;

const PRECISION: f64 = 1e5;
const CHUNK_BITS: u32 = 5;
const CONTINUATION: u8 = 0x20;
const CHUNK_MASK: u8 = 0x1f;
const OFFSET: u8 = 63;
// 12 chunks carry 60 bits, which is as much as an i64 accumulator can hold safely.
const MAX_SHIFT: u32 = 60;

/// Point on the WGS84 ellipsoid in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
	/// Latitude in degrees.
	pub latitude: f64,
	/// Longitude in degrees.
	pub longitude: f64,
}
impl Coordinate {
	/// Builds a coordinate from latitude and longitude.
	pub const fn new(latitude: f64, longitude: f64) -> Self {
		Self { latitude, longitude }
	}
}

/// Malformed polyline input.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum PolylineError {
	/// Byte outside the `?`..`~` alphabet.
	#[error("Invalid polyline character {character:?} at byte {position}.")]
	InvalidCharacter {
		/// Byte offset of the offending character.
		position: usize,
		/// Offending character.
		character: char,
	},
	/// Input ended in the middle of a value or after a lone latitude.
	#[error("Polyline ends unexpectedly at byte {position}.")]
	Truncated {
		/// Byte offset where more input was expected.
		position: usize,
	},
	/// A value does not fit the accumulator.
	#[error("Polyline value overflows at byte {position}.")]
	Overflow {
		/// Byte offset of the overflowing chunk.
		position: usize,
	},
}

/// Decodes an encoded polyline into coordinates. An empty string decodes to no points.
pub fn decode(encoded: &str) -> Result<Vec<Coordinate>, PolylineError> {
	let bytes = encoded.as_bytes();
	let mut index = 0;
	let mut latitude = 0_i64;
	let mut longitude = 0_i64;
	let mut points = Vec::new();

	while index < bytes.len() {
		let position = index;

		latitude = latitude
			.checked_add(next_value(bytes, &mut index)?)
			.ok_or(PolylineError::Overflow { position })?;

		let position = index;

		longitude = longitude
			.checked_add(next_value(bytes, &mut index)?)
			.ok_or(PolylineError::Overflow { position })?;

		points.push(Coordinate::new(latitude as f64 / PRECISION, longitude as f64 / PRECISION));
	}

	Ok(points)
}

/// Decodes optional polyline input; absent or empty input yields `None`.
pub fn decode_polyline(encoded: Option<&str>) -> Result<Option<Vec<Coordinate>>, PolylineError> {
	match encoded {
		Some(encoded) if !encoded.is_empty() => decode(encoded).map(Some),
		_ => Ok(None),
	}
}

/// Encodes coordinates into a polyline, rounding each component to 1e-5 degrees.
///
/// Inputs are expected to be finite WGS84 degrees. Anything else never panics: `NaN` encodes as
/// zero and out-of-range values saturate, so the result only round-trips for valid coordinates.
pub fn encode_polyline(points: &[Coordinate]) -> String {
	let mut encoded = String::new();
	let mut previous = (0_i64, 0_i64);

	for point in points {
		let latitude = (point.latitude * PRECISION).round() as i64;
		let longitude = (point.longitude * PRECISION).round() as i64;

		encode_value(latitude.wrapping_sub(previous.0), &mut encoded);
		encode_value(longitude.wrapping_sub(previous.1), &mut encoded);

		previous = (latitude, longitude);
	}

	encoded
}

fn next_value(bytes: &[u8], index: &mut usize) -> Result<i64, PolylineError> {
	let mut result = 0_i64;
	let mut shift = 0_u32;

	loop {
		let position = *index;
		let byte = *bytes.get(position).ok_or(PolylineError::Truncated { position })?;

		if !(OFFSET..OFFSET + 64).contains(&byte) {
			return Err(PolylineError::InvalidCharacter { position, character: byte as char });
		}
		if shift >= MAX_SHIFT {
			return Err(PolylineError::Overflow { position });
		}

		let chunk = byte - OFFSET;

		result |= i64::from(chunk & CHUNK_MASK) << shift;
		shift += CHUNK_BITS;
		*index += 1;

		if chunk & CONTINUATION == 0 {
			break;
		}
	}

	Ok(if result & 1 == 1 { !(result >> 1) } else { result >> 1 })
}

fn encode_value(delta: i64, out: &mut String) {
	let mut value = ((delta << 1) ^ (delta >> 63)) as u64;

	while value >= u64::from(CONTINUATION) {
		out.push(char::from((CONTINUATION | (value as u8 & CHUNK_MASK)) + OFFSET));

		value >>= CHUNK_BITS;
	}

	out.push(char::from(value as u8 + OFFSET));
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	const REFERENCE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

	fn assert_close(actual: Coordinate, latitude: f64, longitude: f64) {
		assert!((actual.latitude - latitude).abs() < 1e-9, "{actual:?} vs {latitude}");
		assert!((actual.longitude - longitude).abs() < 1e-9, "{actual:?} vs {longitude}");
	}

	#[test]
	fn decodes_reference_vector() {
		let points = decode(REFERENCE).expect("Reference polyline should decode.");

		assert_eq!(points.len(), 3);
		assert_close(points[0], 38.5, -120.2);
		assert_close(points[1], 40.7, -120.95);
		assert_close(points[2], 43.252, -126.453);
	}

	#[test]
	fn encodes_reference_vector() {
		let points = [
			Coordinate::new(38.5, -120.2),
			Coordinate::new(40.7, -120.95),
			Coordinate::new(43.252, -126.453),
		];

		assert_eq!(encode_polyline(&points), REFERENCE);
	}

	#[test]
	fn round_trip_preserves_rounded_points() {
		let points = [
			Coordinate::new(0.0, 0.0),
			Coordinate::new(-33.86785, 151.20732),
			Coordinate::new(51.50735, -0.12776),
			Coordinate::new(-89.99999, 179.99999),
		];
		let decoded =
			decode(&encode_polyline(&points)).expect("Encoded polyline should decode again.");

		assert_eq!(decoded.len(), points.len());

		for (actual, expected) in decoded.into_iter().zip(points) {
			assert_close(actual, expected.latitude, expected.longitude);
		}
	}

	#[test]
	fn non_finite_and_huge_inputs_encode_without_panicking() {
		let points = [
			Coordinate::new(f64::NAN, f64::INFINITY),
			Coordinate::new(f64::NEG_INFINITY, 1e300),
			Coordinate::new(-1e300, f64::MAX),
		];
		let encoded = encode_polyline(&points);

		assert!(!encoded.is_empty());
		assert!(encoded.bytes().all(|byte| (b'?'..=b'~').contains(&byte)));
		assert_eq!(encode_polyline(&[Coordinate::new(f64::NAN, f64::NAN)]), "??");
	}

	#[test]
	fn absent_or_empty_input_is_none() {
		assert_eq!(decode_polyline(None), Ok(None));
		assert_eq!(decode_polyline(Some("")), Ok(None));
		assert_eq!(decode(""), Ok(Vec::new()));
		assert_eq!(
			decode_polyline(Some(REFERENCE)).map(|points| points.map(|points| points.len())),
			Ok(Some(3))
		);
	}

	#[test]
	fn malformed_input_is_reported() {
		assert_eq!(
			decode("_p~iF ps|U"),
			Err(PolylineError::InvalidCharacter { position: 5, character: ' ' })
		);
		assert_eq!(decode("_p~iF"), Err(PolylineError::Truncated { position: 5 }));
		assert_eq!(decode("_"), Err(PolylineError::Truncated { position: 1 }));
		assert_eq!(decode(&"~".repeat(13)), Err(PolylineError::Overflow { position: 12 }));
		assert!(matches!(decode("é"), Err(PolylineError::InvalidCharacter { position: 0, .. })));
	}
}
