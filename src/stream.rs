//! Tag-discriminated stream payloads.
//!
//! Strava returns stream channels either as an array of objects carrying a `type` tag or, with
//! `key_by_type=true`, as an object keyed by that tag. Both forms decode into [`StreamSet`]: the
//! tag selects the channel, and the channel's [`StreamShape`] fixes the element type its `data`
//! array is coerced into. Unknown tags are skipped.

// crates.io
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde_json::Value;
// self
use crate::{_prelude::*, polyline::Coordinate};

/// Channel identifiers understood by the decoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamType {
	/// Elapsed time.
	Time,
	/// Latitude/longitude pairs.
	Latlng,
	/// Cumulative distance.
	Distance,
	/// Elevation.
	Altitude,
	/// Smoothed speed.
	VelocitySmooth,
	/// Heart rate.
	Heartrate,
	/// Cadence.
	Cadence,
	/// Power output.
	Watts,
	/// Temperature.
	Temp,
	/// Moving flag.
	Moving,
	/// Smoothed grade.
	GradeSmooth,
}
impl StreamType {
	/// Every channel, in the order Strava documents them.
	pub const ALL: [StreamType; 11] = [
		StreamType::Time,
		StreamType::Latlng,
		StreamType::Distance,
		StreamType::Altitude,
		StreamType::VelocitySmooth,
		StreamType::Heartrate,
		StreamType::Cadence,
		StreamType::Watts,
		StreamType::Temp,
		StreamType::Moving,
		StreamType::GradeSmooth,
	];

	/// Wire tag.
	pub const fn as_str(self) -> &'static str {
		match self {
			StreamType::Time => "time",
			StreamType::Latlng => "latlng",
			StreamType::Distance => "distance",
			StreamType::Altitude => "altitude",
			StreamType::VelocitySmooth => "velocity_smooth",
			StreamType::Heartrate => "heartrate",
			StreamType::Cadence => "cadence",
			StreamType::Watts => "watts",
			StreamType::Temp => "temp",
			StreamType::Moving => "moving",
			StreamType::GradeSmooth => "grade_smooth",
		}
	}

	/// Element type carried by the channel.
	pub const fn shape(self) -> StreamShape {
		match self {
			StreamType::Time
			| StreamType::Heartrate
			| StreamType::Cadence
			| StreamType::Watts
			| StreamType::Temp => StreamShape::Integer,
			StreamType::Distance
			| StreamType::Altitude
			| StreamType::VelocitySmooth
			| StreamType::GradeSmooth => StreamShape::Float,
			StreamType::Latlng => StreamShape::FloatPair,
			StreamType::Moving => StreamShape::Boolean,
		}
	}

	/// Human-readable unit of the channel's values.
	pub const fn unit(self) -> &'static str {
		match self {
			StreamType::Time => "integer seconds",
			StreamType::Latlng => "floats [latitude, longitude]",
			StreamType::Distance | StreamType::Altitude => "float meters",
			StreamType::VelocitySmooth => "float meters per second",
			StreamType::Heartrate => "integer BPM",
			StreamType::Cadence => "integer RPM",
			StreamType::Watts => "integer watts",
			StreamType::Temp => "integer degrees Celsius",
			StreamType::Moving => "boolean",
			StreamType::GradeSmooth => "float percent",
		}
	}
}
impl Display for StreamType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for StreamType {
	type Err = UnknownStreamType;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		StreamType::ALL
			.into_iter()
			.find(|kind| kind.as_str() == s)
			.ok_or_else(|| UnknownStreamType(s.to_owned()))
	}
}

/// Tag that does not name a known channel.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Unknown stream type `{0}`.")]
pub struct UnknownStreamType(pub String);

/// Element type of a channel's `data` array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreamShape {
	/// `i64` values.
	Integer,
	/// `f64` values.
	Float,
	/// `bool` values.
	Boolean,
	/// `[f64; 2]` pairs.
	FloatPair,
}
impl Display for StreamShape {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(match self {
			StreamShape::Integer => "integers",
			StreamShape::Float => "floats",
			StreamShape::Boolean => "booleans",
			StreamShape::FloatPair => "float pairs",
		})
	}
}

/// Channel data whose `data` array did not match the tag's shape.
#[derive(Debug, ThisError)]
#[error("Stream `{kind}` expects {expected}: {source}")]
pub struct StreamDecodeError {
	/// Channel being decoded.
	pub kind: StreamType,
	/// Element type the channel requires.
	pub expected: StreamShape,
	/// Underlying coercion failure.
	#[source]
	pub source: serde_json::Error,
}

/// One decoded channel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stream<T> {
	/// Samples in series order.
	pub data: Vec<T>,
	/// Series the samples are indexed by (`distance` or `time`).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub series_type: Option<String>,
	/// Sample count before resolution reduction.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub original_size: Option<i64>,
	/// Resolution label (`low`, `medium`, `high`).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub resolution: Option<String>,
}
impl<T> Stream<T> {
	/// Number of samples.
	pub fn len(&self) -> usize {
		self.data.len()
	}

	/// Whether the channel carries no samples.
	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}
}

/// Undecoded channel as it appears on the wire.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TaggedStream {
	/// Channel tag; in the keyed form the key takes precedence.
	#[serde(default, rename = "type")]
	pub kind: Option<String>,
	/// Raw samples.
	#[serde(default)]
	pub data: Value,
	/// Series the samples are indexed by.
	#[serde(default)]
	pub series_type: Option<String>,
	/// Sample count before resolution reduction.
	#[serde(default)]
	pub original_size: Option<i64>,
	/// Resolution label.
	#[serde(default)]
	pub resolution: Option<String>,
}
impl TaggedStream {
	fn coerce<T>(self, kind: StreamType) -> Result<Stream<T>, StreamDecodeError>
	where
		T: DeserializeOwned,
	{
		let data = if self.data.is_null() {
			Vec::new()
		} else {
			serde_json::from_value(self.data).map_err(|source| StreamDecodeError {
				kind,
				expected: kind.shape(),
				source,
			})?
		};

		Ok(Stream {
			data,
			series_type: self.series_type,
			original_size: self.original_size,
			resolution: self.resolution,
		})
	}
}

/// Every channel an activity can expose.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct StreamSet {
	/// Elapsed seconds.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub time: Option<Stream<i64>>,
	/// Cumulative meters.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub distance: Option<Stream<f64>>,
	/// Latitude/longitude pairs.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub latlng: Option<Stream<[f64; 2]>>,
	/// Elevation in meters.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub altitude: Option<Stream<f64>>,
	/// Smoothed speed in meters per second.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub velocity_smooth: Option<Stream<f64>>,
	/// Heart rate in BPM.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub heartrate: Option<Stream<i64>>,
	/// Cadence in RPM.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub cadence: Option<Stream<i64>>,
	/// Power in watts.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub watts: Option<Stream<i64>>,
	/// Temperature in degrees Celsius.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub temp: Option<Stream<i64>>,
	/// Moving flag per sample.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub moving: Option<Stream<bool>>,
	/// Smoothed grade in percent.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub grade_smooth: Option<Stream<f64>>,
}
impl StreamSet {
	/// Binds tagged channels to their fields, skipping tags that are missing or unknown.
	///
	/// A later channel with the same tag replaces an earlier one.
	pub fn from_tagged(
		streams: impl IntoIterator<Item = TaggedStream>,
	) -> Result<Self, StreamDecodeError> {
		let mut set = Self::default();

		for stream in streams {
			let known = stream.kind.as_deref().and_then(|tag| tag.parse::<StreamType>().ok());
			let Some(kind) = known else {
				continue;
			};

			match kind {
				StreamType::Time => set.time = Some(stream.coerce(kind)?),
				StreamType::Latlng => set.latlng = Some(stream.coerce(kind)?),
				StreamType::Distance => set.distance = Some(stream.coerce(kind)?),
				StreamType::Altitude => set.altitude = Some(stream.coerce(kind)?),
				StreamType::VelocitySmooth => set.velocity_smooth = Some(stream.coerce(kind)?),
				StreamType::Heartrate => set.heartrate = Some(stream.coerce(kind)?),
				StreamType::Cadence => set.cadence = Some(stream.coerce(kind)?),
				StreamType::Watts => set.watts = Some(stream.coerce(kind)?),
				StreamType::Temp => set.temp = Some(stream.coerce(kind)?),
				StreamType::Moving => set.moving = Some(stream.coerce(kind)?),
				StreamType::GradeSmooth => set.grade_smooth = Some(stream.coerce(kind)?),
			}
		}

		Ok(set)
	}

	/// Channels present in the set.
	pub fn kinds(&self) -> Vec<StreamType> {
		StreamType::ALL.into_iter().filter(|kind| self.contains(*kind)).collect()
	}

	/// Whether the channel `kind` is present.
	pub fn contains(&self, kind: StreamType) -> bool {
		match kind {
			StreamType::Time => self.time.is_some(),
			StreamType::Latlng => self.latlng.is_some(),
			StreamType::Distance => self.distance.is_some(),
			StreamType::Altitude => self.altitude.is_some(),
			StreamType::VelocitySmooth => self.velocity_smooth.is_some(),
			StreamType::Heartrate => self.heartrate.is_some(),
			StreamType::Cadence => self.cadence.is_some(),
			StreamType::Watts => self.watts.is_some(),
			StreamType::Temp => self.temp.is_some(),
			StreamType::Moving => self.moving.is_some(),
			StreamType::GradeSmooth => self.grade_smooth.is_some(),
		}
	}

	/// Route geometry from the `latlng` channel.
	pub fn coordinates(&self) -> Option<Vec<Coordinate>> {
		self.latlng.as_ref().map(|stream| latlng_coordinates(stream))
	}
}
impl<'de> Deserialize<'de> for StreamSet {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: de::Deserializer<'de>,
	{
		deserializer.deserialize_any(StreamSetVisitor)
	}
}

struct StreamSetVisitor;
impl<'de> Visitor<'de> for StreamSetVisitor {
	type Value = StreamSet;

	fn expecting(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("an array of tagged streams or an object keyed by stream type")
	}

	fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
	where
		A: SeqAccess<'de>,
	{
		let mut streams = Vec::new();

		while let Some(value) = seq.next_element::<Value>()? {
			streams.extend(known_channel::<A::Error>(None, value)?);
		}

		StreamSet::from_tagged(streams).map_err(de::Error::custom)
	}

	fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
	where
		A: MapAccess<'de>,
	{
		let mut streams = Vec::new();

		while let Some((key, value)) = map.next_entry::<String, Value>()? {
			streams.extend(known_channel::<A::Error>(Some(key), value)?);
		}

		StreamSet::from_tagged(streams).map_err(de::Error::custom)
	}
}

// Elements are only deserialized once their tag names a known channel.
fn known_channel<E>(key: Option<String>, mut value: Value) -> Result<Option<TaggedStream>, E>
where
	E: de::Error,
{
	let tag = key.or_else(|| value.get("type").and_then(Value::as_str).map(str::to_owned));
	let Some(tag) = tag.filter(|tag| tag.parse::<StreamType>().is_ok()) else {
		return Ok(None);
	};

	if let Some(fields) = value.as_object_mut() {
		fields.remove("type");
	}

	let mut stream: TaggedStream = serde_json::from_value(value).map_err(E::custom)?;

	stream.kind = Some(tag);

	Ok(Some(stream))
}

/// Channels returned for an activity.
pub type ActivityStreams = StreamSet;

/// Channels Strava exposes for a route.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "StreamSet")]
pub struct RouteStreams {
	/// Elapsed seconds.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub time: Option<Stream<i64>>,
	/// Cumulative meters.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub distance: Option<Stream<f64>>,
	/// Latitude/longitude pairs.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub latlng: Option<Stream<[f64; 2]>>,
	/// Elevation in meters.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub altitude: Option<Stream<f64>>,
	/// Smoothed grade in percent.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub grade_smooth: Option<Stream<f64>>,
}
impl RouteStreams {
	/// Route geometry from the `latlng` channel.
	pub fn coordinates(&self) -> Option<Vec<Coordinate>> {
		self.latlng.as_ref().map(|stream| latlng_coordinates(stream))
	}
}
impl From<StreamSet> for RouteStreams {
	fn from(set: StreamSet) -> Self {
		Self {
			time: set.time,
			distance: set.distance,
			latlng: set.latlng,
			altitude: set.altitude,
			grade_smooth: set.grade_smooth,
		}
	}
}

fn latlng_coordinates(stream: &Stream<[f64; 2]>) -> Vec<Coordinate> {
	stream.data.iter().map(|[latitude, longitude]| Coordinate::new(*latitude, *longitude)).collect()
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn stream_type_tags_round_trip_through_from_str() {
		for kind in StreamType::ALL {
			assert_eq!(kind.as_str().parse::<StreamType>(), Ok(kind));
			assert_eq!(
				serde_json::to_value(kind).expect("Stream type should serialize."),
				json!(kind.as_str())
			);
		}

		assert_eq!("power".parse::<StreamType>(), Err(UnknownStreamType("power".into())));
		assert_eq!(StreamType::Heartrate.unit(), "integer BPM");
		assert_eq!(StreamType::Latlng.shape(), StreamShape::FloatPair);
	}

	#[test]
	fn decodes_tagged_array_and_skips_unknown_tags() {
		let payload = json!([
			{
				"type": "time",
				"data": [0, 1, 2],
				"series_type": "distance",
				"original_size": 3,
				"resolution": "high"
			},
			{ "type": "latlng", "data": [[38.5, -120.2], [40.7, -120.95], [43.252, -126.453]] },
			{ "type": "heartrate", "data": [120, 121, 125] },
			{ "type": "moving", "data": [false, true, true] },
			{ "type": "power_zones", "data": "ignored" },
			{ "data": [1, 2, 3] }
		]);
		let set: StreamSet =
			serde_json::from_value(payload).expect("Tagged stream array should decode.");
		let time = set.time.as_ref().expect("Time channel should be present.");

		assert_eq!(time.data, vec![0, 1, 2]);
		assert_eq!(time.series_type.as_deref(), Some("distance"));
		assert_eq!(time.original_size, Some(3));
		assert_eq!(time.resolution.as_deref(), Some("high"));
		assert_eq!(
			set.kinds(),
			vec![StreamType::Time, StreamType::Latlng, StreamType::Heartrate, StreamType::Moving]
		);
		assert_eq!(
			set.moving.as_ref().map(|stream| stream.data.clone()),
			Some(vec![false, true, true])
		);
		assert_eq!(
			set.coordinates().map(|points| points[1]),
			Some(Coordinate::new(40.7, -120.95))
		);
		assert!(set.watts.is_none());
	}

	#[test]
	fn unknown_tag_leaves_other_channels_empty() {
		let payload = json!([
			{ "type": "time", "data": [0, 1, 2] },
			{ "type": "distance", "data": [0.0, 1.1, 2.2] },
			{ "type": "bogus", "data": [true] }
		]);
		let set: StreamSet =
			serde_json::from_value(payload).expect("Unknown tags should not fail decoding.");

		assert_eq!(set.kinds(), vec![StreamType::Time, StreamType::Distance]);
		assert_eq!(set.distance.map(|stream| stream.data), Some(vec![0.0, 1.1, 2.2]));
		assert!(set.latlng.is_none() && set.heartrate.is_none() && set.moving.is_none());
	}

	#[test]
	fn malformed_unknown_elements_are_skipped() {
		let mistyped_metadata = json!([
			{ "type": "time", "data": [0, 1, 2] },
			{ "type": "bogus", "data": [true], "original_size": "n/a" }
		]);
		let numeric_tag = json!([
			{ "type": "time", "data": [0, 1, 2] },
			{ "type": 42, "data": [true] },
			"not an object"
		]);

		for payload in [mistyped_metadata, numeric_tag] {
			let set: StreamSet = serde_json::from_value(payload)
				.expect("Unknown elements should be skipped before their fields are read.");

			assert_eq!(set.kinds(), vec![StreamType::Time]);
		}

		let keyed: StreamSet = serde_json::from_value(json!({
			"altitude": { "type": 7, "data": [5.0] },
			"bogus": { "original_size": "n/a" }
		}))
		.expect("Keyed streams should take their tag from the key.");

		assert_eq!(keyed.kinds(), vec![StreamType::Altitude]);
	}

	#[test]
	fn decodes_keyed_object_form() {
		let payload = json!({
			"distance": { "data": [0.0, 12.5, 30.1], "series_type": "distance" },
			"altitude": { "type": "altitude", "data": [5.0, 5.5, 6.0] },
			"unknown_channel": { "data": [1] }
		});
		let set: StreamSet = serde_json::from_value(payload).expect("Keyed streams should decode.");

		assert_eq!(set.kinds(), vec![StreamType::Distance, StreamType::Altitude]);
		assert_eq!(set.distance.map(|stream| stream.len()), Some(3));
	}

	#[test]
	fn integer_channels_accept_whole_numbers_only() {
		let err = serde_json::from_value::<StreamSet>(json!([
			{ "type": "heartrate", "data": ["fast"] }
		]))
		.expect_err("Strings should not coerce into heart rate samples.");

		assert!(err.to_string().contains("heartrate"));

		let err = StreamSet::from_tagged([TaggedStream {
			kind: Some("latlng".into()),
			data: json!([1.0, 2.0]),
			series_type: None,
			original_size: None,
			resolution: None,
		}])
		.expect_err("Flat numbers should not coerce into coordinate pairs.");

		assert_eq!(err.kind, StreamType::Latlng);
		assert_eq!(err.expected, StreamShape::FloatPair);
	}

	#[test]
	fn missing_data_decodes_as_empty_channel() {
		let set: StreamSet = serde_json::from_value(json!([{ "type": "cadence" }]))
			.expect("Channel without data should decode.");

		assert!(set.cadence.as_ref().is_some_and(Stream::is_empty));
	}

	#[test]
	fn route_streams_keep_route_channels() {
		let payload = json!([
			{ "type": "latlng", "data": [[1.0, 2.0]] },
			{ "type": "distance", "data": [0.0] },
			{ "type": "altitude", "data": [10.0] },
			{ "type": "heartrate", "data": [99] }
		]);
		let streams: RouteStreams =
			serde_json::from_value(payload).expect("Route streams should decode.");

		assert_eq!(streams.coordinates(), Some(vec![Coordinate::new(1.0, 2.0)]));
		assert!(streams.time.is_none());

		let reencoded = serde_json::to_value(&streams).expect("Route streams should serialize.");
		let decoded: RouteStreams =
			serde_json::from_value(reencoded).expect("Serialized route streams should decode.");

		assert_eq!(decoded, streams);
	}
}
