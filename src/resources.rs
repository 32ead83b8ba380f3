//! Typed resource operations.
//!
//! Each operation obtains a valid token (refreshing it when expired), builds its [`Endpoint`],
//! and decodes the response into the matching record type.

// self
use crate::{
	_prelude::*,
	endpoint::{Endpoint, Pagination},
	executor::TransportErrorMapper,
	flows::StravaClient,
	http::StravaHttpClient,
	models::{Activity, Athlete, Route},
	stream::{ActivityStreams, RouteStreams, StreamType},
};

impl<C, M> StravaClient<C, M>
where
	C: ?Sized + StravaHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Lists the authenticated athlete's activities, newest first.
	pub async fn list_activities(&self, pagination: Pagination) -> Result<Vec<Activity>> {
		self.perform(&Endpoint::ListActivities(pagination)).await
	}

	/// Lists the authenticated athlete's routes.
	pub async fn list_routes(&self, pagination: Pagination) -> Result<Vec<Route>> {
		self.perform(&Endpoint::ListRoutes(pagination)).await
	}

	/// Fetches a single route.
	pub async fn get_route(&self, id: u64) -> Result<Route> {
		self.perform(&Endpoint::GetRoute(id)).await
	}

	/// Fetches the requested stream channels of an activity.
	///
	/// An empty `types` slice requests every channel.
	pub async fn get_activity_streams(
		&self,
		id: u64,
		types: &[StreamType],
	) -> Result<ActivityStreams> {
		let types = if types.is_empty() { StreamType::ALL.to_vec() } else { types.to_vec() };

		self.perform(&Endpoint::GetActivityStreams { id, types }).await
	}

	/// Fetches the stream channels of a route.
	pub async fn get_route_streams(&self, id: u64) -> Result<RouteStreams> {
		self.perform(&Endpoint::GetRouteStreams(id)).await
	}

	/// Fetches a single activity.
	pub async fn get_activity(&self, id: u64) -> Result<Activity> {
		self.perform(&Endpoint::GetActivity(id)).await
	}

	/// Fetches the authenticated athlete's profile.
	pub async fn get_athlete(&self) -> Result<Athlete> {
		self.perform(&Endpoint::GetAthlete).await
	}
}
