//! Resource records returned by the Strava API.
//!
//! Records are flat serde DTOs: every field Strava may omit is an `Option`, and unknown fields are
//! ignored.

pub mod activity;
pub mod athlete;
pub mod item;
pub mod route;

pub use activity::*;
pub use athlete::*;
pub use item::*;
pub use route::*;
