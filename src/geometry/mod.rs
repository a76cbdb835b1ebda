//! Geometry utilities: geodesy, frame conventions, SE3 transforms.

pub mod frames;
pub mod geodesy;
pub mod se3;

pub use geodesy::{compute_offset, haversine_distance, initial_bearing, GeoPoint, EARTH_RADIUS_M};
pub use se3::SE3;
