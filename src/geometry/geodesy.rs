//! Geographic coordinates and the geo-to-local offset transform.
//!
//! Offsets are computed on a spherical earth: the haversine great-circle
//! distance and the initial bearing from the origin give a point on the
//! tangent plane at the origin, which is then rotated into the AR world frame
//! (see [`super::frames`]). Accuracy is best within a few kilometres of the
//! origin, which is the range at which AR content is visible anyway.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use super::frames::enu_to_world;

/// Mean earth radius in meters (IUGG).
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A geographic location in degrees, with optional altitude in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub altitude: Option<f64>,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude: None,
        }
    }

    pub fn with_altitude(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude: Some(altitude),
        }
    }

    /// True when latitude/longitude are finite and within range.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude.abs() <= 90.0
            && self.longitude.abs() <= 180.0
            && self.altitude.map_or(true, f64::is_finite)
    }

    /// Great-circle distance in meters, ignoring altitude.
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        haversine_distance(self, other)
    }

    /// Initial bearing towards `other`, radians clockwise from north.
    pub fn bearing_to(&self, other: &GeoPoint) -> f64 {
        initial_bearing(self, other)
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.altitude {
            Some(alt) => write!(f, "({:.6}, {:.6}, {:.1}m)", self.latitude, self.longitude, alt),
            None => write!(f, "({:.6}, {:.6})", self.latitude, self.longitude),
        }
    }
}

/// Haversine great-circle distance between two points, in meters.
pub fn haversine_distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let d_phi = phi2 - phi1;
    let d_lambda = (b.longitude - a.longitude).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Initial great-circle bearing from `a` to `b`, radians clockwise from north.
pub fn initial_bearing(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let d_lambda = (b.longitude - a.longitude).to_radians();

    let y = d_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();
    y.atan2(x)
}

/// Offset of `target` relative to `origin` in the tangent frame (east, north, up).
///
/// The vertical component is the altitude difference when both points carry
/// an altitude, and zero otherwise.
pub fn enu_offset(origin: &GeoPoint, target: &GeoPoint) -> Vector3<f64> {
    let up = match (origin.altitude, target.altitude) {
        (Some(a0), Some(a1)) => a1 - a0,
        _ => 0.0,
    };

    let distance = haversine_distance(origin, target);
    if distance == 0.0 {
        return Vector3::new(0.0, 0.0, up);
    }

    let bearing = initial_bearing(origin, target);
    Vector3::new(distance * bearing.sin(), distance * bearing.cos(), up)
}

/// Offset of `target` relative to `origin` in the AR world frame.
///
/// +X east, +Y up, -Z north. `compute_offset(o, o)` is the zero vector.
/// Non-finite input propagates as NaN instead of failing.
pub fn compute_offset(origin: &GeoPoint, target: &GeoPoint) -> Vector3<f64> {
    enu_to_world(&enu_offset(origin, target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_same_point_is_zero() {
        let origin = GeoPoint::with_altitude(48.8584, 2.2945, 35.0);
        let offset = compute_offset(&origin, &origin);
        assert_eq!(offset, Vector3::zeros());

        let no_alt = GeoPoint::new(-33.8568, 151.2153);
        assert_eq!(compute_offset(&no_alt, &no_alt), Vector3::zeros());
    }

    #[test]
    fn test_one_degree_north() {
        let origin = GeoPoint::with_altitude(0.0, 0.0, 0.0);
        let target = GeoPoint::with_altitude(1.0, 0.0, 0.0);

        let offset = compute_offset(&origin, &target);

        assert_relative_eq!(offset.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(offset.y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(offset.z, -111_194.93, epsilon = 1.0);
    }

    #[test]
    fn test_due_east_is_positive_x() {
        let origin = GeoPoint::new(0.0, 0.0);
        let target = GeoPoint::new(0.0, 0.01);

        let offset = compute_offset(&origin, &target);

        assert!(offset.x > 1_100.0 && offset.x < 1_120.0);
        assert_relative_eq!(offset.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_altitude_difference_is_vertical() {
        let origin = GeoPoint::with_altitude(40.0, -74.0, 10.0);
        let target = GeoPoint::with_altitude(40.0, -74.0, 25.0);

        let offset = compute_offset(&origin, &target);
        assert_relative_eq!(offset, Vector3::new(0.0, 15.0, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn test_missing_altitude_flattens() {
        let origin = GeoPoint::new(40.0, -74.0);
        let target = GeoPoint::with_altitude(40.001, -74.0, 500.0);

        assert_eq!(compute_offset(&origin, &target).y, 0.0);
    }

    #[test]
    fn test_nan_propagates() {
        let origin = GeoPoint::new(0.0, 0.0);
        let target = GeoPoint::new(f64::NAN, 0.0);

        let offset = compute_offset(&origin, &target);
        assert!(offset.x.is_nan() || offset.z.is_nan());
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        let origin = GeoPoint::new(0.0, 0.0);
        assert_relative_eq!(origin.bearing_to(&GeoPoint::new(1.0, 0.0)), 0.0, epsilon = 1e-12);
        assert_relative_eq!(
            origin.bearing_to(&GeoPoint::new(0.0, 1.0)),
            std::f64::consts::FRAC_PI_2,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_is_valid() {
        assert!(GeoPoint::new(45.0, 120.0).is_valid());
        assert!(!GeoPoint::new(91.0, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, f64::INFINITY).is_valid());
        assert!(!GeoPoint::with_altitude(0.0, 0.0, f64::NAN).is_valid());
    }
}
