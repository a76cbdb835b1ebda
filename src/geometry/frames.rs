//! Coordinate frame definitions for geo-anchored content.
//!
//! # Frame Conventions
//!
//! ## Local Tangent Frame (ENU)
//! ```text
//!        +Z (up)
//!         |
//!         |   +Y (north)
//!         |  /
//!         | /
//!         +------ +X (east)
//! ```
//! The tangent plane touches the earth at the origin location. Geodesy
//! helpers produce offsets in this frame.
//!
//! ## AR World Frame (Y-up)
//! ```text
//!        +Y (up)
//!         |
//!         |
//!         +------ +X (east)
//!        /
//!       /
//!      +Z (south)
//! ```
//! - X: East
//! - Y: Up (gravity aligned)
//! - Z: South, so north is **-Z**
//!
//! This matches the gravity-and-heading world alignment used by mobile AR
//! runtimes, where the session origin is the device position at start-up.
//! Anchor poses handed to the host session are always in this frame.
//!
//! # Transformation Naming Convention
//!
//! `rotation_target_source` maps a vector from `source` into `target`:
//! ```text
//! p_world = rotation_world_enu() * p_enu
//! ```

use nalgebra::{Matrix3, Vector3};

/// Fixed rotation from the ENU tangent frame into the AR world frame.
///
/// Maps:
/// - ENU +X (east)  → World +X (east)
/// - ENU +Y (north) → World -Z
/// - ENU +Z (up)    → World +Y (up)
#[rustfmt::skip]
pub fn rotation_world_enu() -> Matrix3<f64> {
    Matrix3::new(
        1.0, 0.0,  0.0,  // World X = East
        0.0, 0.0,  1.0,  // World Y = Up
        0.0, -1.0, 0.0,  // World Z = -North
    )
}

/// Transform an (east, north, up) offset into the AR world frame.
pub fn enu_to_world(p_enu: &Vector3<f64>) -> Vector3<f64> {
    rotation_world_enu() * p_enu
}
