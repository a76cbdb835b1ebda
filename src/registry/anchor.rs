//! Anchor - an immutable, host-tracked world pose.

use nalgebra::Vector3;

use crate::geometry::{compute_offset, GeoPoint, SE3};

use super::types::AnchorId;

/// A world-space pose registered with the host session.
///
/// Anchors never move: relocating an annotation retires its anchor and
/// creates a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct Anchor {
    pub id: AnchorId,

    /// Pose in the AR world frame (T_wa).
    pub transform: SE3,
}

impl Anchor {
    /// Build the anchor for `location`, placed relative to the origin pose.
    ///
    /// `origin_pose` is where the origin location sits in the AR world; for a
    /// session started at the origin this is the identity.
    pub fn from_geo(id: AnchorId, origin: &GeoPoint, origin_pose: &SE3, location: &GeoPoint) -> Self {
        let offset = compute_offset(origin, location);
        Self {
            id,
            transform: origin_pose.compose(&SE3::from_translation(offset)),
        }
    }

    /// World-space position of the anchor.
    pub fn position(&self) -> Vector3<f64> {
        self.transform.translation
    }
}
