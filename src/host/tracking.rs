//! Camera tracking state reported by the host runtime.

use crate::geometry::SE3;

/// Why tracking quality is limited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitedReason {
    /// Session just started; not enough motion yet.
    Initializing,
    /// Device moving too fast for reliable tracking.
    ExcessiveMotion,
    /// Scene lacks visible features.
    InsufficientFeatures,
    /// Recovering after an interruption.
    Relocalizing,
}

/// Tracking quality of the host camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingState {
    /// No pose available; anchors cannot be placed.
    NotAvailable,
    /// Pose available but of questionable quality.
    Limited(LimitedReason),
    /// Tracking normally.
    Normal,
}

impl Default for TrackingState {
    fn default() -> Self {
        Self::NotAvailable
    }
}

/// Camera descriptor delivered with tracking-state changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTracking {
    pub state: TrackingState,

    /// Camera pose in the AR world frame (T_wc).
    pub pose: SE3,
}

impl CameraTracking {
    pub fn new(state: TrackingState, pose: SE3) -> Self {
        Self { state, pose }
    }
}
