//! Capabilities supplied by the host AR runtime and by the caller.
//!
//! The registry drives two host-side capabilities:
//! - [`HostSession`] - creates and destroys tracked anchors
//! - [`HostScene`] - receives the visuals built for confirmed anchors
//!
//! and consults two optional caller-side capabilities, each set
//! independently on the manager:
//! - [`NodeProvider`] - custom visual per annotation
//! - [`TrackingObserver`] - camera tracking-state notifications
//!
//! Both caller-side traits are implemented for plain closures.

pub mod tracking;

pub use tracking::{CameraTracking, LimitedReason, TrackingState};

use crate::registry::{Anchor, AnchorId, Annotation, HostNodeId};
use crate::visual::VisualNode;

/// Anchor create/destroy primitives of the host session.
///
/// Both calls are fire-and-forget; the host confirms an added anchor later
/// through the manager's `on_anchor_added` callback.
pub trait HostSession {
    fn add_anchor(&mut self, anchor: &Anchor);

    /// Stop tracking `anchor`. The host drops the scene node it created for
    /// the anchor, together with any visual attached under it.
    fn remove_anchor(&mut self, anchor: AnchorId);
}

/// Scene-graph side of the host runtime.
pub trait HostScene {
    /// Attach `node` (and its children) under the host node created for an anchor.
    fn attach(&mut self, parent: HostNodeId, node: &VisualNode);
}

/// Supplies a custom visual for an annotation.
pub trait NodeProvider: Send + Sync {
    /// Return `None` to fall back to the default marker.
    fn node_for(&self, annotation: &Annotation) -> Option<VisualNode>;
}

impl<F> NodeProvider for F
where
    F: Fn(&Annotation) -> Option<VisualNode> + Send + Sync,
{
    fn node_for(&self, annotation: &Annotation) -> Option<VisualNode> {
        self(annotation)
    }
}

/// Receives camera tracking-state changes.
pub trait TrackingObserver: Send + Sync {
    fn camera_did_change_tracking_state(&self, camera: &CameraTracking);
}

impl<F> TrackingObserver for F
where
    F: Fn(&CameraTracking) + Send + Sync,
{
    fn camera_did_change_tracking_state(&self, camera: &CameraTracking) {
        self(camera)
    }
}
