//! Host callback messages.
//!
//! Host runtimes that call back from their own render thread package each
//! callback as a [`HostEvent`] instead of touching the registry directly.

use crate::host::CameraTracking;
use crate::registry::{AnchorId, HostNodeId};

/// A callback from the host runtime, queued for the registry's thread.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// The host confirmed an anchor and created a scene node for it.
    AnchorAdded {
        /// Anchor handed to the session by the registry.
        anchor: AnchorId,

        /// Node the host created at the anchor's pose.
        host_node: HostNodeId,
    },

    /// Camera tracking quality changed.
    TrackingStateChanged(CameraTracking),
}
