//! Queue that serializes host callbacks onto the registry's thread.
//!
//! The host thread holds a [`HostEventSender`]; the thread that owns the
//! `AnnotationManager` drains the queue with `process_events`. The channel is
//! unbounded so the host's render loop never blocks on the registry.

use crossbeam_channel::{unbounded, Receiver, Sender, TryIter};

use crate::error::AnchorError;
use crate::host::CameraTracking;
use crate::registry::{AnchorId, HostNodeId};
use crate::visual::NodeId;

use super::messages::HostEvent;

/// Receiving end of the host callback channel.
pub struct HostEventQueue {
    sender: Sender<HostEvent>,
    receiver: Receiver<HostEvent>,
}

impl HostEventQueue {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    /// A sender to hand to the host thread. Cheap to clone.
    pub fn sender(&self) -> HostEventSender {
        HostEventSender {
            sender: self.sender.clone(),
        }
    }

    /// Number of queued events.
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    /// Events queued so far, without blocking.
    pub(crate) fn drain(&self) -> TryIter<'_, HostEvent> {
        self.receiver.try_iter()
    }
}

impl Default for HostEventQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Host-side handle for posting callbacks.
#[derive(Clone)]
pub struct HostEventSender {
    sender: Sender<HostEvent>,
}

impl HostEventSender {
    /// Queue an anchor confirmation. Returns false if the queue is gone.
    pub fn anchor_added(&self, anchor: AnchorId, host_node: HostNodeId) -> bool {
        self.send(HostEvent::AnchorAdded { anchor, host_node })
    }

    /// Queue a tracking-state change. Returns false if the queue is gone.
    pub fn tracking_state_changed(&self, camera: CameraTracking) -> bool {
        self.send(HostEvent::TrackingStateChanged(camera))
    }

    pub fn send(&self, event: HostEvent) -> bool {
        self.sender.send(event).is_ok()
    }
}

/// Outcome of one `process_events` pass.
#[derive(Debug, Default)]
pub struct ProcessReport {
    /// Number of events taken off the queue.
    pub events_processed: usize,

    /// Visual roots attached, in event order.
    pub nodes_attached: Vec<NodeId>,

    /// Callback failures, in event order.
    pub errors: Vec<AnchorError>,
}

impl ProcessReport {
    pub fn has_invariant_violation(&self) -> bool {
        self.errors.iter().any(AnchorError::is_invariant_violation)
    }
}
