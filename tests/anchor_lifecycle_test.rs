//! End-to-end anchor lifecycle against a simulated host runtime.
//!
//! The simulated host confirms anchors from its own thread through the event
//! queue, the way a render loop would.

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use approx::assert_relative_eq;
use parking_lot::Mutex;

use geoar_anchors::config::InvariantPolicy;
use geoar_anchors::geometry::{GeoPoint, SE3};
use geoar_anchors::host::{CameraTracking, HostScene, HostSession, TrackingState};
use geoar_anchors::registry::{Anchor, AnchorId, Annotation, AnnotationManager, HostNodeId};
use geoar_anchors::system::{HostEventQueue, HostEventSender};
use geoar_anchors::visual::{ImageHandle, NodeId, VisualNode};
use geoar_anchors::{AnchorError, ManagerConfig};

/// Session that records pending anchors for the host thread to confirm.
#[derive(Clone, Default)]
struct SimulatedSession {
    pending: Arc<Mutex<Vec<AnchorId>>>,
    live: Arc<Mutex<HashMap<AnchorId, Anchor>>>,
}

impl HostSession for SimulatedSession {
    fn add_anchor(&mut self, anchor: &Anchor) {
        self.pending.lock().push(anchor.id);
        self.live.lock().insert(anchor.id, anchor.clone());
    }

    fn remove_anchor(&mut self, anchor: AnchorId) {
        self.pending.lock().retain(|id| *id != anchor);
        self.live.lock().remove(&anchor);
    }
}

impl SimulatedSession {
    /// Confirm every pending anchor from a separate "render" thread.
    fn confirm_pending(&self, sender: HostEventSender) {
        let pending: Vec<_> = self.pending.lock().drain(..).collect();
        thread::spawn(move || {
            for id in pending {
                sender.anchor_added(id, HostNodeId(1000 + id.0));
            }
        })
        .join()
        .unwrap();
    }
}

#[derive(Default)]
struct SimulatedScene {
    attached: HashMap<HostNodeId, VisualNode>,
}

impl HostScene for SimulatedScene {
    fn attach(&mut self, parent: HostNodeId, node: &VisualNode) {
        self.attached.insert(parent, node.clone());
    }
}

fn manager_with_origin() -> AnnotationManager<SimulatedSession> {
    let config = ManagerConfig {
        invariant_policy: InvariantPolicy::Report,
        ..ManagerConfig::default()
    };
    let mut manager = AnnotationManager::with_config(SimulatedSession::default(), config);
    // Stockholm city hall
    manager.set_origin(GeoPoint::with_altitude(59.3275, 18.0543, 5.0));
    manager
}

#[test]
fn test_full_lifecycle_through_event_queue() {
    let mut manager = manager_with_origin();
    let queue = HostEventQueue::new();
    let mut scene = SimulatedScene::default();

    let annotations: Vec<_> = [
        (59.3293, 18.0686),
        (59.3251, 18.0711),
        (59.3326, 18.0649),
    ]
    .iter()
    .map(|&(lat, lon)| Arc::new(Annotation::new(GeoPoint::new(lat, lon))))
    .collect();
    annotations[0].set_callout_image(Some(ImageHandle::new("museum", 128, 256)));

    assert_eq!(manager.add_annotations(&annotations).unwrap(), 3);

    // Nothing is attached until the host confirms
    assert_eq!(manager.node_count(), 0);

    manager.session().confirm_pending(queue.sender());
    let report = manager.process_events(&queue, &mut scene);

    assert_eq!(report.events_processed, 3);
    assert_eq!(report.nodes_attached.len(), 3);
    assert!(report.errors.is_empty());
    assert_eq!(manager.node_count(), 3);
    assert!(manager.is_consistent());

    // Hit-test round trip: host node → visual → annotation
    for annotation in &annotations {
        let anchor = annotation.anchor().unwrap();
        let visual = &scene.attached[&HostNodeId(1000 + anchor.0)];
        let hit = manager.annotation_for_node(visual.id()).unwrap();
        assert_eq!(hit.id(), annotation.id());
    }

    // The annotation with an image got a portrait callout
    let first_anchor = annotations[0].anchor().unwrap();
    let first_visual = &scene.attached[&HostNodeId(1000 + first_anchor.0)];
    assert_eq!(first_visual.children().len(), 1);

    manager.remove_all_annotations();
    assert_eq!(manager.anchor_count(), 0);
    assert_eq!(manager.node_count(), 0);
    assert!(manager.session().live.lock().is_empty());
}

#[test]
fn test_origin_offsets_in_world_frame() {
    let mut manager = AnnotationManager::new(SimulatedSession::default());
    manager.set_origin(GeoPoint::with_altitude(0.0, 0.0, 0.0));

    let north = Arc::new(Annotation::new(GeoPoint::with_altitude(1.0, 0.0, 0.0)));
    let anchor = manager.add_annotation(&north).unwrap();

    let position = manager.get_anchor(anchor).unwrap().position();
    assert_relative_eq!(position.x, 0.0, epsilon = 1e-6);
    assert_relative_eq!(position.y, 0.0, epsilon = 1e-9);
    assert_relative_eq!(position.z, -111_194.93, epsilon = 1.0);
}

#[test]
fn test_origin_pose_shifts_anchors() {
    let mut manager = AnnotationManager::new(SimulatedSession::default());
    let origin = GeoPoint::new(10.0, 10.0);
    manager.set_origin_with_pose(origin, SE3::from_translation(nalgebra::Vector3::new(2.0, 0.0, 3.0)));

    let here = Arc::new(Annotation::new(origin));
    let anchor = manager.add_annotation(&here).unwrap();

    let position = manager.get_anchor(anchor).unwrap().position();
    assert_relative_eq!(position, nalgebra::Vector3::new(2.0, 0.0, 3.0), epsilon = 1e-9);
}

#[test]
fn test_relocation_before_and_after_confirmation() {
    let mut manager = manager_with_origin();
    let queue = HostEventQueue::new();
    let mut scene = SimulatedScene::default();

    let annotation = Arc::new(Annotation::new(GeoPoint::new(59.3293, 18.0686)));
    let first = manager.add_annotation(&annotation).unwrap();
    let sender = queue.sender();

    // Host confirms the first anchor, but the event is only drained after
    // the annotation has already moved.
    sender.anchor_added(first, HostNodeId(1));
    let second = manager
        .relocate_annotation(&annotation, GeoPoint::new(59.3300, 18.0700))
        .unwrap();
    sender.anchor_added(second, HostNodeId(2));

    let report = manager.process_events(&queue, &mut scene);

    assert_eq!(report.events_processed, 2);
    assert_eq!(report.nodes_attached.len(), 1);
    assert!(matches!(report.errors[0], AnchorError::AnchorRetired(id) if id == first));
    assert!(!report.has_invariant_violation());

    assert_eq!(annotation.anchor(), Some(second));
    assert!(manager.annotation_for_anchor(first).is_none());
    assert!(manager.session().live.lock().contains_key(&second));
    assert!(!manager.session().live.lock().contains_key(&first));
    assert!(manager.is_consistent());
}

#[test]
fn test_unknown_anchor_surfaces_as_invariant_violation() {
    let mut manager = manager_with_origin();
    let queue = HostEventQueue::new();
    let mut scene = SimulatedScene::default();

    queue.sender().anchor_added(AnchorId::new(4242), HostNodeId(1));
    let report = manager.process_events(&queue, &mut scene);

    assert!(report.has_invariant_violation());
    assert!(scene.attached.is_empty());
    assert_eq!(manager.node_count(), 0);
}

#[test]
fn test_tracking_events_reach_observer() {
    let mut manager = manager_with_origin();
    let queue = HostEventQueue::new();
    let mut scene = SimulatedScene::default();

    let states = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&states);
    manager.set_tracking_observer(move |camera: &CameraTracking| sink.lock().push(camera.state));

    let sender = queue.sender();
    sender.tracking_state_changed(CameraTracking::new(TrackingState::NotAvailable, SE3::identity()));
    sender.tracking_state_changed(CameraTracking::new(TrackingState::Normal, SE3::identity()));

    let report = manager.process_events(&queue, &mut scene);

    assert_eq!(report.events_processed, 2);
    assert_eq!(
        *states.lock(),
        vec![TrackingState::NotAvailable, TrackingState::Normal]
    );
    assert_eq!(manager.anchor_count(), 0);
}

#[test]
fn test_no_origin_leaves_state_untouched() {
    let mut manager = AnnotationManager::new(SimulatedSession::default());
    let annotations: Vec<_> = (0..3)
        .map(|i| Arc::new(Annotation::new(GeoPoint::new(1.0 + i as f64, 1.0))))
        .collect();

    let err = manager.add_annotations(&annotations).unwrap_err();

    match err {
        AnchorError::BatchAborted {
            added,
            not_added,
            source,
        } => {
            assert_eq!(added, 0);
            assert_eq!(not_added.len(), 3);
            assert!(matches!(*source, AnchorError::OriginNotSet));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(manager.anchor_count(), 0);
    assert!(manager.session().live.lock().is_empty());
    assert!(annotations.iter().all(|a| !a.is_anchored()));
}

#[test]
fn test_node_ids_are_unique_across_sources() {
    let mut manager = manager_with_origin();
    let mut scene = SimulatedScene::default();
    let queue = HostEventQueue::new();

    manager.set_node_provider(|annotation: &Annotation| {
        // Custom visual only for annotations north of the origin
        (annotation.location().latitude > 59.3275).then(|| {
            VisualNode::new(
                geoar_anchors::visual::Geometry::Sphere { radius: 1.0 },
                geoar_anchors::visual::Material::Unspecified,
            )
        })
    });

    let north = Arc::new(Annotation::new(GeoPoint::new(59.33, 18.05)));
    let south = Arc::new(Annotation::new(GeoPoint::new(59.32, 18.05)));
    manager.add_annotations(&[north.clone(), south.clone()]).unwrap();
    manager.session().confirm_pending(queue.sender());

    let report = manager.process_events(&queue, &mut scene);
    let ids: Vec<NodeId> = report.nodes_attached;

    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);
    assert!(manager.is_consistent());
}
