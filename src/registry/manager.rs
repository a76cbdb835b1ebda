//! AnnotationManager - pairs annotations with host anchors and visuals.
//!
//! The manager owns the registry state:
//! - the ordered list of live anchors
//! - anchor → annotation (every live anchor, exactly one annotation each)
//! - node → annotation (only after the host confirmed the anchor)
//!
//! Anchor creation is a round trip: `add_annotation` asks the host session for
//! an anchor and returns immediately; the host later confirms it through
//! [`AnnotationManager::on_anchor_added`], which is when the visual is built
//! and indexed. Callers must not expect a node to exist right after adding.
//!
//! All offsets are computed against the origin that is current at the time of
//! the call. Changing the origin does not move existing anchors; relocate
//! them explicitly if that is wanted.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::config::{InvariantPolicy, ManagerConfig};
use crate::error::{AnchorError, Result};
use crate::geometry::{GeoPoint, SE3};
use crate::host::{CameraTracking, HostScene, HostSession, NodeProvider, TrackingObserver};
use crate::system::{HostEvent, HostEventQueue, ProcessReport};
use crate::visual::{callout_node, default_marker, NodeId};

use super::anchor::Anchor;
use super::annotation::Annotation;
use super::types::{AnchorId, HostNodeId};

/// Registry of anchored annotations for one host session.
pub struct AnnotationManager<S: HostSession> {
    /// Host session that tracks the anchors.
    session: S,

    config: ManagerConfig,

    /// Geographic reference for every offset.
    origin: Option<GeoPoint>,

    /// Where the origin location sits in the AR world frame.
    origin_pose: SE3,

    /// Live anchors in creation order.
    anchors: Vec<Anchor>,

    annotations_by_anchor: HashMap<AnchorId, Arc<Annotation>>,

    /// Visual roots of confirmed anchors, queryable by node (hit-testing).
    annotations_by_node: HashMap<NodeId, Arc<Annotation>>,

    /// Visual root built for each confirmed anchor.
    visuals_by_anchor: HashMap<AnchorId, NodeId>,

    node_provider: Option<Box<dyn NodeProvider>>,

    tracking_observer: Option<Box<dyn TrackingObserver>>,

    /// Counter for generating unique anchor IDs.
    next_anchor_id: u64,
}

impl<S: HostSession> AnnotationManager<S> {
    /// Create a manager with the default configuration.
    pub fn new(session: S) -> Self {
        Self::with_config(session, ManagerConfig::default())
    }

    pub fn with_config(session: S, config: ManagerConfig) -> Self {
        Self {
            session,
            config,
            origin: None,
            origin_pose: SE3::identity(),
            anchors: Vec::new(),
            annotations_by_anchor: HashMap::new(),
            annotations_by_node: HashMap::new(),
            visuals_by_anchor: HashMap::new(),
            node_provider: None,
            tracking_observer: None,
            next_anchor_id: 0,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Origin
    // ─────────────────────────────────────────────────────────────────────────

    /// Set the origin location at the AR world origin.
    ///
    /// Resets any pose given earlier through [`Self::set_origin_with_pose`].
    /// Existing anchors stay where they are.
    pub fn set_origin(&mut self, location: GeoPoint) {
        if !location.is_valid() {
            tracing::warn!("Origin location {} is out of range", location);
        }
        if !self.anchors.is_empty() {
            tracing::debug!(
                "Origin changed to {} with {} live anchors; they keep their old placement",
                location,
                self.anchors.len()
            );
        }
        self.origin = Some(location);
        self.origin_pose = SE3::identity();
    }

    /// Set the origin and where it sits in the AR world frame.
    pub fn set_origin_with_pose(&mut self, location: GeoPoint, pose: SE3) {
        self.set_origin(location);
        self.origin_pose = pose;
    }

    pub fn clear_origin(&mut self) {
        self.origin = None;
        self.origin_pose = SE3::identity();
    }

    pub fn origin(&self) -> Option<GeoPoint> {
        self.origin
    }

    pub fn origin_pose(&self) -> &SE3 {
        &self.origin_pose
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Capabilities
    // ─────────────────────────────────────────────────────────────────────────

    pub fn set_node_provider(&mut self, provider: impl NodeProvider + 'static) {
        self.node_provider = Some(Box::new(provider));
    }

    pub fn clear_node_provider(&mut self) {
        self.node_provider = None;
    }

    pub fn set_tracking_observer(&mut self, observer: impl TrackingObserver + 'static) {
        self.tracking_observer = Some(Box::new(observer));
    }

    pub fn clear_tracking_observer(&mut self) {
        self.tracking_observer = None;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Adding
    // ─────────────────────────────────────────────────────────────────────────

    /// Anchor an annotation at its location.
    ///
    /// Fails without touching any state when no origin is set or the
    /// annotation already holds an anchor.
    pub fn add_annotation(&mut self, annotation: &Arc<Annotation>) -> Result<AnchorId> {
        let Some(origin) = self.origin else {
            tracing::warn!(
                "add_annotation({}) called before an origin location was set",
                annotation.id()
            );
            return Err(AnchorError::OriginNotSet);
        };

        if let Some(anchor) = annotation.anchor() {
            tracing::warn!("Annotation {} is already paired with {}", annotation.id(), anchor);
            return Err(AnchorError::AlreadyAnchored {
                annotation: annotation.id(),
                anchor,
            });
        }

        let location = annotation.location();
        if !location.is_valid() {
            tracing::warn!(
                "Annotation {} has out-of-range location {}",
                annotation.id(),
                location
            );
        }

        let anchor = self.create_anchor(&origin, &location);
        let id = self.register_anchor(anchor, annotation);
        debug_assert!(self.is_consistent());
        Ok(id)
    }

    /// Add annotations in order, stopping at the first failure.
    ///
    /// Annotations added before the failure stay anchored. Returns the number
    /// added.
    pub fn add_annotations(&mut self, annotations: &[Arc<Annotation>]) -> Result<usize> {
        for (added, annotation) in annotations.iter().enumerate() {
            if let Err(source) = self.add_annotation(annotation) {
                let not_added: Vec<_> = annotations[added..].iter().map(|a| a.id()).collect();
                tracing::warn!(
                    "Batch add aborted after {} of {} annotations: {}",
                    added,
                    annotations.len(),
                    source
                );
                return Err(AnchorError::BatchAborted {
                    added,
                    not_added,
                    source: Box::new(source),
                });
            }
        }

        tracing::info!("Added {} annotations", annotations.len());
        Ok(annotations.len())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Relocation
    // ─────────────────────────────────────────────────────────────────────────

    /// Move an anchored annotation to a new location.
    ///
    /// The old anchor is retired and a new one is created against the current
    /// origin. Fails without mutation when the annotation is not anchored in
    /// this registry or no origin is set.
    pub fn relocate_annotation(
        &mut self,
        annotation: &Arc<Annotation>,
        new_location: GeoPoint,
    ) -> Result<AnchorId> {
        let Some(old_anchor) = self.owned_anchor(annotation) else {
            tracing::warn!(
                "relocate_annotation({}) called for an annotation without an anchor",
                annotation.id()
            );
            return Err(AnchorError::NotAnchored(annotation.id()));
        };
        let Some(origin) = self.origin else {
            tracing::warn!(
                "relocate_annotation({}) called without an origin location",
                annotation.id()
            );
            return Err(AnchorError::OriginNotSet);
        };

        annotation.set_location(new_location);
        self.retire_anchor(old_anchor);
        annotation.set_anchor(None);

        let anchor = self.create_anchor(&origin, &new_location);
        let new_anchor = self.register_anchor(anchor, annotation);

        tracing::debug!(
            "Relocated annotation {} to {}: {} -> {}",
            annotation.id(),
            new_location,
            old_anchor,
            new_anchor
        );
        debug_assert!(self.is_consistent());
        Ok(new_anchor)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Removal
    // ─────────────────────────────────────────────────────────────────────────

    /// Remove an annotation's anchor and visual.
    ///
    /// Returns false (not an error) when the annotation holds no anchor here.
    pub fn remove_annotation(&mut self, annotation: &Arc<Annotation>) -> bool {
        let Some(anchor) = self.owned_anchor(annotation) else {
            return false;
        };

        self.retire_anchor(anchor);
        annotation.set_anchor(None);
        tracing::debug!("Removed annotation {} ({})", annotation.id(), anchor);
        debug_assert!(self.is_consistent());
        true
    }

    /// Remove each annotation in turn. Returns how many were anchored.
    pub fn remove_annotations(&mut self, annotations: &[Arc<Annotation>]) -> usize {
        annotations
            .iter()
            .filter(|annotation| self.remove_annotation(annotation))
            .count()
    }

    /// Remove every anchor from the host session and clear the registry.
    pub fn remove_all_annotations(&mut self) {
        let anchors = std::mem::take(&mut self.anchors);

        for anchor in &anchors {
            self.session.remove_anchor(anchor.id);
        }

        for (_, annotation) in self.annotations_by_anchor.drain() {
            annotation.set_anchor(None);
        }
        self.annotations_by_node.clear();
        self.visuals_by_anchor.clear();

        tracing::info!("Removed all {} anchors", anchors.len());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Host Callbacks
    // ─────────────────────────────────────────────────────────────────────────

    /// Host confirmed `anchor` and created `host_node` for it.
    ///
    /// Builds the annotation's visual (custom node or default marker, plus an
    /// image callout when the annotation has one), attaches it under
    /// `host_node` and indexes it by node.
    ///
    /// An anchor this registry never created is an internal consistency error
    /// handled per [`InvariantPolicy`]. An anchor retired before confirmation
    /// yields [`AnchorError::AnchorRetired`] and changes nothing.
    pub fn on_anchor_added(
        &mut self,
        anchor: AnchorId,
        host_node: HostNodeId,
        scene: &mut dyn HostScene,
    ) -> Result<NodeId> {
        let annotation = match self.annotations_by_anchor.get(&anchor) {
            Some(annotation) => Arc::clone(annotation),
            // Ids are sequential and never reused: anything below the
            // counter was issued here and has since been retired.
            None if self.was_issued(anchor) => {
                tracing::debug!("Ignoring confirmation of retired anchor {}", anchor);
                return Err(AnchorError::AnchorRetired(anchor));
            }
            None => return Err(self.invariant_violation(AnchorError::UnknownAnchor(anchor))),
        };

        let mut node = self
            .node_provider
            .as_ref()
            .and_then(|provider| provider.node_for(&annotation))
            .unwrap_or_else(|| default_marker(&self.config.default_marker));

        if let Some(image) = annotation.callout_image() {
            let callout = callout_node(&image, &node, self.config.callout_gap);
            node.add_child(callout);
        }

        scene.attach(host_node, &node);

        let node_id = node.id();
        if let Some(previous) = self.visuals_by_anchor.insert(anchor, node_id) {
            tracing::warn!("Anchor {} confirmed twice; replacing visual {}", anchor, previous);
            self.annotations_by_node.remove(&previous);
        }
        self.annotations_by_node.insert(node_id, annotation);

        tracing::debug!("Attached visual {} for {} under {}", node_id, anchor, host_node);
        debug_assert!(self.is_consistent());
        Ok(node_id)
    }

    /// Forward a tracking-state change to the observer, if any.
    pub fn on_tracking_state_changed(&self, camera: &CameraTracking) {
        if let Some(observer) = &self.tracking_observer {
            observer.camera_did_change_tracking_state(camera);
        }
    }

    /// Drain the host event queue on the calling thread.
    ///
    /// Errors from individual callbacks are collected in the report; the
    /// remaining events are still processed.
    pub fn process_events(
        &mut self,
        queue: &HostEventQueue,
        scene: &mut dyn HostScene,
    ) -> ProcessReport {
        let mut report = ProcessReport::default();

        for event in queue.drain() {
            report.events_processed += 1;
            match event {
                HostEvent::AnchorAdded { anchor, host_node } => {
                    match self.on_anchor_added(anchor, host_node, scene) {
                        Ok(node_id) => report.nodes_attached.push(node_id),
                        Err(e) => report.errors.push(e),
                    }
                }
                HostEvent::TrackingStateChanged(camera) => {
                    self.on_tracking_state_changed(&camera);
                }
            }
        }

        report
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Live anchors in creation order.
    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    pub fn anchor_count(&self) -> usize {
        self.anchors.len()
    }

    pub fn get_anchor(&self, id: AnchorId) -> Option<&Anchor> {
        self.anchors.iter().find(|anchor| anchor.id == id)
    }

    pub fn annotation_for_anchor(&self, id: AnchorId) -> Option<&Arc<Annotation>> {
        self.annotations_by_anchor.get(&id)
    }

    /// Annotation whose visual root is `node` (hit-testing).
    pub fn annotation_for_node(&self, node: NodeId) -> Option<&Arc<Annotation>> {
        self.annotations_by_node.get(&node)
    }

    /// Visual root attached for a confirmed anchor.
    pub fn node_for_anchor(&self, id: AnchorId) -> Option<NodeId> {
        self.visuals_by_anchor.get(&id).copied()
    }

    pub fn node_count(&self) -> usize {
        self.annotations_by_node.len()
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Check every registry invariant.
    pub fn is_consistent(&self) -> bool {
        let listed: HashSet<AnchorId> = self.anchors.iter().map(|a| a.id).collect();
        if listed.len() != self.anchors.len() || listed.len() != self.annotations_by_anchor.len() {
            return false;
        }

        let mut paired = HashSet::new();
        for (anchor, annotation) in &self.annotations_by_anchor {
            if !listed.contains(anchor)
                || annotation.anchor() != Some(*anchor)
                || !paired.insert(annotation.id())
            {
                return false;
            }
        }

        self.annotations_by_node.len() == self.visuals_by_anchor.len()
            && self.visuals_by_anchor.iter().all(|(anchor, node)| {
                match (
                    self.annotations_by_anchor.get(anchor),
                    self.annotations_by_node.get(node),
                ) {
                    (Some(a), Some(b)) => a.id() == b.id(),
                    _ => false,
                }
            })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    fn next_anchor_id(&mut self) -> AnchorId {
        let id = AnchorId::new(self.next_anchor_id);
        self.next_anchor_id += 1;
        id
    }

    fn create_anchor(&mut self, origin: &GeoPoint, location: &GeoPoint) -> Anchor {
        let id = self.next_anchor_id();
        Anchor::from_geo(id, origin, &self.origin_pose, location)
    }

    /// Hand the anchor to the host and pair it with the annotation.
    fn register_anchor(&mut self, anchor: Anchor, annotation: &Arc<Annotation>) -> AnchorId {
        let id = anchor.id;
        self.session.add_anchor(&anchor);

        tracing::debug!(
            "Anchored annotation {} as {} at [{:.2}, {:.2}, {:.2}]",
            annotation.id(),
            id,
            anchor.transform.translation.x,
            anchor.transform.translation.y,
            anchor.transform.translation.z
        );

        self.anchors.push(anchor);
        annotation.set_anchor(Some(id));
        self.annotations_by_anchor.insert(id, Arc::clone(annotation));
        id
    }

    /// Remove an anchor from the host session and from all registry state.
    ///
    /// Does not touch the annotation's back-reference.
    fn retire_anchor(&mut self, id: AnchorId) {
        self.session.remove_anchor(id);

        if let Some(idx) = self.anchors.iter().position(|anchor| anchor.id == id) {
            self.anchors.remove(idx);
        }
        self.annotations_by_anchor.remove(&id);

        if let Some(node) = self.visuals_by_anchor.remove(&id) {
            self.annotations_by_node.remove(&node);
        }
    }

    fn was_issued(&self, id: AnchorId) -> bool {
        id.0 < self.next_anchor_id
    }

    /// The annotation's anchor, if this registry is the one that paired them.
    fn owned_anchor(&self, annotation: &Annotation) -> Option<AnchorId> {
        let anchor = annotation.anchor()?;
        self.annotations_by_anchor
            .get(&anchor)
            .filter(|paired| paired.id() == annotation.id())
            .map(|_| anchor)
    }

    fn invariant_violation(&self, err: AnchorError) -> AnchorError {
        tracing::error!("{}", err);
        match self.config.invariant_policy {
            InvariantPolicy::Panic => panic!("{}", err),
            InvariantPolicy::Report => err,
        }
    }
}

impl<S: HostSession> std::fmt::Debug for AnnotationManager<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotationManager")
            .field("origin", &self.origin)
            .field("num_anchors", &self.anchors.len())
            .field("num_nodes", &self.annotations_by_node.len())
            .finish()
    }
}
