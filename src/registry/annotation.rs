//! Annotation - a caller-owned point of interest.
//!
//! Annotations are shared between the caller and the registry as
//! `Arc<Annotation>`. The registry mutates the location and the anchor
//! back-reference through the interior lock; the caller may change the
//! callout image at any time.

use parking_lot::RwLock;

use crate::geometry::GeoPoint;
use crate::visual::ImageHandle;

use super::types::{AnchorId, AnnotationId};

#[derive(Debug)]
struct AnnotationState {
    location: GeoPoint,
    callout_image: Option<ImageHandle>,
    anchor: Option<AnchorId>,
}

/// A geolocated point of interest with an optional image callout.
#[derive(Debug)]
pub struct Annotation {
    id: AnnotationId,
    state: RwLock<AnnotationState>,
}

impl Annotation {
    pub fn new(location: GeoPoint) -> Self {
        Self {
            id: AnnotationId::next(),
            state: RwLock::new(AnnotationState {
                location,
                callout_image: None,
                anchor: None,
            }),
        }
    }

    pub fn with_callout(location: GeoPoint, image: ImageHandle) -> Self {
        let annotation = Self::new(location);
        annotation.set_callout_image(Some(image));
        annotation
    }

    pub fn id(&self) -> AnnotationId {
        self.id
    }

    pub fn location(&self) -> GeoPoint {
        self.state.read().location
    }

    pub fn callout_image(&self) -> Option<ImageHandle> {
        self.state.read().callout_image.clone()
    }

    pub fn set_callout_image(&self, image: Option<ImageHandle>) {
        self.state.write().callout_image = image;
    }

    /// Anchor currently paired with this annotation, if any.
    ///
    /// Non-owning: the registry creates and retires anchors.
    pub fn anchor(&self) -> Option<AnchorId> {
        self.state.read().anchor
    }

    pub fn is_anchored(&self) -> bool {
        self.anchor().is_some()
    }

    pub(crate) fn set_location(&self, location: GeoPoint) {
        self.state.write().location = location;
    }

    pub(crate) fn set_anchor(&self, anchor: Option<AnchorId>) {
        self.state.write().anchor = anchor;
    }
}
