//! Registry module - pairing annotations with anchors and visuals.
//!
//! This module contains:
//! - [`Annotation`] - caller-owned point of interest, shared as `Arc`
//! - [`Anchor`] - immutable world pose registered with the host session
//! - [`AnnotationManager`] - the registry keeping both indices consistent
//!
//! # Architecture
//!
//! Anchors and annotations are paired one to one:
//! - the manager maps anchor → annotation
//! - the annotation points back at its anchor (`Annotation::anchor`)
//!
//! Once the host confirms an anchor, the visual built for it is indexed
//! node → annotation for hit-testing.
//!
//! # Example
//!
//! ```ignore
//! use geoar_anchors::geometry::GeoPoint;
//! use geoar_anchors::registry::{Annotation, AnnotationManager};
//!
//! let mut manager = AnnotationManager::new(session);
//! manager.set_origin(GeoPoint::new(59.3293, 18.0686));
//!
//! let cafe = Arc::new(Annotation::new(GeoPoint::new(59.3301, 18.0690)));
//! let anchor = manager.add_annotation(&cafe)?;
//!
//! // Later, from the host's render callback
//! let node = manager.on_anchor_added(anchor, host_node, &mut scene)?;
//! ```

pub mod anchor;
pub mod annotation;
pub mod manager;
pub mod types;

pub use anchor::Anchor;
pub use annotation::Annotation;
pub use manager::AnnotationManager;
pub use types::{AnchorId, AnnotationId, HostNodeId};
