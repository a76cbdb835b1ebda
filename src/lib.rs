//! Geo-anchored annotations for AR runtimes.
//!
//! Converts geographic locations into offsets from a session origin and keeps
//! annotations paired with the anchors and visual nodes of a host AR runtime.

pub mod config;
pub mod error;
pub mod geometry;
pub mod host;
pub mod registry;
pub mod system;
pub mod visual;

pub use config::ManagerConfig;
pub use error::AnchorError;
pub use geometry::{compute_offset, GeoPoint};
pub use registry::{Anchor, AnchorId, Annotation, AnnotationManager};
