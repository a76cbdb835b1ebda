//! Visual nodes attached at confirmed anchors.

pub mod factory;
pub mod node;

pub use factory::{callout_node, default_marker};
pub use node::{Constraint, FreeAxes, Geometry, ImageHandle, Material, NodeId, Rgba, VisualNode};
