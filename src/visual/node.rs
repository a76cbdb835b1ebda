//! Engine-agnostic description of the visual nodes handed to the host scene.
//!
//! A [`VisualNode`] is a small tree: geometry, material, a local position, an
//! optional set of constraints, and children. The host scene turns it into
//! whatever its renderer needs when [`crate::host::HostScene::attach`] is
//! called.

use std::sync::atomic::{AtomicU64, Ordering};

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Unique identifier for a visual node.
///
/// Assigned from a process-wide counter so that nodes built by a caller's
/// node provider never collide with the default factory's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(0);

impl NodeId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub(crate) fn next() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "V{}", self.0)
    }
}

/// Linear RGBA colour, each channel in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const RED: Rgba = Rgba::new(1.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// Opaque reference to a caller-owned image asset.
///
/// Only the pixel size is interpreted (to keep callouts at the image's aspect
/// ratio); `asset` is whatever key the host uses to find the texture.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageHandle {
    pub asset: String,
    pub width: u32,
    pub height: u32,
}

impl ImageHandle {
    pub fn new(asset: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            asset: asset.into(),
            width,
            height,
        }
    }
}

/// Node geometry, in meters, centred on the node origin.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Sphere { radius: f64 },
    /// Vertical plane in the node's XY plane.
    Plane { width: f64, height: f64 },
    Cuboid { width: f64, height: f64, length: f64 },
    /// Geometry owned by the host; only its bounds are known here.
    External { min: Vector3<f64>, max: Vector3<f64> },
    /// Grouping node with no geometry of its own.
    Empty,
}

impl Geometry {
    /// Local axis-aligned bounding box as `(min, max)`.
    pub fn bounding_box(&self) -> (Vector3<f64>, Vector3<f64>) {
        match *self {
            Geometry::Sphere { radius } => (Vector3::repeat(-radius), Vector3::repeat(radius)),
            Geometry::Plane { width, height } => {
                let half = Vector3::new(width / 2.0, height / 2.0, 0.0);
                (-half, half)
            }
            Geometry::Cuboid {
                width,
                height,
                length,
            } => {
                let half = Vector3::new(width, height, length) / 2.0;
                (-half, half)
            }
            Geometry::External { min, max } => (min, max),
            Geometry::Empty => (Vector3::zeros(), Vector3::zeros()),
        }
    }
}

/// Surface fill of a node's geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    Color(Rgba),
    Image(ImageHandle),
    /// Leave the material to the host.
    Unspecified,
}

/// Axes a billboard is free to rotate about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreeAxes {
    /// Rotate about the vertical axis only, so the node stays upright.
    Y,
    All,
}

/// Behavioural constraint the host applies every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Keep the node facing the viewer.
    Billboard { free_axes: FreeAxes },
}

/// A renderable node and its children.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualNode {
    id: NodeId,
    pub geometry: Geometry,
    pub material: Material,
    /// Position relative to the parent node.
    pub position: Vector3<f64>,
    pub constraints: Vec<Constraint>,
    children: Vec<VisualNode>,
}

impl VisualNode {
    /// Create a node at the parent's origin with a fresh [`NodeId`].
    pub fn new(geometry: Geometry, material: Material) -> Self {
        Self {
            id: NodeId::next(),
            geometry,
            material,
            position: Vector3::zeros(),
            constraints: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_position(mut self, position: Vector3<f64>) -> Self {
        self.position = position;
        self
    }

    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn children(&self) -> &[VisualNode] {
        &self.children
    }

    pub fn add_child(&mut self, child: VisualNode) {
        self.children.push(child);
    }

    /// Bounding box of this node's own geometry (children excluded).
    pub fn bounding_box(&self) -> (Vector3<f64>, Vector3<f64>) {
        self.geometry.bounding_box()
    }
}
