//! Core ID types for the annotation registry.

use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for an anchor created by the registry.
///
/// AnchorIds are assigned sequentially by the `AnnotationManager` that owns
/// them. They serve as lightweight map keys so the registry never depends on
/// the identity semantics of host-runtime anchor objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnchorId(pub u64);

impl AnchorId {
    /// Create a new AnchorId with the given value.
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for AnchorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "A{}", self.0)
    }
}

/// Unique identifier for an annotation.
///
/// Drawn from a process-wide counter when the annotation is constructed, so
/// ids stay unique across registries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnnotationId(pub u64);

static NEXT_ANNOTATION_ID: AtomicU64 = AtomicU64::new(0);

impl AnnotationId {
    /// Create a new AnnotationId with the given value.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub(crate) fn next() -> Self {
        Self(NEXT_ANNOTATION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "N{}", self.0)
    }
}

/// Handle to a node owned by the host scene graph.
///
/// The host passes one of these with every anchor confirmation; the registry
/// attaches its visual under it and never interprets the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HostNodeId(pub u64);

impl std::fmt::Display for HostNodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "H{}", self.0)
    }
}
