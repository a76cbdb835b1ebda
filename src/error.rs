//! Error types for the annotation registry.

use thiserror::Error;

use crate::registry::{AnchorId, AnnotationId};

/// Registry error type.
///
/// Everything except [`AnchorError::UnknownAnchor`] is a caller-side
/// condition that leaves the registry consistent.
#[derive(Error, Debug)]
pub enum AnchorError {
    #[error("origin location must be set before annotations can be anchored")]
    OriginNotSet,

    #[error("annotation {0} has no anchor")]
    NotAnchored(AnnotationId),

    #[error("annotation {annotation} is already paired with anchor {anchor}")]
    AlreadyAnchored {
        annotation: AnnotationId,
        anchor: AnchorId,
    },

    #[error("batch aborted after {added} annotations; {} not added: {source}", .not_added.len())]
    BatchAborted {
        added: usize,
        not_added: Vec<AnnotationId>,
        #[source]
        source: Box<AnchorError>,
    },

    #[error("anchor {0} was retired before the host confirmed it")]
    AnchorRetired(AnchorId),

    #[error("registry inconsistency: host confirmed anchor {0}, which has no annotation")]
    UnknownAnchor(AnchorId),
}

impl AnchorError {
    /// True when the registry itself is broken, as opposed to a caller mistake.
    pub fn is_invariant_violation(&self) -> bool {
        match self {
            AnchorError::UnknownAnchor(_) => true,
            AnchorError::BatchAborted { source, .. } => source.is_invariant_violation(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, AnchorError>;
