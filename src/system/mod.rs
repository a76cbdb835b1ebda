//! Cross-thread delivery of host callbacks.
//!
//! The registry is single-threaded. Host runtimes that call back from another
//! thread post [`HostEvent`]s through a [`HostEventSender`], and the owning
//! thread applies them in arrival order with
//! `AnnotationManager::process_events`.

pub mod event_queue;
pub mod messages;

pub use event_queue::{HostEventQueue, HostEventSender, ProcessReport};
pub use messages::HostEvent;
