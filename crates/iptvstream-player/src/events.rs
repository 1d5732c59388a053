//! Delivery of engine and surface callbacks to the supervisor.
//!
//! Every callback is tagged with the activation it belongs to, so the
//! supervisor can discard stragglers from an activation it already tore down.

use iptvstream_common::ActivationId;
use tokio::sync::mpsc;

use crate::engine::EngineEvent;
use crate::surface::SurfaceEvent;

/// A callback from either side of the playback pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    Engine(EngineEvent),
    Surface(SurfaceEvent),
}

impl From<EngineEvent> for MediaEvent {
    fn from(event: EngineEvent) -> Self {
        Self::Engine(event)
    }
}

impl From<SurfaceEvent> for MediaEvent {
    fn from(event: SurfaceEvent) -> Self {
        Self::Surface(event)
    }
}

/// A [`MediaEvent`] with the activation that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedEvent {
    pub activation: ActivationId,
    pub event: MediaEvent,
}

/// Sending half handed to engines and surfaces for one activation.
#[derive(Debug, Clone)]
pub struct EventSink {
    activation: ActivationId,
    tx: mpsc::UnboundedSender<TaggedEvent>,
}

impl EventSink {
    pub fn new(activation: ActivationId, tx: mpsc::UnboundedSender<TaggedEvent>) -> Self {
        Self { activation, tx }
    }

    /// A sink whose receiver is already gone. Emitting is a no-op.
    pub fn detached(activation: ActivationId) -> Self {
        let (tx, _rx) = mpsc::unbounded_channel();
        Self { activation, tx }
    }

    pub fn activation(&self) -> ActivationId {
        self.activation
    }

    /// Queue an event. Returns `false` once the player is gone.
    pub fn emit(&self, event: impl Into<MediaEvent>) -> bool {
        self.tx
            .send(TaggedEvent {
                activation: self.activation,
                event: event.into(),
            })
            .is_ok()
    }
}
