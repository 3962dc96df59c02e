//! Container resize observation.
//!
//! Holds the live subscription on the current container and turns a
//! reported content box into the surface size and engine `resize` call.

use crate::engine::{BoxSize, Engine, ResizeObservation, Surface};

pub struct SizeObserver<O: ResizeObservation> {
    observation: Option<O>,
}

impl<O: ResizeObservation> SizeObserver<O> {
    pub fn new() -> Self {
        Self { observation: None }
    }

    /// Replace the current subscription, disconnecting the previous one.
    pub fn observe(&mut self, observation: O) {
        self.disconnect();
        self.observation = Some(observation);
    }

    pub fn disconnect(&mut self) {
        if let Some(mut observation) = self.observation.take() {
            observation.disconnect();
            log::trace!("resize observation released");
        }
    }

    pub fn is_observing(&self) -> bool {
        self.observation.is_some()
    }

    /// Apply a reported container box. No-op until an engine exists.
    pub fn apply<E: Engine, S: Surface>(
        &self,
        size: BoxSize,
        surface: Option<&S>,
        engine: Option<&mut E>,
    ) {
        let Some(engine) = engine else {
            log::trace!("resize to {}x{} before engine exists, ignored", size.width, size.height);
            return;
        };
        let usable = size.usable();
        if let Some(surface) = surface {
            surface.set_size(usable);
        }
        engine.resize(usable.width, usable.height);
    }
}

impl<O: ResizeObservation> Default for SizeObserver<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: ResizeObservation> Drop for SizeObserver<O> {
    fn drop(&mut self) {
        self.disconnect();
    }
}
