//! Select-callback bookkeeping.
//!
//! Keeps the latest callback the owner supplied and, separately, the one
//! actually registered on the engine. At most one registration is live at
//! any time, and it is always the latest callback as of registration.

use crate::engine::{Engine, EngineEvent, SelectListener};

#[derive(Debug, Default)]
pub struct EventBridge {
    /// Latest callback supplied by the owner.
    current: Option<SelectListener>,
    /// Callback registered on the live engine, if any.
    registered: Option<SelectListener>,
}

impl EventBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a new callback value. If its identity differs from the current
    /// one, the registered callback is removed and the new one (if present)
    /// registered in its place.
    pub fn set_listener<E: Engine>(&mut self, listener: Option<SelectListener>, engine: Option<&mut E>) {
        let unchanged = match (&self.current, &listener) {
            (Some(old), Some(new)) => old.same(new),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return;
        }
        self.current = listener;
        if let Some(engine) = engine {
            self.detach(engine);
            self.attach(engine);
        }
    }

    /// Register the current callback on `engine` if nothing is registered.
    pub fn attach<E: Engine>(&mut self, engine: &mut E) {
        if self.registered.is_some() {
            return;
        }
        if let Some(listener) = &self.current {
            log::debug!("registering select listener {listener:?}");
            engine.on(EngineEvent::Select, listener.clone());
            self.registered = Some(listener.clone());
        }
    }

    /// Remove whatever is registered on `engine`.
    pub fn detach<E: Engine>(&mut self, engine: &mut E) {
        if let Some(listener) = self.registered.take() {
            log::debug!("removing select listener {listener:?}");
            engine.remove_listener(EngineEvent::Select, &listener);
        }
    }

    pub fn current(&self) -> Option<&SelectListener> {
        self.current.as_ref()
    }

    pub fn registered(&self) -> Option<&SelectListener> {
        self.registered.as_ref()
    }
}
