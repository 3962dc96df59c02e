//! Tracking of the two externally owned resource handles.
//!
//! Hosts deliver the container and the surface independently, in either
//! order, and may hand the same handle back repeatedly. Each cell remembers
//! the last handle it saw and reports whether a write actually changed it.
//! The component re-evaluates engine construction on every change.

use crate::engine::{Container, Surface};

/// Last seen container and surface handles.
pub struct RefCoordinator<C, S> {
    container: Option<C>,
    surface: Option<S>,
}

impl<C: Container, S: Surface> RefCoordinator<C, S> {
    pub fn new() -> Self {
        Self {
            container: None,
            surface: None,
        }
    }

    /// Store a container handle. Returns `true` if its identity differs
    /// from the stored one (including attach and detach).
    pub fn set_container(&mut self, handle: Option<C>) -> bool {
        let changed = match (&self.container, &handle) {
            (Some(old), Some(new)) => !old.same_handle(new),
            (None, None) => false,
            _ => true,
        };
        if changed {
            self.container = handle;
        }
        changed
    }

    /// Store a surface handle. Same contract as [`Self::set_container`].
    pub fn set_surface(&mut self, handle: Option<S>) -> bool {
        let changed = match (&self.surface, &handle) {
            (Some(old), Some(new)) => !old.same_handle(new),
            (None, None) => false,
            _ => true,
        };
        if changed {
            self.surface = handle;
        }
        changed
    }

    pub fn container(&self) -> Option<&C> {
        self.container.as_ref()
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    /// Both handles, if both are attached.
    pub fn both(&self) -> Option<(&C, &S)> {
        Some((self.container.as_ref()?, self.surface.as_ref()?))
    }

    pub fn clear(&mut self) {
        self.container = None;
        self.surface = None;
    }
}

impl<C: Container, S: Surface> Default for RefCoordinator<C, S> {
    fn default() -> Self {
        Self::new()
    }
}
