pub mod component;
pub mod engine;
pub mod events;
pub mod model;
pub mod refs;
pub mod resize;
pub mod sync;

pub use component::FlameChartComponent;
pub use engine::{
    Backend, BoxSize, Container, Engine, EngineEvent, EngineOptions, ResizeObservation,
    SURFACE_INSET, SelectListener, Surface,
};
pub use model::*;
pub use sync::FlameChartProps;
