pub mod carousel;
pub mod config;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod motion;
pub mod transform;

pub use carousel::{Carousel, RenderedItem};
pub use config::{
    AppConfig, CarouselConfig, FadeConfig, PerspectiveConfig, PerspectivePreset, ScrollDirection,
    SpringConfig, UiConfig,
};
pub use error::{Error, Result};
pub use geometry::{GeometryTable, Viewport};
pub use gesture::{
    decide_swipe, Axis, GestureEvent, GesturePhase, GestureStateMachine, SwipeDirection,
    SwipeOutcome, SWIPE_THRESHOLD,
};
pub use motion::{AnimatedValueXY, Interpolation, ListenerId, SpringValueXY, Vec2};
pub use transform::{ItemFrame, ItemTransform, TransformEngine, TransformOp};
