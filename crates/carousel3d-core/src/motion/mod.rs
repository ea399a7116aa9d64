//! Motion primitives for the carousel
//!
//! Everything that moves a number over time or maps one number onto another
//! lives here. Nothing in this module knows about items or gestures.
//!
//! # Architecture
//!
//! ## L4 Atomic Layer
//! - `interpolation` - Clamped piecewise-linear maps and their periodic tiling
//! - `spring` - Damped spring integration on a single axis
//!
//! ## L3 Molecular Layer
//! - `value` - Two-channel animated value with offset, listeners and springs
//!
//! # Usage
//!
//! ```ignore
//! use carousel3d_core::motion::{AnimatedValueXY, SpringValueXY, SpringParams, Vec2};
//!
//! let mut value = SpringValueXY::new(Vec2::ZERO);
//! value.spring_to(Vec2::new(-400.0, 0.0), SpringParams::default());
//!
//! // Once per frame
//! let still_moving = value.advance(1.0 / 60.0);
//! let offset = value.value();
//! ```

// L4 Atomic Layer
pub mod interpolation;
pub mod spring;

// L3 Molecular Layer
pub mod value;

pub use interpolation::{interpolate, interpolate_wrapped, lerp, Interpolation};
pub use spring::{Spring, SpringParams};
pub use value::{AnimatedValueXY, Listener, ListenerId, SpringValueXY, Vec2};
