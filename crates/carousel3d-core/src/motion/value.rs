//! L3 Molecular Layer: Two-channel animated value
//!
//! The live carousel offset. Its visible value is `base + offset`: gestures
//! write the base while the offset holds the position the drag started from.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::spring::{Spring, SpringParams};

/// A pair of scalars, one per axis
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Handle returned by [`AnimatedValueXY::add_listener`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Callback invoked with the visible value whenever it changes
pub type Listener = Box<dyn FnMut(Vec2)>;

/// The animated-value collaborator the carousel drives
///
/// Implementations are single-threaded: listeners run synchronously inside
/// the call that changed the value.
pub trait AnimatedValueXY {
    /// Current visible value (`base + offset`)
    fn value(&self) -> Vec2;

    /// Replace the base value, cancelling any running spring
    fn set_value(&mut self, value: Vec2);

    /// Replace the offset added on top of the base
    fn set_offset(&mut self, offset: Vec2);

    /// Fold the offset into the base and zero it; the visible value is unchanged
    fn flatten_offset(&mut self);

    fn add_listener(&mut self, listener: Listener) -> ListenerId;

    /// Returns false if the id was unknown
    fn remove_listener(&mut self, id: ListenerId) -> bool;

    /// Halt any running spring where it is and return the visible value
    fn stop_animation(&mut self) -> Vec2;

    /// Start a spring from the current base toward `target`
    ///
    /// Replaces any spring already running; the offset is left as is.
    fn spring_to(&mut self, target: Vec2, params: SpringParams);

    fn is_animating(&self) -> bool;

    /// Advance running springs by `dt` seconds; returns true while still moving
    ///
    /// Hosts that own their animation clock may treat this as a no-op.
    fn advance(&mut self, dt: f64) -> bool;
}

#[derive(Debug, Clone, Copy)]
struct ActiveSpring {
    x: Spring,
    y: Spring,
    params: SpringParams,
}

/// In-memory [`AnimatedValueXY`] that integrates its own springs
pub struct SpringValueXY {
    base: Vec2,
    offset: Vec2,
    spring: Option<ActiveSpring>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl fmt::Debug for SpringValueXY {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpringValueXY")
            .field("base", &self.base)
            .field("offset", &self.offset)
            .field("spring", &self.spring)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for SpringValueXY {
    fn default() -> Self {
        Self::new(Vec2::ZERO)
    }
}

impl SpringValueXY {
    pub fn new(initial: Vec2) -> Self {
        Self {
            base: initial,
            offset: Vec2::ZERO,
            spring: None,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    /// Target of the running spring, if any
    pub fn spring_target(&self) -> Option<Vec2> {
        self.spring
            .as_ref()
            .map(|s| Vec2::new(s.x.target, s.y.target) + self.offset)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn notify(&mut self) {
        let value = self.value();
        for (_, listener) in self.listeners.iter_mut() {
            listener(value);
        }
    }
}

impl AnimatedValueXY for SpringValueXY {
    #[inline]
    fn value(&self) -> Vec2 {
        self.base + self.offset
    }

    fn set_value(&mut self, value: Vec2) {
        self.spring = None;
        self.base = value;
        self.notify();
    }

    fn set_offset(&mut self, offset: Vec2) {
        self.offset = offset;
        self.notify();
    }

    fn flatten_offset(&mut self) {
        self.base = self.base + self.offset;
        self.offset = Vec2::ZERO;
        if let Some(spring) = self.spring.as_mut() {
            // keep the running spring in the same visible place
            spring.x.position = self.base.x;
            spring.y.position = self.base.y;
        }
    }

    fn add_listener(&mut self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, listener));
        id
    }

    fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    fn stop_animation(&mut self) -> Vec2 {
        self.spring = None;
        self.value()
    }

    fn spring_to(&mut self, target: Vec2, params: SpringParams) {
        let (vx, vy) = self
            .spring
            .as_ref()
            .map(|s| (s.x.velocity, s.y.velocity))
            .unwrap_or((0.0, 0.0));
        let mut x = Spring::new(self.base.x, target.x);
        let mut y = Spring::new(self.base.y, target.y);
        x.velocity = vx;
        y.velocity = vy;
        tracing::debug!(
            from_x = self.base.x,
            from_y = self.base.y,
            to_x = target.x,
            to_y = target.y,
            "Spring started"
        );
        self.spring = Some(ActiveSpring { x, y, params });
    }

    #[inline]
    fn is_animating(&self) -> bool {
        self.spring.is_some()
    }

    fn advance(&mut self, dt: f64) -> bool {
        let Some(mut active) = self.spring else {
            return false;
        };

        active.x.step(dt, &active.params);
        active.y.step(dt, &active.params);

        let done = active.x.is_at_rest(&active.params) && active.y.is_at_rest(&active.params);
        if done {
            active.x.settle();
            active.y.settle();
            self.spring = None;
            tracing::debug!(x = active.x.position, y = active.y.position, "Spring settled");
        } else {
            self.spring = Some(active);
        }

        self.base = Vec2::new(active.x.position, active.y.position);
        self.notify();
        !done
    }
}
