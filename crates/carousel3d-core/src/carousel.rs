//! The carousel: gesture stream in, per-item transforms out
//!
//! Owns the geometry, the gesture state machine and the live offset. Hosts
//! feed it gesture events, call [`Carousel::tick`] once per frame, and read
//! back one [`ItemFrame`] per item whenever the offset has moved.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::config::{CarouselConfig, ScrollDirection};
use crate::geometry::{GeometryTable, Viewport};
use crate::gesture::{Axis, GestureEvent, GesturePhase, GestureStateMachine, SwipeOutcome};
use crate::motion::{AnimatedValueXY, ListenerId, SpringValueXY, Vec2};
use crate::transform::{ItemFrame, ItemTransform, TransformEngine};
use crate::Result;

/// An item from the caller's list paired with its frame
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedItem<'a, T> {
    pub item: &'a T,
    pub frame: ItemFrame,
}

type SwipeCallback = Box<dyn FnMut(SwipeOutcome)>;

pub struct Carousel<V: AnimatedValueXY = SpringValueXY> {
    config: CarouselConfig,
    engine: TransformEngine,
    machine: GestureStateMachine,
    value: V,
    listener: ListenerId,
    dirty: Rc<Cell<bool>>,
    on_swipe: Option<SwipeCallback>,
}

impl<V: AnimatedValueXY> fmt::Debug for Carousel<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Carousel")
            .field("count", &self.count())
            .field("viewport", &self.engine.geometry().viewport())
            .field("current_index", &self.machine.current_index())
            .field("phase", &self.machine.phase())
            .field("offset", &self.value.value())
            .finish()
    }
}

impl Carousel<SpringValueXY> {
    /// Carousel over `count` items with the built-in spring value
    pub fn new(count: usize, viewport: Viewport, config: CarouselConfig) -> Self {
        Self::with_value(count, viewport, config, SpringValueXY::default())
    }

    /// Size the cells from the screen, honoring custom width/height
    pub fn for_screen(
        count: usize,
        screen_width: f64,
        screen_height: f64,
        config: CarouselConfig,
    ) -> Result<Self> {
        let viewport = Viewport::from_screen(screen_width, screen_height, &config)?;
        Ok(Self::new(count, viewport, config))
    }
}

impl<V: AnimatedValueXY> Carousel<V> {
    /// Carousel driving a caller-supplied animated value
    pub fn with_value(count: usize, viewport: Viewport, config: CarouselConfig, mut value: V) -> Self {
        let geometry = GeometryTable::new(count, viewport);
        let engine = TransformEngine::new(geometry, &config);
        let machine = GestureStateMachine::new(&config);

        value.set_offset(Vec2::ZERO);
        value.set_value(Vec2::ZERO);

        let dirty = Rc::new(Cell::new(true));
        let flag = Rc::clone(&dirty);
        let listener = value.add_listener(Box::new(move |_| flag.set(true)));

        tracing::debug!(
            count,
            width = viewport.width,
            height = viewport.height,
            loop_enabled = config.loop_enabled,
            direction = config.scroll_direction.as_str(),
            "Carousel created"
        );

        Self {
            config,
            engine,
            machine,
            value,
            listener,
            dirty,
            on_swipe: None,
        }
    }

    /// Register the callback fired once per completed release
    pub fn on_swipe<F>(&mut self, callback: F)
    where
        F: FnMut(SwipeOutcome) + 'static,
    {
        self.on_swipe = Some(Box::new(callback));
    }

    /// Feed one gesture event
    pub fn handle_gesture(&mut self, event: GestureEvent) -> Option<SwipeOutcome> {
        let outcome = self
            .machine
            .handle(event, &mut self.value, self.engine.geometry());

        if let (Some(outcome), Some(callback)) = (outcome, self.on_swipe.as_mut()) {
            callback(outcome);
        }
        outcome
    }

    /// Advance the snap spring by `dt` seconds; returns true while it moves
    pub fn tick(&mut self, dt: f64) -> bool {
        let moving = self.value.advance(dt);
        self.machine.on_frame(moving);
        moving
    }

    /// Whether a drag or spring is in flight
    pub fn is_active(&self) -> bool {
        self.machine.phase() != GesturePhase::Idle || self.value.is_animating()
    }

    /// True once after every change of the live offset
    pub fn take_dirty(&self) -> bool {
        self.dirty.replace(false)
    }

    #[inline]
    pub fn offset(&self) -> Vec2 {
        self.value.value()
    }

    #[inline]
    pub fn current_index(&self) -> usize {
        self.machine.current_index()
    }

    #[inline]
    pub fn phase(&self) -> GesturePhase {
        self.machine.phase()
    }

    /// Axis whose descriptor shape is rendered
    #[inline]
    pub fn axis(&self) -> Axis {
        self.machine.axis()
    }

    pub fn last_settled(&self) -> Vec2 {
        self.machine.last_settled()
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.engine.geometry().count()
    }

    pub fn geometry(&self) -> &GeometryTable {
        self.engine.geometry()
    }

    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn set_loop_enabled(&mut self, enabled: bool) {
        self.config.loop_enabled = enabled;
        self.machine.set_loop_enabled(enabled);
        self.rebuild(self.engine.geometry().clone());
    }

    pub fn set_scroll_direction(&mut self, direction: ScrollDirection) {
        self.config.scroll_direction = direction;
        self.machine.set_scroll_direction(direction);
        self.jump_to(self.machine.current_index());
    }

    /// Snap straight to `index` without animating; out-of-range clamps
    pub fn jump_to(&mut self, index: usize) {
        let geometry = self.engine.geometry().clone();
        self.machine.jump_to(index, &mut self.value, &geometry);
    }

    /// Recompute geometry for a new item count
    pub fn set_item_count(&mut self, count: usize) {
        if count == self.count() {
            return;
        }
        tracing::debug!(from = self.count(), to = count, "Item count changed");
        let viewport = self.engine.geometry().viewport();
        self.relayout(GeometryTable::new(count, viewport));
    }

    /// Recompute geometry for a new cell size
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport == self.engine.geometry().viewport() {
            return;
        }
        tracing::debug!(width = viewport.width, height = viewport.height, "Viewport resized");
        let count = self.count();
        self.relayout(GeometryTable::new(count, viewport));
    }

    /// Transform of a single item at the live offset
    pub fn transform_for(&self, index: usize) -> ItemTransform {
        self.engine
            .transform_for(index, self.value.value(), self.machine.axis())
    }

    /// One frame per item, in list order
    pub fn frames(&self) -> Vec<ItemFrame> {
        self.engine.frames(self.value.value(), self.machine.axis())
    }

    /// Frames ordered back to front by `z_order`
    pub fn paint_order(&self) -> Vec<ItemFrame> {
        let mut frames = self.frames();
        frames.sort_by_key(|f| f.z_order);
        frames
    }

    /// Pair every item with its frame, resyncing geometry to the list length
    pub fn render<'a, T>(&mut self, items: &'a [T]) -> Vec<RenderedItem<'a, T>> {
        self.set_item_count(items.len());
        items
            .iter()
            .zip(self.frames())
            .map(|(item, frame)| RenderedItem { item, frame })
            .collect()
    }

    fn relayout(&mut self, geometry: GeometryTable) {
        let index = self.machine.current_index();
        self.rebuild(geometry.clone());
        self.machine.jump_to(index, &mut self.value, &geometry);
    }

    fn rebuild(&mut self, geometry: GeometryTable) {
        self.engine = TransformEngine::new(geometry, &self.config);
        self.dirty.set(true);
    }
}

impl<V: AnimatedValueXY> Drop for Carousel<V> {
    fn drop(&mut self) {
        self.value.remove_listener(self.listener);
    }
}
