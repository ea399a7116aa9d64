use crate::config::{CarouselConfig, ScrollDirection};
use crate::geometry::GeometryTable;
use crate::motion::{AnimatedValueXY, SpringParams, Vec2};

use super::{Axis, GestureEvent, GesturePhase, SwipeDirection, SwipeOutcome};

/// Release delta beyond which a swipe moves to a neighbouring item
pub const SWIPE_THRESHOLD: f64 = 50.0;

/// Pick the settle index for a release
///
/// A positive delta past the threshold moves back one item, a negative one
/// moves forward. With looping, stepping back from the first item lands on
/// the last and stepping forward from the last lands on the first; the
/// direction label stays the plain one.
pub fn decide_swipe(
    current: usize,
    delta: f64,
    axis: Axis,
    count: usize,
    looping: bool,
) -> SwipeOutcome {
    let last = count.saturating_sub(1);
    let wraps = looping && count > 1;
    let (back, forward) = match axis {
        Axis::Horizontal => (SwipeDirection::Right, SwipeDirection::Left),
        Axis::Vertical => (SwipeDirection::Down, SwipeDirection::Up),
    };

    if delta > SWIPE_THRESHOLD {
        let index = if wraps && current == 0 {
            last
        } else {
            current.saturating_sub(1)
        };
        SwipeOutcome {
            direction: back,
            index,
        }
    } else if delta < -SWIPE_THRESHOLD {
        let index = if wraps && current == last {
            0
        } else {
            (current + 1).min(last)
        };
        SwipeOutcome {
            direction: forward,
            index,
        }
    } else {
        SwipeOutcome {
            direction: SwipeDirection::None,
            index: current.min(last),
        }
    }
}

/// Tracks one gesture at a time and owns the committed index
#[derive(Debug, Clone)]
pub struct GestureStateMachine {
    scroll_direction: ScrollDirection,
    loop_enabled: bool,
    axis_lock_slop: f64,
    spring: SpringParams,
    phase: GesturePhase,
    current_index: usize,
    /// Axis of the most recent gesture; selects the descriptor shape
    axis: Axis,
    /// Lock for the gesture in flight
    lock: Option<Axis>,
    last_settled: Vec2,
}

impl GestureStateMachine {
    pub fn new(config: &CarouselConfig) -> Self {
        Self {
            scroll_direction: config.scroll_direction,
            loop_enabled: config.loop_enabled,
            axis_lock_slop: config.axis_lock_slop,
            spring: SpringParams::from(&config.spring),
            phase: GesturePhase::Idle,
            current_index: 0,
            axis: initial_axis(config.scroll_direction),
            lock: None,
            last_settled: Vec2::ZERO,
        }
    }

    #[inline]
    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    #[inline]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[inline]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Offset of the last committed rest position
    #[inline]
    pub fn last_settled(&self) -> Vec2 {
        self.last_settled
    }

    pub fn scroll_direction(&self) -> ScrollDirection {
        self.scroll_direction
    }

    pub fn set_scroll_direction(&mut self, direction: ScrollDirection) {
        self.scroll_direction = direction;
        if direction != ScrollDirection::All {
            self.axis = initial_axis(direction);
        }
    }

    pub fn loop_enabled(&self) -> bool {
        self.loop_enabled
    }

    pub fn set_loop_enabled(&mut self, enabled: bool) {
        self.loop_enabled = enabled;
    }

    /// Feed one gesture event; returns the outcome on release
    pub fn handle<V>(
        &mut self,
        event: GestureEvent,
        value: &mut V,
        geometry: &GeometryTable,
    ) -> Option<SwipeOutcome>
    where
        V: AnimatedValueXY + ?Sized,
    {
        match event {
            GestureEvent::Start => {
                self.begin(value, geometry);
                None
            }
            GestureEvent::Move { dx, dy } => {
                if self.phase != GesturePhase::Dragging {
                    tracing::debug!("Move without start, beginning gesture implicitly");
                    self.begin(value, geometry);
                }
                self.drag(dx, dy, value);
                None
            }
            GestureEvent::Release { dx, dy } => {
                if self.phase != GesturePhase::Dragging {
                    tracing::debug!("Release without start, beginning gesture implicitly");
                    self.begin(value, geometry);
                }
                self.release(dx, dy, value, geometry)
            }
        }
    }

    /// Call after each animation step; drops back to idle once the spring rests
    pub fn on_frame(&mut self, still_animating: bool) {
        if self.phase == GesturePhase::SnapAnimating && !still_animating {
            self.phase = GesturePhase::Idle;
            tracing::debug!(index = self.current_index, "Snap spring settled");
        }
    }

    /// Place the carousel on `index` without animating
    ///
    /// Used when the item list or viewport changes under the carousel.
    pub fn jump_to<V>(&mut self, index: usize, value: &mut V, geometry: &GeometryTable)
    where
        V: AnimatedValueXY + ?Sized,
    {
        self.current_index = index.min(geometry.count().saturating_sub(1));
        self.last_settled = self.rest_offset(self.axis, self.current_index, geometry);
        self.phase = GesturePhase::Idle;
        self.lock = None;
        value.stop_animation();
        value.set_offset(Vec2::ZERO);
        value.set_value(self.last_settled);
    }

    /// Gesture start: preempt any spring and rebase on the current value
    ///
    /// In dual-axis mode the channel the previous gesture did not drive is
    /// rebased on the committed item's page, so a gesture on the other axis
    /// starts from the item on screen rather than from zero.
    fn begin<V>(&mut self, value: &mut V, geometry: &GeometryTable)
    where
        V: AnimatedValueXY + ?Sized,
    {
        let interrupted = self.phase == GesturePhase::SnapAnimating;
        value.stop_animation();
        value.flatten_offset();
        let current = value.value();
        let baseline = match (self.scroll_direction, self.axis) {
            (ScrollDirection::All, Axis::Horizontal) => {
                Vec2::new(current.x, geometry.page_y(self.current_index))
            }
            (ScrollDirection::All, Axis::Vertical) => {
                Vec2::new(geometry.page_x(self.current_index), current.y)
            }
            _ => current,
        };
        value.set_value(Vec2::ZERO);
        value.set_offset(baseline);

        self.phase = GesturePhase::Dragging;
        self.lock = match self.scroll_direction {
            ScrollDirection::Horizontal => Some(Axis::Horizontal),
            ScrollDirection::Vertical => Some(Axis::Vertical),
            ScrollDirection::All => None,
        };
        if let Some(axis) = self.lock {
            self.axis = axis;
        }

        tracing::debug!(
            x = baseline.x,
            y = baseline.y,
            interrupted,
            "Gesture started"
        );
    }

    fn drag<V>(&mut self, dx: f64, dy: f64, value: &mut V)
    where
        V: AnimatedValueXY + ?Sized,
    {
        let axis = match self.lock {
            Some(axis) => axis,
            None if dx.abs().max(dy.abs()) > self.axis_lock_slop => {
                let axis = Axis::dominant(dx, dy);
                self.lock = Some(axis);
                self.axis = axis;
                tracing::debug!(axis = axis.as_str(), dx, dy, "Axis locked");
                axis
            }
            None => {
                tracing::trace!(dx, dy, "Below axis lock slop");
                return;
            }
        };

        tracing::trace!(dx, dy, axis = axis.as_str(), "Drag");
        value.set_value(match axis {
            Axis::Horizontal => Vec2::new(dx, 0.0),
            Axis::Vertical => Vec2::new(0.0, dy),
        });
    }

    fn release<V>(
        &mut self,
        dx: f64,
        dy: f64,
        value: &mut V,
        geometry: &GeometryTable,
    ) -> Option<SwipeOutcome>
    where
        V: AnimatedValueXY + ?Sized,
    {
        let axis = self.lock.take().unwrap_or_else(|| Axis::dominant(dx, dy));
        self.axis = axis;
        value.flatten_offset();

        if geometry.is_empty() {
            tracing::debug!("Release on empty carousel, nothing to commit");
            self.last_settled = Vec2::ZERO;
            value.spring_to(Vec2::ZERO, self.spring);
            self.phase = GesturePhase::SnapAnimating;
            return None;
        }

        let delta = match axis {
            Axis::Horizontal => dx,
            Axis::Vertical => dy,
        };
        let count = geometry.count();
        let previous = self.current_index;
        let outcome = decide_swipe(previous, delta, axis, count, self.loop_enabled);
        let wrapped = (delta > SWIPE_THRESHOLD && outcome.index > previous)
            || (delta < -SWIPE_THRESHOLD && outcome.index < previous);

        let target = self.rest_offset(axis, outcome.index, geometry);
        self.last_settled = target;
        self.current_index = outcome.index;
        self.phase = GesturePhase::SnapAnimating;
        value.spring_to(target, self.spring);

        tracing::info!(
            direction = %outcome.direction,
            from = previous,
            index = outcome.index,
            wrapped,
            "Swipe committed"
        );
        Some(outcome)
    }

    /// Resting offset of `index`; the axis not being swiped rests at zero
    fn rest_offset(&self, axis: Axis, index: usize, geometry: &GeometryTable) -> Vec2 {
        match axis {
            Axis::Horizontal => Vec2::new(geometry.page_x(index), 0.0),
            Axis::Vertical => Vec2::new(0.0, geometry.page_y(index)),
        }
    }
}

fn initial_axis(direction: ScrollDirection) -> Axis {
    match direction {
        ScrollDirection::Vertical => Axis::Vertical,
        ScrollDirection::Horizontal | ScrollDirection::All => Axis::Horizontal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Viewport;
    use crate::motion::SpringValueXY;

    fn setup(count: usize, config: CarouselConfig) -> (GestureStateMachine, SpringValueXY, GeometryTable) {
        let geometry = GeometryTable::new(count, Viewport::new(400.0, 600.0).unwrap());
        (GestureStateMachine::new(&config), SpringValueXY::default(), geometry)
    }

    fn swipe(
        machine: &mut GestureStateMachine,
        value: &mut SpringValueXY,
        geometry: &GeometryTable,
        dx: f64,
        dy: f64,
    ) -> Option<SwipeOutcome> {
        machine.handle(GestureEvent::Start, value, geometry);
        machine.handle(GestureEvent::Move { dx, dy }, value, geometry);
        machine.handle(GestureEvent::Release { dx, dy }, value, geometry)
    }

    fn settle(machine: &mut GestureStateMachine, value: &mut SpringValueXY) {
        for _ in 0..60 * 10 {
            let moving = value.advance(1.0 / 60.0);
            machine.on_frame(moving);
            if !moving {
                return;
            }
        }
        panic!("spring never settled");
    }

    #[test]
    fn test_decide_swipe_thresholds() {
        let h = Axis::Horizontal;
        assert_eq!(decide_swipe(1, 51.0, h, 3, false).index, 0);
        assert_eq!(decide_swipe(1, -51.0, h, 3, false).index, 2);
        assert_eq!(decide_swipe(1, 50.0, h, 3, false).index, 1);
        assert_eq!(decide_swipe(1, -50.0, h, 3, false).direction, SwipeDirection::None);
        assert_eq!(decide_swipe(0, 80.0, h, 3, false).index, 0);
        assert_eq!(decide_swipe(2, -80.0, h, 3, false).index, 2);
    }

    #[test]
    fn test_decide_swipe_wraps_only_with_loop() {
        let h = Axis::Horizontal;
        assert_eq!(decide_swipe(0, 80.0, h, 3, true).index, 2);
        assert_eq!(decide_swipe(2, -80.0, h, 3, true).index, 0);
        assert_eq!(decide_swipe(0, 80.0, h, 3, true).direction, SwipeDirection::Right);
        assert_eq!(decide_swipe(1, 80.0, h, 3, true).index, 0);
        assert_eq!(decide_swipe(0, 80.0, h, 1, true).index, 0);
    }

    #[test]
    fn test_decide_swipe_vertical_labels() {
        let v = Axis::Vertical;
        assert_eq!(decide_swipe(1, 90.0, v, 3, false).direction, SwipeDirection::Down);
        assert_eq!(decide_swipe(1, -90.0, v, 3, false).direction, SwipeDirection::Up);
    }

    #[test]
    fn test_swipe_left_advances() {
        let (mut machine, mut value, geometry) = setup(3, CarouselConfig::default());
        let outcome = swipe(&mut machine, &mut value, &geometry, -80.0, 0.0).unwrap();

        assert_eq!(outcome, SwipeOutcome { direction: SwipeDirection::Left, index: 1 });
        assert_eq!(machine.current_index(), 1);
        assert_eq!(machine.phase(), GesturePhase::SnapAnimating);
        assert_eq!(machine.last_settled(), Vec2::new(-400.0, 0.0));

        settle(&mut machine, &mut value);
        assert_eq!(machine.phase(), GesturePhase::Idle);
        assert_eq!(value.value(), Vec2::new(-400.0, 0.0));
    }

    #[test]
    fn test_loop_wraps_back_from_first() {
        let config = CarouselConfig {
            loop_enabled: true,
            ..Default::default()
        };
        let (mut machine, mut value, geometry) = setup(3, config);
        let outcome = swipe(&mut machine, &mut value, &geometry, 80.0, 0.0).unwrap();

        assert_eq!(outcome, SwipeOutcome { direction: SwipeDirection::Right, index: 2 });
        assert_eq!(value.spring_target(), Some(Vec2::new(-800.0, 0.0)));
    }

    #[test]
    fn test_single_item_never_moves() {
        let config = CarouselConfig {
            loop_enabled: true,
            ..Default::default()
        };
        let (mut machine, mut value, geometry) = setup(1, config);
        for dx in [-300.0, 300.0, 20.0, -51.0] {
            let outcome = swipe(&mut machine, &mut value, &geometry, dx, 0.0).unwrap();
            assert_eq!(outcome.index, 0);
            assert_eq!(machine.current_index(), 0);
        }
    }

    #[test]
    fn test_small_release_springs_back_to_current() {
        let (mut machine, mut value, geometry) = setup(3, CarouselConfig::default());
        swipe(&mut machine, &mut value, &geometry, -80.0, 0.0);
        settle(&mut machine, &mut value);

        let outcome = swipe(&mut machine, &mut value, &geometry, -30.0, 0.0).unwrap();
        assert_eq!(outcome.direction, SwipeDirection::None);
        assert_eq!(outcome.index, 1);
        assert_eq!(value.value(), Vec2::new(-430.0, 0.0));
        settle(&mut machine, &mut value);
        assert_eq!(value.value(), Vec2::new(-400.0, 0.0));
    }

    #[test]
    fn test_drag_composes_with_baseline() {
        let (mut machine, mut value, geometry) = setup(3, CarouselConfig::default());
        swipe(&mut machine, &mut value, &geometry, -80.0, 0.0);
        settle(&mut machine, &mut value);

        machine.handle(GestureEvent::Start, &mut value, &geometry);
        machine.handle(GestureEvent::Move { dx: -25.0, dy: 40.0 }, &mut value, &geometry);
        // horizontal mode ignores dy entirely
        assert_eq!(value.value(), Vec2::new(-425.0, 0.0));
    }

    #[test]
    fn test_dual_axis_locks_on_first_meaningful_move() {
        let config = CarouselConfig {
            scroll_direction: ScrollDirection::All,
            ..Default::default()
        };
        let (mut machine, mut value, geometry) = setup(3, config);

        machine.handle(GestureEvent::Start, &mut value, &geometry);
        machine.handle(GestureEvent::Move { dx: 6.0, dy: 0.0 }, &mut value, &geometry);
        assert_eq!(value.value(), Vec2::ZERO);
        machine.handle(GestureEvent::Move { dx: 10.0, dy: 90.0 }, &mut value, &geometry);
        assert_eq!(machine.axis(), Axis::Vertical);
        assert_eq!(value.value(), Vec2::new(0.0, 90.0));

        // the lock holds even if the drag turns horizontal
        machine.handle(GestureEvent::Move { dx: -200.0, dy: 60.0 }, &mut value, &geometry);
        assert_eq!(value.value(), Vec2::new(0.0, 60.0));

        let outcome = machine
            .handle(GestureEvent::Release { dx: -200.0, dy: 60.0 }, &mut value, &geometry)
            .unwrap();
        assert_eq!(outcome.direction, SwipeDirection::Down);
        assert_eq!(outcome.index, 0);
    }

    #[test]
    fn test_dual_axis_release_without_lock_uses_release_delta() {
        let config = CarouselConfig {
            scroll_direction: ScrollDirection::All,
            ..Default::default()
        };
        let (mut machine, mut value, geometry) = setup(3, config);
        machine.handle(GestureEvent::Start, &mut value, &geometry);
        let outcome = machine
            .handle(GestureEvent::Release { dx: 5.0, dy: -70.0 }, &mut value, &geometry)
            .unwrap();
        assert_eq!(outcome, SwipeOutcome { direction: SwipeDirection::Up, index: 1 });
        assert_eq!(value.spring_target(), Some(Vec2::new(0.0, -600.0)));
    }

    #[test]
    fn test_new_gesture_preempts_spring() {
        let (mut machine, mut value, geometry) = setup(3, CarouselConfig::default());
        swipe(&mut machine, &mut value, &geometry, -80.0, 0.0);
        value.advance(0.1);
        let midflight = value.value();
        assert!(midflight.x > -400.0);

        machine.handle(GestureEvent::Start, &mut value, &geometry);
        assert!(!value.is_animating());
        assert_eq!(machine.phase(), GesturePhase::Dragging);
        assert_eq!(value.value(), midflight);

        machine.handle(GestureEvent::Move { dx: -10.0, dy: 0.0 }, &mut value, &geometry);
        assert!((value.value().x - (midflight.x - 10.0)).abs() < 1e-9);
    }

    #[test]
    fn test_dual_axis_switch_starts_from_committed_item() {
        let config = CarouselConfig {
            scroll_direction: ScrollDirection::All,
            ..Default::default()
        };
        let (mut machine, mut value, geometry) = setup(3, config);
        swipe(&mut machine, &mut value, &geometry, -80.0, 0.0);
        settle(&mut machine, &mut value);
        assert_eq!(machine.current_index(), 1);

        machine.handle(GestureEvent::Start, &mut value, &geometry);
        machine.handle(GestureEvent::Move { dx: 0.0, dy: -20.0 }, &mut value, &geometry);
        assert_eq!(machine.axis(), Axis::Vertical);
        assert_eq!(value.value(), Vec2::new(-400.0, -620.0));

        let outcome = machine
            .handle(GestureEvent::Release { dx: 0.0, dy: -20.0 }, &mut value, &geometry)
            .unwrap();
        assert_eq!(outcome.index, 1);
        settle(&mut machine, &mut value);
        assert_eq!(value.value(), Vec2::new(0.0, -600.0));
    }

    #[test]
    fn test_empty_release_commits_nothing() {
        let (mut machine, mut value, geometry) = setup(0, CarouselConfig::default());
        assert!(swipe(&mut machine, &mut value, &geometry, -80.0, 0.0).is_none());
        assert_eq!(machine.current_index(), 0);
    }

    #[test]
    fn test_vertical_mode_zeroes_horizontal_channel() {
        let config = CarouselConfig {
            scroll_direction: ScrollDirection::Vertical,
            ..Default::default()
        };
        let (mut machine, mut value, geometry) = setup(3, config);
        let outcome = swipe(&mut machine, &mut value, &geometry, -300.0, -90.0).unwrap();
        assert_eq!(outcome, SwipeOutcome { direction: SwipeDirection::Up, index: 1 });
        assert_eq!(machine.last_settled(), Vec2::new(0.0, -600.0));
        settle(&mut machine, &mut value);
        assert_eq!(value.value(), Vec2::new(0.0, -600.0));
    }

    #[test]
    fn test_jump_to_clamps() {
        let (mut machine, mut value, geometry) = setup(3, CarouselConfig::default());
        machine.jump_to(7, &mut value, &geometry);
        assert_eq!(machine.current_index(), 2);
        assert_eq!(value.value(), Vec2::new(-800.0, 0.0));
    }
}
