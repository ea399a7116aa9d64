use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use crossterm::event::MouseEvent;

use carousel3d_core::{
    AppConfig, Carousel, GestureEvent, SwipeOutcome, UiConfig, Viewport, SWIPE_THRESHOLD,
};

use crate::input::Action;
use crate::pointer::PointerTracker;

/// Rows reserved below the stage for the status bar
pub const STATUS_BAR_HEIGHT: u16 = 1;

/// Delta of a keyboard swipe, just past the commit threshold
const KEY_SWIPE: f64 = SWIPE_THRESHOLD + 10.0;

/// Main application state
pub struct App {
    pub carousel: Carousel,
    pub items: Vec<String>,
    pub ui: UiConfig,
    pointer: PointerTracker,
    last_swipe: Rc<RefCell<Option<SwipeOutcome>>>,
    pub status_message: Option<String>,
    pub should_quit: bool,
}

impl App {
    /// Build the app for a terminal of `cols x rows` cells
    pub fn new(items: Vec<String>, config: &AppConfig, cols: u16, rows: u16) -> Result<Self> {
        let ui = config.ui.clone();
        let (width, height) = stage_units(&ui, cols, rows);
        let mut carousel = Carousel::for_screen(items.len(), width, height, config.carousel.clone())?;

        let last_swipe = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&last_swipe);
        carousel.on_swipe(move |outcome| {
            *sink.borrow_mut() = Some(outcome);
        });

        Ok(Self {
            carousel,
            items,
            pointer: PointerTracker::new(ui.units_per_column, ui.units_per_row),
            ui,
            last_swipe,
            status_message: None,
            should_quit: false,
        })
    }

    pub fn last_swipe(&self) -> Option<SwipeOutcome> {
        *self.last_swipe.borrow()
    }

    pub fn current_label(&self) -> Option<&str> {
        self.items
            .get(self.carousel.current_index())
            .map(String::as_str)
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Whether the next frame should be polled at the animation rate
    pub fn is_animating(&self) -> bool {
        self.pointer.is_pressed() || self.carousel.is_active()
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::SwipePrev => self.synthesize_swipe(KEY_SWIPE, 0.0),
            Action::SwipeNext => self.synthesize_swipe(-KEY_SWIPE, 0.0),
            Action::SwipeUp => self.synthesize_swipe(0.0, -KEY_SWIPE),
            Action::SwipeDown => self.synthesize_swipe(0.0, KEY_SWIPE),
            Action::Home => {
                self.pointer.cancel();
                self.carousel.jump_to(0);
                self.clear_status();
            }
            Action::ToggleLoop => {
                let enabled = !self.carousel.config().loop_enabled;
                self.carousel.set_loop_enabled(enabled);
                self.set_status(format!("Loop {}", if enabled { "on" } else { "off" }));
            }
            Action::CycleDirection => {
                self.pointer.cancel();
                let direction = self.carousel.config().scroll_direction.next();
                self.carousel.set_scroll_direction(direction);
                self.set_status(format!("Direction: {}", direction.as_str()));
            }
            Action::None => {}
        }
    }

    /// Feed a terminal mouse event through the pointer tracker
    pub fn handle_mouse(&mut self, event: &MouseEvent) {
        if let Some(gesture) = self.pointer.handle(event) {
            if gesture == GestureEvent::Start {
                self.clear_status();
            }
            self.carousel.handle_gesture(gesture);
        }
    }

    /// Resize the stage; a terminal too small for a card keeps the old size
    pub fn resize(&mut self, cols: u16, rows: u16) {
        let (width, height) = stage_units(&self.ui, cols, rows);
        match Viewport::from_screen(width, height, self.carousel.config()) {
            Ok(viewport) => self.carousel.resize(viewport),
            Err(e) => tracing::warn!("Ignoring resize to {}x{}: {}", cols, rows, e),
        }
    }

    /// Advance the spring by `dt` seconds
    pub fn tick(&mut self, dt: f64) -> bool {
        self.carousel.tick(dt)
    }

    /// A full start/move/release sequence, as a quick drag would produce
    fn synthesize_swipe(&mut self, dx: f64, dy: f64) {
        self.pointer.cancel();
        self.clear_status();
        self.carousel.handle_gesture(GestureEvent::Start);
        self.carousel.handle_gesture(GestureEvent::Move { dx, dy });
        self.carousel.handle_gesture(GestureEvent::Release { dx, dy });
    }
}

/// Stage size in carousel units for a terminal of `cols x rows`
pub fn stage_units(ui: &UiConfig, cols: u16, rows: u16) -> (f64, f64) {
    let stage_rows = rows.saturating_sub(STATUS_BAR_HEIGHT).max(1);
    (
        f64::from(cols) * ui.units_per_column,
        f64::from(stage_rows) * ui.units_per_row,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use carousel3d_core::{Axis, ScrollDirection, SwipeDirection};
    use crossterm::event::{KeyModifiers, MouseButton, MouseEventKind};

    fn app(count: usize) -> App {
        let items = (1..=count).map(|i| format!("Card {}", i)).collect();
        App::new(items, &AppConfig::default(), 80, 25).unwrap()
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_stage_excludes_status_bar() {
        let ui = UiConfig::default();
        assert_eq!(stage_units(&ui, 80, 25), (800.0, 480.0));
        assert_eq!(stage_units(&ui, 80, 0), (800.0, 20.0));
    }

    #[test]
    fn test_keyboard_swipe_moves_to_next() {
        let mut app = app(3);
        app.handle_action(Action::SwipeNext);
        assert_eq!(app.carousel.current_index(), 1);
        assert_eq!(
            app.last_swipe(),
            Some(SwipeOutcome { direction: SwipeDirection::Left, index: 1 })
        );
        assert_eq!(app.current_label(), Some("Card 2"));
        assert!(app.is_animating());
    }

    #[test]
    fn test_keyboard_swipe_clamps_without_loop() {
        let mut app = app(3);
        app.handle_action(Action::SwipePrev);
        assert_eq!(app.carousel.current_index(), 0);
        assert_eq!(
            app.last_swipe(),
            Some(SwipeOutcome { direction: SwipeDirection::Right, index: 0 })
        );

        app.handle_action(Action::ToggleLoop);
        assert!(app.carousel.config().loop_enabled);
        assert_eq!(app.status_message.as_deref(), Some("Loop on"));
        app.handle_action(Action::SwipePrev);
        assert_eq!(app.carousel.current_index(), 2);
    }

    #[test]
    fn test_cycle_direction_switches_axis() {
        let mut app = app(3);
        app.handle_action(Action::CycleDirection);
        assert_eq!(app.carousel.config().scroll_direction, ScrollDirection::Vertical);
        assert_eq!(app.carousel.axis(), Axis::Vertical);

        app.handle_action(Action::SwipeUp);
        assert_eq!(app.carousel.current_index(), 1);
        assert_eq!(
            app.last_swipe().map(|o| o.direction),
            Some(SwipeDirection::Up)
        );
    }

    #[test]
    fn test_mouse_drag_commits_swipe() {
        let mut app = app(3);
        app.handle_mouse(&mouse(MouseEventKind::Down(MouseButton::Left), 40, 10));
        app.handle_mouse(&mouse(MouseEventKind::Drag(MouseButton::Left), 34, 10));
        assert!(app.is_animating());
        assert_eq!(app.carousel.offset().x, -60.0);
        app.handle_mouse(&mouse(MouseEventKind::Up(MouseButton::Left), 32, 10));
        assert_eq!(app.carousel.current_index(), 1);
    }

    #[test]
    fn test_tick_settles_and_home_resets() {
        let mut app = app(3);
        app.handle_action(Action::SwipeNext);
        for _ in 0..600 {
            if !app.tick(1.0 / 60.0) {
                break;
            }
        }
        assert!(!app.is_animating());
        assert!((app.carousel.offset().x + 800.0).abs() < 0.01);

        app.handle_action(Action::Home);
        assert_eq!(app.carousel.current_index(), 0);
        assert_eq!(app.carousel.offset().x, 0.0);
    }

    #[test]
    fn test_resize_rebuilds_geometry() {
        let mut app = app(3);
        app.resize(100, 31);
        assert_eq!(app.carousel.geometry().width(), 1000.0);
        assert!((app.carousel.geometry().height() - 480.0).abs() < 1e-9);
    }

    #[test]
    fn test_quit() {
        let mut app = app(1);
        app.handle_action(Action::Quit);
        assert!(app.should_quit);
    }
}
